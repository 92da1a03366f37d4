//! Simulation domain models.
//!
//! Provides the data types shared by the dispatch loop and the analyzers:
//! immutable task definitions, the mutable instances created from them
//! during a run, and the execution record a run produces.
//!
//! # Ownership
//!
//! | Type | Created by | Mutated by |
//! |------|-----------|------------|
//! | Task | caller / config loader | never |
//! | Instance | instance generator | dispatch loop only |
//! | ExecutionTrace, Dispatch | dispatch loop | never after the run |

mod instance;
mod task;
mod trace;

pub use instance::{ExecutionInterval, Instance, InstanceId};
pub use task::{Task, TaskId, Time};
pub use trace::{Dispatch, ExecutionTrace, Slot};
