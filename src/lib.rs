//! Tick-level CPU scheduling simulator.
//!
//! Simulates a single processor running a set of tasks under one of six
//! classical policies, records which task held the CPU at every tick, and
//! analyzes the run for performance figures and anomalies.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Instance`, `ExecutionTrace`, `Slot`
//! - **`dispatching`**: `Policy` and the per-policy `SelectionRule`s
//! - **`scheduler`**: The dispatch loop (`Simulator`) and `SimulationMetrics`
//! - **`analysis`**: Starvation, priority inversion, deadline misses, feasibility
//! - **`config`**: JSON configuration loading
//! - **`validation`**: Task-set integrity checks
//! - **`timeline`**: Textual per-task Gantt rows
//! - **`workload`**: Seeded random task sets
//!
//! # Policies
//!
//! | Policy | Preemptive | Selection |
//! |--------|-----------|-----------|
//! | FCFS | no | earliest arrival |
//! | SJF | no | shortest computation time |
//! | RR | at quantum expiry | queue order, `quantum` ticks per turn |
//! | SRTF | yes | shortest remaining time |
//! | RM | yes | shortest period |
//! | EDF | yes | earliest absolute deadline |
//!
//! RM and EDF release a new instance of every task each period; the other
//! policies run each task once.
//!
//! # Example
//!
//! ```
//! use u_cpusim::dispatching::Policy;
//! use u_cpusim::models::Task;
//! use u_cpusim::scheduler::{SimulationMetrics, Simulator};
//!
//! let tasks = vec![Task::new(0, 5), Task::new(1, 2)];
//! let sim = Simulator::new(Policy::Sjf).run(&tasks, 7);
//! assert_eq!(sim.trace.to_string(), "[1, 1, 0, 0, 0, 0, 0]");
//!
//! let metrics = SimulationMetrics::calculate(&sim);
//! assert_eq!(metrics.most_waiting_task, Some(0));
//! ```
//!
//! # References
//!
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"
//! - Silberschatz et al. (2018), "Operating System Concepts"
//! - Buttazzo (2011), "Hard Real-Time Computing Systems"

pub mod analysis;
pub mod config;
pub mod diagnostics;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod report;
pub mod scheduler;
pub mod timeline;
pub mod validation;
pub mod workload;

pub use config::SimulationConfig;
pub use diagnostics::Diagnostic;
pub use error::{Result, SimError};
pub use report::{simulate, SimulationReport};
