//! Simulation engine and performance metrics.
//!
//! Provides the tick-driven dispatch loop, the instance generator it
//! drives, and metrics computed from a finished run.
//!
//! # Algorithm
//!
//! `Simulator` advances a discrete clock on one CPU. At every decision
//! point it releases due periodic instances, admits arrivals into the
//! ready set, and asks the policy's selection rule what to run and for
//! how long.
//!
//! # Metrics
//!
//! `SimulationMetrics` computes turnaround, waiting time, CPU utilization
//! and the most/least waiting tasks from finished instances.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Buttazzo (2011), "Hard Real-Time Computing Systems", Ch. 4

mod generator;
mod kpi;
mod simulator;

pub use generator::InstanceGenerator;
pub use kpi::{SimulationMetrics, TaskMetrics};
pub use simulator::{Simulation, Simulator};
