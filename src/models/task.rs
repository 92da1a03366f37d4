//! Task definition model.
//!
//! A task is an immutable template: it declares how much CPU time each
//! of its instances needs, when the first one arrives, and the timing
//! parameters consumed by the periodic and quantum-based policies.
//!
//! # Reference
//! Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//! Hard-Real-Time Environment"

use serde::{Deserialize, Serialize};

/// Task identifier, assigned by input order.
pub type TaskId = usize;

/// Simulated time in ticks.
pub type Time = i64;

/// A task definition.
///
/// Never mutated by a simulation run. Runtime state lives in
/// [`Instance`](super::Instance) values created fresh for every run.
///
/// # Time Representation
/// All times are integer ticks relative to the simulation epoch (t=0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Earliest arrival time (first release for periodic tasks).
    pub offset: Time,
    /// CPU time required by each instance.
    pub computation_time: Time,
    /// Interval between successive releases (RM/EDF).
    pub period: Time,
    /// Maximum contiguous run per dispatch (RR).
    pub quantum: Time,
    /// Time after arrival by which an instance must finish.
    pub relative_deadline: Time,
}

impl Task {
    /// Creates a task arriving at t=0.
    ///
    /// Period, quantum and deadline default to the computation time.
    pub fn new(id: TaskId, computation_time: Time) -> Self {
        Self {
            id,
            offset: 0,
            computation_time,
            period: computation_time,
            quantum: computation_time,
            relative_deadline: computation_time,
        }
    }

    /// Creates a periodic task with an implicit deadline (deadline = period).
    pub fn periodic(id: TaskId, computation_time: Time, period: Time) -> Self {
        Self::new(id, computation_time)
            .with_period(period)
            .with_deadline(period)
    }

    /// Sets the arrival offset.
    pub fn with_offset(mut self, offset: Time) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the release period.
    pub fn with_period(mut self, period: Time) -> Self {
        self.period = period;
        self
    }

    /// Sets the round-robin quantum.
    pub fn with_quantum(mut self, quantum: Time) -> Self {
        self.quantum = quantum;
        self
    }

    /// Sets the relative deadline.
    pub fn with_deadline(mut self, relative_deadline: Time) -> Self {
        self.relative_deadline = relative_deadline;
        self
    }

    /// Processor share demanded by the task: `C / T`.
    pub fn utilization(&self) -> f64 {
        if self.period <= 0 {
            return 0.0;
        }
        self.computation_time as f64 / self.period as f64
    }

    /// Number of instances released in `[0, horizon)`.
    ///
    /// `floor((horizon - offset - 1) / period) + 1` when the first release
    /// falls inside the horizon, otherwise 0.
    pub fn releases_before(&self, horizon: Time) -> usize {
        if self.offset >= horizon || self.period <= 0 {
            return 0;
        }
        ((horizon - self.offset - 1) / self.period + 1) as usize
    }
}
