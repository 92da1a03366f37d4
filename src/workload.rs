//! Random workload generation.
//!
//! Produces task sets for experiments and tests. All randomness comes from
//! the caller's RNG, so a seeded RNG yields a reproducible task set.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Task, Time};

/// Bounds for generated task sets. All ranges are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadParams {
    /// Number of tasks.
    pub task_count: (usize, usize),
    /// Arrival offset.
    pub offset: (Time, Time),
    /// Computation time per instance.
    pub computation_time: (Time, Time),
    /// Extra period on top of the computation time (period >= C).
    pub period_slack: (Time, Time),
    /// Round-robin quantum.
    pub quantum: (Time, Time),
    /// Suggested horizon for runs over these tasks.
    pub horizon: Time,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self {
            task_count: (1, 6),
            offset: (0, 8),
            computation_time: (1, 6),
            period_slack: (0, 12),
            quantum: (1, 4),
            horizon: 40,
        }
    }
}

impl WorkloadParams {
    /// Sets the task-count range.
    pub fn with_task_count(mut self, min: usize, max: usize) -> Self {
        self.task_count = (min, max.max(min));
        self
    }

    /// Sets the suggested horizon.
    pub fn with_horizon(mut self, horizon: Time) -> Self {
        self.horizon = horizon;
        self
    }
}

/// Generates a random task set with IDs `0..n`.
///
/// Deadlines are implicit (equal to the period).
pub fn random_tasks<R: Rng>(rng: &mut R, params: &WorkloadParams) -> Vec<Task> {
    let count = rng.random_range(params.task_count.0..=params.task_count.1.max(params.task_count.0));
    (0..count)
        .map(|id| {
            let computation = sample(rng, params.computation_time).max(1);
            let period = computation + sample(rng, params.period_slack).max(0);
            Task::periodic(id, computation, period)
                .with_offset(sample(rng, params.offset).max(0))
                .with_quantum(sample(rng, params.quantum).max(1))
        })
        .collect()
}

fn sample<R: Rng>(rng: &mut R, (lo, hi): (Time, Time)) -> Time {
    rng.random_range(lo..=hi.max(lo))
}
