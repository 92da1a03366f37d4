//! Starvation detection.
//!
//! An instance is starved when it spent most of its turnaround waiting:
//! `waiting / turnaround > threshold`.

use serde::{Deserialize, Serialize};

use crate::models::{Instance, InstanceId, TaskId, Time};

/// Default wait-ratio threshold.
pub const DEFAULT_STARVATION_THRESHOLD: f64 = 0.8;

/// A finished instance whose wait ratio exceeded the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarvationEvent {
    /// Owning task.
    pub task_id: TaskId,
    /// Instance index.
    pub instance: InstanceId,
    /// Ticks spent ready but not running.
    pub waiting: Time,
    /// Finish minus arrival.
    pub turnaround: Time,
    /// `waiting / turnaround`.
    pub wait_ratio: f64,
}

/// `waiting / turnaround`, undefined for a zero turnaround.
pub fn wait_ratio(waiting: Time, turnaround: Time) -> Option<f64> {
    (turnaround > 0).then(|| waiting as f64 / turnaround as f64)
}

/// Whether the wait ratio strictly exceeds `threshold`.
pub fn is_starved(waiting: Time, turnaround: Time, threshold: f64) -> bool {
    wait_ratio(waiting, turnaround).is_some_and(|r| r > threshold)
}

/// Flags finished instances with an excessive wait ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarvationDetector {
    threshold: f64,
}

impl Default for StarvationDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_STARVATION_THRESHOLD,
        }
    }
}

impl StarvationDetector {
    /// Creates a detector with a custom threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Threshold in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scans finished instances; unfinished ones are skipped.
    pub fn detect(&self, instances: &[Instance]) -> Vec<StarvationEvent> {
        instances
            .iter()
            .enumerate()
            .filter_map(|(id, inst)| {
                let turnaround = inst.turnaround()?;
                let waiting = inst.waiting()?;
                let ratio = wait_ratio(waiting, turnaround)?;
                (ratio > self.threshold).then_some(StarvationEvent {
                    task_id: inst.task_id,
                    instance: id,
                    waiting,
                    turnaround,
                    wait_ratio: ratio,
                })
            })
            .collect()
    }
}
