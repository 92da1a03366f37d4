//! Run diagnostics.
//!
//! Non-fatal observations made while preparing or running a simulation.
//! They are returned alongside the results for the presenter to show, and
//! mirrored to `tracing` at warn level when recorded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{InstanceId, TaskId, Time};

/// A non-fatal observation about a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// An instance still owed CPU time when the horizon was reached.
    /// It is excluded from metrics.
    IncompleteInstance {
        /// Owning task.
        task_id: TaskId,
        /// Instance index.
        instance: InstanceId,
        /// Release ordinal within the task.
        release: usize,
        /// Arrival tick.
        arrival: Time,
        /// CPU time still owed.
        remaining_time: Time,
    },
    /// Total utilization exceeds the Liu & Layland bound under RM.
    /// The set may still be schedulable.
    UtilizationAboveBound {
        /// Sum of `C / T`.
        utilization: f64,
        /// Bound for the task count.
        bound: f64,
    },
    /// Total utilization exceeds 1.0; deadline misses are certain.
    Overloaded {
        /// Sum of `C / T`.
        utilization: f64,
    },
}

impl Diagnostic {
    /// Task the diagnostic refers to, if any.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Diagnostic::IncompleteInstance { task_id, .. } => Some(*task_id),
            _ => None,
        }
    }

    /// Records the diagnostic to the tracing subscriber.
    pub(crate) fn emit(&self) {
        tracing::warn!(diagnostic = %self, "simulation diagnostic");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IncompleteInstance {
                task_id,
                release,
                arrival,
                remaining_time,
                ..
            } => write!(
                f,
                "instance T{task_id}#{release} (arrived at {arrival}) unfinished at horizon, \
                 {remaining_time} tick(s) remaining"
            ),
            Diagnostic::UtilizationAboveBound { utilization, bound } => write!(
                f,
                "utilization {utilization:.3} exceeds Liu & Layland bound {bound:.3}"
            ),
            Diagnostic::Overloaded { utilization } => {
                write!(f, "utilization {utilization:.3} exceeds 1.0")
            }
        }
    }
}
