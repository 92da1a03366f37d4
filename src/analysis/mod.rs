//! Post-run anomaly analysis.
//!
//! Detectors read a finished [`Simulation`] and never modify it. Each one
//! tolerates empty input and returns an empty list.
//!
//! | Detector | Applies to | Flags |
//! |----------|-----------|-------|
//! | [`StarvationDetector`] | all policies | `waiting / turnaround > threshold` |
//! | [`detect_priority_inversions`] | RM, EDF | lower-priority run while a higher-priority instance waits |
//! | [`detect_missed_deadlines`] | all policies | `finish_time > absolute_deadline` |
//! | [`assess_feasibility`] | RM, EDF | utilization tests, before running |

mod deadline;
mod feasibility;
mod inversion;
mod starvation;

pub use deadline::{detect_missed_deadlines, miss_ratios, DeadlineMiss, TaskMissRatio};
pub use feasibility::{
    assess_feasibility, liu_layland_bound, total_utilization, FeasibilityReport, Verdict,
};
pub use inversion::{detect_priority_inversions, PriorityInversion};
pub use starvation::{
    is_starved, wait_ratio, StarvationDetector, StarvationEvent, DEFAULT_STARVATION_THRESHOLD,
};

use serde::{Deserialize, Serialize};

use crate::scheduler::Simulation;

/// Every anomaly found in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Starved instances.
    pub starvation: Vec<StarvationEvent>,
    /// Inversion ticks; `None` when the policy has no static priority notion.
    pub priority_inversions: Option<Vec<PriorityInversion>>,
    /// Finished instances that completed late.
    pub missed_deadlines: Vec<DeadlineMiss>,
    /// Per-task miss ratios.
    pub miss_ratios: Vec<TaskMissRatio>,
}

impl AnomalyReport {
    /// Runs every detector over `simulation`.
    pub fn analyze(simulation: &Simulation, starvation_threshold: f64) -> Self {
        let starvation = StarvationDetector::new(starvation_threshold).detect(&simulation.instances);
        let priority_inversions = detect_priority_inversions(
            simulation.policy,
            &simulation.tasks,
            &simulation.instances,
            &simulation.dispatches,
        );
        let missed_deadlines = detect_missed_deadlines(&simulation.instances);
        let miss_ratios = miss_ratios(&missed_deadlines, &simulation.tasks, &simulation.spawned);

        Self {
            starvation,
            priority_inversions,
            missed_deadlines,
            miss_ratios,
        }
    }

    /// Whether no detector flagged anything.
    pub fn is_clean(&self) -> bool {
        self.starvation.is_empty()
            && self.missed_deadlines.is_empty()
            && self
                .priority_inversions
                .as_ref()
                .map_or(true, |inv| inv.is_empty())
    }
}
