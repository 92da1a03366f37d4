//! Policy selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::rules;
use super::SelectionRule;
use crate::error::SimError;
use crate::models::{Instance, Task, Time};

/// The six supported scheduling policies.
///
/// Serialized and parsed by their short names (`FCFS`, `SJF`, `RR`,
/// `SRTF`, `RM`, `EDF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// First Come First Served.
    #[serde(rename = "FCFS")]
    Fcfs,
    /// Shortest Job First (non-preemptive).
    #[serde(rename = "SJF")]
    Sjf,
    /// Round Robin with per-task quantum.
    #[serde(rename = "RR")]
    RoundRobin,
    /// Shortest Remaining Time First.
    #[serde(rename = "SRTF")]
    Srtf,
    /// Rate Monotonic (periodic).
    #[serde(rename = "RM")]
    RateMonotonic,
    /// Earliest Deadline First (periodic).
    #[serde(rename = "EDF")]
    EarliestDeadlineFirst,
}

impl Policy {
    /// All policies, in declaration order.
    pub const ALL: [Policy; 6] = [
        Policy::Fcfs,
        Policy::Sjf,
        Policy::RoundRobin,
        Policy::Srtf,
        Policy::RateMonotonic,
        Policy::EarliestDeadlineFirst,
    ];

    /// Short name.
    pub fn name(&self) -> &'static str {
        self.rule().name()
    }

    /// Whether tasks are released periodically (RM, EDF).
    pub fn is_periodic(&self) -> bool {
        matches!(self, Policy::RateMonotonic | Policy::EarliestDeadlineFirst)
    }

    /// Whether a running instance can be displaced before it finishes.
    pub fn is_preemptive(&self) -> bool {
        !matches!(self, Policy::Fcfs | Policy::Sjf)
    }

    /// Selection rule implementing this policy.
    pub fn rule(&self) -> &'static dyn SelectionRule {
        match self {
            Policy::Fcfs => &rules::Fcfs,
            Policy::Sjf => &rules::Sjf,
            Policy::RoundRobin => &rules::RoundRobin,
            Policy::Srtf => &rules::Srtf,
            Policy::RateMonotonic => &rules::RateMonotonic,
            Policy::EarliestDeadlineFirst => &rules::EarliestDeadlineFirst,
        }
    }

    /// Real-time priority key of an instance (lower = more urgent).
    ///
    /// Period for RM, absolute deadline for EDF. `None` for the other
    /// policies, where priority inversion is not defined.
    pub fn priority_key(&self, instance: &Instance, task: &Task) -> Option<Time> {
        match self {
            Policy::RateMonotonic => Some(task.period),
            Policy::EarliestDeadlineFirst => Some(instance.absolute_deadline),
            _ => None,
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FCFS" => Ok(Policy::Fcfs),
            "SJF" => Ok(Policy::Sjf),
            "RR" => Ok(Policy::RoundRobin),
            "SRTF" => Ok(Policy::Srtf),
            "RM" => Ok(Policy::RateMonotonic),
            "EDF" => Ok(Policy::EarliestDeadlineFirst),
            _ => Err(SimError::UnknownPolicy(s.to_string())),
        }
    }
}
