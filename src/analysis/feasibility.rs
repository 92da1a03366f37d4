//! Schedulability analysis for periodic task sets.
//!
//! The verdict is advisory: it is logged and attached to the report as a
//! diagnostic, and the simulation runs regardless.
//!
//! # Theory
//! **Liu & Layland (1973)**: under RM, `n` independent implicit-deadline
//! periodic tasks are schedulable on one CPU if
//!
//! `U = Σ C_i / T_i <= n (2^(1/n) - 1)`
//!
//! Under EDF the density test `Σ C_i / min(D_i, T_i) <= 1` is sufficient,
//! and exact when every deadline equals its period.
//!
//! | n | RM bound |
//! |---|---|
//! | 1 | 1.000 |
//! | 2 | 0.828 |
//! | 3 | 0.780 |
//! | ∞ | ln(2) ≈ 0.693 |

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::dispatching::Policy;
use crate::models::Task;

/// Outcome of a schedulability test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Every deadline is guaranteed to be met.
    Schedulable,
    /// The sufficient test failed but the set may still be schedulable.
    Inconclusive,
    /// Utilization exceeds 1.0; misses are certain.
    Infeasible,
}

/// Result of [`assess_feasibility`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    /// `Σ C / T`.
    pub utilization: f64,
    /// Load compared against `bound` by the policy's test.
    pub load: f64,
    /// Bound the load was compared against.
    pub bound: f64,
    /// Outcome.
    pub verdict: Verdict,
}

impl FeasibilityReport {
    /// Diagnostics worth surfacing for this verdict.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.verdict {
            Verdict::Schedulable => Vec::new(),
            Verdict::Inconclusive => vec![Diagnostic::UtilizationAboveBound {
                utilization: self.load,
                bound: self.bound,
            }],
            Verdict::Infeasible => vec![Diagnostic::Overloaded {
                utilization: self.utilization,
            }],
        }
    }
}

/// Total processor utilization `Σ C / T`.
pub fn total_utilization(tasks: &[Task]) -> f64 {
    tasks.iter().map(Task::utilization).sum()
}

/// Liu & Layland bound `n (2^(1/n) - 1)`; 0 for an empty set.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;
    nf * (2.0_f64.powf(1.0 / nf) - 1.0)
}

fn density(tasks: &[Task]) -> f64 {
    tasks
        .iter()
        .map(|t| {
            let window = t.relative_deadline.min(t.period);
            if window <= 0 {
                0.0
            } else {
                t.computation_time as f64 / window as f64
            }
        })
        .sum()
}

/// Runs the policy's sufficient schedulability test.
///
/// Returns `None` for non-periodic policies.
pub fn assess_feasibility(policy: Policy, tasks: &[Task]) -> Option<FeasibilityReport> {
    let utilization = total_utilization(tasks);
    let (load, bound) = match policy {
        Policy::RateMonotonic => {
            let implicit = tasks.iter().all(|t| t.relative_deadline >= t.period);
            let bound = liu_layland_bound(tasks.len());
            // The bound only holds for implicit deadlines
            let load = if implicit { utilization } else { density(tasks) };
            (load, bound)
        }
        Policy::EarliestDeadlineFirst => (density(tasks), 1.0),
        _ => return None,
    };

    let verdict = if utilization > 1.0 + 1e-12 {
        Verdict::Infeasible
    } else if load <= bound + 1e-12 {
        Verdict::Schedulable
    } else {
        Verdict::Inconclusive
    };

    Some(FeasibilityReport {
        utilization,
        load,
        bound,
        verdict,
    })
}
