//! Built-in selection rules, one per scheduling policy.
//!
//! # Categories
//!
//! - **Run to completion**: FCFS, SJF
//! - **Quantum-preemptive**: RR
//! - **Tick-preemptive**: SRTF, RM, EDF
//!
//! # Score Convention
//! All rules return lower scores for higher priority instances. Ties are
//! broken by task id, then by arrival, by the provided
//! [`SelectionRule::select`].
//!
//! # References
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"

use super::{DispatchContext, Grant, ReadySet, RuleScore, SelectionRule};
use crate::models::{Instance, Time};

// ======================== Run-to-completion rules ========================

/// First Come First Served.
///
/// Runs the earliest arrival to completion.
#[derive(Debug, Clone, Copy)]
pub struct Fcfs;

impl SelectionRule for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn score(&self, instance: &Instance, _context: &DispatchContext<'_>) -> RuleScore {
        instance.arrival
    }

    fn slice(&self, instance: &Instance, _context: &DispatchContext<'_>) -> Time {
        instance.remaining_time
    }

    fn description(&self) -> &'static str {
        "First Come First Served"
    }
}

/// Shortest Job First (non-preemptive).
///
/// Runs the ready instance with the smallest total demand to completion.
#[derive(Debug, Clone, Copy)]
pub struct Sjf;

impl SelectionRule for Sjf {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn score(&self, instance: &Instance, _context: &DispatchContext<'_>) -> RuleScore {
        instance.computation_time
    }

    fn slice(&self, instance: &Instance, _context: &DispatchContext<'_>) -> Time {
        instance.remaining_time
    }

    fn description(&self) -> &'static str {
        "Shortest Job First"
    }
}

// ======================== Quantum-preemptive rule ========================

/// Round Robin.
///
/// Runs the head of the FIFO ready queue for at most its task's quantum.
/// The dispatch loop moves an unfinished instance to the tail afterwards.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin;

impl SelectionRule for RoundRobin {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn score(&self, instance: &Instance, _context: &DispatchContext<'_>) -> RuleScore {
        instance.arrival
    }

    fn slice(&self, instance: &Instance, context: &DispatchContext<'_>) -> Time {
        let quantum = context
            .task(instance.task_id)
            .map(|t| t.quantum)
            .unwrap_or(instance.remaining_time);
        quantum.min(instance.remaining_time)
    }

    fn select(&self, ready: &ReadySet, context: &DispatchContext<'_>) -> Option<Grant> {
        ready.iter().find_map(|id| {
            let instance = context.instance(id)?;
            instance.is_ready(context.now).then(|| Grant {
                instance: id,
                ticks: self.slice(instance, context).max(1),
            })
        })
    }

    fn description(&self) -> &'static str {
        "Round Robin"
    }
}

// ======================== Tick-preemptive rules ========================

/// Shortest Remaining Time First.
///
/// Re-evaluated every tick on the current remaining demand.
#[derive(Debug, Clone, Copy)]
pub struct Srtf;

impl SelectionRule for Srtf {
    fn name(&self) -> &'static str {
        "SRTF"
    }

    fn score(&self, instance: &Instance, _context: &DispatchContext<'_>) -> RuleScore {
        instance.remaining_time
    }

    fn description(&self) -> &'static str {
        "Shortest Remaining Time First"
    }
}

/// Rate Monotonic.
///
/// Static priority: shorter period wins.
///
/// # Reference
/// Liu & Layland (1973), optimal among fixed-priority policies for
/// implicit-deadline periodic tasks.
#[derive(Debug, Clone, Copy)]
pub struct RateMonotonic;

impl SelectionRule for RateMonotonic {
    fn name(&self) -> &'static str {
        "RM"
    }

    fn score(&self, instance: &Instance, context: &DispatchContext<'_>) -> RuleScore {
        context
            .task(instance.task_id)
            .map(|t| t.period)
            .unwrap_or(Time::MAX)
    }

    fn description(&self) -> &'static str {
        "Rate Monotonic"
    }
}

/// Earliest Deadline First.
///
/// Dynamic priority: earliest absolute deadline wins.
///
/// # Reference
/// Liu & Layland (1973), optimal on one processor for independent
/// preemptible tasks.
#[derive(Debug, Clone, Copy)]
pub struct EarliestDeadlineFirst;

impl SelectionRule for EarliestDeadlineFirst {
    fn name(&self) -> &'static str {
        "EDF"
    }

    fn score(&self, instance: &Instance, _context: &DispatchContext<'_>) -> RuleScore {
        instance.absolute_deadline
    }

    fn description(&self) -> &'static str {
        "Earliest Deadline First"
    }
}
