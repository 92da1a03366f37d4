//! Scheduling policies and their selection rules.
//!
//! Each policy is a [`Policy`] variant backed by one [`SelectionRule`]
//! implementation. The rule is resolved once when a run starts; the
//! dispatch loop then asks it for a [`Grant`] at every decision point.
//!
//! # Usage
//!
//! ```
//! use u_cpusim::dispatching::Policy;
//!
//! let policy: Policy = "EDF".parse().unwrap();
//! assert!(policy.is_periodic());
//! assert_eq!(policy.rule().name(), "EDF");
//! ```
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Buttazzo (2011), "Hard Real-Time Computing Systems", Ch. 4

mod context;
mod policy;
mod ready;
pub mod rules;

pub use context::DispatchContext;
pub use policy::Policy;
pub use ready::ReadySet;

use crate::models::{Instance, InstanceId, Time};
use std::fmt::Debug;

/// Score returned by a selection rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = Time;

/// A selector decision: run `instance` for `ticks` contiguous ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    /// Instance to run.
    pub instance: InstanceId,
    /// Contiguous ticks granted (always at least 1).
    pub ticks: Time,
}

/// A selection rule choosing the next instance to run.
///
/// # Score Convention
/// **Lower score = higher priority.** The provided [`select`] picks the
/// ready instance with the lowest `(score, task id, arrival)`.
///
/// [`select`]: SelectionRule::select
pub trait SelectionRule: Send + Sync + Debug {
    /// Rule name (e.g., "FCFS", "EDF").
    fn name(&self) -> &'static str;

    /// Priority of an instance at the context's tick.
    fn score(&self, instance: &Instance, context: &DispatchContext<'_>) -> RuleScore;

    /// Contiguous ticks granted to a selected instance.
    ///
    /// Defaults to one tick (re-evaluate at every tick boundary).
    fn slice(&self, _instance: &Instance, _context: &DispatchContext<'_>) -> Time {
        1
    }

    /// Chooses the next instance to run, or `None` to idle.
    fn select(&self, ready: &ReadySet, context: &DispatchContext<'_>) -> Option<Grant> {
        ready
            .iter()
            .filter_map(|id| context.instance(id).map(|inst| (id, inst)))
            .filter(|(_, inst)| inst.is_ready(context.now))
            .min_by_key(|&(id, inst)| (self.score(inst, context), inst.task_id, inst.arrival, id))
            .map(|(id, inst)| Grant {
                instance: id,
                ticks: self.slice(inst, context).max(1),
            })
    }

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
