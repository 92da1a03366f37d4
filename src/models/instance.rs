//! Runnable instance model.
//!
//! An instance is one occurrence of a task: non-periodic tasks produce
//! exactly one, periodic tasks one per release. Instances carry all the
//! mutable state of a run and refer to their task by id only.

use serde::{Deserialize, Serialize};

use super::{Task, TaskId, Time};

/// Index of an instance within a simulation's instance list.
pub type InstanceId = usize;

/// A half-open run `[start, end)` during which an instance held the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionInterval {
    /// First tick of the run.
    pub start: Time,
    /// Tick after the last one of the run.
    pub end: Time,
}

impl ExecutionInterval {
    /// Creates an interval.
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Length in ticks.
    pub fn len(&self) -> Time {
        self.end - self.start
    }

    /// Whether the interval covers no ticks.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether tick `t` lies inside the interval.
    pub fn contains(&self, t: Time) -> bool {
        self.start <= t && t < self.end
    }
}

/// One runnable occurrence of a task.
///
/// # Invariants
/// - `remaining_time` only decreases and never drops below 0.
/// - `start_time` is set once, on the first dispatch.
/// - `intervals` are ordered, disjoint, and their total length equals
///   `computation_time - remaining_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Originating task.
    pub task_id: TaskId,
    /// Release ordinal within the task (0 for the first release).
    pub release: usize,
    /// Tick at which the instance became ready.
    pub arrival: Time,
    /// `arrival + relative_deadline`, saturating at `Time::MAX`.
    pub absolute_deadline: Time,
    /// CPU time demanded (copied from the task).
    pub computation_time: Time,
    /// CPU time still owed.
    pub remaining_time: Time,
    /// First dispatch tick. `None` = never ran.
    pub start_time: Option<Time>,
    /// Completion tick. `None` = unfinished.
    pub finish_time: Option<Time>,
    /// Contiguous runs in chronological order.
    pub intervals: Vec<ExecutionInterval>,
}

impl Instance {
    /// Creates the `release`-th instance of `task`, arriving at `arrival`.
    pub fn new(task: &Task, release: usize, arrival: Time) -> Self {
        Self {
            task_id: task.id,
            release,
            arrival,
            absolute_deadline: arrival.saturating_add(task.relative_deadline),
            computation_time: task.computation_time,
            remaining_time: task.computation_time,
            start_time: None,
            finish_time: None,
            intervals: Vec::new(),
        }
    }

    /// Whether the instance has completed.
    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }

    /// Whether the instance may be dispatched at `now`.
    pub fn is_ready(&self, now: Time) -> bool {
        self.arrival <= now && self.remaining_time > 0
    }

    /// Whether the instance was arrived and unfinished during tick `t`.
    ///
    /// Evaluated after a run, from the recorded finish time.
    pub fn was_pending_at(&self, t: Time) -> bool {
        self.arrival <= t && self.finish_time.map_or(true, |f| t < f)
    }

    /// Whether the instance held the CPU during tick `t`.
    pub fn ran_at(&self, t: Time) -> bool {
        self.intervals.iter().any(|iv| iv.contains(t))
    }

    /// CPU time received so far.
    pub fn executed_time(&self) -> Time {
        self.intervals.iter().map(ExecutionInterval::len).sum()
    }

    /// `finish_time - arrival`, if finished.
    pub fn turnaround(&self) -> Option<Time> {
        self.finish_time.map(|f| f - self.arrival)
    }

    /// `turnaround - computation_time`, if finished.
    ///
    /// On a single CPU this equals the ticks spent ready but not running.
    pub fn waiting(&self) -> Option<Time> {
        self.turnaround().map(|tat| tat - self.computation_time)
    }

    /// Whether the instance finished after its absolute deadline.
    ///
    /// `None` while unfinished.
    pub fn missed_deadline(&self) -> Option<bool> {
        self.finish_time.map(|f| f > self.absolute_deadline)
    }

    /// Runs the instance for `ticks` starting at `now`.
    ///
    /// Contiguous runs are merged into the previous interval. Sets the
    /// start time on the first run and the finish time when the demand is
    /// met. `ticks` is clamped to the remaining demand.
    pub(crate) fn execute(&mut self, now: Time, ticks: Time) -> Time {
        let ticks = ticks.min(self.remaining_time);
        if ticks <= 0 || now < self.arrival {
            return 0;
        }

        if self.start_time.is_none() {
            self.start_time = Some(now);
        }

        match self.intervals.last_mut() {
            Some(last) if last.end == now => last.end = now + ticks,
            _ => self.intervals.push(ExecutionInterval::new(now, now + ticks)),
        }

        self.remaining_time -= ticks;
        if self.remaining_time == 0 {
            self.finish_time = Some(now + ticks);
        }
        ticks
    }
}
