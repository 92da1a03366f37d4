//! Dispatch context passed to selection rules.

use crate::models::{Instance, InstanceId, Task, TaskId, Time};

/// Read-only view of the simulation state at one decision point.
///
/// Selection rules see the current tick, the task definitions, and every
/// instance created so far. They never mutate any of it.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// Current simulation tick.
    pub now: Time,
    /// Task definitions of the run.
    pub tasks: &'a [Task],
    /// All instances created so far, indexed by [`InstanceId`].
    pub instances: &'a [Instance],
}

impl<'a> DispatchContext<'a> {
    /// Creates a context at the given tick.
    pub fn at_time(now: Time, tasks: &'a [Task], instances: &'a [Instance]) -> Self {
        Self {
            now,
            tasks,
            instances,
        }
    }

    /// Looks up a task definition by ID.
    ///
    /// Task IDs normally equal their input position, which is tried first.
    pub fn task(&self, id: TaskId) -> Option<&'a Task> {
        match self.tasks.get(id) {
            Some(task) if task.id == id => Some(task),
            _ => self.tasks.iter().find(|t| t.id == id),
        }
    }

    /// Looks up an instance.
    pub fn instance(&self, id: InstanceId) -> Option<&'a Instance> {
        self.instances.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_lookup() {
        let tasks = vec![Task::new(0, 1), Task::new(1, 2)];
        let ctx = DispatchContext::at_time(0, &tasks, &[]);
        assert_eq!(ctx.task(1).map(|t| t.computation_time), Some(2));
        assert!(ctx.task(5).is_none());
    }

    #[test]
    fn test_task_lookup_out_of_order_ids() {
        let tasks = vec![Task::new(7, 1), Task::new(3, 2)];
        let ctx = DispatchContext::at_time(0, &tasks, &[]);
        assert_eq!(ctx.task(3).map(|t| t.computation_time), Some(2));
        assert_eq!(ctx.task(7).map(|t| t.computation_time), Some(1));
    }
}
