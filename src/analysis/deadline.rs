//! Deadline miss detection.

use serde::{Deserialize, Serialize};

use crate::models::{Instance, InstanceId, Task, TaskId, Time};

/// A finished instance that completed after its absolute deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineMiss {
    /// Owning task.
    pub task_id: TaskId,
    /// Instance index.
    pub instance: InstanceId,
    /// `arrival + relative_deadline`.
    pub absolute_deadline: Time,
    /// Completion tick.
    pub finish_time: Time,
    /// `finish_time - absolute_deadline` (always > 0).
    pub lateness: Time,
}

/// Per-task miss ratio: `misses / spawned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMissRatio {
    /// Task.
    pub task_id: TaskId,
    /// Finished instances that missed.
    pub misses: usize,
    /// Instances created for the task.
    pub spawned: usize,
    /// `misses / spawned`, 0 when nothing was spawned.
    pub ratio: f64,
}

/// Lists finished instances with `finish_time > absolute_deadline`.
pub fn detect_missed_deadlines(instances: &[Instance]) -> Vec<DeadlineMiss> {
    instances
        .iter()
        .enumerate()
        .filter_map(|(id, inst)| {
            let finish = inst.finish_time?;
            (finish > inst.absolute_deadline).then_some(DeadlineMiss {
                task_id: inst.task_id,
                instance: id,
                absolute_deadline: inst.absolute_deadline,
                finish_time: finish,
                lateness: finish - inst.absolute_deadline,
            })
        })
        .collect()
}

/// Aggregates misses per task against the spawn counts.
///
/// `spawned` is parallel to `tasks`. One entry per task, in task order.
pub fn miss_ratios(misses: &[DeadlineMiss], tasks: &[Task], spawned: &[usize]) -> Vec<TaskMissRatio> {
    tasks
        .iter()
        .enumerate()
        .map(|(pos, task)| {
            let spawned = spawned.get(pos).copied().unwrap_or(0);
            let count = misses.iter().filter(|m| m.task_id == task.id).count();
            TaskMissRatio {
                task_id: task.id,
                misses: count,
                spawned,
                ratio: if spawned == 0 {
                    0.0
                } else {
                    count as f64 / spawned as f64
                },
            }
        })
        .collect()
}
