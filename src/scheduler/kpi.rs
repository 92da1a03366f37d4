//! Simulation performance metrics.
//!
//! Computes turnaround, waiting and utilization figures from the finished
//! instances of a run. Unfinished instances are excluded.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Turnaround (TAT) | finish - arrival |
//! | Waiting (WT) | TAT - computation time |
//! | Avg TAT / Avg WT | Mean over tasks of each task's mean over its finished instances |
//! | CPU Utilization | Σ computation time / latest finish |
//! | Most / Least Waiting Task | Task with max / min mean WT (ties: lowest id) |
//!
//! Non-periodic policies have one instance per task, so the two-level mean
//! reduces to a plain mean over instances.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Simulation;
use crate::models::{Instance, TaskId, Time};

/// Per-task figures, averaged over the task's finished instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMetrics {
    /// Task.
    pub task_id: TaskId,
    /// Instances that finished within the horizon.
    pub finished_instances: usize,
    /// Mean turnaround.
    pub avg_turnaround: f64,
    /// Mean waiting time.
    pub avg_waiting: f64,
}

/// System-wide metrics record.
///
/// All-zero (with no extremal tasks) when nothing finished.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Mean turnaround across tasks.
    pub avg_turnaround: f64,
    /// Mean waiting time across tasks.
    pub avg_waiting: f64,
    /// Busy share up to the last completion (0.0..=1.0).
    pub cpu_utilization: f64,
    /// Largest per-task mean waiting time.
    pub max_waiting: f64,
    /// Smallest per-task mean waiting time.
    pub min_waiting: f64,
    /// Task with the largest mean waiting time.
    pub most_waiting_task: Option<TaskId>,
    /// Task with the smallest mean waiting time.
    pub least_waiting_task: Option<TaskId>,
    /// Instances counted.
    pub finished_instances: usize,
    /// Per-task breakdown, ordered by task id.
    pub per_task: Vec<TaskMetrics>,
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    turnaround: Time,
    waiting: Time,
}

impl SimulationMetrics {
    /// Computes metrics for a finished run.
    pub fn calculate(simulation: &Simulation) -> Self {
        Self::from_instances(&simulation.instances)
    }

    /// Computes metrics from any instance set; unfinished ones are skipped.
    pub fn from_instances(instances: &[Instance]) -> Self {
        let mut by_task: BTreeMap<TaskId, Accumulator> = BTreeMap::new();
        let mut total_computation: Time = 0;
        let mut last_finish: Time = 0;
        let mut finished_instances = 0;

        for inst in instances {
            let (Some(finish), Some(turnaround), Some(waiting)) =
                (inst.finish_time, inst.turnaround(), inst.waiting())
            else {
                continue;
            };
            finished_instances += 1;
            total_computation += inst.computation_time;
            last_finish = last_finish.max(finish);

            let acc = by_task.entry(inst.task_id).or_default();
            acc.count += 1;
            acc.turnaround += turnaround;
            acc.waiting += waiting;
        }

        if by_task.is_empty() {
            return Self::default();
        }

        let per_task: Vec<TaskMetrics> = by_task
            .into_iter()
            .map(|(task_id, acc)| TaskMetrics {
                task_id,
                finished_instances: acc.count,
                avg_turnaround: acc.turnaround as f64 / acc.count as f64,
                avg_waiting: acc.waiting as f64 / acc.count as f64,
            })
            .collect();

        let n = per_task.len() as f64;
        let avg_turnaround = per_task.iter().map(|t| t.avg_turnaround).sum::<f64>() / n;
        let avg_waiting = per_task.iter().map(|t| t.avg_waiting).sum::<f64>() / n;

        // per_task is ordered by id, so strict comparisons keep the lowest id on ties
        let mut most = &per_task[0];
        let mut least = &per_task[0];
        for t in &per_task[1..] {
            if t.avg_waiting > most.avg_waiting {
                most = t;
            }
            if t.avg_waiting < least.avg_waiting {
                least = t;
            }
        }

        let cpu_utilization = if last_finish > 0 {
            total_computation as f64 / last_finish as f64
        } else {
            0.0
        };

        Self {
            avg_turnaround,
            avg_waiting,
            cpu_utilization,
            max_waiting: most.avg_waiting,
            min_waiting: least.avg_waiting,
            most_waiting_task: Some(most.task_id),
            least_waiting_task: Some(least.task_id),
            finished_instances,
            per_task,
        }
    }

    /// Metrics for one task, if any of its instances finished.
    pub fn task(&self, task_id: TaskId) -> Option<&TaskMetrics> {
        self.per_task.iter().find(|t| t.task_id == task_id)
    }
}
