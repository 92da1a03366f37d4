//! Priority inversion detection (RM / EDF).
//!
//! For every tick at which an instance ran, any other pending instance
//! with a strictly more urgent priority key is recorded as blocked by it.
//! A correct preemptive run produces none; the detector exists to audit
//! recorded or externally produced schedules.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::dispatching::Policy;
use crate::models::{Dispatch, Instance, InstanceId, Task, TaskId, Time};

/// One tick at which a more urgent instance waited behind a running one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityInversion {
    /// Tick of the inversion.
    pub time: Time,
    /// Task of the running instance.
    pub running_task: TaskId,
    /// Running instance.
    pub running_instance: InstanceId,
    /// Task of the blocked instance.
    pub blocked_task: TaskId,
    /// Blocked instance.
    pub blocked_instance: InstanceId,
}

/// Scans a run for priority inversions.
///
/// Returns `None` for policies without a real-time priority key. Pairs
/// where either key cannot be resolved are skipped. Results are ordered by
/// tick, then by blocked priority key.
///
/// # Algorithm
/// Sweeps dispatched ticks in order, keeping the pending instances in a
/// set ordered by priority key. Arrivals enter the set and completions
/// leave it as the sweep passes them, so each tick only visits the blocked
/// instances it reports. Dispatches must not overlap.
pub fn detect_priority_inversions(
    policy: Policy,
    tasks: &[Task],
    instances: &[Instance],
    dispatches: &[Dispatch],
) -> Option<Vec<PriorityInversion>> {
    if !policy.is_periodic() {
        return None;
    }

    let task_keys: HashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
    let keys: Vec<Option<Time>> = instances
        .iter()
        .map(|inst| {
            task_keys
                .get(&inst.task_id)
                .and_then(|task| policy.priority_key(inst, task))
        })
        .collect();

    let mut by_arrival: Vec<InstanceId> = (0..instances.len())
        .filter(|&id| keys[id].is_some())
        .collect();
    by_arrival.sort_by_key(|&id| (instances[id].arrival, id));
    let mut next_arrival = 0;

    let mut order: Vec<&Dispatch> = dispatches.iter().collect();
    order.sort_by_key(|d| (d.start, d.instance));

    let mut active: BTreeSet<(Time, InstanceId)> = BTreeSet::new();
    let mut retiring: BTreeSet<(Time, InstanceId)> = BTreeSet::new();
    let mut inversions = Vec::new();

    for dispatch in order {
        let Some(running) = instances.get(dispatch.instance) else {
            continue;
        };
        let Some(running_key) = keys[dispatch.instance] else {
            continue;
        };

        for t in dispatch.start..dispatch.end {
            while let Some(&id) = by_arrival.get(next_arrival) {
                let inst = &instances[id];
                if inst.arrival > t {
                    break;
                }
                next_arrival += 1;
                if inst.finish_time.is_some_and(|f| f <= t) {
                    continue;
                }
                if let Some(key) = keys[id] {
                    active.insert((key, id));
                }
                if let Some(finish) = inst.finish_time {
                    retiring.insert((finish, id));
                }
            }
            while let Some(&(finish, id)) = retiring.first() {
                if finish > t {
                    break;
                }
                retiring.pop_first();
                if let Some(key) = keys[id] {
                    active.remove(&(key, id));
                }
            }

            for &(_, id) in active.range(..(running_key, 0)) {
                if id == dispatch.instance {
                    continue;
                }
                inversions.push(PriorityInversion {
                    time: t,
                    running_task: running.task_id,
                    running_instance: dispatch.instance,
                    blocked_task: instances[id].task_id,
                    blocked_instance: id,
                });
            }
        }
    }
    Some(inversions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Simulator;

    fn run(instances: &mut [Instance], id: InstanceId, start: Time, ticks: Time) -> Dispatch {
        instances[id].execute(start, ticks);
        Dispatch {
            instance: id,
            task_id: instances[id].task_id,
            start,
            end: start + ticks,
        }
    }

    #[test]
    fn test_not_applicable_to_non_periodic() {
        assert!(detect_priority_inversions(Policy::Fcfs, &[], &[], &[]).is_none());
        assert!(detect_priority_inversions(Policy::Srtf, &[], &[], &[]).is_none());
    }

    #[test]
    fn test_rm_inversion_recorded() {
        // Long-period task runs while the short-period one waits
        let tasks = vec![Task::periodic(0, 2, 10), Task::periodic(1, 1, 4)];
        let mut instances = vec![Instance::new(&tasks[0], 0, 0), Instance::new(&tasks[1], 0, 0)];
        let dispatches = vec![
            run(&mut instances, 0, 0, 2),
            run(&mut instances, 1, 2, 1),
        ];

        let found =
            detect_priority_inversions(Policy::RateMonotonic, &tasks, &instances, &dispatches)
                .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].time, 0);
        assert_eq!(found[1].time, 1);
        assert_eq!(found[0].running_task, 0);
        assert_eq!(found[0].blocked_task, 1);
    }

    #[test]
    fn test_edf_uses_absolute_deadline() {
        let tasks = vec![
            Task::periodic(0, 1, 8).with_deadline(3),
            Task::periodic(1, 1, 8).with_deadline(6),
        ];
        let mut instances = vec![Instance::new(&tasks[0], 0, 0), Instance::new(&tasks[1], 0, 0)];
        let dispatches = vec![
            run(&mut instances, 1, 0, 1),
            run(&mut instances, 0, 1, 1),
        ];

        let found = detect_priority_inversions(
            Policy::EarliestDeadlineFirst,
            &tasks,
            &instances,
            &dispatches,
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].blocked_task, 0);
        assert_eq!(found[0].running_task, 1);
    }

    #[test]
    fn test_simulated_runs_are_inversion_free() {
        let tasks = vec![
            Task::periodic(0, 1, 4),
            Task::periodic(1, 2, 6),
            Task::periodic(2, 1, 12).with_offset(1),
        ];
        for policy in [Policy::RateMonotonic, Policy::EarliestDeadlineFirst] {
            let sim = Simulator::new(policy).run(&tasks, 24);
            let found =
                detect_priority_inversions(policy, &sim.tasks, &sim.instances, &sim.dispatches)
                    .unwrap();
            assert!(found.is_empty(), "{policy}: {found:?}");
        }
    }

    #[test]
    fn test_unknown_task_skipped() {
        let tasks = vec![Task::periodic(0, 1, 4)];
        let ghost = Task::periodic(9, 1, 2);
        let mut instances = vec![Instance::new(&tasks[0], 0, 0), Instance::new(&ghost, 0, 0)];
        let dispatches = vec![run(&mut instances, 0, 0, 1)];
        let found =
            detect_priority_inversions(Policy::RateMonotonic, &tasks, &instances, &dispatches)
                .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_sweep_matches_per_tick_scan() {
        // An RM schedule audited with EDF keys contains inversions
        let tasks = vec![
            Task::periodic(0, 1, 3),
            Task::periodic(1, 3, 7).with_deadline(4),
            Task::periodic(2, 2, 12).with_offset(2),
        ];
        let sim = Simulator::new(Policy::RateMonotonic).run(&tasks, 42);
        let policy = Policy::EarliestDeadlineFirst;
        let found =
            detect_priority_inversions(policy, &sim.tasks, &sim.instances, &sim.dispatches)
                .unwrap();

        let key = |inst: &Instance| {
            let task = sim.task(inst.task_id)?;
            policy.priority_key(inst, task)
        };
        let mut expected = Vec::new();
        for d in &sim.dispatches {
            let running = &sim.instances[d.instance];
            let running_key = key(running).unwrap();
            for t in d.start..d.end {
                let mut blocked: Vec<(Time, InstanceId)> = sim
                    .instances
                    .iter()
                    .enumerate()
                    .filter(|&(id, other)| {
                        id != d.instance && other.was_pending_at(t) && !other.ran_at(t)
                    })
                    .filter_map(|(id, other)| key(other).map(|k| (k, id)))
                    .filter(|&(k, _)| k < running_key)
                    .collect();
                blocked.sort();
                expected.extend(blocked.into_iter().map(|(_, id)| PriorityInversion {
                    time: t,
                    running_task: running.task_id,
                    running_instance: d.instance,
                    blocked_task: sim.instances[id].task_id,
                    blocked_instance: id,
                }));
            }
        }

        assert!(!expected.is_empty());
        assert_eq!(found, expected);
    }

    #[test]
    fn test_long_horizon_scan() {
        let tasks = vec![
            Task::periodic(0, 1, 4),
            Task::periodic(1, 2, 6),
            Task::periodic(2, 1, 10),
        ];
        let sim = Simulator::new(Policy::EarliestDeadlineFirst).run(&tasks, 60_000);
        let found = detect_priority_inversions(
            Policy::EarliestDeadlineFirst,
            &sim.tasks,
            &sim.instances,
            &sim.dispatches,
        )
        .unwrap();
        assert!(found.is_empty());
    }
}
