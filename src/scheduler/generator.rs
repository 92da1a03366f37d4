//! Instance generation.
//!
//! Expands task definitions into runnable instances. Non-periodic
//! policies get exactly one instance per task, created up front with
//! `arrival = offset`. Periodic policies get a new instance at every
//! `offset + k * period` tick reached by the dispatch loop.

use crate::dispatching::Policy;
use crate::models::{Instance, Task, Time};

/// Creates instances from task definitions as simulated time advances.
#[derive(Debug, Clone)]
pub struct InstanceGenerator<'a> {
    tasks: &'a [Task],
    periodic: bool,
    next_release: Vec<Option<Time>>,
    spawned: Vec<usize>,
}

impl<'a> InstanceGenerator<'a> {
    /// Creates a generator for the given policy.
    pub fn new(tasks: &'a [Task], policy: Policy) -> Self {
        let periodic = policy.is_periodic();
        Self {
            tasks,
            periodic,
            next_release: tasks.iter().map(|t| Some(t.offset)).collect(),
            spawned: vec![0; tasks.len()],
        }
    }

    /// Instances that exist from the start of the run.
    ///
    /// One per task for non-periodic policies, none for periodic ones.
    pub fn initial(&mut self) -> Vec<Instance> {
        if self.periodic {
            return Vec::new();
        }
        self.next_release.iter_mut().for_each(|r| *r = None);
        self.spawned.iter_mut().for_each(|n| *n = 1);
        self.tasks
            .iter()
            .map(|task| Instance::new(task, 0, task.offset))
            .collect()
    }

    /// Instances released at or before `now` and not yet produced.
    ///
    /// Only periodic policies release anything here. Each release is
    /// stamped with its nominal release tick, so successive instances of a
    /// task are exactly one period apart.
    pub fn release_at(&mut self, now: Time) -> Vec<Instance> {
        if !self.periodic {
            return Vec::new();
        }

        let mut released = Vec::new();
        for (index, task) in self.tasks.iter().enumerate() {
            while let Some(at) = self.next_release[index] {
                if at > now {
                    break;
                }
                released.push(Instance::new(task, self.spawned[index], at));
                self.spawned[index] += 1;
                // No further release once the next one would overflow `Time`
                self.next_release[index] = if task.period > 0 {
                    at.checked_add(task.period)
                } else {
                    None
                };
            }
        }
        released
    }

    /// Instances produced so far per task, parallel to the task slice.
    pub fn spawned(&self) -> &[usize] {
        &self.spawned
    }

    /// Consumes the generator, returning the per-task spawn counts.
    pub fn into_spawned(self) -> Vec<usize> {
        self.spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_periodic_one_per_task() {
        let tasks = vec![Task::new(0, 3), Task::new(1, 2).with_offset(4)];
        let mut generator = InstanceGenerator::new(&tasks, Policy::Fcfs);

        let initial = generator.initial();
        assert_eq!(initial.len(), 2);
        assert_eq!(initial[1].arrival, 4);
        assert!(generator.release_at(4).is_empty());
        assert_eq!(generator.spawned(), &[1, 1]);
    }

    #[test]
    fn test_periodic_releases() {
        let tasks = vec![Task::periodic(0, 1, 4), Task::periodic(1, 1, 3).with_offset(2)];
        let mut generator = InstanceGenerator::new(&tasks, Policy::RateMonotonic);
        assert!(generator.initial().is_empty());

        let mut arrivals: Vec<(usize, Time)> = Vec::new();
        for t in 0..10 {
            for inst in generator.release_at(t) {
                assert_eq!(inst.arrival, t);
                arrivals.push((inst.task_id, inst.arrival));
            }
        }

        assert_eq!(
            arrivals,
            vec![(0, 0), (1, 2), (0, 4), (1, 5), (0, 8), (1, 8)]
        );
        assert_eq!(generator.into_spawned(), vec![3, 3]);
    }

    #[test]
    fn test_periodic_catch_up_keeps_spacing() {
        let tasks = vec![Task::periodic(0, 1, 2)];
        let mut generator = InstanceGenerator::new(&tasks, Policy::EarliestDeadlineFirst);
        let released = generator.release_at(5);
        let arrivals: Vec<Time> = released.iter().map(|i| i.arrival).collect();
        assert_eq!(arrivals, vec![0, 2, 4]);
        assert_eq!(released[2].release, 2);
        assert_eq!(released[2].absolute_deadline, 6);
    }

    #[test]
    fn test_spawn_count_formula() {
        let tasks = vec![
            Task::periodic(0, 1, 4).with_offset(1),
            Task::periodic(1, 1, 5).with_offset(20),
        ];
        let horizon = 13;
        let mut generator = InstanceGenerator::new(&tasks, Policy::RateMonotonic);
        for t in 0..horizon {
            generator.release_at(t);
        }
        for (task, &count) in tasks.iter().zip(generator.spawned()) {
            assert_eq!(count, task.releases_before(horizon));
        }
    }

    #[test]
    fn test_huge_period_releases_once() {
        let tasks = vec![Task::periodic(0, 1, Time::MAX).with_offset(1)];
        let mut generator = InstanceGenerator::new(&tasks, Policy::RateMonotonic);
        let mut arrivals = Vec::new();
        for t in 0..5 {
            arrivals.extend(generator.release_at(t).into_iter().map(|i| i.arrival));
        }
        assert_eq!(arrivals, vec![1]);
        assert_eq!(generator.spawned(), &[1]);
    }
}
