//! Tick-driven dispatch loop.
//!
//! # Algorithm
//!
//! While `now < simulation_time`:
//! 1. Release periodic instances due at `now`.
//! 2. Admit arrived instances into the ready set.
//! 3. Ask the policy's selection rule for a grant.
//! 4. Run the granted instance (clamped to the horizon) or record an idle
//!    tick, then advance the clock.
//!
//! Unfinished instances at the horizon are kept with `finish_time = None`
//! and reported as [`Diagnostic::IncompleteInstance`].
//!
//! # Complexity
//! O(T * n) where T = simulation ticks and n = live instances.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::InstanceGenerator;
use crate::config::SimulationConfig;
use crate::diagnostics::Diagnostic;
use crate::dispatching::{DispatchContext, Policy, ReadySet};
use crate::models::{Dispatch, ExecutionTrace, Instance, Slot, Task, TaskId, Time};

/// Outcome of one simulation run.
///
/// Owns fresh instances for this run only; the task definitions are a
/// copy of the input and are never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    /// Policy the run used.
    pub policy: Policy,
    /// Horizon in ticks.
    pub simulation_time: Time,
    /// Task definitions of the run.
    pub tasks: Vec<Task>,
    /// Every instance created, in creation order.
    pub instances: Vec<Instance>,
    /// Selector decisions in chronological order.
    pub dispatches: Vec<Dispatch>,
    /// One slot per tick.
    pub trace: ExecutionTrace,
    /// Instances created per task, parallel to `tasks`.
    pub spawned: Vec<usize>,
    /// Non-fatal observations.
    pub diagnostics: Vec<Diagnostic>,
}

impl Simulation {
    /// Instances that completed within the horizon.
    pub fn finished_instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter().filter(|i| i.is_finished())
    }

    /// Instances still owing CPU time at the horizon.
    pub fn unfinished_instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter().filter(|i| !i.is_finished())
    }

    /// Instances of one task, in release order.
    pub fn instances_of(&self, task_id: TaskId) -> impl Iterator<Item = &Instance> {
        self.instances.iter().filter(move |i| i.task_id == task_id)
    }

    /// Task definition by ID.
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Instances created for a task.
    pub fn spawned_count(&self, task_id: TaskId) -> usize {
        self.tasks
            .iter()
            .position(|t| t.id == task_id)
            .and_then(|pos| self.spawned.get(pos).copied())
            .unwrap_or(0)
    }

    /// Ticks during which some instance held the CPU.
    pub fn busy_ticks(&self) -> usize {
        self.trace.len() - self.trace.idle_ticks()
    }
}

/// Discrete-time single-CPU simulator.
///
/// The policy is fixed at construction; each [`run`](Simulator::run) is
/// independent and deterministic.
///
/// # Example
///
/// ```
/// use u_cpusim::dispatching::Policy;
/// use u_cpusim::models::{Slot, Task};
/// use u_cpusim::scheduler::Simulator;
///
/// let tasks = vec![Task::new(0, 3), Task::new(1, 2).with_offset(1)];
/// let sim = Simulator::new(Policy::Fcfs).run(&tasks, 5);
///
/// let ids: Vec<_> = sim.trace.slots().iter().map(|s| s.task_id()).collect();
/// assert_eq!(ids, vec![Some(0), Some(0), Some(0), Some(1), Some(1)]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    policy: Policy,
}

impl Simulator {
    /// Creates a simulator for the given policy.
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    /// Policy used by this simulator.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Runs the task set for `simulation_time` ticks.
    ///
    /// A negative horizon is treated as 0.
    pub fn run(&self, tasks: &[Task], simulation_time: Time) -> Simulation {
        let rule = self.policy.rule();
        let horizon = simulation_time.max(0);

        let mut generator = InstanceGenerator::new(tasks, self.policy);
        let mut instances: Vec<Instance> = Vec::new();
        let mut ready = ReadySet::new();
        let mut trace = ExecutionTrace::with_capacity(horizon as usize);
        let mut dispatches: Vec<Dispatch> = Vec::new();

        info!(
            policy = %self.policy,
            tasks = tasks.len(),
            horizon,
            "simulation started"
        );

        for instance in generator.initial() {
            ready.track(instances.len());
            instances.push(instance);
        }

        let mut now: Time = 0;
        while now < horizon {
            for instance in generator.release_at(now) {
                debug!(task_id = instance.task_id, arrival = instance.arrival, "release");
                ready.track(instances.len());
                instances.push(instance);
            }
            ready.admit(now, &instances);

            let grant = {
                let context = DispatchContext::at_time(now, tasks, &instances);
                rule.select(&ready, &context)
            };

            let Some(grant) = grant else {
                trace.push(Slot::Idle);
                now += 1;
                continue;
            };

            let instance = &mut instances[grant.instance];
            let ran = instance.execute(now, grant.ticks.min(horizon - now));
            if ran == 0 {
                trace.push(Slot::Idle);
                now += 1;
                continue;
            }

            let task_id = instance.task_id;
            let finished = instance.is_finished();
            trace.extend(Slot::Run(task_id), ran);
            dispatches.push(Dispatch {
                instance: grant.instance,
                task_id,
                start: now,
                end: now + ran,
            });
            debug!(task_id, instance = grant.instance, start = now, ticks = ran, "dispatch");
            now += ran;

            if finished {
                debug!(task_id, instance = grant.instance, finish = now, "finished");
                ready.remove(grant.instance);
            } else {
                // Arrivals during the run queue ahead of the preempted instance.
                ready.admit(now, &instances);
                ready.requeue(grant.instance);
            }
        }

        let mut diagnostics = Vec::new();
        for (id, instance) in instances.iter().enumerate() {
            if instance.is_finished() {
                continue;
            }
            let diagnostic = Diagnostic::IncompleteInstance {
                task_id: instance.task_id,
                instance: id,
                release: instance.release,
                arrival: instance.arrival,
                remaining_time: instance.remaining_time,
            };
            diagnostic.emit();
            diagnostics.push(diagnostic);
        }

        info!(
            policy = %self.policy,
            instances = instances.len(),
            unfinished = diagnostics.len(),
            idle_ticks = trace.idle_ticks(),
            "simulation finished"
        );

        Simulation {
            policy: self.policy,
            simulation_time: horizon,
            tasks: tasks.to_vec(),
            instances,
            dispatches,
            trace,
            spawned: generator.into_spawned(),
            diagnostics,
        }
    }

    /// Runs a loaded configuration with this simulator's policy.
    pub fn run_config(&self, config: &SimulationConfig) -> Simulation {
        self.run(&config.tasks, config.simulation_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::{random_tasks, WorkloadParams};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn trace_ids(sim: &Simulation) -> Vec<Option<TaskId>> {
        sim.trace.slots().iter().map(Slot::task_id).collect()
    }

    fn ids(seq: &[usize]) -> Vec<Option<TaskId>> {
        seq.iter().map(|&id| Some(id)).collect()
    }

    #[test]
    fn test_fcfs_scenario() {
        init_tracing();
        let tasks = vec![Task::new(0, 3), Task::new(1, 2).with_offset(1)];
        let sim = Simulator::new(Policy::Fcfs).run(&tasks, 5);

        assert_eq!(trace_ids(&sim), ids(&[0, 0, 0, 1, 1]));
        assert_eq!(sim.instances[0].finish_time, Some(3));
        assert_eq!(sim.instances[1].start_time, Some(3));
        assert_eq!(sim.instances[1].finish_time, Some(5));
        assert!(sim.diagnostics.is_empty());
    }

    #[test]
    fn test_sjf_scenario() {
        let tasks = vec![Task::new(0, 5), Task::new(1, 2)];
        let sim = Simulator::new(Policy::Sjf).run(&tasks, 7);
        assert_eq!(trace_ids(&sim), ids(&[1, 1, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_sjf_non_preemptive() {
        // Shorter job arriving mid-run waits for the running one
        let tasks = vec![Task::new(0, 4), Task::new(1, 1).with_offset(1)];
        let sim = Simulator::new(Policy::Sjf).run(&tasks, 5);
        assert_eq!(trace_ids(&sim), ids(&[0, 0, 0, 0, 1]));
    }

    #[test]
    fn test_rr_scenario() {
        let tasks = vec![
            Task::new(0, 3).with_quantum(2),
            Task::new(1, 3).with_quantum(2),
        ];
        let sim = Simulator::new(Policy::RoundRobin).run(&tasks, 6);
        assert_eq!(trace_ids(&sim), ids(&[0, 0, 1, 1, 0, 1]));
        assert_eq!(sim.instances[0].intervals.len(), 2);
    }

    #[test]
    fn test_rr_arrival_queues_before_preempted() {
        // T1 arrives at 1, during T0's quantum; it runs before T0 resumes
        let tasks = vec![
            Task::new(0, 4).with_quantum(2),
            Task::new(1, 1).with_offset(1).with_quantum(2),
        ];
        let sim = Simulator::new(Policy::RoundRobin).run(&tasks, 5);
        assert_eq!(trace_ids(&sim), ids(&[0, 0, 1, 0, 0]));
    }

    #[test]
    fn test_srtf_preempts() {
        let tasks = vec![Task::new(0, 5), Task::new(1, 2).with_offset(1)];
        let sim = Simulator::new(Policy::Srtf).run(&tasks, 7);
        assert_eq!(trace_ids(&sim), ids(&[0, 1, 1, 0, 0, 0, 0]));
        assert_eq!(sim.instances[0].start_time, Some(0));
        assert_eq!(sim.instances[0].finish_time, Some(7));
    }

    #[test]
    fn test_rm_prefers_short_period() {
        let tasks = vec![Task::periodic(0, 2, 6), Task::periodic(1, 1, 3)];
        let sim = Simulator::new(Policy::RateMonotonic).run(&tasks, 6);
        assert_eq!(trace_ids(&sim), vec![
            Some(1), Some(0), Some(0), Some(1), None, None
        ]);
        assert_eq!(sim.spawned_count(0), 1);
        assert_eq!(sim.spawned_count(1), 2);
    }

    #[test]
    fn test_edf_scenario_no_misses() {
        // U = 2/4 + 3/6 = 1.0
        let tasks = vec![Task::periodic(0, 2, 4), Task::periodic(1, 3, 6)];
        let sim = Simulator::new(Policy::EarliestDeadlineFirst).run(&tasks, 12);

        assert_eq!(sim.spawned_count(0), 3);
        assert_eq!(sim.spawned_count(1), 2);
        assert!(sim
            .finished_instances()
            .all(|i| i.missed_deadline() == Some(false)));
        assert_eq!(sim.unfinished_instances().count(), 0);
        assert_eq!(sim.trace.idle_ticks(), 0);
    }

    #[test]
    fn test_idle_until_arrival() {
        let tasks = vec![Task::new(0, 1).with_offset(2)];
        let sim = Simulator::new(Policy::Fcfs).run(&tasks, 4);
        assert_eq!(trace_ids(&sim), vec![None, None, Some(0), None]);
        assert_eq!(sim.trace.tokens()[0], "idle");
    }

    #[test]
    fn test_horizon_truncates_run_to_completion() {
        let tasks = vec![Task::new(0, 10)];
        let sim = Simulator::new(Policy::Fcfs).run(&tasks, 4);

        assert_eq!(sim.trace.len(), 4);
        assert_eq!(sim.instances[0].remaining_time, 6);
        assert!(sim.instances[0].finish_time.is_none());
        assert_eq!(sim.diagnostics.len(), 1);
        assert!(matches!(
            sim.diagnostics[0],
            Diagnostic::IncompleteInstance { task_id: 0, remaining_time: 6, .. }
        ));
    }

    #[test]
    fn test_empty_inputs() {
        let sim = Simulator::new(Policy::Srtf).run(&[], 3);
        assert_eq!(sim.trace.len(), 3);
        assert_eq!(sim.trace.idle_ticks(), 3);

        let sim = Simulator::new(Policy::Fcfs).run(&[Task::new(0, 1)], 0);
        assert!(sim.trace.is_empty());
        assert_eq!(sim.diagnostics.len(), 1);

        let sim = Simulator::new(Policy::Fcfs).run(&[], -4);
        assert_eq!(sim.simulation_time, 0);
        assert!(sim.trace.is_empty());
    }

    #[test]
    fn test_run_does_not_touch_tasks() {
        let tasks = vec![Task::new(0, 2), Task::new(1, 2)];
        let before = tasks.clone();
        let _ = Simulator::new(Policy::RoundRobin).run(&tasks, 10);
        assert_eq!(tasks, before);
    }

    // ======================== Properties over random workloads ========================

    fn random_sets() -> Vec<(Vec<Task>, Time)> {
        let mut rng = StdRng::seed_from_u64(42);
        let params = WorkloadParams::default();
        (0..40)
            .map(|_| (random_tasks(&mut rng, &params), params.horizon))
            .collect()
    }

    #[test]
    fn test_property_trace_length_equals_horizon() {
        for (tasks, horizon) in random_sets() {
            for policy in Policy::ALL {
                let sim = Simulator::new(policy).run(&tasks, horizon);
                assert_eq!(sim.trace.len() as Time, horizon, "{policy}");
            }
        }
    }

    #[test]
    fn test_property_intervals_cover_demand() {
        for (tasks, horizon) in random_sets() {
            for policy in Policy::ALL {
                let sim = Simulator::new(policy).run(&tasks, horizon);
                for inst in &sim.instances {
                    assert_eq!(
                        inst.executed_time(),
                        inst.computation_time - inst.remaining_time
                    );
                    for pair in inst.intervals.windows(2) {
                        assert!(pair[0].end < pair[1].start, "{policy}: overlapping runs");
                    }
                    if let Some(first) = inst.intervals.first() {
                        assert!(first.start >= inst.arrival, "{policy}: ran before arrival");
                        assert_eq!(inst.start_time, Some(first.start));
                    }
                    if inst.is_finished() {
                        assert_eq!(inst.executed_time(), inst.computation_time);
                    }
                }
            }
        }
    }

    #[test]
    fn test_property_trace_matches_dispatches() {
        for (tasks, horizon) in random_sets() {
            for policy in Policy::ALL {
                let sim = Simulator::new(policy).run(&tasks, horizon);
                let busy: Time = sim.dispatches.iter().map(Dispatch::len).sum();
                assert_eq!(busy as usize, sim.busy_ticks());
                for d in &sim.dispatches {
                    for t in d.start..d.end {
                        assert_eq!(sim.trace.at(t), Some(Slot::Run(d.task_id)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_property_rr_respects_quantum() {
        for (tasks, horizon) in random_sets() {
            let sim = Simulator::new(Policy::RoundRobin).run(&tasks, horizon);
            for d in &sim.dispatches {
                let quantum = sim.task(d.task_id).map(|t| t.quantum).unwrap_or(0);
                assert!(d.len() <= quantum);
            }
        }
    }

    #[test]
    fn test_property_periodic_spawn_count() {
        for (tasks, horizon) in random_sets() {
            for policy in [Policy::RateMonotonic, Policy::EarliestDeadlineFirst] {
                let sim = Simulator::new(policy).run(&tasks, horizon);
                for task in &tasks {
                    assert_eq!(sim.spawned_count(task.id), task.releases_before(horizon));
                    let arrivals: Vec<Time> = sim.instances_of(task.id).map(|i| i.arrival).collect();
                    for pair in arrivals.windows(2) {
                        assert_eq!(pair[1] - pair[0], task.period);
                    }
                }
            }
        }
    }

    #[test]
    fn test_property_idempotent() {
        for (tasks, horizon) in random_sets().into_iter().take(10) {
            for policy in Policy::ALL {
                let simulator = Simulator::new(policy);
                assert_eq!(simulator.run(&tasks, horizon), simulator.run(&tasks, horizon));
            }
        }
    }
}
