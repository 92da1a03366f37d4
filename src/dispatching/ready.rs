//! Ready-set tracking.
//!
//! Instances enter the ready set once their arrival tick is reached and
//! leave it when they finish. The set keeps FIFO order, which round
//! robin consumes directly; key-based rules ignore it.

use std::collections::VecDeque;

use crate::models::{Instance, InstanceId, Time};

/// Instances eligible to run, in admission order.
#[derive(Debug, Clone, Default)]
pub struct ReadySet {
    queue: VecDeque<InstanceId>,
    pending: Vec<InstanceId>,
}

impl ReadySet {
    /// Creates an empty ready set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instance that will become ready at its arrival tick.
    pub fn track(&mut self, id: InstanceId) {
        self.pending.push(id);
    }

    /// Moves every pending instance with `arrival <= now` into the queue.
    ///
    /// Simultaneous arrivals are queued by (arrival, task id, instance id).
    /// Returns the number of admitted instances.
    pub fn admit(&mut self, now: Time, instances: &[Instance]) -> usize {
        let arrived = |id: &InstanceId| instances.get(*id).is_some_and(|i| i.arrival <= now);

        let mut admitted: Vec<InstanceId> = self.pending.iter().copied().filter(arrived).collect();
        if admitted.is_empty() {
            return 0;
        }
        self.pending.retain(|id| !arrived(id));

        admitted.sort_by_key(|&id| {
            let inst = &instances[id];
            (inst.arrival, inst.task_id, id)
        });
        let count = admitted.len();
        self.queue.extend(admitted);
        count
    }

    /// Moves an instance to the tail of the queue.
    pub fn requeue(&mut self, id: InstanceId) {
        self.remove(id);
        self.queue.push_back(id);
    }

    /// Removes an instance. Returns whether it was queued.
    pub fn remove(&mut self, id: InstanceId) -> bool {
        match self.queue.iter().position(|&q| q == id) {
            Some(pos) => {
                self.queue.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Queued instances, head first.
    pub fn iter(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.queue.iter().copied()
    }

    /// Head of the queue.
    pub fn front(&self) -> Option<InstanceId> {
        self.queue.front().copied()
    }

    /// Whether an instance is queued.
    pub fn contains(&self, id: InstanceId) -> bool {
        self.queue.contains(&id)
    }

    /// Number of queued instances.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of instances not yet arrived.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn make_instances(arrivals: &[(usize, Time)]) -> Vec<Instance> {
        arrivals
            .iter()
            .map(|&(task_id, arrival)| Instance::new(&Task::new(task_id, 1), 0, arrival))
            .collect()
    }

    #[test]
    fn test_admit_by_arrival() {
        let instances = make_instances(&[(0, 3), (1, 0), (2, 1)]);
        let mut ready = ReadySet::new();
        for id in 0..instances.len() {
            ready.track(id);
        }

        assert_eq!(ready.admit(0, &instances), 1);
        assert_eq!(ready.iter().collect::<Vec<_>>(), vec![1]);

        assert_eq!(ready.admit(5, &instances), 2);
        assert_eq!(ready.iter().collect::<Vec<_>>(), vec![1, 2, 0]);
        assert_eq!(ready.pending_len(), 0);
    }

    #[test]
    fn test_simultaneous_arrivals_by_task_id() {
        let instances = make_instances(&[(2, 0), (0, 0), (1, 0)]);
        let mut ready = ReadySet::new();
        for id in 0..instances.len() {
            ready.track(id);
        }
        ready.admit(0, &instances);
        assert_eq!(ready.iter().collect::<Vec<_>>(), vec![1, 2, 0]);
    }

    #[test]
    fn test_requeue_and_remove() {
        let instances = make_instances(&[(0, 0), (1, 0), (2, 0)]);
        let mut ready = ReadySet::new();
        for id in 0..instances.len() {
            ready.track(id);
        }
        ready.admit(0, &instances);

        ready.requeue(0);
        assert_eq!(ready.iter().collect::<Vec<_>>(), vec![1, 2, 0]);
        assert_eq!(ready.front(), Some(1));

        assert!(ready.remove(2));
        assert!(!ready.remove(2));
        assert!(!ready.contains(2));
        assert_eq!(ready.len(), 2);
    }

    #[test]
    fn test_empty() {
        let mut ready = ReadySet::new();
        assert!(ready.is_empty());
        assert_eq!(ready.admit(10, &[]), 0);
        assert!(ready.front().is_none());
    }
}
