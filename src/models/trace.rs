//! Execution trace model.
//!
//! The trace holds one slot per simulated tick: either the id of the task
//! whose instance held the CPU, or idle. Its length always equals the
//! simulation horizon.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::{InstanceId, TaskId, Time};

/// What the CPU did during one tick.
///
/// Serialized as the bare task id, or the string `"idle"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// An instance of this task ran.
    Run(TaskId),
    /// No instance was ready.
    Idle,
}

impl Slot {
    /// Task that ran, if any.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Slot::Run(id) => Some(*id),
            Slot::Idle => None,
        }
    }

    /// Whether the CPU was idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, Slot::Idle)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Run(id) => write!(f, "{id}"),
            Slot::Idle => f.write_str(IDLE_TOKEN),
        }
    }
}

impl From<TaskId> for Slot {
    fn from(id: TaskId) -> Self {
        Slot::Run(id)
    }
}

const IDLE_TOKEN: &str = "idle";

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Slot::Run(id) => serializer.serialize_u64(*id as u64),
            Slot::Idle => serializer.serialize_str(IDLE_TOKEN),
        }
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SlotVisitor)
    }
}

struct SlotVisitor;

impl<'de> Visitor<'de> for SlotVisitor {
    type Value = Slot;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a task id or \"idle\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Slot, E> {
        usize::try_from(v)
            .map(Slot::Run)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Slot, E> {
        usize::try_from(v)
            .map(Slot::Run)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Slot, E> {
        if v == IDLE_TOKEN {
            Ok(Slot::Idle)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

/// One selector decision: `instance` held the CPU during `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    /// Dispatched instance.
    pub instance: InstanceId,
    /// Its task (denormalized for query convenience).
    pub task_id: TaskId,
    /// First tick granted.
    pub start: Time,
    /// Tick after the last one granted.
    pub end: Time,
}

impl Dispatch {
    /// Granted ticks.
    pub fn len(&self) -> Time {
        self.end - self.start
    }

    /// Whether nothing was granted.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether tick `t` was covered by this dispatch.
    pub fn covers(&self, t: Time) -> bool {
        self.start <= t && t < self.end
    }
}

/// Tick-by-tick execution sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionTrace {
    slots: Vec<Slot>,
}

impl ExecutionTrace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty trace with room for `horizon` ticks.
    pub fn with_capacity(horizon: usize) -> Self {
        Self {
            slots: Vec::with_capacity(horizon),
        }
    }

    /// Appends `ticks` copies of `slot`.
    pub(crate) fn extend(&mut self, slot: Slot, ticks: Time) {
        let ticks = ticks.max(0) as usize;
        self.slots.extend(std::iter::repeat(slot).take(ticks));
    }

    /// Appends one slot.
    pub(crate) fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    /// All slots in tick order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no tick was recorded.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at tick `t`.
    pub fn at(&self, t: Time) -> Option<Slot> {
        usize::try_from(t).ok().and_then(|i| self.slots.get(i).copied())
    }

    /// Number of idle ticks.
    pub fn idle_ticks(&self) -> usize {
        self.slots.iter().filter(|s| s.is_idle()).count()
    }

    /// Number of ticks used by a task.
    pub fn busy_ticks(&self, task_id: TaskId) -> usize {
        self.slots
            .iter()
            .filter(|s| s.task_id() == Some(task_id))
            .count()
    }

    /// Tokens as strings (`"0"`, `"1"`, `"idle"`), one per tick.
    pub fn tokens(&self) -> Vec<String> {
        self.slots.iter().map(Slot::to_string).collect()
    }
}

impl fmt::Display for ExecutionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
        }
        f.write_str("]")
    }
}
