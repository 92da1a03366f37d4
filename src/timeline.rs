//! Textual Gantt rendering of a run.
//!
//! One row per task, one column per tick:
//!
//! | Glyph | Meaning |
//! |-------|---------|
//! | `#` | an instance of the task held the CPU |
//! | `-` | an instance was ready but waiting |
//! | `_` | nothing pending for the task |
//!
//! ```text
//! T0: ###__
//! T1: _--##
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::{TaskId, Time};
use crate::scheduler::Simulation;

/// Rendered timeline, one row per task in task order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Number of columns.
    pub horizon: Time,
    /// `(task, glyphs)` pairs.
    pub rows: Vec<(TaskId, String)>,
}

impl Timeline {
    /// Builds the timeline from recorded execution intervals.
    ///
    /// Linear in the horizon per task plus the total number of intervals:
    /// pending spans are accumulated in a per-task difference array, then
    /// execution intervals are painted over them.
    pub fn from_simulation(simulation: &Simulation) -> Self {
        let horizon = simulation.simulation_time.max(0);
        let width = horizon as usize;
        let position: HashMap<TaskId, usize> = simulation
            .tasks
            .iter()
            .enumerate()
            .map(|(pos, task)| (task.id, pos))
            .collect();

        let mut pending = vec![vec![0_i64; width + 1]; simulation.tasks.len()];
        let mut running = vec![vec![false; width]; simulation.tasks.len()];
        for inst in &simulation.instances {
            let Some(&pos) = position.get(&inst.task_id) else {
                continue;
            };
            let from = inst.arrival.clamp(0, horizon);
            let to = inst.finish_time.unwrap_or(horizon).clamp(0, horizon);
            if from < to {
                pending[pos][from as usize] += 1;
                pending[pos][to as usize] -= 1;
            }
            for iv in &inst.intervals {
                for t in iv.start.clamp(0, horizon)..iv.end.clamp(0, horizon) {
                    running[pos][t as usize] = true;
                }
            }
        }

        let rows = simulation
            .tasks
            .iter()
            .zip(pending.iter().zip(&running))
            .map(|(task, (pending, running))| {
                let mut depth = 0;
                let row: String = (0..width)
                    .map(|t| {
                        depth += pending[t];
                        if running[t] {
                            '#'
                        } else if depth > 0 {
                            '-'
                        } else {
                            '_'
                        }
                    })
                    .collect();
                (task.id, row)
            })
            .collect();
        Self { horizon, rows }
    }

    /// Row for one task.
    pub fn row(&self, task_id: TaskId) -> Option<&str> {
        self.rows
            .iter()
            .find(|(id, _)| *id == task_id)
            .map(|(_, row)| row.as_str())
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (task_id, row) in &self.rows {
            writeln!(f, "T{task_id}: {row}")?;
        }
        Ok(())
    }
}
