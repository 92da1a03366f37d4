//! Simulation configuration and JSON loading.
//!
//! # Input Format
//!
//! ```json
//! {
//!   "simulation_time": 20,
//!   "scheduler_name": "EDF",
//!   "tasks": [
//!     { "offset": 0, "computation_time": 2, "period_time": 4, "quantum": 2, "deadline": 4 }
//!   ],
//!   "starvation_threshold": 0.8
//! }
//! ```
//!
//! Task ids are assigned by position in `tasks`. Every task field is
//! required; a missing one is reported with the task index and field
//! name. `starvation_threshold` is optional.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::analysis::DEFAULT_STARVATION_THRESHOLD;
use crate::dispatching::Policy;
use crate::error::{Result, SimError};
use crate::models::{Task, Time};
use crate::validation::{validate_horizon, validate_tasks};

/// A validated simulation setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Horizon in ticks.
    pub simulation_time: Time,
    /// Scheduling policy.
    pub policy: Policy,
    /// Task definitions, ids matching their position.
    pub tasks: Vec<Task>,
    /// Wait-ratio threshold for starvation detection.
    pub starvation_threshold: f64,
}

#[derive(Deserialize)]
struct RawConfig {
    simulation_time: Option<Time>,
    scheduler_name: Option<String>,
    tasks: Option<Vec<RawTask>>,
    starvation_threshold: Option<f64>,
}

#[derive(Deserialize)]
struct RawTask {
    offset: Option<Time>,
    computation_time: Option<Time>,
    period_time: Option<Time>,
    quantum: Option<Time>,
    deadline: Option<Time>,
}

impl RawTask {
    fn into_task(self, index: usize) -> Result<Task> {
        let require = |value: Option<Time>, field: &'static str| {
            value.ok_or(SimError::MissingTaskField { index, field })
        };
        Ok(Task {
            id: index,
            offset: require(self.offset, "offset")?,
            computation_time: require(self.computation_time, "computation_time")?,
            period: require(self.period_time, "period_time")?,
            quantum: require(self.quantum, "quantum")?,
            relative_deadline: require(self.deadline, "deadline")?,
        })
    }
}

impl SimulationConfig {
    /// Creates a configuration with the default starvation threshold.
    ///
    /// Not validated; use [`validate`](Self::validate) or load from JSON.
    pub fn new(policy: Policy, tasks: Vec<Task>, simulation_time: Time) -> Self {
        Self {
            simulation_time,
            policy,
            tasks,
            starvation_threshold: DEFAULT_STARVATION_THRESHOLD,
        }
    }

    /// Sets the starvation threshold.
    pub fn with_starvation_threshold(mut self, threshold: f64) -> Self {
        self.starvation_threshold = threshold;
        self
    }

    /// Checks the horizon and every task.
    pub fn validate(&self) -> Result<()> {
        let mut errors = validate_horizon(self.simulation_time).err().unwrap_or_default();
        if let Err(task_errors) = validate_tasks(&self.tasks) {
            errors.extend(task_errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SimError::InvalidTasks(errors))
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Reads a JSON configuration from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawConfig = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    /// Reads a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let simulation_time = raw.simulation_time.ok_or(SimError::MissingSetting {
            field: "simulation_time",
        })?;
        let policy: Policy = raw
            .scheduler_name
            .ok_or(SimError::MissingSetting {
                field: "scheduler_name",
            })?
            .parse()?;
        let tasks = raw
            .tasks
            .ok_or(SimError::MissingSetting { field: "tasks" })?
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_task(index))
            .collect::<Result<Vec<_>>>()?;

        let config = Self {
            simulation_time,
            policy,
            tasks,
            starvation_threshold: raw
                .starvation_threshold
                .unwrap_or(DEFAULT_STARVATION_THRESHOLD),
        };
        config.validate()?;
        Ok(config)
    }
}
