//! Error types.
//!
//! Only conditions that prevent a simulation from starting are errors.
//! Anything observed during a run (an instance left unfinished, an
//! overloaded task set) is reported as a [`Diagnostic`](crate::Diagnostic).

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while preparing a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A task entry lacks a required field.
    #[error("task {index}: missing field `{field}`")]
    MissingTaskField {
        /// Position of the task in the input list.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A top-level setting is absent.
    #[error("missing setting `{field}`")]
    MissingSetting {
        /// Name of the missing setting.
        field: &'static str,
    },

    /// One or more task fields hold out-of-range values.
    #[error("invalid task set: {}", summarize(.0))]
    InvalidTasks(Vec<ValidationError>),

    /// The scheduler name is not one of the supported policies.
    #[error("unknown scheduling policy `{0}` (expected FCFS, SJF, RR, SRTF, RM or EDF)")]
    UnknownPolicy(String),

    /// The configuration is not well-formed JSON or has mistyped values.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Whether the error comes from the input description rather than I/O.
    pub fn is_config_error(&self) -> bool {
        !matches!(self, SimError::Io(_))
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, SimError>;
