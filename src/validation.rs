//! Input validation for simulation task sets.
//!
//! Checks task definitions before a run starts. Detects:
//! - Duplicate task IDs
//! - Negative arrival offsets
//! - Non-positive computation time, period, quantum or deadline
//! - Negative simulation horizons
//!
//! All problems are collected; validation never stops at the first one.

use crate::models::{Task, Time};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateId,
    /// A task arrives before t=0.
    NegativeOffset,
    /// A duration-like field is zero or negative.
    NonPositiveValue,
    /// The simulation horizon is negative.
    NegativeHorizon,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a task set.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. `offset >= 0`
/// 3. `computation_time`, `period`, `quantum`, `relative_deadline` all `> 0`
///
/// Period, quantum and deadline are checked regardless of the policy the
/// set will run under, so one task file is valid for every policy.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for (index, task) in tasks.iter().enumerate() {
        if !ids.insert(task.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("task {index}: duplicate task ID {}", task.id),
            ));
        }

        if task.offset < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeOffset,
                format!("task {index}: offset {} is negative", task.offset),
            ));
        }

        let positive_fields = [
            ("computation_time", task.computation_time),
            ("period_time", task.period),
            ("quantum", task.quantum),
            ("deadline", task.relative_deadline),
        ];
        for (field, value) in positive_fields {
            if value <= 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonPositiveValue,
                    format!("task {index}: {field} must be positive, got {value}"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the simulation horizon.
///
/// A horizon of 0 is accepted and yields an empty run.
pub fn validate_horizon(simulation_time: Time) -> ValidationResult {
    if simulation_time < 0 {
        return Err(vec![ValidationError::new(
            ValidationErrorKind::NegativeHorizon,
            format!("simulation_time {simulation_time} is negative"),
        )]);
    }
    Ok(())
}
