//! The mutable record of the current generated program and its outcomes.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::report::ValidationFailure;

/// The artifact under repair. One record per run, overwritten in place on
/// every generation and repair, never replaced.
///
/// Invariant: at most one of `execution_error` / `validation_error` is
/// present whenever the planner evaluates state. The mutators below keep
/// that true; an execution failure must be resolved before validation
/// results are meaningful again.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationArtifact {
    /// Most recent generated program text.
    pub source_code: Option<String>,
    /// Where the program was materialized; set after the first successful write.
    pub source_location: Option<PathBuf>,
    /// Stderr or launch-failure text from the last run; `None` means the
    /// last run, if any, succeeded.
    pub execution_error: Option<String>,
    /// Mismatch description from the last validation; `None` means the last
    /// validation, if any, passed.
    pub validation_error: Option<ValidationFailure>,
}

impl GenerationArtifact {
    /// Replace the program text with a fresh generation or repair.
    pub fn record_source(&mut self, code: String) {
        self.source_code = Some(code);
    }

    pub fn record_location(&mut self, path: PathBuf) {
        self.source_location = Some(path);
    }

    /// Record a failed run. Clears any validation error, since validation
    /// of an unrunnable program is stale.
    pub fn record_execution_failure(&mut self, stderr: String) {
        self.execution_error = Some(stderr);
        self.validation_error = None;
    }

    pub fn record_execution_success(&mut self) {
        self.execution_error = None;
    }

    pub fn record_validation_failure(&mut self, failure: ValidationFailure) {
        self.execution_error = None;
        self.validation_error = Some(failure);
    }

    pub fn record_validation_success(&mut self) {
        self.validation_error = None;
    }

    pub fn clear_execution_error(&mut self) {
        self.execution_error = None;
    }

    pub fn clear_validation_error(&mut self) {
        self.validation_error = None;
    }

    /// True when the last cycle executed and validated cleanly.
    pub fn is_clean(&self) -> bool {
        self.execution_error.is_none() && self.validation_error.is_none()
    }
}
