//! Dataset validation: compare the produced dataset against the reference.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::report::ValidationFailure;
use crate::core::table::{Table, compare};

/// The reference dataset is missing.
///
/// A configuration error, not a workflow-recoverable one: callers downcast
/// and treat this as fatal instead of routing it into the repair loop.
#[derive(Debug)]
pub struct MissingReferenceError {
    pub path: PathBuf,
}

impl fmt::Display for MissingReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing reference dataset {}", self.path.display())
    }
}

impl std::error::Error for MissingReferenceError {}

/// Validation verdict for one produced dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Pass,
    Failed(ValidationFailure),
}

/// Compare the dataset at `candidate` against the one at `reference`.
///
/// A missing or unreadable candidate is a recoverable failure (the generated
/// program is at fault); a missing or unreadable reference is an error.
#[instrument(skip_all, fields(reference = %reference.display(), candidate = %candidate.display()))]
pub fn validate(reference: &Path, candidate: &Path) -> Result<ValidationOutcome> {
    if !reference.exists() {
        return Err(MissingReferenceError {
            path: reference.to_path_buf(),
        }
        .into());
    }
    if !candidate.exists() {
        debug!("candidate dataset missing");
        return Ok(ValidationOutcome::Failed(
            ValidationFailure::MissingArtifact {
                path: candidate.to_path_buf(),
            },
        ));
    }

    let reference_table = load_table(reference)
        .with_context(|| format!("load reference dataset {}", reference.display()))?;
    let candidate_table = match load_table(candidate) {
        Ok(table) => table,
        Err(err) => {
            debug!(err = %err, "candidate dataset unreadable");
            return Ok(ValidationOutcome::Failed(ValidationFailure::Malformed {
                path: candidate.to_path_buf(),
                message: format!("{err:#}"),
            }));
        }
    };

    match compare(&reference_table, &candidate_table) {
        None => Ok(ValidationOutcome::Pass),
        Some(report) => {
            debug!(
                columns = report.mismatched_columns.len(),
                rows = report.mismatched_rows.len(),
                "datasets differ"
            );
            Ok(ValidationOutcome::Failed(ValidationFailure::Mismatch(
                report,
            )))
        }
    }
}

fn load_table(path: &Path) -> Result<Table> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("open {}", path.display()))?;
    let columns = reader
        .headers()
        .context("read header row")?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read row {}", idx + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn identical_datasets_pass() {
        let temp = tempfile::tempdir().expect("tempdir");
        let reference = temp.path().join("reference.csv");
        let candidate = temp.path().join("output.csv");
        fs::write(&reference, "Name,Age\nAlice,25\n").expect("write");
        fs::write(&candidate, "Name,Age\nAlice,25\n").expect("write");

        let outcome = validate(&reference, &candidate).expect("validate");
        assert_eq!(outcome, ValidationOutcome::Pass);
    }

    #[test]
    fn altered_cell_reports_exact_column_and_row() {
        let temp = tempfile::tempdir().expect("tempdir");
        let reference = temp.path().join("reference.csv");
        let candidate = temp.path().join("output.csv");
        fs::write(&reference, "Name,Age\nAlice,25\n").expect("write");
        fs::write(&candidate, "Name,Age\nAlice,26\n").expect("write");

        let outcome = validate(&reference, &candidate).expect("validate");
        let ValidationOutcome::Failed(ValidationFailure::Mismatch(report)) = outcome else {
            panic!("expected mismatch, got {outcome:?}");
        };
        assert_eq!(report.mismatched_columns, vec!["Age".to_string()]);
        assert_eq!(report.mismatched_rows, vec![0]);
    }

    #[test]
    fn missing_candidate_is_a_recoverable_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let reference = temp.path().join("reference.csv");
        fs::write(&reference, "Name,Age\nAlice,25\n").expect("write");

        let outcome = validate(&reference, &temp.path().join("output.csv")).expect("validate");
        assert!(matches!(
            outcome,
            ValidationOutcome::Failed(ValidationFailure::MissingArtifact { .. })
        ));
    }

    #[test]
    fn missing_reference_is_a_fatal_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let candidate = temp.path().join("output.csv");
        fs::write(&candidate, "Name,Age\nAlice,25\n").expect("write");

        let err = validate(&temp.path().join("reference.csv"), &candidate)
            .expect_err("validate should fail");
        assert!(err.downcast_ref::<MissingReferenceError>().is_some());
    }

    #[test]
    fn ragged_candidate_is_a_recoverable_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let reference = temp.path().join("reference.csv");
        let candidate = temp.path().join("output.csv");
        fs::write(&reference, "Name,Age\nAlice,25\n").expect("write");
        fs::write(&candidate, "Name,Age\nAlice\n").expect("write");

        let outcome = validate(&reference, &candidate).expect("validate");
        assert!(matches!(
            outcome,
            ValidationOutcome::Failed(ValidationFailure::Malformed { .. })
        ));
    }

    #[test]
    fn row_order_sensitivity_mismatches_every_column() {
        let temp = tempfile::tempdir().expect("tempdir");
        let reference = temp.path().join("reference.csv");
        let candidate = temp.path().join("output.csv");
        fs::write(&reference, "Name,Age\nAlice,25\nBob,31\n").expect("write");
        fs::write(&candidate, "Name,Age\nBob,31\nAlice,25\n").expect("write");

        let outcome = validate(&reference, &candidate).expect("validate");
        let ValidationOutcome::Failed(ValidationFailure::Mismatch(report)) = outcome else {
            panic!("expected mismatch, got {outcome:?}");
        };
        assert_eq!(
            report.mismatched_columns,
            vec!["Name".to_string(), "Age".to_string()]
        );
    }
}
