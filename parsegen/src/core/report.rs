//! Structured validation failure payloads fed back to the repair step.

use std::path::PathBuf;

use serde::Serialize;

/// Number of reference rows included in a report as a diagnostic sample.
pub const SAMPLE_ROW_LIMIT: usize = 3;

/// Column-wise mismatch report between the reference and candidate tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Reference columns containing at least one differing cell, in
    /// reference column order.
    pub mismatched_columns: Vec<String>,
    /// 0-based data-row indices where a mismatched column differs, ascending.
    pub mismatched_rows: Vec<usize>,
    /// Up to [`SAMPLE_ROW_LIMIT`] reference rows.
    pub sample_rows: Vec<Vec<String>>,
}

impl ValidationReport {
    /// Render the report as the error payload for the logic-repair prompt.
    pub fn to_prompt_text(&self) -> String {
        let mut buf = String::new();
        buf.push_str(&format!(
            "mismatched columns: {}\n",
            self.mismatched_columns.join(", ")
        ));
        let rows: Vec<String> = self.mismatched_rows.iter().map(usize::to_string).collect();
        buf.push_str(&format!("mismatched row indices: {}\n", rows.join(", ")));
        if !self.sample_rows.is_empty() {
            buf.push_str("first rows of the reference dataset:\n");
            for row in &self.sample_rows {
                buf.push_str(&format!("  {}\n", row.join(", ")));
            }
        }
        buf
    }
}

/// Why the last validation did not pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationFailure {
    /// The candidate dataset was never produced.
    MissingArtifact { path: PathBuf },
    /// The candidate dataset exists but could not be read as tabular data.
    Malformed { path: PathBuf, message: String },
    /// The candidate dataset differs from the reference.
    Mismatch(ValidationReport),
}

impl ValidationFailure {
    pub fn to_prompt_text(&self) -> String {
        match self {
            ValidationFailure::MissingArtifact { path } => format!(
                "the expected output dataset was not produced at {}\n",
                path.display()
            ),
            ValidationFailure::Malformed { path, message } => format!(
                "the output dataset at {} is not readable tabular data: {}\n",
                path.display(),
                message
            ),
            ValidationFailure::Mismatch(report) => report.to_prompt_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_report_renders_columns_rows_and_sample() {
        let report = ValidationReport {
            mismatched_columns: vec!["Age".to_string()],
            mismatched_rows: vec![0, 2],
            sample_rows: vec![vec!["Alice".to_string(), "25".to_string()]],
        };
        let text = report.to_prompt_text();
        assert!(text.contains("mismatched columns: Age"));
        assert!(text.contains("mismatched row indices: 0, 2"));
        assert!(text.contains("Alice, 25"));
    }

    #[test]
    fn missing_artifact_names_the_expected_path() {
        let failure = ValidationFailure::MissingArtifact {
            path: PathBuf::from("/tmp/output.csv"),
        };
        assert!(failure.to_prompt_text().contains("/tmp/output.csv"));
    }
}
