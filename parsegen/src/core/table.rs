//! Pure tabular comparison between reference and candidate datasets.
//!
//! Cells compare as raw strings with no numeric tolerance, and rows compare
//! by position with no alignment step. A single inserted or deleted row
//! therefore cascades into a full-column mismatch. Both are deliberate,
//! documented limitations of the validation contract.

use crate::core::report::{SAMPLE_ROW_LIMIT, ValidationReport};

/// In-memory table with a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Compare `candidate` against `reference` column by column.
///
/// Returns `None` when every reference column matches. The reference defines
/// the contract: columns that exist only in the candidate are ignored.
pub fn compare(reference: &Table, candidate: &Table) -> Option<ValidationReport> {
    let mismatched_columns: Vec<String> = reference
        .columns
        .iter()
        .filter(|name| column_differs(reference, candidate, name))
        .cloned()
        .collect();
    if mismatched_columns.is_empty() {
        return None;
    }

    let row_count = reference.rows.len().max(candidate.rows.len());
    let mismatched_rows: Vec<usize> = (0..row_count)
        .filter(|&row| {
            mismatched_columns
                .iter()
                .any(|name| cell_differs(reference, candidate, name, row))
        })
        .collect();

    let sample_rows = reference
        .rows
        .iter()
        .take(SAMPLE_ROW_LIMIT)
        .cloned()
        .collect();

    Some(ValidationReport {
        mismatched_columns,
        mismatched_rows,
        sample_rows,
    })
}

fn column_differs(reference: &Table, candidate: &Table, name: &str) -> bool {
    if column_index(candidate, name).is_none() {
        return true;
    }
    if reference.rows.len() != candidate.rows.len() {
        return true;
    }
    (0..reference.rows.len()).any(|row| cell_differs(reference, candidate, name, row))
}

fn cell_differs(reference: &Table, candidate: &Table, name: &str, row: usize) -> bool {
    match (cell(reference, name, row), cell(candidate, name, row)) {
        (Some(a), Some(b)) => a != b,
        (None, None) => false,
        _ => true,
    }
}

fn cell<'a>(table: &'a Table, name: &str, row: usize) -> Option<&'a str> {
    let col = column_index(table, name)?;
    table.rows.get(row)?.get(col).map(String::as_str)
}

fn column_index(table: &Table, name: &str) -> Option<usize> {
    table.columns.iter().position(|c| c == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn identical_tables_pass() {
        let reference = table(&["Name", "Age"], &[&["Alice", "25"], &["Bob", "31"]]);
        assert_eq!(compare(&reference, &reference.clone()), None);
    }

    #[test]
    fn single_altered_cell_pins_column_and_row() {
        let reference = table(&["Name", "Age"], &[&["Alice", "25"]]);
        let candidate = table(&["Name", "Age"], &[&["Alice", "26"]]);

        let report = compare(&reference, &candidate).expect("mismatch");
        assert_eq!(report.mismatched_columns, vec!["Age".to_string()]);
        assert_eq!(report.mismatched_rows, vec![0]);
    }

    #[test]
    fn altered_cell_in_later_row_reports_that_row_only() {
        let reference = table(
            &["Name", "Age"],
            &[&["Alice", "25"], &["Bob", "31"], &["Carol", "19"]],
        );
        let candidate = table(
            &["Name", "Age"],
            &[&["Alice", "25"], &["Bob", "32"], &["Carol", "19"]],
        );

        let report = compare(&reference, &candidate).expect("mismatch");
        assert_eq!(report.mismatched_columns, vec!["Age".to_string()]);
        assert_eq!(report.mismatched_rows, vec![1]);
    }

    #[test]
    fn reordered_rows_mismatch_every_column() {
        let reference = table(&["Name", "Age"], &[&["Alice", "25"], &["Bob", "31"]]);
        let candidate = table(&["Name", "Age"], &[&["Bob", "31"], &["Alice", "25"]]);

        let report = compare(&reference, &candidate).expect("mismatch");
        assert_eq!(
            report.mismatched_columns,
            vec!["Name".to_string(), "Age".to_string()]
        );
        assert_eq!(report.mismatched_rows, vec![0, 1]);
    }

    #[test]
    fn missing_candidate_column_is_a_mismatch() {
        let reference = table(&["Name", "Age"], &[&["Alice", "25"]]);
        let candidate = table(&["Name"], &[&["Alice"]]);

        let report = compare(&reference, &candidate).expect("mismatch");
        assert_eq!(report.mismatched_columns, vec!["Age".to_string()]);
    }

    #[test]
    fn extra_candidate_column_is_ignored() {
        let reference = table(&["Name"], &[&["Alice"]]);
        let candidate = table(&["Name", "Age"], &[&["Alice", "25"]]);
        assert_eq!(compare(&reference, &candidate), None);
    }

    #[test]
    fn extra_candidate_row_cascades_into_full_column_mismatch() {
        let reference = table(&["Name", "Age"], &[&["Alice", "25"]]);
        let candidate = table(&["Name", "Age"], &[&["Alice", "25"], &["Bob", "31"]]);

        let report = compare(&reference, &candidate).expect("mismatch");
        assert_eq!(
            report.mismatched_columns,
            vec!["Name".to_string(), "Age".to_string()]
        );
        assert_eq!(report.mismatched_rows, vec![1]);
    }

    #[test]
    fn sample_is_capped_at_three_reference_rows() {
        let reference = table(
            &["N"],
            &[&["1"], &["2"], &["3"], &["4"], &["5"]],
        );
        let candidate = table(&["N"], &[&["9"], &["2"], &["3"], &["4"], &["5"]]);

        let report = compare(&reference, &candidate).expect("mismatch");
        assert_eq!(report.sample_rows.len(), 3);
        assert_eq!(report.mismatched_rows, vec![0]);
    }
}
