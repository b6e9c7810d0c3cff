//! Document text extraction for the preprocessing step.
//!
//! Extraction is an external collaborator from the workflow's point of view:
//! file in, one text blob out. The built-in [`FileExtractor`] covers plain
//! inputs; richer formats plug in through the [`Extractor`] trait.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Extensions the built-in extractor understands.
const SUPPORTED_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// Abstraction over document text extraction backends.
pub trait Extractor {
    /// Produce one text blob for the document at `path`.
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Extractor for plain inputs: text files pass through unchanged, tabular
/// files are wrapped line by line so the model sees row boundaries.
pub struct FileExtractor;

impl Extractor for FileExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        match extension_of(path).as_str() {
            "txt" => fs::read_to_string(path).with_context(|| format!("read {}", path.display())),
            "csv" => extract_tagged_lines(path),
            other => bail!(
                "unsupported document type '{other}' for {} (supported: {})",
                path.display(),
                SUPPORTED_EXTENSIONS.join(", ")
            ),
        }
    }
}

/// Wrap each line of a tabular file in `<line N>` tags.
fn extract_tagged_lines(path: &Path) -> Result<String> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut buf = String::new();
    for (idx, line) in contents.lines().enumerate() {
        buf.push_str(&format!("<line {idx}>{line}</line {idx}>"));
    }
    Ok(buf)
}

/// Collect supported documents under `dir`, sorted by path.
///
/// Errors on a missing directory or when nothing supported is found; both
/// are configuration problems, not workflow-recoverable ones.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("input directory {} does not exist", dir.display());
    }
    let mut documents = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry.context("read directory entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if SUPPORTED_EXTENSIONS.contains(&extension_of(&path).as_str()) {
            documents.push(path);
        }
    }
    documents.sort();
    if documents.is_empty() {
        bail!(
            "no supported documents in {} (supported: {})",
            dir.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        );
    }
    debug!(count = documents.len(), "discovered input documents");
    Ok(documents)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_files_pass_through_unchanged() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("statement.txt");
        fs::write(&path, "plain body\n").expect("write");

        let text = FileExtractor.extract(&path).expect("extract");
        assert_eq!(text, "plain body\n");
    }

    #[test]
    fn tabular_files_are_line_tagged() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("statement.csv");
        fs::write(&path, "Name,Age\nAlice,25\n").expect("write");

        let text = FileExtractor.extract(&path).expect("extract");
        assert_eq!(
            text,
            "<line 0>Name,Age</line 0><line 1>Alice,25</line 1>"
        );
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("statement.pdf");
        fs::write(&path, "%PDF").expect("write");

        let err = FileExtractor.extract(&path).expect_err("should fail");
        assert!(err.to_string().contains("unsupported document type"));
    }

    #[test]
    fn discovery_is_sorted_and_skips_unsupported_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("b.csv"), "x\n").expect("write");
        fs::write(temp.path().join("a.txt"), "x\n").expect("write");
        fs::write(temp.path().join("ignore.pdf"), "x\n").expect("write");

        let documents = discover_documents(temp.path()).expect("discover");
        let names: Vec<String> = documents
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.csv"]);
    }

    #[test]
    fn empty_directory_is_a_configuration_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = discover_documents(temp.path()).expect_err("should fail");
        assert!(err.to_string().contains("no supported documents"));
    }

    #[test]
    fn missing_directory_is_a_configuration_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = discover_documents(&temp.path().join("nope")).expect_err("should fail");
        assert!(err.to_string().contains("does not exist"));
    }
}
