//! Executor: materialize generated source and run it in a subprocess.
//!
//! The [`Executor`] trait decouples the controller from the concrete
//! interpreter invocation. Tests use scripted executors that return
//! predetermined results without spawning processes.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::io::process::run_command_with_timeout;

/// Parameters for one execution of the generated program.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    /// Program text to materialize and run.
    pub source_code: String,
    /// Directory the source file is written to; created if absent.
    pub target_dir: PathBuf,
    /// File stem for the source file, without extension.
    pub file_name: String,
    /// Text supplied to the program on standard input (the input-document path).
    pub invocation_input: String,
}

/// Outcome of one execution.
///
/// Never an error: write, spawn, and wait failures are folded into a failed
/// result carrying the failure text, so retry policy stays with the
/// controller and nothing propagates past this boundary.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// Where the source was written; `None` when the write itself failed.
    pub source_location: Option<PathBuf>,
}

impl ExecutionResult {
    pub fn failed(stderr: String, source_location: Option<PathBuf>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr,
            source_location,
        }
    }
}

/// Abstraction over how generated programs are run.
pub trait Executor {
    fn execute(&self, request: &ExecRequest) -> ExecutionResult;
}

/// Executor that writes the source to disk and runs it with a configured
/// interpreter command (e.g. `python3`).
pub struct SubprocessExecutor {
    interpreter: Vec<String>,
    source_extension: String,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl SubprocessExecutor {
    pub fn new(
        interpreter: Vec<String>,
        source_extension: String,
        timeout: Duration,
        output_limit_bytes: usize,
    ) -> Self {
        Self {
            interpreter,
            source_extension,
            timeout,
            output_limit_bytes,
        }
    }

    fn write_source(&self, request: &ExecRequest) -> Result<PathBuf> {
        fs::create_dir_all(&request.target_dir)
            .with_context(|| format!("create directory {}", request.target_dir.display()))?;
        let path = request
            .target_dir
            .join(format!("{}.{}", request.file_name, self.source_extension));
        fs::write(&path, &request.source_code)
            .with_context(|| format!("write source {}", path.display()))?;
        Ok(path)
    }
}

impl Executor for SubprocessExecutor {
    #[instrument(skip_all, fields(file_name = %request.file_name, timeout_secs = self.timeout.as_secs()))]
    fn execute(&self, request: &ExecRequest) -> ExecutionResult {
        let path = match self.write_source(request) {
            Ok(path) => path,
            Err(err) => {
                warn!(err = %err, "failed to materialize source");
                return ExecutionResult::failed(format!("{err:#}"), None);
            }
        };

        let Some((program, args)) = self.interpreter.split_first() else {
            return ExecutionResult::failed(
                "interpreter command is empty".to_string(),
                Some(path),
            );
        };
        let mut cmd = Command::new(program);
        cmd.args(args).arg(&path);

        let output = match run_command_with_timeout(
            cmd,
            Some(request.invocation_input.as_bytes()),
            self.timeout,
            self.output_limit_bytes,
        ) {
            Ok(output) => output,
            Err(err) => {
                warn!(err = %err, "failed to run generated program");
                return ExecutionResult::failed(format!("{err:#}"), Some(path));
            }
        };

        if output.timed_out {
            return ExecutionResult::failed(
                format!("execution timed out after {}s", self.timeout.as_secs()),
                Some(path),
            );
        }

        let stderr = output.stderr_text();
        // Empty stderr is the success signal; exit codes are not consulted.
        // This treats warnings on stderr as failures too.
        let success = stderr.is_empty();
        if !success {
            debug!(exit_code = ?output.status.code(), "program wrote to stderr");
        }
        ExecutionResult {
            success,
            stdout: output.stdout_text(),
            stderr,
            source_location: Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh_executor(timeout: Duration) -> SubprocessExecutor {
        SubprocessExecutor::new(vec!["sh".to_string()], "sh".to_string(), timeout, 10_000)
    }

    fn request(dir: &std::path::Path, source: &str) -> ExecRequest {
        ExecRequest {
            source_code: source.to_string(),
            target_dir: dir.to_path_buf(),
            file_name: "candidate".to_string(),
            invocation_input: "input.csv".to_string(),
        }
    }

    #[test]
    fn stdout_only_program_succeeds() {
        let temp = tempfile::tempdir().expect("tempdir");
        let executor = sh_executor(Duration::from_secs(5));
        let result = executor.execute(&request(temp.path(), "printf parsed\n"));

        assert!(result.success);
        assert_eq!(result.stdout, "parsed");
        assert_eq!(
            result.source_location.as_deref(),
            Some(temp.path().join("candidate.sh").as_path())
        );
    }

    #[test]
    fn stderr_output_fails_even_with_exit_code_zero() {
        let temp = tempfile::tempdir().expect("tempdir");
        let executor = sh_executor(Duration::from_secs(5));
        let result = executor.execute(&request(temp.path(), "printf oops 1>&2; exit 0\n"));

        assert!(!result.success);
        assert_eq!(result.stderr, "oops");
    }

    #[test]
    fn program_reads_invocation_input_from_stdin() {
        let temp = tempfile::tempdir().expect("tempdir");
        let executor = sh_executor(Duration::from_secs(5));
        let result = executor.execute(&request(temp.path(), "read path; printf '%s' \"$path\"\n"));

        assert!(result.success);
        assert_eq!(result.stdout, "input.csv");
    }

    #[test]
    fn timeout_becomes_an_execution_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let executor = sh_executor(Duration::from_millis(200));
        let result = executor.execute(&request(temp.path(), "sleep 5\n"));

        assert!(!result.success);
        assert!(result.stderr.contains("timed out"));
        assert!(result.source_location.is_some());
    }

    #[test]
    fn missing_interpreter_is_a_failure_result_not_a_panic() {
        let temp = tempfile::tempdir().expect("tempdir");
        let executor = SubprocessExecutor::new(
            vec!["definitely-not-a-real-binary-xyz".to_string()],
            "sh".to_string(),
            Duration::from_secs(1),
            10_000,
        );
        let result = executor.execute(&request(temp.path(), "printf hi\n"));

        assert!(!result.success);
        assert!(result.stderr.contains("spawn command"));
    }
}
