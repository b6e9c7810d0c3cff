//! Test-only scripted collaborators and workspace helpers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::controller::RunPaths;
use crate::io::executor::{ExecRequest, ExecutionResult, Executor};
use crate::io::generate::Generator;

/// Generator returning canned sources in order; errors when exhausted.
pub struct ScriptedGenerator {
    responses: RefCell<VecDeque<String>>,
    prompts_seen: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().map(str::to_string).collect()),
            prompts_seen: RefCell::new(Vec::new()),
        }
    }

    /// Prompts received so far, in order.
    pub fn prompts_seen(&self) -> Vec<String> {
        self.prompts_seen.borrow().clone()
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts_seen.borrow_mut().push(prompt.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("scripted generator exhausted"))
    }
}

/// One scripted execution outcome, optionally writing the candidate dataset
/// the way a real generated program would.
#[derive(Debug, Clone)]
pub struct ScriptedExec {
    success: bool,
    stderr: String,
    candidate: Option<(String, String)>,
}

impl ScriptedExec {
    pub fn ok() -> Self {
        Self {
            success: true,
            stderr: String::new(),
            candidate: None,
        }
    }

    pub fn fail(stderr: &str) -> Self {
        Self {
            success: false,
            stderr: stderr.to_string(),
            candidate: None,
        }
    }

    /// Write `contents` to `target_dir/<file_name>` when this execution runs.
    pub fn writing_candidate(mut self, file_name: &str, contents: &str) -> Self {
        self.candidate = Some((file_name.to_string(), contents.to_string()));
        self
    }
}

/// Executor returning canned results in order without spawning processes.
pub struct ScriptedExecutor {
    outcomes: RefCell<VecDeque<ScriptedExec>>,
}

impl ScriptedExecutor {
    pub fn new(outcomes: Vec<ScriptedExec>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
        }
    }
}

impl Executor for ScriptedExecutor {
    fn execute(&self, request: &ExecRequest) -> ExecutionResult {
        let Some(scripted) = self.outcomes.borrow_mut().pop_front() else {
            return ExecutionResult::failed("scripted executor exhausted".to_string(), None);
        };

        // Mirror the real executor: the target directory exists and the
        // source is materialized before the program runs.
        if fs::create_dir_all(&request.target_dir).is_err() {
            return ExecutionResult::failed(
                format!("create directory {}", request.target_dir.display()),
                None,
            );
        }
        let location = request.target_dir.join(&request.file_name);
        if let Some((file_name, contents)) = &scripted.candidate {
            if let Err(err) = fs::write(request.target_dir.join(file_name), contents) {
                return ExecutionResult::failed(format!("write candidate: {err}"), Some(location));
            }
        }

        ExecutionResult {
            success: scripted.success,
            stdout: String::new(),
            stderr: scripted.stderr,
            source_location: Some(location),
        }
    }
}

/// Temporary run layout: an input directory, a generation directory, and a
/// reference dataset path, all under one tempdir.
pub struct TestWorkspace {
    temp: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        fs::create_dir_all(temp.path().join("input")).context("create input dir")?;
        Ok(Self { temp })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn input_dir(&self) -> PathBuf {
        self.temp.path().join("input")
    }

    pub fn gen_dir(&self) -> PathBuf {
        self.temp.path().join("generated")
    }

    pub fn reference_path(&self) -> PathBuf {
        self.temp.path().join("reference.csv")
    }

    pub fn paths(&self) -> RunPaths {
        RunPaths {
            input_dir: self.input_dir(),
            gen_dir: self.gen_dir(),
            reference_path: self.reference_path(),
        }
    }

    pub fn write_document(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.input_dir().join(name);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn write_reference(&self, contents: &str) -> Result<()> {
        let path = self.reference_path();
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }
}
