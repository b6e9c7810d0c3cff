//! Generation backends and prompt rendering.
//!
//! The [`Generator`] trait keeps the language model opaque: prompt text in,
//! generated source text out. The production backend shells out to a
//! configured CLI and must never be assumed deterministic; tests use
//! scripted generators that return canned sources.

use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use minijinja::{Environment, context};
use tracing::{info, instrument};

use crate::io::process::run_command_with_timeout;

const GENERATE_TEMPLATE: &str = include_str!("prompts/generate.md");
const REPAIR_EXECUTION_TEMPLATE: &str = include_str!("prompts/repair_execution.md");
const REPAIR_LOGIC_TEMPLATE: &str = include_str!("prompts/repair_logic.md");
const TESTS_TEMPLATE: &str = include_str!("prompts/tests.md");

/// Abstraction over source-generation backends.
pub trait Generator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generator that pipes the prompt to a configured command and reads the
/// generated source from its stdout.
pub struct CommandGenerator {
    command: Vec<String>,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl CommandGenerator {
    pub fn new(command: Vec<String>, timeout: Duration, output_limit_bytes: usize) -> Self {
        Self {
            command,
            timeout,
            output_limit_bytes,
        }
    }
}

impl Generator for CommandGenerator {
    #[instrument(skip_all, fields(timeout_secs = self.timeout.as_secs()))]
    fn generate(&self, prompt: &str) -> Result<String> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow!("generator command is empty"))?;
        let mut cmd = Command::new(program);
        cmd.args(args);

        info!(command = %program, "invoking generator");
        let output = run_command_with_timeout(
            cmd,
            Some(prompt.as_bytes()),
            self.timeout,
            self.output_limit_bytes,
        )
        .context("run generator command")?;

        if output.timed_out {
            return Err(anyhow!(
                "generator timed out after {}s",
                self.timeout.as_secs()
            ));
        }
        if !output.status.success() {
            return Err(anyhow!(
                "generator failed with status {:?}: {}",
                output.status.code(),
                output.stderr_text()
            ));
        }

        Ok(strip_code_fence(&output.stdout_text()).to_string())
    }
}

/// Drop a single surrounding Markdown code fence if the backend wrapped its
/// answer in one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body_start) = rest.find('\n') else {
        return trimmed;
    };
    let body = &rest[body_start + 1..];
    match body.rfind("```") {
        Some(end) => body[..end].trim_end(),
        None => trimmed,
    }
}

/// Template engine wrapper around minijinja.
///
/// Templates are plain text with named placeholders; each workflow step has
/// its own template and its own substitution set.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("generate", GENERATE_TEMPLATE)
            .expect("generate template should be valid");
        env.add_template("repair_execution", REPAIR_EXECUTION_TEMPLATE)
            .expect("repair_execution template should be valid");
        env.add_template("repair_logic", REPAIR_LOGIC_TEMPLATE)
            .expect("repair_logic template should be valid");
        env.add_template("tests", TESTS_TEMPLATE)
            .expect("tests template should be valid");
        Self { env }
    }

    pub fn render_generate(
        &self,
        document_text: &str,
        save_path: &str,
        output_file_name: &str,
    ) -> Result<String> {
        let template = self.env.get_template("generate")?;
        let rendered = template.render(context! {
            text => document_text,
            save_path => save_path,
            output_file_name => output_file_name,
        })?;
        Ok(rendered)
    }

    pub fn render_repair_execution(&self, code: &str, error: &str) -> Result<String> {
        let template = self.env.get_template("repair_execution")?;
        let rendered = template.render(context! { code => code, error => error })?;
        Ok(rendered)
    }

    pub fn render_repair_logic(&self, code: &str, error: &str) -> Result<String> {
        let template = self.env.get_template("repair_logic")?;
        let rendered = template.render(context! { code => code, error => error })?;
        Ok(rendered)
    }

    pub fn render_tests(&self, code: &str) -> Result<String> {
        let template = self.env.get_template("tests")?;
        let rendered = template.render(context! { code => code })?;
        Ok(rendered)
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}
