//! Orchestration of the generate → execute → validate → repair loop.
//!
//! The controller owns the run context ([`WorkflowState`] plus
//! [`GenerationArtifact`]) and threads it by reference through every step;
//! there are no shared globals. Collaborators come in through trait seams:
//! the generator and extractor are opaque externals whose failures
//! propagate, while the executor and validator fold their internal failures
//! into structured error fields that the planner routes to a repair phase.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::core::artifact::GenerationArtifact;
use crate::core::phase::{Phase, PlannerAction};
use crate::core::planner::decide;
use crate::core::state::{StatusLabel, WorkflowState};
use crate::io::config::AgentConfig;
use crate::io::executor::{ExecRequest, Executor};
use crate::io::extract::{Extractor, discover_documents};
use crate::io::generate::{Generator, PromptEngine};
use crate::io::validator::{ValidationOutcome, validate};

/// Filesystem layout for one run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// Directory holding input documents.
    pub input_dir: PathBuf,
    /// Directory generated programs (and their output dataset) live in.
    pub gen_dir: PathBuf,
    /// Known-correct dataset used as ground truth.
    pub reference_path: PathBuf,
}

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStop {
    /// The artifact passed evaluation and test cases were generated.
    TestsGenerated,
    /// The retry budget ran out before the artifact passed.
    RetriesExhausted,
}

impl RunStop {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStop::TestsGenerated => "tests_generated",
            RunStop::RetriesExhausted => "retries_exhausted",
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub stop: RunStop,
    pub tries: u32,
    pub visited: Vec<Phase>,
    pub status_history: Vec<StatusLabel>,
}

/// Step-boundary record handed to the observer after every completed step.
#[derive(Debug)]
pub struct StepRecord<'a> {
    pub phase: Phase,
    pub elapsed: Duration,
    pub state: &'a WorkflowState,
    pub artifact: &'a GenerationArtifact,
}

/// Run context owned by the controller for the duration of one run.
#[derive(Debug, Default)]
struct RunContext {
    state: WorkflowState,
    artifact: GenerationArtifact,
}

/// Drive the workflow from `Preprocessing` to `Terminated`.
///
/// `on_step` fires after every completed step with the step name, elapsed
/// time, and the resulting state snapshot; it is a cross-cutting observer,
/// not step logic.
pub fn run_workflow<G, X, E, F>(
    paths: &RunPaths,
    config: &AgentConfig,
    generator: &G,
    extractor: &X,
    executor: &E,
    mut on_step: F,
) -> Result<RunOutcome>
where
    G: Generator,
    X: Extractor,
    E: Executor,
    F: FnMut(&StepRecord<'_>),
{
    config.validate()?;
    let prompts = PromptEngine::new();
    let mut ctx = RunContext::default();
    let mut document: Option<PathBuf> = None;

    let mut phase = Phase::Preprocessing;
    while phase != Phase::Terminated {
        let started = Instant::now();
        ctx.state.visit(phase);
        let next = match phase {
            Phase::Preprocessing => preprocess(paths, extractor, &mut ctx, &mut document)?,
            Phase::Planning => plan(config, &mut ctx),
            Phase::GeneratingCode => generate_code(paths, config, generator, &prompts, &mut ctx)?,
            Phase::Evaluating => evaluate(paths, config, executor, &mut ctx, document.as_deref())?,
            Phase::RepairingExecution => repair_execution(generator, &prompts, &mut ctx)?,
            Phase::RepairingLogic => repair_logic(generator, &prompts, &mut ctx)?,
            Phase::GeneratingTests => generate_tests(config, generator, &prompts, &mut ctx)?,
            // Guarded by the loop condition.
            Phase::Terminated => break,
        };
        on_step(&StepRecord {
            phase,
            elapsed: started.elapsed(),
            state: &ctx.state,
            artifact: &ctx.artifact,
        });
        phase = next;
    }

    let stop = if ctx.state.status_history.last() == Some(&StatusLabel::TestsGenerated) {
        RunStop::TestsGenerated
    } else {
        RunStop::RetriesExhausted
    };
    info!(
        stop = stop.as_str(),
        tries = ctx.state.tries,
        steps = ctx.state.visited.len(),
        "workflow terminated"
    );
    Ok(RunOutcome {
        stop,
        tries: ctx.state.tries,
        visited: ctx.state.visited,
        status_history: ctx.state.status_history,
    })
}

fn preprocess<X: Extractor>(
    paths: &RunPaths,
    extractor: &X,
    ctx: &mut RunContext,
    document: &mut Option<PathBuf>,
) -> Result<Phase> {
    let selected = discover_documents(&paths.input_dir)?
        .into_iter()
        .next()
        .with_context(|| format!("no documents in {}", paths.input_dir.display()))?;
    info!(document = %selected.display(), "selected input document");

    let text = extractor
        .extract(&selected)
        .with_context(|| format!("extract {}", selected.display()))?;
    debug!(chars = text.len(), "document text extracted");

    ctx.state.pending_text = Some(text);
    ctx.state.record_status(StatusLabel::Preprocessed);
    *document = Some(selected);
    Ok(Phase::Planning)
}

fn plan(config: &AgentConfig, ctx: &mut RunContext) -> Phase {
    let action = decide(&ctx.artifact, ctx.state.tries, config.max_tries);
    if action == PlannerAction::Terminate {
        info!(
            max_tries = config.max_tries,
            "retry budget exhausted, terminating"
        );
        ctx.state.record_status(StatusLabel::RetriesExhausted);
    } else {
        ctx.state.tries += 1;
    }
    debug!(
        action = action.as_str(),
        tries = ctx.state.tries,
        "planner decision"
    );
    ctx.state.next_action = Some(action);
    action.target_phase()
}

fn generate_code<G: Generator>(
    paths: &RunPaths,
    config: &AgentConfig,
    generator: &G,
    prompts: &PromptEngine,
    ctx: &mut RunContext,
) -> Result<Phase> {
    let text = ctx
        .state
        .pending_text
        .clone()
        .context("no document text extracted")?;
    let prompt = prompts.render_generate(
        &text,
        &paths.gen_dir.display().to_string(),
        &config.output_file_name,
    )?;

    info!("requesting initial parser generation");
    let code = generator.generate(&prompt).context("generate parser source")?;
    debug!(chars = code.len(), "generator returned source");

    ctx.artifact.record_source(code.clone());
    ctx.state.pending_text = Some(code);
    ctx.state.record_status(StatusLabel::CodeGenerated);
    ctx.state.next_action = Some(PlannerAction::Evaluate);
    Ok(Phase::Evaluating)
}

fn evaluate<E: Executor>(
    paths: &RunPaths,
    config: &AgentConfig,
    executor: &E,
    ctx: &mut RunContext,
    document: Option<&Path>,
) -> Result<Phase> {
    let source = ctx
        .artifact
        .source_code
        .clone()
        .context("no source to evaluate")?;
    let document = document.context("no input document selected")?;

    let request = ExecRequest {
        source_code: source,
        target_dir: paths.gen_dir.clone(),
        file_name: parser_file_stem(document),
        invocation_input: document.display().to_string(),
    };
    let result = executor.execute(&request);
    if let Some(location) = result.source_location {
        ctx.artifact.record_location(location);
    }

    if !result.success {
        warn!("execution failed");
        ctx.artifact.record_execution_failure(result.stderr);
        ctx.state.record_status(StatusLabel::ExecutionFailed);
        return Ok(Phase::Planning);
    }
    ctx.artifact.record_execution_success();

    let candidate = paths.gen_dir.join(&config.output_file_name);
    match validate(&paths.reference_path, &candidate)? {
        ValidationOutcome::Failed(failure) => {
            warn!("validation failed");
            ctx.artifact.record_validation_failure(failure);
            ctx.state.record_status(StatusLabel::ValidationFailed);
        }
        ValidationOutcome::Pass => {
            info!("evaluation passed");
            ctx.artifact.record_validation_success();
            ctx.state.record_status(StatusLabel::EvaluationPassed);
        }
    }
    Ok(Phase::Planning)
}

fn repair_execution<G: Generator>(
    generator: &G,
    prompts: &PromptEngine,
    ctx: &mut RunContext,
) -> Result<Phase> {
    let code = ctx
        .artifact
        .source_code
        .clone()
        .context("no source to repair")?;
    let error = ctx
        .artifact
        .execution_error
        .clone()
        .context("no execution error recorded")?;
    let prompt = prompts.render_repair_execution(&code, &error)?;

    info!("requesting execution repair");
    let fixed = generator.generate(&prompt).context("generate execution fix")?;

    ctx.artifact.record_source(fixed.clone());
    ctx.artifact.clear_execution_error();
    ctx.state.pending_text = Some(fixed);
    ctx.state.record_status(StatusLabel::ExecutionRepaired);
    ctx.state.next_action = Some(PlannerAction::Evaluate);
    Ok(Phase::Evaluating)
}

fn repair_logic<G: Generator>(
    generator: &G,
    prompts: &PromptEngine,
    ctx: &mut RunContext,
) -> Result<Phase> {
    let code = ctx
        .artifact
        .source_code
        .clone()
        .context("no source to repair")?;
    let failure = ctx
        .artifact
        .validation_error
        .clone()
        .context("no validation error recorded")?;
    let prompt = prompts.render_repair_logic(&code, &failure.to_prompt_text())?;

    info!("requesting logic repair");
    let fixed = generator.generate(&prompt).context("generate logic fix")?;

    ctx.artifact.record_source(fixed.clone());
    ctx.artifact.clear_validation_error();
    ctx.state.pending_text = Some(fixed);
    ctx.state.record_status(StatusLabel::LogicRepaired);
    ctx.state.next_action = Some(PlannerAction::Evaluate);
    Ok(Phase::Evaluating)
}

fn generate_tests<G: Generator>(
    config: &AgentConfig,
    generator: &G,
    prompts: &PromptEngine,
    ctx: &mut RunContext,
) -> Result<Phase> {
    let code = ctx
        .artifact
        .source_code
        .clone()
        .context("no source to generate tests for")?;
    let location = ctx
        .artifact
        .source_location
        .clone()
        .context("no materialized source to generate tests for")?;
    let prompt = prompts.render_tests(&code)?;

    info!(source = %location.display(), "requesting test generation");
    let tests = generator.generate(&prompt).context("generate test cases")?;

    let test_path = test_file_path(&location, &config.source_extension);
    fs::write(&test_path, &tests)
        .with_context(|| format!("write generated tests {}", test_path.display()))?;
    info!(tests = %test_path.display(), "generated tests written");

    ctx.state.pending_text = Some(tests);
    ctx.state.record_status(StatusLabel::TestsGenerated);
    Ok(Phase::Terminated)
}

fn parser_file_stem(document: &Path) -> String {
    let stem = document
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document");
    format!("{stem}_parser")
}

fn test_file_path(source_location: &Path, extension: &str) -> PathBuf {
    let stem = source_location
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("parser");
    let dir = source_location.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("test_{stem}.{extension}"))
}
