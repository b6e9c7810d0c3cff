//! Iterative parser-generation workflow CLI.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;

use parsegen::controller::{RunOutcome, RunPaths, StepRecord, run_workflow};
use parsegen::diagram::write_diagram;
use parsegen::exit_codes;
use parsegen::io::config::{AgentConfig, load_config};
use parsegen::io::executor::SubprocessExecutor;
use parsegen::io::extract::FileExtractor;
use parsegen::io::generate::CommandGenerator;
use parsegen::logging;

#[derive(Parser)]
#[command(
    name = "parsegen",
    version,
    about = "Iterative parser generation against a reference dataset"
)]
struct Cli {
    /// Directory holding input documents.
    #[arg(long, default_value = "data")]
    input_dir: PathBuf,

    /// Directory generated programs are written to.
    #[arg(long, default_value = "generated")]
    gen_dir: PathBuf,

    /// Known-correct dataset used as ground truth.
    #[arg(long, default_value = "reference.csv")]
    reference: PathBuf,

    /// Optional TOML config file; defaults apply when missing.
    #[arg(long, default_value = "parsegen.toml")]
    config: PathBuf,

    /// Maximum planner decisions before the run terminates (overrides config).
    #[arg(long)]
    max_tries: Option<u32>,

    /// Enable detailed step output.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    quiet: bool,

    /// Skip writing the workflow diagram.
    #[arg(long)]
    no_diagram: bool,

    /// Path for the workflow diagram.
    #[arg(long, default_value = "workflow.mmd")]
    diagram_path: PathBuf,

    /// Check that configured paths exist before running.
    #[arg(long)]
    validate_paths: bool,

    /// Show configuration and exit without running the workflow.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.quiet && cli.verbose {
        eprintln!("warning: --quiet and --verbose are mutually exclusive, using --verbose");
    }
    let quiet = cli.quiet && !cli.verbose;
    logging::init(cli.verbose, quiet);

    let mut config = load_config(&cli.config)?;
    if let Some(max_tries) = cli.max_tries {
        config.max_tries = max_tries;
    }
    config.validate()?;

    let paths = RunPaths {
        input_dir: cli.input_dir.clone(),
        gen_dir: cli.gen_dir.clone(),
        reference_path: cli.reference.clone(),
    };

    if cli.validate_paths {
        check_paths(&paths)?;
    }

    if !quiet {
        print_configuration(&cli, &config);
    }

    if cli.dry_run {
        println!("dry run: configuration shown above, exiting");
        return Ok(());
    }

    if !cli.no_diagram {
        write_diagram(&cli.diagram_path)?;
        if !quiet {
            println!("workflow diagram written to {}", cli.diagram_path.display());
        }
    }

    let generator = CommandGenerator::new(
        config.generator.command.clone(),
        config.generator_timeout(),
        config.output_limit_bytes,
    );
    let executor = SubprocessExecutor::new(
        config.interpreter.clone(),
        config.source_extension.clone(),
        config.exec_timeout(),
        config.output_limit_bytes,
    );

    let outcome = run_workflow(
        &paths,
        &config,
        &generator,
        &FileExtractor,
        &executor,
        |record: &StepRecord<'_>| {
            info!(
                phase = record.phase.as_str(),
                elapsed_ms = record.elapsed.as_millis() as u64,
                tries = record.state.tries,
                status = record
                    .state
                    .status_history
                    .last()
                    .map(|status| status.as_str())
                    .unwrap_or("-"),
                "step completed"
            );
        },
    )?;

    if !quiet {
        print_summary(&outcome);
    }
    Ok(())
}

fn check_paths(paths: &RunPaths) -> Result<()> {
    let mut errors = Vec::new();
    if !paths.input_dir.is_dir() {
        errors.push(format!(
            "input directory does not exist: {}",
            paths.input_dir.display()
        ));
    }
    if !paths.reference_path.is_file() {
        errors.push(format!(
            "reference dataset does not exist: {}",
            paths.reference_path.display()
        ));
    }
    if let Some(parent) = paths.gen_dir.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        errors.push(format!(
            "generation path parent does not exist: {}",
            parent.display()
        ));
    }
    if !errors.is_empty() {
        bail!("path validation failed:\n- {}", errors.join("\n- "));
    }
    Ok(())
}

fn print_configuration(cli: &Cli, config: &AgentConfig) {
    println!("configuration:");
    println!("  input directory:  {}", cli.input_dir.display());
    println!("  generation path:  {}", cli.gen_dir.display());
    println!("  reference:        {}", cli.reference.display());
    println!("  max tries:        {}", config.max_tries);
    println!("  interpreter:      {}", config.interpreter.join(" "));
    println!("  generator:        {}", config.generator.command.join(" "));
    println!();
}

fn print_summary(outcome: &RunOutcome) {
    let visited: Vec<&str> = outcome
        .visited
        .iter()
        .map(|phase| phase.as_str())
        .collect();
    println!(
        "run: stop={} tries={} steps={}",
        outcome.stop.as_str(),
        outcome.tries,
        outcome.visited.len()
    );
    println!("run: visited {}", visited.join(" -> "));
    if let Some(status) = outcome.status_history.last() {
        println!("run: final status {}", status.as_str());
    }
}
