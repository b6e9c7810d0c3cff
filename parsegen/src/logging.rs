//! Development-time tracing for debugging the workflow.
//!
//! Tracing is dev diagnostics on stderr, controlled by `RUST_LOG`. Product
//! artifacts (generated sources, datasets, the diagram) are files and are
//! unaffected by the log level.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `--verbose` lowers the default to
/// debug and `--quiet` raises it to error.
///
/// # Example
/// ```bash
/// RUST_LOG=parsegen=debug parsegen --input-dir data
/// ```
pub fn init(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "parsegen=debug,info"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
