//! Stable exit codes for the parsegen CLI.

/// Run completed, regardless of pass/fail at termination.
pub const OK: i32 = 0;
/// Configuration error or uncaught failure.
pub const INVALID: i32 = 1;
/// User interruption. No handler is installed; SIGINT's default disposition
/// yields 128 + 2 at the shell.
pub const INTERRUPTED: i32 = 130;
