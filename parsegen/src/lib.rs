//! Iterative parser generation driven by a language model.
//!
//! Given a sample document, the workflow asks a generation backend for a
//! parser program, executes it in an isolated subprocess, validates the
//! produced dataset against a reference, and feeds failures back to the
//! backend for a corrected version, bounded by a retry budget. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (planning, the transition
//!   table, artifact/state records, table comparison). No I/O, fully
//!   testable in isolation.
//! - **[`io`]**: Side-effecting operations (subprocess execution, dataset
//!   loading, prompt rendering, configuration). Isolated to enable mocking
//!   in tests.
//!
//! The [`controller`] module coordinates core logic with I/O to drive the
//! generate → execute → validate → repair loop.

pub mod controller;
pub mod core;
pub mod diagram;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
