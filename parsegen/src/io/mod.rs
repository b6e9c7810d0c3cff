//! Side-effecting operations: filesystem, subprocess execution, dataset
//! loading, prompt rendering, and configuration. Isolated from [`crate::core`]
//! to keep the deterministic logic mockable in tests.

pub mod config;
pub mod executor;
pub mod extract;
pub mod generate;
pub mod process;
pub mod validator;
