//! Runfile - a small Makefile-style task runner
//!
//! Runfile reads a plain-text definition of named targets, resolves the
//! requested targets and their dependencies into a plan, and runs each
//! target's command lines through the shell.

// Public modules
pub mod cli;
pub mod config;
pub mod definition;
pub mod error;
pub mod exit_codes;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{Result, RunfileError};

/// Current version of Runfile
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
