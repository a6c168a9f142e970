//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, the target listing and shell
//! completion.

pub mod app;
pub mod help;

// Re-export main types
pub use app::*;
pub use help::*;
