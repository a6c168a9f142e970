//! Target execution engine
//!
//! This module handles variable substitution, dependency resolution and the
//! execution of resolved plans.

pub mod command;
pub mod context;
pub mod interpolate;
pub mod plan;
pub mod signal;
pub mod task;

// Re-export main types
pub use command::*;
pub use context::*;
pub use interpolate::*;
pub use plan::*;
pub use signal::*;
pub use task::*;
