//! Tool configuration
//!
//! This module handles the optional YAML settings files that tune how
//! targets are executed.

pub mod settings;

// Re-export main types
pub use settings::*;
