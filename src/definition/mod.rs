//! Definition parsing and validation
//!
//! This module handles parsing of Runfile definitions into a target table
//! and validation of the references between targets.

pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
