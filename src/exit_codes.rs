//! Exit code constants for the runfile CLI.
//!
//! A successful run exits with 0 and a failing command's own exit code
//! is passed through unchanged; the constants below cover everything else.

/// Generic failure (I/O problems outside of target execution).
pub const FAILURE: i32 = 1;

/// Definition, settings, usage or resolution error before any command ran.
pub const DEFINITION_ERROR: i32 = 2;

/// A command could not be started (shell missing, bad working directory).
pub const COMMAND_NOT_STARTED: i32 = 127;

/// Added to the signal number when a run is interrupted.
pub const SIGNAL_BASE: i32 = 128;
