//! Error types for Runfile

use crate::exit_codes;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Runfile operations
pub type Result<T> = std::result::Result<T, RunfileError>;

/// Main error type for Runfile
#[derive(Error, Debug)]
pub enum RunfileError {
    /// Definition file errors
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Dependency resolution errors
    #[error("Resolution error: {0}")]
    Plan(#[from] PlanError),

    /// Target execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Settings file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Command line usage errors
    #[error("{0}")]
    Usage(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RunfileError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RunfileError::Definition(_)
            | RunfileError::Plan(_)
            | RunfileError::Config(_)
            | RunfileError::Usage(_) => exit_codes::DEFINITION_ERROR,
            RunfileError::Execution(e) => e.exit_code(),
            RunfileError::Io(_) => exit_codes::FAILURE,
        }
    }
}

/// Definition file discovery and parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Failed to find definition file (searched: {0})")]
    NotFound(String),

    #[error("Failed to read '{path}': {error}")]
    Read { path: PathBuf, error: String },

    #[error("line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("line {line}: target '{name}' is already declared on line {first_line}")]
    DuplicateTarget {
        name: String,
        line: usize,
        first_line: usize,
    },

    #[error("no targets are declared")]
    Empty,

    #[error("line {line}: target '{name}' is not declared")]
    UnknownTarget { name: String, line: usize },
}

/// Dependency resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Target '{0}' is not defined")]
    UnknownTarget(String),

    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

/// Target execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("target '{target}' failed with exit code {code}: {command}")]
    CommandFailed {
        target: String,
        command: String,
        code: i32,
    },

    #[error("target '{target}' could not start '{command}': {source}")]
    Spawn {
        target: String,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("target '{target}' was interrupted by signal {signal}")]
    Interrupted { target: String, signal: i32 },
}

impl ExecutionError {
    /// Exit code reported to the operator for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionError::CommandFailed { code, .. } => *code,
            ExecutionError::Spawn { .. } => exit_codes::COMMAND_NOT_STARTED,
            ExecutionError::Interrupted { signal, .. } => exit_codes::SIGNAL_BASE + signal,
        }
    }

    /// Name of the target that failed
    pub fn target(&self) -> &str {
        match self {
            ExecutionError::CommandFailed { target, .. }
            | ExecutionError::Spawn { target, .. }
            | ExecutionError::Interrupted { target, .. } => target,
        }
    }
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid settings in '{path}': {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Specialized result type for definition parsing
pub type DefinitionResult<T> = std::result::Result<T, DefinitionError>;

/// Specialized result type for dependency resolution
pub type PlanResult<T> = std::result::Result<T, PlanError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for settings operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
