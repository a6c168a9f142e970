//! Invocation context for target running
//!
//! The context holds the variable layers and output settings for a single
//! invocation. It is created per run and discarded afterwards.

use crate::definition::TargetDefinition;
use crate::runner::interpolate;
use crate::ui;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Source of inherited environment variables
pub trait EnvProvider {
    /// Look up a variable
    fn get(&self, name: &str) -> Option<String>;

    /// Variables that a child process would not inherit on its own and must
    /// be passed explicitly
    fn exported(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// The real process environment, optionally backed by `.env` values
#[derive(Debug, Clone, Default)]
pub struct ProcessEnv {
    dotenv: IndexMap<String, String>,
}

impl ProcessEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add values from a `.env` file; the process environment still wins
    pub fn with_dotenv(mut self, dotenv: IndexMap<String, String>) -> Self {
        self.dotenv = dotenv;
        self
    }

    /// Load the `.env` file in `dir`, if there is one
    pub fn with_dotenv_from(self, dir: &Path) -> Result<Self, dotenvy::Error> {
        let path = dir.join(".env");
        if !path.is_file() {
            return Ok(self);
        }

        let mut values = IndexMap::new();
        for item in dotenvy::from_path_iter(&path)? {
            let (key, value) = item?;
            values.insert(key, value);
        }
        Ok(self.with_dotenv(values))
    }
}

impl EnvProvider for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok().or_else(|| self.dotenv.get(name).cloned())
    }

    fn exported(&self) -> Vec<(String, String)> {
        self.dotenv
            .iter()
            .filter(|(key, _)| env::var_os(key).is_none())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// A fixed mapping, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapEnv(pub HashMap<String, String>);

impl MapEnv {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MapEnv(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl EnvProvider for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

/// Resolved bindings and output settings for one invocation
pub struct InvocationContext {
    /// Directory commands run in unless a target overrides it
    pub working_dir: PathBuf,

    /// Shell used to run command lines (e.g., ["sh", "-c"])
    pub shell: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Warn about placeholders without a binding
    pub warn_undefined: bool,

    /// Echo command lines (not prefixed with `@`) before running them
    pub echo: bool,

    /// `KEY=VALUE` arguments from the command line
    overrides: IndexMap<String, String>,

    /// Definition-level defaults
    defaults: IndexMap<String, String>,

    env: Box<dyn EnvProvider>,
}

impl InvocationContext {
    /// Create a context over the given environment provider
    pub fn new(env: Box<dyn EnvProvider>) -> Self {
        InvocationContext {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            shell: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
            warn_undefined: true,
            echo: true,
            overrides: IndexMap::new(),
            defaults: IndexMap::new(),
            env,
        }
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn with_shell(mut self, shell: Vec<String>) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_warn_undefined(mut self, warn: bool) -> Self {
        self.warn_undefined = warn;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Set command line overrides
    pub fn with_overrides(mut self, overrides: IndexMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Set definition defaults
    pub fn with_defaults(mut self, defaults: IndexMap<String, String>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set a single command line override
    pub fn set_override(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(key.into(), value.into());
    }

    /// Resolve a variable as seen from `target`'s body
    pub fn lookup(&self, name: &str, target: &TargetDefinition) -> Option<String> {
        self.overrides
            .get(name)
            .or_else(|| target.variables.get(name))
            .cloned()
            .or_else(|| self.env.get(name))
            .or_else(|| self.defaults.get(name).cloned())
    }

    /// Substitute placeholders in one of `target`'s lines, warning about
    /// unbound names
    pub fn substitute(&self, raw: &str, target: &TargetDefinition) -> String {
        let result = interpolate(raw, |name| self.lookup(name, target));
        if self.warn_undefined {
            for name in &result.undefined {
                self.print_warning(&format!(
                    "variable '{}' is not set (target '{}'), using an empty string",
                    name, target.name
                ));
            }
        }
        result.value
    }

    /// Directory `target`'s commands run in
    pub fn target_dir(&self, target: &TargetDefinition) -> PathBuf {
        match &target.working_dir {
            Some(dir) => self.working_dir.join(self.substitute(dir, target)),
            None => self.working_dir.clone(),
        }
    }

    /// Variables passed to `target`'s child processes on top of the
    /// inherited environment, lowest precedence first
    pub fn child_env(&self, target: &TargetDefinition) -> Vec<(String, String)> {
        let mut vars: IndexMap<String, String> = self.env.exported().into_iter().collect();
        for (key, value) in target.variables.iter().chain(self.overrides.iter()) {
            vars.insert(key.clone(), value.clone());
        }
        vars.into_iter().collect()
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", ui::tag_info(), message);
        }
    }

    /// Print warning message
    pub fn print_warning(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", ui::tag_warn(), message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", ui::tag_debug(), message);
        }
    }

    /// Echo a command before it runs
    pub fn print_command(&self, command: &str) {
        if self.echo && self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", ui::tag_run(), command);
        }
    }

    /// Print target start message
    pub fn print_target_start(&self, target: &str) {
        self.print_info(&format!("Running target: {}", ui::target_name(target)));
    }

    /// Print target complete message
    pub fn print_target_complete(&self, target: &str) {
        self.print_debug(&format!("Target completed: {}", target));
    }
}
