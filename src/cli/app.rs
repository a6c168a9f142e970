//! Main CLI application

use crate::cli::help::{render_help, render_targets_verbose};
use crate::config::Settings;
use crate::definition::{find_definition_file, parse_definition_file, TargetTable};
use crate::error::{ConfigError, RunfileError};
use crate::runner::{
    execute_plan, resolve, DryRunner, InterruptFlag, InvocationContext, ProcessEnv, RunReport,
    ShellRunner, Verbosity,
};
use crate::ui;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use colored::control::SHOULD_COLORIZE;
use indexmap::IndexMap;
use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
}

impl App {
    pub fn new() -> Self {
        App {
            command: build_command(),
        }
    }

    /// Run the application with the process arguments
    pub fn run(self) -> Result<(), RunfileError> {
        self.run_from(std::env::args_os())
    }

    /// Run the application with explicit arguments
    pub fn run_from<I, T>(mut self, args: I) -> Result<(), RunfileError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);

        if matches.get_flag("no-color") {
            ui::disable_color();
        }
        let verbosity = get_verbosity(&matches);

        if let Some(("completions", sub)) = matches.subcommand() {
            if let Some(shell) = sub.get_one::<Shell>("shell").copied() {
                clap_complete::generate(shell, &mut self.command, "runfile", &mut io::stdout());
            }
            return Ok(());
        }

        let path = match matches.get_one::<String>("file") {
            Some(file) => PathBuf::from(file),
            None => find_definition_file()?,
        };
        let table = parse_definition_file(&path)?;

        match matches.subcommand() {
            Some(("run", sub)) => {
                let args: Vec<String> = sub
                    .get_many::<String>("args")
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default();
                let (targets, overrides) = split_invocation_args(&args)?;

                if targets.is_empty() {
                    print_help(&table, &path, verbosity);
                    return Ok(());
                }

                run_targets(
                    &table,
                    &path,
                    &targets,
                    overrides,
                    verbosity,
                    matches.get_flag("dry-run"),
                )
            }
            _ => {
                print_help(&table, &path, verbosity);
                Ok(())
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve and execute `targets` from `table`
fn run_targets(
    table: &TargetTable,
    path: &Path,
    targets: &[String],
    overrides: IndexMap<String, String>,
    verbosity: Verbosity,
    dry_run: bool,
) -> Result<(), RunfileError> {
    let plan = resolve(table, targets)?;

    let dir = definition_dir(path);
    let settings = Settings::load(&dir)?;
    let env = if settings.dotenv {
        ProcessEnv::new()
            .with_dotenv_from(&dir)
            .map_err(|e| ConfigError::Invalid {
                path: dir.join(".env"),
                message: e.to_string(),
            })?
    } else {
        ProcessEnv::new()
    };

    let ctx = InvocationContext::new(Box::new(env))
        .with_shell(settings.shell)
        .with_verbosity(verbosity)
        .with_warn_undefined(settings.warn_undefined)
        .with_defaults(table.defaults.clone())
        .with_overrides(overrides)
        .with_echo(!dry_run);

    ctx.print_debug(&format!(
        "Definition: {}, plan: {}",
        path.display(),
        plan.names().join(" -> ")
    ));

    let report = if dry_run {
        execute_plan(&plan, &ctx, &mut DryRunner::default())?
    } else {
        let mut runner = ShellRunner::new(ctx.shell.clone(), InterruptFlag::install()?);
        execute_plan(&plan, &ctx, &mut runner)?
    };

    summarize(&ctx, &report);
    Ok(())
}

fn summarize(ctx: &InvocationContext, report: &RunReport) {
    if !report.tolerated.is_empty() {
        ctx.print_warning(&format!(
            "{} failure(s) ignored in: {}",
            report.tolerated.len(),
            report
                .tolerated
                .iter()
                .map(|f| f.target.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    ctx.print_debug(&format!("Completed: {}", report.completed.join(", ")));
}

fn definition_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Print the target listing to stdout
fn print_help(table: &TargetTable, path: &Path, verbosity: Verbosity) {
    let color = io::stdout().is_terminal() && SHOULD_COLORIZE.should_colorize();

    println!("Usage: runfile run <TARGET>... [KEY=VALUE]...");
    println!();

    if verbosity >= Verbosity::Verbose {
        println!("Targets in {}:", path.display());
        print!("{}", render_targets_verbose(table, color));
        return;
    }

    let listing = render_help(table, color);
    if listing.is_empty() {
        println!("No documented targets in {}", path.display());
    } else {
        println!("Targets:");
        print!("{}", listing);
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("runfile")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A small Makefile-style task runner")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to the definition file (default: nearest Runfile)")
                .global(true),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print commands instead of running them")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Run targets and their dependencies")
                .arg(
                    Arg::new("args")
                        .value_name("TARGET|KEY=VALUE")
                        .help("Targets to run and variable overrides")
                        .action(ArgAction::Append)
                        .num_args(0..),
                ),
        )
        .subcommand(Command::new("help").about("List documented targets"))
        .subcommand(
            Command::new("completions")
                .about("Generate a shell completion script")
                .arg(
                    Arg::new("shell")
                        .value_name("SHELL")
                        .required(true)
                        .value_parser(value_parser!(Shell)),
                ),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Split `run` arguments into target names and `KEY=VALUE` overrides
pub fn split_invocation_args(
    args: &[String],
) -> Result<(Vec<String>, IndexMap<String, String>), RunfileError> {
    let mut targets = Vec::new();
    let mut overrides = IndexMap::new();

    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) => {
                if !is_variable_name(key) {
                    return Err(RunfileError::Usage(format!(
                        "invalid variable binding '{}'",
                        arg
                    )));
                }
                overrides.insert(key.to_string(), value.to_string());
            }
            None => targets.push(arg.clone()),
        }
    }

    Ok((targets, overrides))
}

fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<(), RunfileError> {
    App::new().run()
}
