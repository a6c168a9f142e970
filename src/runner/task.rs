//! Plan execution
//!
//! Runs the targets of an execution plan one after another, substituting
//! each command line right before it runs.

use crate::definition::TargetDefinition;
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{CommandRunner, CommandStatus, ExecutionPlan, InvocationContext};

/// A failure that did not stop the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToleratedFailure {
    pub target: String,
    pub command: String,
    pub code: i32,
}

/// Summary of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Targets whose bodies ran to the end, in order
    pub completed: Vec<String>,

    /// Failures ignored because of `-` lines or best-effort targets
    pub tolerated: Vec<ToleratedFailure>,
}

/// A body line with its prefixes parsed off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLine<'a> {
    /// Text after the prefixes, still unsubstituted
    pub text: &'a str,

    /// `@`: do not echo
    pub silent: bool,

    /// `-`: a non-zero exit does not fail the target
    pub ignore_errors: bool,
}

impl<'a> CommandLine<'a> {
    /// Split leading `@` and `-` markers (in any order) from `raw`
    pub fn parse(raw: &'a str) -> Self {
        let mut line = CommandLine {
            text: raw,
            silent: false,
            ignore_errors: false,
        };

        loop {
            if let Some(rest) = line.text.strip_prefix('@') {
                line.silent = true;
                line.text = rest;
            } else if let Some(rest) = line.text.strip_prefix('-') {
                line.ignore_errors = true;
                line.text = rest;
            } else {
                break;
            }
        }
        line.text = line.text.trim_start();
        line
    }
}

/// Execute every target of `plan` in order
///
/// Stops at the first failing command of a fail-fast target and returns
/// its identity and exit code. An interrupt stops the plan after the
/// running command, whatever the target's failure policy.
pub fn execute_plan(
    plan: &ExecutionPlan,
    ctx: &InvocationContext,
    runner: &mut dyn CommandRunner,
) -> ExecutionResult<RunReport> {
    let mut report = RunReport::default();

    for target in plan.steps() {
        execute_target(target, ctx, runner, &mut report)?;
    }

    Ok(report)
}

/// Execute a single target's body
pub fn execute_target(
    target: &TargetDefinition,
    ctx: &InvocationContext,
    runner: &mut dyn CommandRunner,
    report: &mut RunReport,
) -> ExecutionResult<()> {
    check_interrupt(target, runner)?;
    ctx.print_target_start(&target.name);

    if target.is_bodyless() {
        ctx.print_debug(&format!("Target '{}' has no commands", target.name));
    }

    let cwd = ctx.target_dir(target);
    let env = ctx.child_env(target);

    for raw in &target.body {
        let line = CommandLine::parse(raw);
        let command = ctx.substitute(line.text, target);

        if !line.silent {
            ctx.print_command(&command);
        }

        let status = runner
            .execute(&command, &cwd, &env)
            .map_err(|source| ExecutionError::Spawn {
                target: target.name.clone(),
                command: command.clone(),
                source,
            })?;

        check_interrupt(target, runner)?;

        if status.success() {
            continue;
        }

        let code = exit_code(status);
        if line.ignore_errors || target.best_effort {
            ctx.print_warning(&format!(
                "target '{}' ignored exit code {}: {}",
                target.name, code, command
            ));
            report.tolerated.push(ToleratedFailure {
                target: target.name.clone(),
                command,
                code,
            });
            continue;
        }

        return Err(ExecutionError::CommandFailed {
            target: target.name.clone(),
            command,
            code,
        });
    }

    ctx.print_target_complete(&target.name);
    report.completed.push(target.name.clone());
    Ok(())
}

fn check_interrupt(target: &TargetDefinition, runner: &dyn CommandRunner) -> ExecutionResult<()> {
    match runner.interrupted() {
        Some(signal) => Err(ExecutionError::Interrupted {
            target: target.name.clone(),
            signal,
        }),
        None => Ok(()),
    }
}

/// Shell-style exit code for a finished command
fn exit_code(status: CommandStatus) -> i32 {
    match status {
        CommandStatus::Exited(code) => code,
        CommandStatus::Signaled(signal) => crate::exit_codes::SIGNAL_BASE + signal,
    }
}
