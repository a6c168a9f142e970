//! Command execution
//!
//! Everything that spawns processes sits behind [`CommandRunner`], so the
//! executor only deals with exit statuses.

use crate::runner::signal::InterruptFlag;
use std::io;
use std::path::Path;
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

/// How often a running child is polled for exit or interrupts
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Outcome of one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command exited with this code
    Exited(i32),

    /// The command was terminated by this signal
    Signaled(i32),
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        matches!(self, CommandStatus::Exited(0))
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return CommandStatus::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return CommandStatus::Signaled(signal);
            }
        }

        CommandStatus::Exited(1)
    }
}

/// Capability to run one command line
pub trait CommandRunner {
    /// Run `command` in `cwd` with `env` added to the inherited environment
    fn execute(
        &mut self,
        command: &str,
        cwd: &Path,
        env: &[(String, String)],
    ) -> io::Result<CommandStatus>;

    /// Interrupt signal received while running, if any
    fn interrupted(&self) -> Option<i32> {
        None
    }
}

/// Runs commands through a shell with inherited standard streams
pub struct ShellRunner {
    shell: Vec<String>,
    interrupt: InterruptFlag,
}

impl ShellRunner {
    /// Create a runner for `shell` (e.g., ["sh", "-c"])
    pub fn new(shell: Vec<String>, interrupt: InterruptFlag) -> Self {
        ShellRunner { shell, interrupt }
    }

    fn spawn(&self, command: &str, cwd: &Path, env: &[(String, String)]) -> io::Result<Child> {
        let (program, args) = self
            .shell
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty shell"))?;

        StdCommand::new(program)
            .args(args)
            .arg(command)
            .current_dir(cwd)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
    }
}

impl CommandRunner for ShellRunner {
    fn execute(
        &mut self,
        command: &str,
        cwd: &Path,
        env: &[(String, String)],
    ) -> io::Result<CommandStatus> {
        let mut child = self.spawn(command, cwd, env)?;

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status.into());
            }

            if let Some(signal) = self.interrupt.received() {
                forward_signal(&mut child, signal)?;
                return Ok(child.wait()?.into());
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    fn interrupted(&self) -> Option<i32> {
        self.interrupt.received()
    }
}

#[cfg(unix)]
fn forward_signal(child: &mut Child, signal: i32) -> io::Result<()> {
    // SAFETY: kill(2) has no memory-safety preconditions; the pid belongs to
    // a child we have not reaped yet.
    let rc = unsafe { libc::kill(child.id() as libc::pid_t, signal) };
    if rc == 0 {
        Ok(())
    } else {
        let err = io::Error::last_os_error();
        // ESRCH: the child exited between polling and signalling
        if err.raw_os_error() == Some(libc::ESRCH) {
            Ok(())
        } else {
            Err(err)
        }
    }
}

#[cfg(not(unix))]
fn forward_signal(child: &mut Child, _signal: i32) -> io::Result<()> {
    child.kill()
}

/// Prints commands to stdout instead of running them
#[derive(Debug, Default)]
pub struct DryRunner {
    /// Commands seen so far, with their directories
    pub commands: Vec<(String, String)>,
}

impl CommandRunner for DryRunner {
    fn execute(
        &mut self,
        command: &str,
        cwd: &Path,
        _env: &[(String, String)],
    ) -> io::Result<CommandStatus> {
        println!("{}", command);
        self.commands
            .push((command.to_string(), cwd.display().to_string()));
        Ok(CommandStatus::Exited(0))
    }
}
