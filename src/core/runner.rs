//! Invocation of the wrapped CLI.
//!
//! [`CommandRunner`] is the seam between the controller and the real
//! process. [`CliRunner`] spawns the executable with the caller's environment
//! unchanged; tests substitute their own implementation.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::interpreter;
use crate::error::{Error, Result};
use crate::logger;

/// Captured result of one CLI invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `-1` when the process was killed by a signal.
    pub exit_code: i32,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Both streams joined, for phrase matching.
    #[must_use]
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
            (true, false) => self.stderr.clone(),
            _ => self.stdout.clone(),
        }
    }
}

/// Turn a raw exit into the error taxonomy.
///
/// Non-zero exits become [`Error::CommandFailed`], or [`Error::NotLoggedIn`]
/// when stderr says so.
pub fn classify(output: CommandOutput) -> Result<CommandOutput> {
    if output.exit_code == 0 {
        return Ok(output);
    }
    let stderr = output.stderr.trim().to_string();
    if interpreter::mentions_not_logged_in(&stderr) {
        return Err(Error::NotLoggedIn { detail: stderr });
    }
    Err(Error::CommandFailed {
        code: output.exit_code,
        stderr,
    })
}

/// Command line for the log, with the login password masked.
#[must_use]
pub fn display_args(args: &[String]) -> String {
    let mut shown = Vec::with_capacity(args.len());
    let mut mask_next = false;
    for arg in args {
        if mask_next {
            shown.push("********".to_string());
            mask_next = false;
            continue;
        }
        mask_next = arg == "--password";
        shown.push(arg.clone());
    }
    shown.join(" ")
}

/// Something that can execute the VPN CLI.
pub trait CommandRunner: Send + Sync {
    /// Path the runner invokes.
    fn executable(&self) -> &Path;

    /// Run once and return the raw exit, without classification.
    ///
    /// A `timeout` kills the process when exceeded.
    ///
    /// # Errors
    ///
    /// [`Error::Spawn`] when the process cannot start, [`Error::TimedOut`]
    /// when the budget runs out.
    fn execute(&self, args: &[String], timeout: Option<Duration>) -> Result<CommandOutput>;

    /// Run and classify, logging the command line and any failure.
    ///
    /// # Errors
    ///
    /// See [`classify`] and [`CommandRunner::execute`].
    fn run(&self, args: &[String]) -> Result<CommandOutput> {
        invoke(self, args, None, false)
    }

    /// Like [`CommandRunner::run`] but only failures reach the log.
    ///
    /// # Errors
    ///
    /// See [`CommandRunner::run`].
    fn run_quiet(&self, args: &[String]) -> Result<CommandOutput> {
        invoke(self, args, None, true)
    }

    /// Like [`CommandRunner::run`] with a time budget.
    ///
    /// # Errors
    ///
    /// See [`CommandRunner::run`].
    fn run_with_timeout(&self, args: &[String], timeout: Duration) -> Result<CommandOutput> {
        invoke(self, args, Some(timeout), false)
    }
}

fn invoke<R: CommandRunner + ?Sized>(
    runner: &R,
    args: &[String],
    timeout: Option<Duration>,
    quiet: bool,
) -> Result<CommandOutput> {
    let shown = display_args(args);
    if !quiet {
        logger::info("CMD", &format!("Running: {shown}"));
    }
    let result = runner.execute(args, timeout).and_then(classify);
    match &result {
        Ok(output) if !quiet && !output.stdout.trim().is_empty() => {
            let first = interpreter::first_line(&output.stdout).unwrap_or_default();
            logger::info("CMD", &format!("Output: {first}"));
        }
        Err(Error::NotLoggedIn { .. }) => {
            logger::warn("AUTH", &format!("'{shown}' requires login"));
        }
        Err(err) => logger::error("CMD", &format!("'{shown}' failed: {err}")),
        Ok(_) => {}
    }
    result
}

/// Runner for the real executable.
#[derive(Clone, Debug)]
pub struct CliRunner {
    executable: PathBuf,
}

impl CliRunner {
    #[must_use]
    pub const fn new(executable: PathBuf) -> Self {
        Self { executable }
    }
}

impl CommandRunner for CliRunner {
    fn executable(&self) -> &Path {
        &self.executable
    }

    fn execute(&self, args: &[String], timeout: Option<Duration>) -> Result<CommandOutput> {
        let mut cmd = Command::new(&self.executable);
        cmd.args(args).stdin(Stdio::null());

        let Some(timeout) = timeout else {
            let output = cmd.output().map_err(|e| Error::Spawn(e.to_string()))?;
            return Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code().unwrap_or(-1),
            });
        };

        let child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Spawn(e.to_string()))?;
        wait_with_timeout(child, timeout)
    }
}

/// Poll `child` until it exits or `timeout` passes; kill it in the latter case.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<CommandOutput> {
    // Drain pipes on their own threads so a chatty child cannot block on a full pipe.
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::TimedOut(timeout));
            }
            Ok(None) => thread::sleep(Duration::from_millis(25)),
            Err(e) => return Err(Error::Spawn(e.to_string())),
        }
    };

    let collect = |handle: Option<thread::JoinHandle<String>>| {
        handle.and_then(|h| h.join().ok()).unwrap_or_default()
    };
    Ok(CommandOutput {
        stdout: collect(stdout),
        stderr: collect(stderr),
        exit_code: status.code().unwrap_or(-1),
    })
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}
