//! The command-execution seam and its two implementations.
//!
//! [`CommandRunner`] is the single interface the mock layer needs from its
//! host: run an external command line and report what it produced.
//! [`ShellRunner`] is the production implementation; [`MockRunner`] replays
//! a fixture document instead of spawning anything, so a test swaps one for
//! the other and the code under test cannot tell the difference.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize as _, Stream};
use tokio::io::AsyncReadExt;

use crate::dispatcher::MockDispatcher;
use crate::error::MockError;
use crate::fixture::Response;

/// Default timeout for captured commands.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable enabling command echo in [`ShellRunner`].
pub const VERBOSE_ENV: &str = "SHELLMOCK_VERBOSE";

/// Command execution with captured or interactive output.
///
/// Implementations must treat the command line as opaque: no splitting,
/// no quoting fixes. Test doubles return canned results without spawning
/// processes.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `command` and capture combined stdout/stderr.
    /// A non-zero exit is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned, times out, or
    /// exits non-zero.
    async fn run(&self, command: &str) -> Result<String>;

    /// Run `command` and capture output even when it exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or times out.
    async fn run_unchecked(&self, command: &str) -> Result<String>;

    /// Run `command` with inherited stdio (interactive pass-through).
    /// Returns whether the command exited successfully.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned, or (for mocks)
    /// the fixture marks the call as failing.
    async fn run_interactive(&self, command: &str) -> Result<bool>;
}

/// Configuration for the production runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Kill the child and fail after this long.
    pub timeout: Duration,
    /// Echo each command to stderr before running it.
    pub verbose: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        }
    }
}

impl RunnerConfig {
    /// Default configuration with verbosity taken from [`VERBOSE_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        let verbose = std::env::var(VERBOSE_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self {
            verbose,
            ..Self::default()
        }
    }
}

fn echo_command(command: &str) {
    eprintln!(
        "{}",
        command.if_supports_color(Stream::Stderr, |text| text.dimmed())
    );
}

fn echo_failure(command: &str, output: &str) {
    eprintln!(
        "{}",
        "Command Failed:".if_supports_color(Stream::Stderr, |text| text.red())
    );
    eprintln!("{command}");
    if !output.is_empty() {
        eprintln!("{output}");
    }
}

/// Production implementation: runs the command line through `sh -c`,
/// captures stdout and stderr, and kills the child on timeout.
pub struct ShellRunner {
    config: RunnerConfig,
}

impl ShellRunner {
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    async fn capture(&self, command: &str) -> Result<(bool, String)> {
        if self.config.verbose {
            echo_command(command);
        }
        let mut child = tokio::process::Command::new("sh")
            .args(["-c", command])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn: {command}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        // Read stdout/stderr concurrently with wait(): a child writing more
        // than the OS pipe buffer would otherwise block and never exit.
        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut handle) = stdout_handle {
                            let _ = handle.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut handle) = stderr_handle {
                            let _ = handle.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                let status = status.with_context(|| format!("waiting for: {command}"))?;
                let mut text = String::from_utf8_lossy(&stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&stderr));
                Ok((status.success(), text))
            } => result,
            () = tokio::time::sleep(self.config.timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("timed out after {}s: {command}", self.config.timeout.as_secs())
            }
        }
    }
}

impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<String> {
        let (success, output) = self.capture(command).await?;
        if !success {
            echo_failure(command, &output);
            anyhow::bail!("command failed: {command}");
        }
        Ok(output)
    }

    async fn run_unchecked(&self, command: &str) -> Result<String> {
        let (_, output) = self.capture(command).await?;
        Ok(output)
    }

    async fn run_interactive(&self, command: &str) -> Result<bool> {
        if self.config.verbose {
            echo_command(command);
        }
        let status = tokio::process::Command::new("sh")
            .args(["-c", command])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("failed to spawn: {command}"))?;
        Ok(status.success())
    }
}

/// Test double: replays a fixture document through a [`MockDispatcher`].
///
/// Bound to one action; obtain via [`MockDispatcher::runner`]. Structured
/// responses are rendered as compact JSON on this plain-text seam, which
/// is what the code under test would get from a real `-o json` invocation;
/// callers that want the raw value use [`MockDispatcher::intercept`].
pub struct MockRunner<'a> {
    dispatcher: &'a MockDispatcher,
    action: String,
}

impl<'a> MockRunner<'a> {
    pub(crate) fn new(dispatcher: &'a MockDispatcher, action: String) -> Self {
        Self { dispatcher, action }
    }

    /// The action this runner consumes rules from.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    fn intercept(&self, command: &str) -> Result<Response, MockError> {
        self.dispatcher.intercept(&self.action, command)
    }

    fn failed(&self, command: &str) -> MockError {
        MockError::CommandFailed {
            action: self.action.clone(),
            command: command.to_owned(),
        }
    }
}

fn render_structured(value: &serde_yaml::Value) -> Result<String> {
    serde_json::to_string(value).context("structured response is not representable as JSON")
}

impl CommandRunner for MockRunner<'_> {
    async fn run(&self, command: &str) -> Result<String> {
        match self.intercept(command)? {
            Response::Text(text) => Ok(text),
            Response::Flag(true) => Ok(String::new()),
            Response::Flag(false) => Err(self.failed(command).into()),
            Response::Structured(value) => render_structured(&value),
        }
    }

    async fn run_unchecked(&self, command: &str) -> Result<String> {
        match self.intercept(command)? {
            Response::Text(text) => Ok(text),
            // The tolerant path swallows the simulated failure, the same
            // way it swallows a real non-zero exit.
            Response::Flag(_) => Ok(String::new()),
            Response::Structured(value) => render_structured(&value),
        }
    }

    async fn run_interactive(&self, command: &str) -> Result<bool> {
        match self.intercept(command)? {
            Response::Flag(false) => Err(self.failed(command).into()),
            Response::Flag(true) | Response::Text(_) | Response::Structured(_) => Ok(true),
        }
    }
}
