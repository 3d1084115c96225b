use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use super::error::ProcessError;

/// A fully specified child process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Overrides on top of the inherited environment
    pub env: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

/// Renders the command line as it would be typed
impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    /// Status for a given exit code; zero is success
    pub fn from_code(code: i32) -> Self {
        if code == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Error(code)
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    /// Exit code; `None` when the process was killed by a signal
    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            ExitStatus::Signal(_) => None,
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitStatus::from_code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitStatus::Signal(signal);
            }
        }

        ExitStatus::Error(1)
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError>;
}

/// Runs commands as real child processes on the tokio runtime
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    fn spawn(command: &ProcessCommand) -> Result<tokio::process::Child, ProcessError> {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .envs(&command.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A dropped future (operation timeout) must not leave git running
            .kill_on_drop(true);
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        cmd.spawn().map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ProcessError::CommandNotFound(command.program.clone()),
            _ => ProcessError::Io {
                command: command.to_string(),
                source,
            },
        })
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        tracing::debug!("Executing subprocess: {}", command);
        if let Some(dir) = &command.working_dir {
            tracing::trace!("Working directory: {:?}", dir);
        }

        let started = Instant::now();
        let child = Self::spawn(&command)?;
        let waiting = child.wait_with_output();

        let output = match command.timeout {
            Some(after) => tokio::time::timeout(after, waiting)
                .await
                .map_err(|_| ProcessError::Timeout {
                    command: command.to_string(),
                    after,
                })?,
            None => waiting.await,
        }
        .map_err(|source| ProcessError::Io {
            command: command.to_string(),
            source,
        })?;

        let result = ProcessOutput {
            status: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration: started.elapsed(),
        };

        match result.status {
            ExitStatus::Success => {
                tracing::debug!("`{}` succeeded in {:?}", command, result.duration)
            }
            ExitStatus::Error(code) => {
                tracing::debug!("`{}` exited with {} in {:?}", command, code, result.duration);
                if !result.stderr.is_empty() {
                    tracing::trace!("Stderr: {}", result.stderr);
                }
            }
            ExitStatus::Signal(signal) => {
                tracing::warn!("`{}` killed by signal {}", command, signal)
            }
        }

        Ok(result)
    }
}
