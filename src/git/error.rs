//! Git operation error types

use std::time::Duration;
use thiserror::Error;

/// Errors raised at the version-control boundary.
///
/// Every variant that concerns a concrete invocation keeps the command line
/// so the user can see exactly what was attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Repository is in detached HEAD state")]
    DetachedHead,

    #[error("Invalid git reference '{name}': {reason}")]
    InvalidReference { name: String, reason: String },

    #[error("`git {command}` failed{}: {}", exit_suffix(.code), .output.trim())]
    CommandFailed {
        command: String,
        code: Option<i32>,
        /// Combined stderr and stdout; git reports merge conflicts on stdout
        output: String,
    },

    #[error("git executable not found; install git or add it to PATH")]
    GitNotInstalled,

    #[error("`git {command}` could not be run: {message}")]
    Process { command: String, message: String },

    #[error("`git {command}` timed out after {after:?}")]
    Timeout { command: String, after: Duration },
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit code {code})"),
        None => String::new(),
    }
}

impl GitError {
    /// Whether git reported merge conflicts for this failure
    pub fn is_merge_conflict(&self) -> bool {
        match self {
            GitError::CommandFailed { output, .. } => {
                output.contains("CONFLICT") || output.contains("Automatic merge failed")
            }
            _ => false,
        }
    }

    /// The attempted command line, if this error concerns one
    pub fn command(&self) -> Option<&str> {
        match self {
            GitError::CommandFailed { command, .. }
            | GitError::Process { command, .. }
            | GitError::Timeout { command, .. } => Some(command),
            _ => None,
        }
    }
}
