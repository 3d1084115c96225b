//! Unified error taxonomy for flow operations
//!
//! Callers must be able to tell "nothing happened" apart from "something
//! happened, finish it by hand". Variants before [`FlowError::TagExists`]
//! never carry committed steps; [`FlowError::PartialSuccess`] always does.

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

use crate::config::ConfigError;
use crate::flow::{FlowOperation, FlowStep};
use crate::git::GitError;
use crate::guardian::PolicyError;
use crate::preflight::PreflightReport;
use crate::validator::ValidationError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Invalid {what} '{value}': {source}")]
    Validation {
        /// "branch name" or "version"
        what: &'static str,
        value: String,
        source: ValidationError,
        /// Advisory repair; never applied automatically
        suggestion: Option<String>,
    },

    #[error("Guardian rejected '{branch}': {source}")]
    Policy { branch: String, source: PolicyError },

    #[error("Pre-flight checks failed ({} of {} failing)", .0.failures().count(), .0.len())]
    Precondition(PreflightReport),

    #[error("Branch '{0}' already exists")]
    BranchExists(String),

    #[error("Branch '{0}' does not exist")]
    BranchNotFound(String),

    #[error("Not on a {prefix}* branch (current: {current})")]
    NotOnFlowBranch { current: String, prefix: String },

    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("Failed to {step}: {source}")]
    Gateway { step: String, source: GitError },

    #[error("Merge of '{source_branch}' into '{target}' failed: {source}")]
    MergeFailed {
        source_branch: String,
        target: String,
        remediation: Vec<String>,
        source: GitError,
    },

    #[error("Tag '{tag}' already exists")]
    TagExists {
        tag: String,
        completed: Vec<FlowStep>,
    },

    #[error("Partial success: {failed} failed after {}", describe_steps(.completed))]
    PartialSuccess {
        completed: Vec<FlowStep>,
        /// The step that failed, in words
        failed: String,
        remediation: Vec<String>,
        source: GitError,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: FlowOperation,
        after: Duration,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn describe_steps(steps: &[FlowStep]) -> String {
    let described: Vec<String> = steps.iter().map(ToString::to_string).collect();
    described.join(", ")
}

impl FlowError {
    /// Steps that were committed before the failure
    pub fn completed_steps(&self) -> &[FlowStep] {
        match self {
            FlowError::TagExists { completed, .. } | FlowError::PartialSuccess { completed, .. } => {
                completed
            }
            _ => &[],
        }
    }

    /// Whether repository history was mutated before the failure
    pub fn has_committed_steps(&self) -> bool {
        !self.completed_steps().is_empty()
    }

    /// Manual commands that complete or recover the operation
    pub fn remediation(&self) -> &[String] {
        match self {
            FlowError::MergeFailed { remediation, .. }
            | FlowError::PartialSuccess { remediation, .. } => remediation,
            _ => &[],
        }
    }

    /// One-line hint shown after the error, when there is one
    pub fn hint(&self) -> Option<String> {
        match self {
            FlowError::Validation {
                suggestion: Some(suggestion),
                ..
            } => Some(format!("Suggested: {suggestion}")),
            FlowError::NotOnFlowBranch { .. } => {
                Some("Pass the name explicitly or switch to a flow branch".to_string())
            }
            FlowError::TagExists { .. } => {
                Some("Use a different version or delete the existing tag".to_string())
            }
            FlowError::BranchNotFound(_) => {
                Some("Check the name with `flow list`".to_string())
            }
            FlowError::NotARepository(_) => {
                Some("Run this command inside a git repository".to_string())
            }
            _ => None,
        }
    }

    /// Stable numeric code from [`ErrorCode`]
    pub fn code(&self) -> u16 {
        match self {
            FlowError::Validation { what, .. } => {
                if *what == "version" {
                    ErrorCode::VALIDATION_INVALID_VERSION
                } else {
                    ErrorCode::VALIDATION_INVALID_BRANCH_NAME
                }
            }
            FlowError::Policy { .. } => ErrorCode::VALIDATION_POLICY_VIOLATION,
            FlowError::Precondition(_) => ErrorCode::FLOW_PRECONDITION_FAILED,
            FlowError::BranchExists(_) => ErrorCode::FLOW_BRANCH_EXISTS,
            FlowError::BranchNotFound(_) => ErrorCode::GIT_BRANCH_NOT_FOUND,
            FlowError::NotOnFlowBranch { .. } => ErrorCode::FLOW_NOT_ON_FLOW_BRANCH,
            FlowError::NotARepository(_) => ErrorCode::GIT_REPO_NOT_FOUND,
            FlowError::Gateway { source, .. } => git_error_code(source),
            FlowError::MergeFailed { .. } => ErrorCode::GIT_MERGE_CONFLICT,
            FlowError::TagExists { .. } => ErrorCode::FLOW_TAG_EXISTS,
            FlowError::PartialSuccess { .. } => ErrorCode::FLOW_PARTIAL_SUCCESS,
            FlowError::Timeout { .. } => ErrorCode::EXEC_TIMEOUT,
            FlowError::Config(e) => config_error_code(e),
        }
    }

    /// Process exit status for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            FlowError::Config(_) => 2,
            FlowError::PartialSuccess { .. } => 3,
            FlowError::Timeout { .. } => 5,
            FlowError::Precondition(_)
            | FlowError::BranchExists(_)
            | FlowError::NotOnFlowBranch { .. }
            | FlowError::TagExists { .. } => 6,
            FlowError::NotARepository(_)
            | FlowError::BranchNotFound(_)
            | FlowError::Gateway { .. }
            | FlowError::MergeFailed { .. } => 7,
            FlowError::Validation { .. } | FlowError::Policy { .. } => 8,
        }
    }
}

fn git_error_code(error: &GitError) -> u16 {
    match error {
        GitError::NotARepository => ErrorCode::GIT_REPO_NOT_FOUND,
        GitError::DetachedHead => ErrorCode::GIT_DETACHED_HEAD,
        GitError::InvalidReference { .. } => ErrorCode::GIT_INVALID_REFERENCE,
        GitError::CommandFailed { .. } if error.is_merge_conflict() => {
            ErrorCode::GIT_MERGE_CONFLICT
        }
        GitError::CommandFailed { .. } => ErrorCode::GIT_GENERIC,
        GitError::GitNotInstalled => ErrorCode::EXEC_COMMAND_NOT_FOUND,
        GitError::Process { .. } => ErrorCode::EXEC_SUBPROCESS_FAILED,
        GitError::Timeout { .. } => ErrorCode::EXEC_TIMEOUT,
    }
}

fn config_error_code(error: &ConfigError) -> u16 {
    match error {
        ConfigError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
            ErrorCode::CONFIG_NOT_FOUND
        }
        ConfigError::Read { .. } | ConfigError::Write { .. } | ConfigError::NoGlobalDir => {
            ErrorCode::CONFIG_PATH_ERROR
        }
        ConfigError::Parse { .. } => ErrorCode::CONFIG_INVALID_YAML,
        ConfigError::InvalidValue { .. } | ConfigError::UnknownKey(_) => {
            ErrorCode::CONFIG_INVALID_VALUE
        }
        ConfigError::InvalidPattern { .. }
        | ConfigError::InvalidTagFormat(_)
        | ConfigError::EmptyValue(_)
        | ConfigError::SameBranches(_) => ErrorCode::CONFIG_VALIDATION_FAILED,
        ConfigError::AlreadyExists(_) => ErrorCode::CONFIG_ALREADY_EXISTS,
        ConfigError::Serialize(_) => ErrorCode::CONFIG_GENERIC,
    }
}

/// Type alias for Results using FlowError
pub type Result<T> = std::result::Result<T, FlowError>;

#[cfg(test)]
mod tests;
