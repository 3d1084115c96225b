//! Version-control gateway
//!
//! The orchestrator only sees [`GitReader`] and [`GitWriter`]. Production
//! code talks to the `git` executable through [`GitCommandRunner`]; tests use
//! either a [`crate::subprocess::MockProcessRunner`] under the real runner or
//! the in-memory [`ScenarioGateway`].

pub mod error;
pub mod parsers;
pub mod refname;
pub mod scenario;
pub mod types;

pub use error::GitError;
pub use parsers::*;
pub use refname::validate_ref_name;
pub use scenario::*;
pub use types::*;

use crate::subprocess::{ProcessCommandBuilder, ProcessError, ProcessOutput, ProcessRunner};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub type GitResult<T> = Result<T, GitError>;

/// Git read operations
#[async_trait]
pub trait GitReader: Send + Sync {
    /// Check if the gateway's directory is inside a git repository
    async fn is_repository(&self) -> bool;

    /// Name of the checked-out branch; [`GitError::DetachedHead`] if none
    async fn current_branch(&self) -> GitResult<String>;

    async fn working_tree_status(&self) -> GitResult<WorkingTreeStatus>;

    /// Whether there are no staged, unstaged or untracked changes
    async fn is_working_tree_clean(&self) -> GitResult<bool> {
        Ok(self.working_tree_status().await?.is_clean())
    }

    async fn branch_exists(&self, name: &str) -> GitResult<bool>;

    async fn tag_exists(&self, name: &str) -> GitResult<bool>;

    /// Local branches whose names start with `prefix`, sorted
    async fn list_branches(&self, prefix: &str) -> GitResult<Vec<String>>;
}

/// Git write operations
#[async_trait]
pub trait GitWriter: Send + Sync {
    /// Switch to an existing branch
    async fn checkout(&self, branch: &str) -> GitResult<()>;

    /// Create a branch at HEAD and switch to it
    async fn create_branch(&self, branch: &str) -> GitResult<()>;

    /// Merge `branch` into the current branch
    async fn merge(&self, branch: &str, no_fast_forward: bool) -> GitResult<()>;

    /// Delete a fully merged local branch
    async fn delete_branch(&self, branch: &str) -> GitResult<()>;

    /// Create an annotated tag at HEAD
    async fn create_tag(&self, name: &str, message: &str) -> GitResult<()>;
}

/// Combined trait for all git operations
pub trait GitOperations: GitReader + GitWriter {}

impl<T: GitReader + GitWriter> GitOperations for T {}

/// Production implementation that shells out to `git`
pub struct GitCommandRunner {
    process_runner: Arc<dyn ProcessRunner>,
    repo_dir: PathBuf,
    command_timeout: Option<Duration>,
}

impl GitCommandRunner {
    pub fn new(process_runner: Arc<dyn ProcessRunner>, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            process_runner,
            repo_dir: repo_dir.into(),
            command_timeout: None,
        }
    }

    /// Bound every single git invocation, on top of any operation deadline
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Run git and return its raw output regardless of exit status
    async fn run_git(&self, args: &[&str]) -> GitResult<ProcessOutput> {
        let mut builder = ProcessCommandBuilder::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("LC_ALL", "C");
        if let Some(timeout) = self.command_timeout {
            builder = builder.timeout(timeout);
        }

        let command_line = args.join(" ");
        tracing::debug!("git {}", command_line);

        self.process_runner
            .run(builder.build())
            .await
            .map_err(|e| match e {
                ProcessError::Timeout { after, .. } => GitError::Timeout {
                    command: command_line.clone(),
                    after,
                },
                ProcessError::CommandNotFound(_) => GitError::GitNotInstalled,
                other => GitError::Process {
                    command: command_line.clone(),
                    message: other.to_string(),
                },
            })
    }

    /// Run git and fail unless it exits successfully
    async fn run_git_checked(&self, args: &[&str]) -> GitResult<ProcessOutput> {
        let output = self.run_git(args).await?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(command_failed(args, &output))
        }
    }

    /// `show-ref --verify --quiet`: exit 0 means present, 1 means absent
    async fn ref_exists(&self, full_ref: &str) -> GitResult<bool> {
        let args = ["show-ref", "--verify", "--quiet", full_ref];
        let output = self.run_git(&args).await?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(command_failed(&args, &output)),
        }
    }
}

fn command_failed(args: &[&str], output: &ProcessOutput) -> GitError {
    let combined = match (output.stderr.trim(), output.stdout.trim()) {
        ("", stdout) => stdout.to_string(),
        (stderr, "") => stderr.to_string(),
        (stderr, stdout) => format!("{stderr}\n{stdout}"),
    };
    GitError::CommandFailed {
        command: args.join(" "),
        code: output.status.code(),
        output: combined,
    }
}

#[async_trait]
impl GitReader for GitCommandRunner {
    async fn is_repository(&self) -> bool {
        match self.run_git(&["rev-parse", "--git-dir"]).await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    async fn current_branch(&self) -> GitResult<String> {
        let output = self.run_git_checked(&["branch", "--show-current"]).await?;
        let branch = output.stdout.trim();
        if branch.is_empty() {
            return Err(GitError::DetachedHead);
        }
        Ok(branch.to_string())
    }

    async fn working_tree_status(&self) -> GitResult<WorkingTreeStatus> {
        let output = self
            .run_git_checked(&["status", "--porcelain=v2", "--branch"])
            .await?;
        Ok(parse_status_output(&output.stdout))
    }

    async fn branch_exists(&self, name: &str) -> GitResult<bool> {
        validate_ref_name(name)?;
        self.ref_exists(&format!("refs/heads/{name}")).await
    }

    async fn tag_exists(&self, name: &str) -> GitResult<bool> {
        validate_ref_name(name)?;
        self.ref_exists(&format!("refs/tags/{name}")).await
    }

    async fn list_branches(&self, prefix: &str) -> GitResult<Vec<String>> {
        let output = self
            .run_git_checked(&["for-each-ref", "--format=%(refname)", "refs/heads"])
            .await?;
        let mut branches: Vec<String> = parse_branch_list(&output.stdout)
            .into_iter()
            .filter_map(|full| full.strip_prefix("refs/heads/").map(str::to_string))
            .filter(|name| name.starts_with(prefix))
            .collect();
        branches.sort();
        Ok(branches)
    }
}

#[async_trait]
impl GitWriter for GitCommandRunner {
    async fn checkout(&self, branch: &str) -> GitResult<()> {
        validate_ref_name(branch)?;
        self.run_git_checked(&["checkout", branch]).await?;
        Ok(())
    }

    async fn create_branch(&self, branch: &str) -> GitResult<()> {
        validate_ref_name(branch)?;
        self.run_git_checked(&["checkout", "-b", branch]).await?;
        Ok(())
    }

    async fn merge(&self, branch: &str, no_fast_forward: bool) -> GitResult<()> {
        validate_ref_name(branch)?;
        let args: &[&str] = if no_fast_forward {
            &["merge", "--no-ff", "--no-edit", branch]
        } else {
            &["merge", "--no-edit", branch]
        };
        self.run_git_checked(args).await?;
        Ok(())
    }

    async fn delete_branch(&self, branch: &str) -> GitResult<()> {
        validate_ref_name(branch)?;
        self.run_git_checked(&["branch", "-d", branch]).await?;
        Ok(())
    }

    async fn create_tag(&self, name: &str, message: &str) -> GitResult<()> {
        validate_ref_name(name)?;
        // The message travels as its own argv element; no shell is involved.
        self.run_git_checked(&["tag", "-a", name, "-m", message])
            .await?;
        Ok(())
    }
}
