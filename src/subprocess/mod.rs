//! Process execution capability
//!
//! Everything that spawns a child process goes through [`ProcessRunner`], so
//! the git gateway can be exercised against [`MockProcessRunner`] in tests.

pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;


pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use mock::{MockProcessRunner, ScriptedCommand};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};

use std::sync::Arc;

/// Owns the process runner every gateway is built on
#[derive(Clone)]
pub struct SubprocessManager {
    runner: Arc<dyn ProcessRunner>,
}

impl SubprocessManager {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    pub fn production() -> Self {
        Self::new(Arc::new(TokioProcessRunner))
    }

    /// Git gateway rooted at `repo_dir`
    pub fn git(&self, repo_dir: impl Into<std::path::PathBuf>) -> crate::git::GitCommandRunner {
        crate::git::GitCommandRunner::new(Arc::clone(&self.runner), repo_dir)
    }
}
