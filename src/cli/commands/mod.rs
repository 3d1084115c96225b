//! Command implementation modules
//!
//! Each command loads what it needs from a [`CommandContext`] and returns an
//! `anyhow::Result`; flow failures travel inside it as [`FlowError`] so the
//! binary can pick the exit status.
//!
//! [`FlowError`]: crate::error::FlowError

pub mod config;
pub mod flow;
pub mod repo;

pub use config::run_config_command;
pub use flow::run_flow_command;
pub use repo::{run_init_command, run_list_command, run_status_command};

use crate::config::{ConfigLoader, LoadedConfig};
use crate::error::FlowError;
use crate::git::{GitCommandRunner, GitReader};
use crate::subprocess::SubprocessManager;
use std::path::PathBuf;

/// Global flags shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub repo_dir: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    pub fn new(repo_dir: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            repo_dir,
            config_path,
        }
    }

    pub fn loader(&self) -> ConfigLoader {
        ConfigLoader::new(&self.repo_dir).with_explicit_path(self.config_path.clone())
    }

    pub async fn load_config(&self) -> Result<LoadedConfig, FlowError> {
        Ok(self.loader().load().await?)
    }

    pub fn git(&self) -> GitCommandRunner {
        SubprocessManager::production().git(&self.repo_dir)
    }

    /// Git gateway for a directory that must be a repository
    pub async fn repository(&self) -> Result<GitCommandRunner, FlowError> {
        let git = self.git();
        if !git.is_repository().await {
            return Err(FlowError::NotARepository(self.repo_dir.clone()));
        }
        Ok(git)
    }
}
