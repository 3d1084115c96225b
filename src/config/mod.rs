//! Configuration: persisted document, layered discovery and the immutable
//! runtime view handed to the orchestrator.

pub mod file;
pub mod keys;
pub mod loader;

pub use file::{
    BranchesSection, ConfigFile, GuardianSection, NamingSection, OptionsSection, PrefixesSection,
    WorkflowSection,
};
pub use keys::{get_value, set_value};
pub use loader::{
    global_config_path, read_config_file, write_config_file, ConfigLoader, ConfigSource,
    LoadedConfig, LOCAL_CONFIG_FILE,
};

use crate::flow::FlowKind;
use crate::git::validate_ref_name;
use crate::guardian::PolicyConfig;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Invalid guardian naming pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid tag format '{0}': it must contain exactly one %s placeholder")]
    InvalidTagFormat(String),

    #[error("Configuration value '{0}' cannot be empty")]
    EmptyValue(&'static str),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Mainline and develop branches must differ (both are '{0}')")]
    SameBranches(String),

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Could not determine the global configuration directory")]
    NoGlobalDir,

    #[error("Configuration already exists at {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),
}

/// Immutable runtime configuration for one invocation
#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub mainline_branch: String,
    pub develop_branch: String,
    pub feature_prefix: String,
    pub release_prefix: String,
    pub hotfix_prefix: String,
    pub delete_after_finish: bool,
    pub tag_format: String,
    pub policy: PolicyConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        let file = ConfigFile::default();
        Self {
            mainline_branch: file.branches.mainline,
            develop_branch: file.branches.develop,
            feature_prefix: file.prefixes.feature,
            release_prefix: file.prefixes.release,
            hotfix_prefix: file.prefixes.hotfix,
            delete_after_finish: file.options.delete_branch_after_finish,
            tag_format: file.options.tag_format,
            policy: PolicyConfig::disabled().with_mode(file.guardian.mode),
        }
    }
}

impl FlowConfig {
    /// Validate a persisted document and compile it into a runtime view.
    ///
    /// This is the only place the guardian pattern is compiled, so a bad
    /// pattern is reported here and never in the middle of a flow.
    pub fn from_file(file: &ConfigFile) -> Result<Self, ConfigError> {
        let non_empty = [
            ("branches.mainline", &file.branches.mainline),
            ("branches.develop", &file.branches.develop),
            ("prefixes.feature", &file.prefixes.feature),
            ("prefixes.release", &file.prefixes.release),
            ("prefixes.hotfix", &file.prefixes.hotfix),
        ];
        for (key, value) in non_empty {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyValue(key));
            }
        }

        for (key, branch) in [
            ("branches.mainline", &file.branches.mainline),
            ("branches.develop", &file.branches.develop),
        ] {
            validate_ref_name(branch).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        }

        if file.branches.mainline == file.branches.develop {
            return Err(ConfigError::SameBranches(file.branches.mainline.clone()));
        }

        if file.options.tag_format.matches("%s").count() != 1 {
            return Err(ConfigError::InvalidTagFormat(
                file.options.tag_format.clone(),
            ));
        }

        let guardian = &file.guardian;
        let naming = if guardian.enabled {
            PolicyConfig::compile(
                &guardian.naming.pattern,
                guardian.naming.max_length,
                &guardian.naming.forbidden,
            )
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: guardian.naming.pattern.clone(),
                source,
            })?
        } else {
            PolicyConfig::disabled()
        };
        let policy = naming.with_mode(guardian.mode).with_workflow(
            guardian.workflow.require_clean_tree,
            guardian.workflow.require_up_to_date,
        );

        Ok(Self {
            mainline_branch: file.branches.mainline.clone(),
            develop_branch: file.branches.develop.clone(),
            feature_prefix: file.prefixes.feature.clone(),
            release_prefix: file.prefixes.release.clone(),
            hotfix_prefix: file.prefixes.hotfix.clone(),
            delete_after_finish: file.options.delete_branch_after_finish,
            tag_format: file.options.tag_format.clone(),
            policy,
        })
    }

    pub fn prefix(&self, kind: FlowKind) -> &str {
        match kind {
            FlowKind::Feature => &self.feature_prefix,
            FlowKind::Release => &self.release_prefix,
            FlowKind::Hotfix => &self.hotfix_prefix,
        }
    }

    /// Branch a new flow of this kind starts from
    pub fn base_branch(&self, kind: FlowKind) -> &str {
        match kind {
            FlowKind::Feature | FlowKind::Release => &self.develop_branch,
            FlowKind::Hotfix => &self.mainline_branch,
        }
    }

    pub fn branch_name(&self, kind: FlowKind, identifier: &str) -> String {
        format!("{}{}", self.prefix(kind), identifier)
    }

    pub fn tag_name(&self, version: &str) -> String {
        self.tag_format.replacen("%s", version, 1)
    }
}
