//! Persisted configuration document
//!
//! Every field has a default, so a partial file (or no file at all) is valid.

use crate::guardian::GuardianMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub branches: BranchesSection,
    pub prefixes: PrefixesSection,
    pub options: OptionsSection,
    pub guardian: GuardianSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchesSection {
    #[serde(alias = "master")]
    pub mainline: String,
    pub develop: String,
}

impl Default for BranchesSection {
    fn default() -> Self {
        Self {
            mainline: "master".to_string(),
            develop: "develop".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixesSection {
    pub feature: String,
    pub release: String,
    pub hotfix: String,
}

impl Default for PrefixesSection {
    fn default() -> Self {
        Self {
            feature: "feature/".to_string(),
            release: "release/".to_string(),
            hotfix: "hotfix/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsSection {
    pub delete_branch_after_finish: bool,
    pub push_after_finish: bool,
    /// Tag name template; `%s` is replaced by the version
    pub tag_format: String,
    pub require_clean_tree: bool,
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            delete_branch_after_finish: true,
            push_after_finish: false,
            tag_format: "v%s".to_string(),
            require_clean_tree: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GuardianSection {
    pub enabled: bool,
    pub mode: GuardianMode,
    pub naming: NamingSection,
    pub workflow: WorkflowSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingSection {
    pub pattern: String,
    pub max_length: usize,
    pub forbidden: Vec<String>,
}

impl Default for NamingSection {
    fn default() -> Self {
        Self {
            pattern: "^[a-z0-9]+([.-][a-z0-9]+)*$".to_string(),
            max_length: 50,
            forbidden: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowSection {
    pub require_clean_tree: bool,
    pub require_up_to_date: bool,
    pub prevent_direct_push: bool,
    pub require_linear_history: bool,
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            require_clean_tree: true,
            require_up_to_date: true,
            prevent_direct_push: false,
            require_linear_history: false,
        }
    }
}
