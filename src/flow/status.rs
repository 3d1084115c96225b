//! Read-only views: `status` and `list`

use super::FlowKind;
use crate::config::FlowConfig;
use crate::error::FlowError;
use crate::git::{GitError, GitReader};
use std::fmt;

/// What the current branch is, from the flow's point of view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchRole {
    Mainline,
    Develop,
    Flow(FlowKind),
    Other,
}

impl BranchRole {
    pub fn classify(branch: &str, config: &FlowConfig) -> Self {
        if branch == config.mainline_branch {
            return BranchRole::Mainline;
        }
        if branch == config.develop_branch {
            return BranchRole::Develop;
        }
        FlowKind::ALL
            .into_iter()
            .find(|kind| branch.starts_with(config.prefix(*kind)))
            .map_or(BranchRole::Other, BranchRole::Flow)
    }
}

impl fmt::Display for BranchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchRole::Mainline => f.write_str("mainline"),
            BranchRole::Develop => f.write_str("develop"),
            BranchRole::Flow(kind) => write!(f, "{kind} branch"),
            BranchRole::Other => f.write_str("not a flow branch"),
        }
    }
}

/// Snapshot of the repository's flow state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStatus {
    /// `None` on a detached HEAD
    pub current_branch: Option<String>,
    pub role: BranchRole,
    /// Active flow branches per kind, sorted
    pub active: Vec<(FlowKind, Vec<String>)>,
    pub dirty_count: usize,
}

impl FlowStatus {
    pub fn is_clean(&self) -> bool {
        self.dirty_count == 0
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().map(|(_, branches)| branches.len()).sum()
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.current_branch {
            Some(branch) => writeln!(f, "On branch {branch} ({})", self.role)?,
            None => writeln!(f, "HEAD detached")?,
        }
        if self.is_clean() {
            writeln!(f, "Working tree clean")?;
        } else {
            writeln!(f, "{} uncommitted change(s)", self.dirty_count)?;
        }

        for (kind, branches) in &self.active {
            if branches.is_empty() {
                continue;
            }
            writeln!(f, "Active {kind} branches:")?;
            for branch in branches {
                let marker = if self.current_branch.as_deref() == Some(branch.as_str()) {
                    "*"
                } else {
                    " "
                };
                writeln!(f, "  {marker} {branch}")?;
            }
        }
        if self.active_count() == 0 {
            writeln!(f, "No active flow branches")?;
        }
        Ok(())
    }
}

/// Flow branches of one kind, or of every kind when `kind` is `None`
pub async fn list_flow_branches<G>(
    git: &G,
    config: &FlowConfig,
    kind: Option<FlowKind>,
) -> Result<Vec<(FlowKind, Vec<String>)>, FlowError>
where
    G: GitReader + ?Sized,
{
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => FlowKind::ALL.to_vec(),
    };

    let mut listing = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let prefix = config.prefix(kind);
        let branches = git
            .list_branches(prefix)
            .await
            .map_err(|source| FlowError::Gateway {
                step: format!("list {kind} branches"),
                source,
            })?;
        listing.push((kind, branches));
    }
    Ok(listing)
}

pub async fn collect_status<G>(git: &G, config: &FlowConfig) -> Result<FlowStatus, FlowError>
where
    G: GitReader + ?Sized,
{
    let current_branch = match git.current_branch().await {
        Ok(branch) => Some(branch),
        Err(GitError::DetachedHead) => None,
        Err(source) => {
            return Err(FlowError::Gateway {
                step: "read the current branch".to_string(),
                source,
            })
        }
    };
    let role = current_branch
        .as_deref()
        .map_or(BranchRole::Other, |branch| BranchRole::classify(branch, config));

    let tree = git
        .working_tree_status()
        .await
        .map_err(|source| FlowError::Gateway {
            step: "read the working tree status".to_string(),
            source,
        })?;

    Ok(FlowStatus {
        current_branch,
        role,
        active: list_flow_branches(git, config, None).await?,
        dirty_count: tree.dirty_count(),
    })
}
