//! Git data structures

use std::path::PathBuf;

/// Working tree status as reported by `git status --porcelain=v2 --branch`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkingTreeStatus {
    /// Current branch name (None if detached HEAD)
    pub branch: Option<String>,
    /// Tracked files with staged or unstaged changes
    pub changed: Vec<PathBuf>,
    /// Untracked files
    pub untracked: Vec<PathBuf>,
    /// Files with unresolved conflicts
    pub conflicts: Vec<PathBuf>,
}

impl WorkingTreeStatus {
    /// Check if the working directory is clean
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.untracked.is_empty() && self.conflicts.is_empty()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Number of paths that make the tree dirty
    pub fn dirty_count(&self) -> usize {
        self.changed.len() + self.untracked.len() + self.conflicts.len()
    }
}
