//! Pre-flight checks run before any mutating flow step
//!
//! Every check is evaluated on every run, in a fixed order, so a blocked
//! user sees everything that stands in the way at once. Gateway query errors
//! are folded into failed results instead of being propagated.

use crate::git::GitReader;
use std::fmt;

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightResult {
    pub check_name: String,
    pub passed: bool,
    pub error_detail: Option<String>,
    pub hint: Option<String>,
}

impl PreflightResult {
    fn pass(check_name: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            passed: true,
            error_detail: None,
            hint: None,
        }
    }

    fn fail(
        check_name: impl Into<String>,
        error_detail: Option<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            check_name: check_name.into(),
            passed: false,
            error_detail,
            hint: Some(hint.into()),
        }
    }
}

/// Ordered results of one pre-flight run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreflightReport {
    results: Vec<PreflightResult>,
}

impl PreflightReport {
    pub fn results(&self) -> &[PreflightResult] {
        &self.results
    }

    pub fn has_failure(&self) -> bool {
        self.results.iter().any(|r| !r.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PreflightResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl From<Vec<PreflightResult>> for PreflightReport {
    fn from(results: Vec<PreflightResult>) -> Self {
        Self { results }
    }
}

impl fmt::Display for PreflightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pre-flight checks:")?;
        for result in &self.results {
            if result.passed {
                writeln!(f, "  ✅ {}", result.check_name)?;
                continue;
            }
            writeln!(f, "  ❌ {}", result.check_name)?;
            if let Some(detail) = &result.error_detail {
                writeln!(f, "     Error: {detail}")?;
            }
            if let Some(hint) = &result.hint {
                writeln!(f, "     Hint: {hint}")?;
            }
        }
        Ok(())
    }
}

const CLEAN_TREE_CHECK: &str = "Clean working tree";

/// Runs the fixed check set against a repository
pub struct PreflightChecker<'a, G: GitReader + ?Sized> {
    git: &'a G,
    target_branch: Option<String>,
}

impl<'a, G: GitReader + ?Sized> PreflightChecker<'a, G> {
    pub fn new(git: &'a G) -> Self {
        Self {
            git,
            target_branch: None,
        }
    }

    /// Also verify that `branch` exists
    pub fn with_target_branch(mut self, branch: impl Into<String>) -> Self {
        self.target_branch = Some(branch.into());
        self
    }

    pub async fn run_all(&self) -> PreflightReport {
        let mut results = vec![self.check_clean_tree().await];

        if let Some(target) = &self.target_branch {
            results.push(self.check_branch_exists(target).await);
        }

        let report = PreflightReport::from(results);
        tracing::debug!(
            "Pre-flight: {} check(s), {} failed",
            report.len(),
            report.failures().count()
        );
        report
    }

    async fn check_clean_tree(&self) -> PreflightResult {
        match self.git.working_tree_status().await {
            Ok(status) if status.is_clean() => PreflightResult::pass(CLEAN_TREE_CHECK),
            Ok(status) => PreflightResult::fail(
                CLEAN_TREE_CHECK,
                Some(format!("{} uncommitted change(s)", status.dirty_count())),
                "Commit or stash your changes before finishing",
            ),
            Err(e) => PreflightResult::fail(
                CLEAN_TREE_CHECK,
                Some(e.to_string()),
                "Failed to check git status",
            ),
        }
    }

    async fn check_branch_exists(&self, target: &str) -> PreflightResult {
        let name = format!("Target branch '{target}' exists");
        match self.git.branch_exists(target).await {
            Ok(true) => PreflightResult::pass(name),
            Ok(false) => PreflightResult::fail(
                name,
                None,
                format!("Create branch '{target}' first or check your configuration"),
            ),
            Err(e) => PreflightResult::fail(
                name,
                Some(e.to_string()),
                "Failed to check if branch exists",
            ),
        }
    }
}
