//! Flow lifecycle orchestration
//!
//! Starting and finishing feature, release and hotfix branches, plus the
//! read-only `status`/`list` views and repository initialization.

pub mod finish;
pub mod init;
pub mod orchestrator;
pub mod start;
pub mod status;

pub use init::{initialize, InitOptions, InitReport};
pub use orchestrator::FlowOrchestrator;
pub use status::{collect_status, list_flow_branches, BranchRole, FlowStatus};

use crate::guardian::PolicyError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Wall-clock limit for start operations
pub const START_TIMEOUT: Duration = Duration::from_secs(30);
/// Wall-clock limit for finish operations; merges may be slow
pub const FINISH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlowKind {
    Feature,
    Release,
    Hotfix,
}

impl FlowKind {
    pub const ALL: [FlowKind; 3] = [FlowKind::Feature, FlowKind::Release, FlowKind::Hotfix];

    pub fn as_str(self) -> &'static str {
        match self {
            FlowKind::Feature => "feature",
            FlowKind::Release => "release",
            FlowKind::Hotfix => "hotfix",
        }
    }

    /// Release and hotfix branches are named by a strict version
    pub fn is_versioned(self) -> bool {
        !matches!(self, FlowKind::Feature)
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feature" => Ok(FlowKind::Feature),
            "release" => Ok(FlowKind::Release),
            "hotfix" => Ok(FlowKind::Hotfix),
            other => Err(format!(
                "unknown flow kind '{other}' (expected feature, release or hotfix)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowOperation {
    FeatureStart,
    FeatureFinish,
    ReleaseStart,
    ReleaseFinish,
    HotfixStart,
    HotfixFinish,
}

impl FlowOperation {
    pub fn start(kind: FlowKind) -> Self {
        match kind {
            FlowKind::Feature => FlowOperation::FeatureStart,
            FlowKind::Release => FlowOperation::ReleaseStart,
            FlowKind::Hotfix => FlowOperation::HotfixStart,
        }
    }

    pub fn finish(kind: FlowKind) -> Self {
        match kind {
            FlowKind::Feature => FlowOperation::FeatureFinish,
            FlowKind::Release => FlowOperation::ReleaseFinish,
            FlowKind::Hotfix => FlowOperation::HotfixFinish,
        }
    }

    pub fn kind(self) -> FlowKind {
        match self {
            FlowOperation::FeatureStart | FlowOperation::FeatureFinish => FlowKind::Feature,
            FlowOperation::ReleaseStart | FlowOperation::ReleaseFinish => FlowKind::Release,
            FlowOperation::HotfixStart | FlowOperation::HotfixFinish => FlowKind::Hotfix,
        }
    }

    pub fn is_finish(self) -> bool {
        matches!(
            self,
            FlowOperation::FeatureFinish | FlowOperation::ReleaseFinish | FlowOperation::HotfixFinish
        )
    }

    pub fn default_timeout(self) -> Duration {
        if self.is_finish() {
            FINISH_TIMEOUT
        } else {
            START_TIMEOUT
        }
    }
}

impl fmt::Display for FlowOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = if self.is_finish() { "finish" } else { "start" };
        write!(f, "{} {}", self.kind(), phase)
    }
}

/// A history mutation that has been committed to the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    CreateBranch { branch: String },
    Merge { source: String, target: String },
    Tag { name: String },
    DeleteBranch { branch: String },
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStep::CreateBranch { branch } => write!(f, "created branch '{branch}'"),
            FlowStep::Merge { source, target } => write!(f, "merged '{source}' into '{target}'"),
            FlowStep::Tag { name } => write!(f, "created tag '{name}'"),
            FlowStep::DeleteBranch { branch } => write!(f, "deleted branch '{branch}'"),
        }
    }
}

/// Non-fatal condition; never changes the verdict of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowWarning {
    /// The base branch was not checked out, so a checkout happened first
    CheckoutAdvisory { current: Option<String>, base: String },
    /// Release/hotfix finish skipped the develop merge
    DevelopMissing { branch: String },
    /// The source branch could not be deleted after a successful finish
    DeleteFailed { branch: String, reason: String },
    /// Permissive guardian mode let a violation through
    PolicyViolation(PolicyError),
}

impl fmt::Display for FlowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowWarning::CheckoutAdvisory { current, base } => match current {
                Some(current) => {
                    write!(f, "You're on '{current}', not '{base}'; checking out '{base}' first")
                }
                None => write!(f, "HEAD is detached; checking out '{base}' first"),
            },
            FlowWarning::DevelopMissing { branch } => {
                write!(f, "Develop branch '{branch}' does not exist; skipping merge to develop")
            }
            FlowWarning::DeleteFailed { branch, reason } => {
                write!(f, "Failed to delete branch '{branch}': {reason}")
            }
            FlowWarning::PolicyViolation(violation) => write!(f, "Guardian: {violation}"),
        }
    }
}

/// Result of a successful operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOutcome {
    pub operation: FlowOperation,
    /// The flow branch that was created or finished
    pub branch: String,
    pub completed: Vec<FlowStep>,
    pub warnings: Vec<FlowWarning>,
}

impl FlowOutcome {
    fn new(operation: FlowOperation, branch: impl Into<String>) -> Self {
        Self {
            operation,
            branch: branch.into(),
            completed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.completed.iter().find_map(|step| match step {
            FlowStep::Tag { name } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn branch_deleted(&self) -> bool {
        self.completed
            .iter()
            .any(|step| matches!(step, FlowStep::DeleteBranch { .. }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartRequest {
    /// Branch name fragment for features, strict version otherwise
    pub identifier: String,
    /// Start from this branch instead of the configured base; features only
    pub base_override: Option<String>,
}

impl StartRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            base_override: None,
        }
    }

    pub fn from_base(mut self, base: impl Into<String>) -> Self {
        self.base_override = Some(base.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFinishRequest {
    /// Feature name without prefix; detected from the current branch if absent
    pub name: Option<String>,
    pub keep: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionFinishRequest {
    pub version: String,
    pub keep: bool,
    pub no_tag: bool,
    pub tag_message: Option<String>,
}

impl VersionFinishRequest {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }
}

/// One top-level flow operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowCommand {
    Start(FlowKind, StartRequest),
    FinishFeature(FeatureFinishRequest),
    FinishRelease(VersionFinishRequest),
    FinishHotfix(VersionFinishRequest),
}

impl FlowCommand {
    pub fn operation(&self) -> FlowOperation {
        match self {
            FlowCommand::Start(kind, _) => FlowOperation::start(*kind),
            FlowCommand::FinishFeature(_) => FlowOperation::FeatureFinish,
            FlowCommand::FinishRelease(_) => FlowOperation::ReleaseFinish,
            FlowCommand::FinishHotfix(_) => FlowOperation::HotfixFinish,
        }
    }
}
