//! Flow lifecycle orchestrator
//!
//! Composes the validator, the guardian, the pre-flight checker and the git
//! gateway. Steps of one operation run strictly in order, mutating steps are
//! never retried, and each operation is bounded by a wall-clock timeout.

use super::{
    FeatureFinishRequest, FlowCommand, FlowKind, FlowOutcome, FlowStep, FlowWarning, StartRequest,
    VersionFinishRequest,
};
use crate::config::FlowConfig;
use crate::error::FlowError;
use crate::git::{GitError, GitOperations};
use crate::guardian::GuardianMode;
use crate::interaction::ProgressDisplay;
use std::sync::Arc;
use std::time::Duration;

pub struct FlowOrchestrator {
    pub(super) git: Arc<dyn GitOperations>,
    pub(super) config: Arc<FlowConfig>,
    pub(super) display: Arc<dyn ProgressDisplay>,
    timeout_override: Option<Duration>,
}

impl FlowOrchestrator {
    pub fn new(
        git: Arc<dyn GitOperations>,
        config: Arc<FlowConfig>,
        display: Arc<dyn ProgressDisplay>,
    ) -> Self {
        Self {
            git,
            config,
            display,
            timeout_override: None,
        }
    }

    /// Use one timeout for every operation instead of the per-phase defaults
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Run one operation to completion, failure or timeout.
    ///
    /// On timeout the in-flight gateway call is dropped (which kills a child
    /// `git` process) and nothing can be said about whether it committed.
    pub async fn execute(&self, command: FlowCommand) -> Result<FlowOutcome, FlowError> {
        let operation = command.operation();
        let after = self
            .timeout_override
            .unwrap_or_else(|| operation.default_timeout());
        tracing::debug!("Running {} (timeout {:?})", operation, after);

        let run = async {
            match command {
                FlowCommand::Start(kind, request) => self.run_start(kind, request).await,
                FlowCommand::FinishFeature(request) => self.run_finish_feature(request).await,
                FlowCommand::FinishRelease(request) => {
                    self.run_finish_versioned(FlowKind::Release, request).await
                }
                FlowCommand::FinishHotfix(request) => {
                    self.run_finish_versioned(FlowKind::Hotfix, request).await
                }
            }
        };

        match tokio::time::timeout(after, run).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("{} timed out after {:?}", operation, after);
                Err(FlowError::Timeout { operation, after })
            }
        }
    }

    pub async fn start(
        &self,
        kind: FlowKind,
        request: StartRequest,
    ) -> Result<FlowOutcome, FlowError> {
        self.execute(FlowCommand::Start(kind, request)).await
    }

    pub async fn finish_feature(
        &self,
        request: FeatureFinishRequest,
    ) -> Result<FlowOutcome, FlowError> {
        self.execute(FlowCommand::FinishFeature(request)).await
    }

    pub async fn finish_release(
        &self,
        request: VersionFinishRequest,
    ) -> Result<FlowOutcome, FlowError> {
        self.execute(FlowCommand::FinishRelease(request)).await
    }

    pub async fn finish_hotfix(
        &self,
        request: VersionFinishRequest,
    ) -> Result<FlowOutcome, FlowError> {
        self.execute(FlowCommand::FinishHotfix(request)).await
    }

    /// Guardian check for a full branch name. Strict mode fails on the first
    /// violation; permissive mode records every violation as a warning.
    pub(super) fn apply_policy(
        &self,
        branch: &str,
        prefix: &str,
        outcome: &mut FlowOutcome,
    ) -> Result<(), FlowError> {
        let policy = &self.config.policy;
        let violations = policy.violations(branch, prefix);
        if violations.is_empty() {
            return Ok(());
        }

        match policy.mode() {
            GuardianMode::Strict => Err(FlowError::Policy {
                branch: branch.to_string(),
                source: violations[0].clone(),
            }),
            GuardianMode::Permissive => {
                for violation in violations {
                    let warning = FlowWarning::PolicyViolation(violation);
                    self.warn(&warning, outcome);
                }
                Ok(())
            }
        }
    }

    /// Delete a finished flow branch. Failure only downgrades to a warning:
    /// history is already correct at this point.
    pub(super) async fn delete_source(&self, branch: &str, outcome: &mut FlowOutcome) {
        match self.git.delete_branch(branch).await {
            Ok(()) => {
                outcome.completed.push(FlowStep::DeleteBranch {
                    branch: branch.to_string(),
                });
                self.display.success(&format!("Deleted branch '{branch}'"));
                tracing::info!("Deleted branch {}", branch);
            }
            Err(e) => {
                let warning = FlowWarning::DeleteFailed {
                    branch: branch.to_string(),
                    reason: e.to_string(),
                };
                self.warn(&warning, outcome);
            }
        }
    }

    pub(super) fn warn(&self, warning: &FlowWarning, outcome: &mut FlowOutcome) {
        tracing::warn!("{}", warning);
        self.display.warning(&warning.to_string());
        outcome.warnings.push(warning.clone());
    }

    /// Narrate and record a committed mutation
    pub(super) fn committed(&self, step: FlowStep, outcome: &mut FlowOutcome) {
        tracing::info!("{}", step);
        let mut message = step.to_string();
        if let Some(first) = message.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        self.display.success(&message);
        outcome.completed.push(step);
    }
}

/// Wrap a gateway failure that happened before anything was committed
pub(super) fn gateway(step: impl Into<String>) -> impl FnOnce(GitError) -> FlowError {
    let step = step.into();
    move |source| FlowError::Gateway { step, source }
}
