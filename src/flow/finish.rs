//! `finish`: merge a flow branch back, tag versions, clean up
//!
//! Release and hotfix finishes update mainline before develop, so a tag
//! always points at code that is already on mainline, and delete the source
//! branch last, so any earlier step can be retried. Once mainline has been
//! merged every failure is reported as a partial success naming exactly what
//! was committed; nothing is retried or rolled back automatically.

use super::orchestrator::gateway;
use super::{
    FeatureFinishRequest, FlowKind, FlowOperation, FlowOrchestrator, FlowOutcome, FlowStep,
    FlowWarning, VersionFinishRequest,
};
use crate::error::FlowError;
use crate::git::GitError;
use crate::preflight::PreflightChecker;
use crate::validator::validate_version;

/// Default annotation for a version tag, shared by releases and hotfixes
pub fn default_tag_message(version: &str) -> String {
    format!("Release version {version}")
}

/// Names the finish of one versioned flow needs for narration and remediation
struct VersionedFinish {
    kind: FlowKind,
    version: String,
    branch: String,
    mainline: String,
    develop: String,
    tag: Option<(String, String)>,
    delete: bool,
}

/// Where a versioned finish stopped after mainline was merged
enum Pending {
    Tag,
    Develop,
}

impl VersionedFinish {
    /// Manual commands that complete the finish from `pending` onwards.
    ///
    /// `develop_exists` is `None` when that could not be determined; the
    /// develop merge is then kept in the sequence.
    fn remediation(&self, pending: Pending, develop_exists: Option<bool>) -> Vec<String> {
        let mut steps = Vec::new();
        if let (Pending::Tag, Some((tag, message))) = (&pending, &self.tag) {
            steps.push(format!("git checkout {}", self.mainline));
            steps.push(format!("git tag -a {tag} -m {message:?}"));
        }
        if develop_exists == Some(false) {
            steps.push(format!(
                "Skip the develop merge: '{}' does not exist",
                self.develop
            ));
        } else {
            steps.push(format!("git checkout {}", self.develop));
            steps.push(format!("git merge --no-ff {}", self.branch));
            steps.push("Resolve conflicts and commit".to_string());
        }
        if self.delete {
            steps.push(format!("git branch -d {}", self.branch));
        }
        steps
    }
}

impl FlowOrchestrator {
    pub(super) async fn run_finish_feature(
        &self,
        request: FeatureFinishRequest,
    ) -> Result<FlowOutcome, FlowError> {
        let prefix = self.config.feature_prefix.clone();
        let name = match request.name {
            Some(name) => name,
            None => self.detect_flow_name(&prefix).await?,
        };
        let branch = format!("{prefix}{name}");
        let target = self.config.develop_branch.clone();
        let mut outcome = FlowOutcome::new(FlowOperation::FeatureFinish, &branch);

        self.preflight(&target).await?;
        self.require_branch(&branch).await?;

        self.git
            .checkout(&target)
            .await
            .map_err(gateway(format!("check out '{target}'")))?;
        self.display
            .progress(&format!("Merging '{branch}' into '{target}'"));
        if let Err(source) = self.git.merge(&branch, true).await {
            return Err(FlowError::MergeFailed {
                remediation: vec![
                    format!("Resolve the conflicts on '{target}' and commit (or `git merge --abort`)"),
                    format!("flow feature finish {name}"),
                ],
                source_branch: branch,
                target,
                source,
            });
        }
        self.committed(
            FlowStep::Merge {
                source: branch.clone(),
                target,
            },
            &mut outcome,
        );

        if self.config.delete_after_finish && !request.keep {
            self.delete_source(&branch, &mut outcome).await;
        }

        Ok(outcome)
    }

    pub(super) async fn run_finish_versioned(
        &self,
        kind: FlowKind,
        request: VersionFinishRequest,
    ) -> Result<FlowOutcome, FlowError> {
        let version = request.version;
        validate_version(&version).map_err(|source| FlowError::Validation {
            what: "version",
            value: version.clone(),
            source,
            suggestion: None,
        })?;

        let finish = VersionedFinish {
            kind,
            branch: self.config.branch_name(kind, &version),
            mainline: self.config.mainline_branch.clone(),
            develop: self.config.develop_branch.clone(),
            tag: (!request.no_tag).then(|| {
                let message = request
                    .tag_message
                    .clone()
                    .unwrap_or_else(|| default_tag_message(&version));
                (self.config.tag_name(&version), message)
            }),
            delete: self.config.delete_after_finish && !request.keep,
            version,
        };
        let mut outcome = FlowOutcome::new(FlowOperation::finish(kind), &finish.branch);

        self.require_branch(&finish.branch).await?;
        self.preflight(&finish.mainline).await?;
        // A duplicate tag would only be discovered after mainline moved;
        // catch it while nothing has been committed.
        if let Some((tag, _)) = &finish.tag {
            self.ensure_tag_free(tag, &outcome, &finish).await?;
        }

        // Mainline merge: a failure here leaves nothing committed
        self.git
            .checkout(&finish.mainline)
            .await
            .map_err(gateway(format!("check out '{}'", finish.mainline)))?;
        self.display.progress(&format!(
            "Merging '{}' into '{}'",
            finish.branch, finish.mainline
        ));
        if let Err(source) = self.git.merge(&finish.branch, true).await {
            return Err(FlowError::MergeFailed {
                source_branch: finish.branch.clone(),
                target: finish.mainline.clone(),
                remediation: vec![
                    format!(
                        "Resolve the conflicts on '{}' and commit (or `git merge --abort`)",
                        finish.mainline
                    ),
                    format!("flow {} finish {}", finish.kind, finish.version),
                ],
                source,
            });
        }
        self.committed(
            FlowStep::Merge {
                source: finish.branch.clone(),
                target: finish.mainline.clone(),
            },
            &mut outcome,
        );

        // Tag
        if let Some((tag, message)) = &finish.tag {
            self.ensure_tag_free(tag, &outcome, &finish).await?;
            if let Err(source) = self.git.create_tag(tag, message).await {
                return Err(self.partial(
                    &outcome,
                    format!("creating tag '{tag}'"),
                    self.tag_remediation(&finish).await,
                    source,
                ));
            }
            self.committed(FlowStep::Tag { name: tag.clone() }, &mut outcome);
        }

        // Develop merge; a repository without develop skips it
        let develop_exists = match self.git.branch_exists(&finish.develop).await {
            Ok(exists) => exists,
            Err(source) => {
                return Err(self.partial(
                    &outcome,
                    format!("checking whether '{}' exists", finish.develop),
                    finish.remediation(Pending::Develop, None),
                    source,
                ))
            }
        };
        if develop_exists {
            if let Err(source) = self.git.checkout(&finish.develop).await {
                return Err(self.partial(
                    &outcome,
                    format!("checking out '{}'", finish.develop),
                    finish.remediation(Pending::Develop, Some(true)),
                    source,
                ));
            }
            self.display.progress(&format!(
                "Merging '{}' into '{}'",
                finish.branch, finish.develop
            ));
            if let Err(source) = self.git.merge(&finish.branch, true).await {
                return Err(self.partial(
                    &outcome,
                    format!("merging '{}' into '{}'", finish.branch, finish.develop),
                    finish.remediation(Pending::Develop, Some(true)),
                    source,
                ));
            }
            self.committed(
                FlowStep::Merge {
                    source: finish.branch.clone(),
                    target: finish.develop.clone(),
                },
                &mut outcome,
            );
        } else {
            let warning = FlowWarning::DevelopMissing {
                branch: finish.develop.clone(),
            };
            self.warn(&warning, &mut outcome);
        }

        if finish.delete {
            self.delete_source(&finish.branch, &mut outcome).await;
        }

        Ok(outcome)
    }

    /// Feature name from the current branch, which must carry `prefix`
    async fn detect_flow_name(&self, prefix: &str) -> Result<String, FlowError> {
        let current = match self.git.current_branch().await {
            Ok(current) => current,
            Err(GitError::DetachedHead) => {
                return Err(FlowError::NotOnFlowBranch {
                    current: "detached HEAD".to_string(),
                    prefix: prefix.to_string(),
                })
            }
            Err(e) => return Err(gateway("read the current branch")(e)),
        };

        match current.strip_prefix(prefix) {
            Some(name) if !name.is_empty() => {
                self.display
                    .info(&format!("Auto-detected feature: {name}"));
                Ok(name.to_string())
            }
            _ => Err(FlowError::NotOnFlowBranch {
                current,
                prefix: prefix.to_string(),
            }),
        }
    }

    /// Run pre-flight checks against `target`; the full report is shown
    /// either way and any failure blocks the operation.
    async fn preflight(&self, target: &str) -> Result<(), FlowError> {
        let report = PreflightChecker::new(self.git.as_ref())
            .with_target_branch(target)
            .run_all()
            .await;
        self.display.block(&report.to_string());
        if report.has_failure() {
            return Err(FlowError::Precondition(report));
        }
        Ok(())
    }

    async fn require_branch(&self, branch: &str) -> Result<(), FlowError> {
        let exists = self
            .git
            .branch_exists(branch)
            .await
            .map_err(gateway(format!("check whether '{branch}' exists")))?;
        if !exists {
            return Err(FlowError::BranchNotFound(branch.to_string()));
        }
        Ok(())
    }

    async fn ensure_tag_free(
        &self,
        tag: &str,
        outcome: &FlowOutcome,
        finish: &VersionedFinish,
    ) -> Result<(), FlowError> {
        match self.git.tag_exists(tag).await {
            Ok(false) => Ok(()),
            Ok(true) => Err(FlowError::TagExists {
                tag: tag.to_string(),
                completed: outcome.completed.clone(),
            }),
            Err(source) if outcome.completed.is_empty() => {
                Err(gateway(format!("check whether tag '{tag}' exists"))(source))
            }
            Err(source) => Err(self.partial(
                outcome,
                format!("checking whether tag '{tag}' exists"),
                self.tag_remediation(finish).await,
                source,
            )),
        }
    }

    /// Remediation for a finish that stopped before tagging; the develop
    /// steps follow whether that branch is actually there.
    async fn tag_remediation(&self, finish: &VersionedFinish) -> Vec<String> {
        let develop_exists = self.git.branch_exists(&finish.develop).await.ok();
        finish.remediation(Pending::Tag, develop_exists)
    }

    fn partial(
        &self,
        outcome: &FlowOutcome,
        failed: String,
        remediation: Vec<String>,
        source: GitError,
    ) -> FlowError {
        tracing::error!(
            "Partial success: {} failed after {} committed step(s): {}",
            failed,
            outcome.completed.len(),
            source
        );
        FlowError::PartialSuccess {
            completed: outcome.completed.clone(),
            failed,
            remediation,
            source,
        }
    }
}
