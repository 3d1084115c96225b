//! `start`: validate, check policy, then branch off the base

use super::orchestrator::gateway;
use super::{FlowKind, FlowOperation, FlowOrchestrator, FlowOutcome, FlowStep, FlowWarning, StartRequest};
use crate::error::FlowError;
use crate::git::GitError;
use crate::validator::{suggest_branch_name, validate_branch_fragment, validate_version};

/// Validate a start identifier: a branch fragment for features, a strict
/// version for releases and hotfixes. Touches nothing outside the process.
pub fn validate_identifier(kind: FlowKind, identifier: &str) -> Result<(), FlowError> {
    if kind.is_versioned() {
        return validate_version(identifier).map_err(|source| FlowError::Validation {
            what: "version",
            value: identifier.to_string(),
            source,
            suggestion: None,
        });
    }

    validate_branch_fragment(identifier).map_err(|source| {
        let suggestion = suggest_branch_name(identifier);
        let usable = !suggestion.is_empty()
            && suggestion != identifier
            && validate_branch_fragment(&suggestion).is_ok();
        FlowError::Validation {
            what: "branch name",
            value: identifier.to_string(),
            source,
            suggestion: usable.then_some(suggestion),
        }
    })
}

impl FlowOrchestrator {
    pub(super) async fn run_start(
        &self,
        kind: FlowKind,
        request: StartRequest,
    ) -> Result<FlowOutcome, FlowError> {
        let identifier = request.identifier.as_str();
        validate_identifier(kind, identifier)?;

        let prefix = self.config.prefix(kind);
        let branch = self.config.branch_name(kind, identifier);
        let mut outcome = FlowOutcome::new(FlowOperation::start(kind), &branch);
        self.apply_policy(&branch, prefix, &mut outcome)?;

        let default_base = self.config.base_branch(kind);
        let base = match request.base_override {
            Some(base) if kind == FlowKind::Feature => base,
            Some(base) => {
                self.display.warning(&format!(
                    "Ignoring --from '{base}': {kind} branches always start from '{default_base}'"
                ));
                default_base.to_string()
            }
            None => default_base.to_string(),
        };

        let exists = self
            .git
            .branch_exists(&branch)
            .await
            .map_err(gateway(format!("check whether '{branch}' exists")))?;
        if exists {
            return Err(FlowError::BranchExists(branch));
        }

        let current = match self.git.current_branch().await {
            Ok(current) => Some(current),
            Err(GitError::DetachedHead) => None,
            Err(e) => return Err(gateway("read the current branch")(e)),
        };
        if current.as_deref() != Some(base.as_str()) {
            let advisory = FlowWarning::CheckoutAdvisory {
                current,
                base: base.clone(),
            };
            self.warn(&advisory, &mut outcome);
        }

        self.git
            .checkout(&base)
            .await
            .map_err(gateway(format!("check out '{base}'")))?;
        self.git
            .create_branch(&branch)
            .await
            .map_err(gateway(format!("create branch '{branch}'")))?;

        self.committed(
            FlowStep::CreateBranch {
                branch: branch.clone(),
            },
            &mut outcome,
        );
        self.display
            .info(&format!("Switched to branch '{branch}' (from '{base}')"));

        Ok(outcome)
    }
}
