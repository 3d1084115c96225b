use super::*;
use crate::preflight::PreflightResult;

fn conflict() -> GitError {
    GitError::CommandFailed {
        command: "merge --no-ff --no-edit release/1.0.0".to_string(),
        code: Some(1),
        output: "CONFLICT (content): Merge conflict in app.rs".to_string(),
    }
}

#[test]
fn test_partial_success_names_completed_steps() {
    let err = FlowError::PartialSuccess {
        completed: vec![
            FlowStep::Merge {
                source: "release/1.0.0".to_string(),
                target: "master".to_string(),
            },
            FlowStep::Tag {
                name: "v1.0.0".to_string(),
            },
        ],
        failed: "merge of 'release/1.0.0' into 'develop'".to_string(),
        remediation: vec![
            "git checkout develop".to_string(),
            "git merge --no-ff release/1.0.0".to_string(),
        ],
        source: conflict(),
    };

    let message = err.to_string();
    assert!(message.contains("merged 'release/1.0.0' into 'master'"));
    assert!(message.contains("created tag 'v1.0.0'"));
    assert!(err.has_committed_steps());
    assert_eq!(err.remediation().len(), 2);
    assert_eq!(err.code(), ErrorCode::FLOW_PARTIAL_SUCCESS);
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_local_failures_commit_nothing() {
    let errors = [
        FlowError::BranchExists("feature/x".to_string()),
        FlowError::BranchNotFound("feature/x".to_string()),
        FlowError::Precondition(PreflightReport::default()),
        FlowError::TagExists {
            tag: "v1.0.0".to_string(),
            completed: vec![],
        },
        FlowError::MergeFailed {
            source_branch: "feature/x".to_string(),
            target: "develop".to_string(),
            remediation: vec![],
            source: conflict(),
        },
    ];
    for err in errors {
        assert!(!err.has_committed_steps(), "{err}");
    }
}

#[test]
fn test_codes_by_category() {
    let validation = FlowError::Validation {
        what: "version",
        value: "v1".to_string(),
        source: crate::validator::ValidationError::MalformedShape("v1".to_string()),
        suggestion: None,
    };
    assert_eq!(validation.code(), ErrorCode::VALIDATION_INVALID_VERSION);
    assert_eq!(validation.exit_code(), 8);

    let gateway = FlowError::Gateway {
        step: "merge".to_string(),
        source: conflict(),
    };
    assert_eq!(gateway.code(), ErrorCode::GIT_MERGE_CONFLICT);

    let detached = FlowError::Gateway {
        step: "read the current branch".to_string(),
        source: GitError::DetachedHead,
    };
    assert_eq!(detached.code(), ErrorCode::GIT_DETACHED_HEAD);

    let missing_git = FlowError::Gateway {
        step: "read the current branch".to_string(),
        source: GitError::GitNotInstalled,
    };
    assert_eq!(missing_git.code(), ErrorCode::EXEC_COMMAND_NOT_FOUND);
    assert_eq!(missing_git.exit_code(), 7);

    let config = FlowError::from(ConfigError::InvalidTagFormat("v".to_string()));
    assert_eq!(config.code(), ErrorCode::CONFIG_VALIDATION_FAILED);
    assert_eq!(config.exit_code(), 2);
}

#[test]
fn test_precondition_message_counts_failures() {
    let report = PreflightReport::from(vec![
        PreflightResult {
            check_name: "Clean working tree".to_string(),
            passed: false,
            error_detail: None,
            hint: None,
        },
        PreflightResult {
            check_name: "Target branch 'develop' exists".to_string(),
            passed: true,
            error_detail: None,
            hint: None,
        },
    ]);
    let err = FlowError::Precondition(report);
    assert_eq!(err.to_string(), "Pre-flight checks failed (1 of 2 failing)");
}

#[test]
fn test_validation_hint_carries_suggestion() {
    let err = FlowError::Validation {
        what: "branch name",
        value: "My Feature".to_string(),
        source: crate::validator::ValidationError::ForbiddenPattern(" ".to_string()),
        suggestion: Some("my-feature".to_string()),
    };
    assert_eq!(err.hint().as_deref(), Some("Suggested: my-feature"));
}
