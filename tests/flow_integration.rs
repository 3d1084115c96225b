//! End-to-end flows against real git repositories

mod common;

use common::TestRepo;
use flowline::config::FlowConfig;
use flowline::error::FlowError;
use flowline::flow::{
    FeatureFinishRequest, FlowKind, FlowOrchestrator, FlowStep, StartRequest,
    VersionFinishRequest,
};
use flowline::git::{GitError, GitReader};
use flowline::interaction::RecordingDisplay;
use flowline::subprocess::SubprocessManager;
use std::sync::Arc;

fn orchestrator(repo: &TestRepo) -> (FlowOrchestrator, RecordingDisplay) {
    let git = SubprocessManager::production().git(repo.path());
    let display = RecordingDisplay::new();
    let orchestrator = FlowOrchestrator::new(
        Arc::new(git),
        Arc::new(FlowConfig::default()),
        Arc::new(display.clone()),
    );
    (orchestrator, display)
}

fn feature_finish(name: &str) -> FeatureFinishRequest {
    FeatureFinishRequest {
        name: Some(name.to_string()),
        keep: false,
    }
}

#[tokio::test]
async fn test_feature_cycle() {
    let repo = TestRepo::new();
    let (flow, _) = orchestrator(&repo);

    flow.start(FlowKind::Feature, StartRequest::new("user-auth"))
        .await
        .unwrap();
    assert_eq!(repo.current_branch(), "feature/user-auth");

    repo.commit_file("auth.rs", "pub fn login() {}\n", "Add login");
    let outcome = flow.finish_feature(feature_finish("user-auth")).await.unwrap();

    assert!(outcome.branch_deleted());
    assert_eq!(repo.current_branch(), "develop");
    assert!(!repo.has_branch("feature/user-auth"));
    assert_eq!(
        repo.show("develop", "auth.rs").as_deref(),
        Some("pub fn login() {}\n")
    );
    // --no-ff always records a merge commit
    let merges = repo.git(&["rev-list", "--merges", "--count", "develop"]);
    assert_eq!(merges, "1");
    assert_eq!(repo.show("master", "auth.rs"), None);
}

#[tokio::test]
async fn test_release_cycle_tags_mainline() {
    let repo = TestRepo::new();
    let (flow, _) = orchestrator(&repo);

    flow.start(FlowKind::Release, StartRequest::new("1.0.0"))
        .await
        .unwrap();
    repo.commit_file("VERSION", "1.0.0\n", "Bump version");

    let outcome = flow
        .finish_release(VersionFinishRequest::new("1.0.0"))
        .await
        .unwrap();

    assert_eq!(outcome.tag(), Some("v1.0.0"));
    assert_eq!(repo.tags(), vec!["v1.0.0"]);
    assert_eq!(repo.show("master", "VERSION").as_deref(), Some("1.0.0\n"));
    assert_eq!(repo.show("develop", "VERSION").as_deref(), Some("1.0.0\n"));
    assert_eq!(repo.rev("v1.0.0^{commit}"), repo.rev("master"));
    assert_eq!(
        repo.git(&[
            "for-each-ref",
            "--format=%(contents:subject)",
            "refs/tags/v1.0.0"
        ]),
        "Release version 1.0.0"
    );
    assert!(!repo.has_branch("release/1.0.0"));
}

#[tokio::test]
async fn test_hotfix_cycle() {
    let repo = TestRepo::new();
    let (flow, _) = orchestrator(&repo);

    flow.start(FlowKind::Hotfix, StartRequest::new("1.0.1"))
        .await
        .unwrap();
    repo.commit_file("fix.txt", "patched\n", "Fix crash");

    flow.finish_hotfix(VersionFinishRequest {
        tag_message: Some("Fix crash on login".to_string()),
        ..VersionFinishRequest::new("1.0.1")
    })
    .await
    .unwrap();

    assert_eq!(repo.show("master", "fix.txt").as_deref(), Some("patched\n"));
    assert_eq!(repo.show("develop", "fix.txt").as_deref(), Some("patched\n"));
    assert_eq!(
        repo.git(&[
            "for-each-ref",
            "--format=%(contents:subject)",
            "refs/tags/v1.0.1"
        ]),
        "Fix crash on login"
    );
}

#[tokio::test]
async fn test_develop_conflict_reports_partial_success() {
    let repo = TestRepo::new();
    let (flow, _) = orchestrator(&repo);

    flow.start(FlowKind::Release, StartRequest::new("1.1.0"))
        .await
        .unwrap();
    repo.commit_file("shared.txt", "from release\n", "Release change");
    repo.git(&["checkout", "-q", "develop"]);
    repo.commit_file("shared.txt", "from develop\n", "Develop change");

    let err = flow
        .finish_release(VersionFinishRequest::new("1.1.0"))
        .await
        .unwrap_err();

    match &err {
        FlowError::PartialSuccess {
            completed,
            remediation,
            source,
            ..
        } => {
            assert_eq!(
                completed,
                &vec![
                    FlowStep::Merge {
                        source: "release/1.1.0".to_string(),
                        target: "master".to_string(),
                    },
                    FlowStep::Tag {
                        name: "v1.1.0".to_string()
                    },
                ]
            );
            assert!(source.is_merge_conflict(), "{source}");
            assert!(remediation.iter().any(|step| step.contains("develop")));
            assert!(remediation.iter().any(|step| step.contains("release/1.1.0")));
        }
        other => panic!("expected partial success, got {other:?}"),
    }

    assert_eq!(repo.tags(), vec!["v1.1.0"]);
    assert_eq!(
        repo.show("master", "shared.txt").as_deref(),
        Some("from release\n")
    );
    assert!(repo.has_branch("release/1.1.0"));
}

#[tokio::test]
async fn test_dirty_tree_blocks_finish() {
    let repo = TestRepo::new();
    let (flow, display) = orchestrator(&repo);

    flow.start(FlowKind::Feature, StartRequest::new("wip"))
        .await
        .unwrap();
    repo.write_file("scratch.txt", "untracked\n");
    let develop_before = repo.rev("develop");

    let err = flow.finish_feature(feature_finish("wip")).await.unwrap_err();

    assert!(matches!(err, FlowError::Precondition(_)));
    assert_eq!(repo.rev("develop"), develop_before);
    assert_eq!(repo.current_branch(), "feature/wip");
    assert!(display.contains("1 uncommitted change(s)"));
}

#[tokio::test]
async fn test_duplicate_tag_leaves_repository_untouched() {
    let repo = TestRepo::new();
    let (flow, _) = orchestrator(&repo);

    repo.git(&["tag", "-a", "v2.0.0", "-m", "Existing"]);
    flow.start(FlowKind::Release, StartRequest::new("2.0.0"))
        .await
        .unwrap();
    let master_before = repo.rev("master");

    let err = flow
        .finish_release(VersionFinishRequest::new("2.0.0"))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::TagExists { .. }));
    assert!(!err.has_committed_steps());
    assert_eq!(repo.rev("master"), master_before);
    assert_eq!(repo.current_branch(), "release/2.0.0");
}

#[tokio::test]
async fn test_gateway_reads_real_repository() {
    let repo = TestRepo::new();
    let git = SubprocessManager::production().git(repo.path());

    assert!(git.is_repository().await);
    assert_eq!(git.current_branch().await.unwrap(), "develop");
    assert!(git.branch_exists("master").await.unwrap());
    assert!(!git.tag_exists("v9.9.9").await.unwrap());

    repo.write_file("README.md", "changed\n");
    repo.write_file("new.txt", "new\n");
    let status = git.working_tree_status().await.unwrap();
    assert_eq!(status.dirty_count(), 2);

    let head = repo.rev("HEAD");
    repo.git(&["checkout", "-q", "--detach", &head]);
    assert_eq!(git.current_branch().await, Err(GitError::DetachedHead));
}

#[tokio::test]
async fn test_gateway_outside_repository() {
    let dir = tempfile::TempDir::new().unwrap();
    let git = SubprocessManager::production().git(dir.path());
    assert!(!git.is_repository().await);
}
