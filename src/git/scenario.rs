//! Scenario-based in-memory repository for orchestration tests
//!
//! [`ScenarioGateway`] models just enough of a repository (branches, tags,
//! HEAD, a clean/dirty tree) to drive flows end to end without spawning git.
//! Failures can be injected per operation and every call is logged so tests
//! can assert exact step ordering.

use super::{GitError, GitReader, GitResult, GitWriter, WorkingTreeStatus};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;

/// An operation that should fail when the orchestrator attempts it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScenarioFailure {
    Checkout(String),
    CreateBranch(String),
    /// Merging `source` while `into` is checked out reports conflicts
    Merge { source: String, into: String },
    DeleteBranch(String),
    CreateTag(String),
    Status,
    BranchLookup(String),
}

#[derive(Debug, Clone)]
struct ScenarioState {
    is_repository: bool,
    branches: BTreeSet<String>,
    tags: BTreeMap<String, String>,
    current: Option<String>,
    status: WorkingTreeStatus,
    failures: HashSet<ScenarioFailure>,
    command_log: Vec<String>,
    mutations: Vec<String>,
}

/// In-memory git gateway
pub struct ScenarioGateway {
    state: Mutex<ScenarioState>,
    latency: Option<Duration>,
}

impl Default for ScenarioGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioGateway {
    /// A clean repository with `master` and `develop`, on `develop`
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ScenarioState {
                is_repository: true,
                branches: ["master", "develop"].iter().map(|b| b.to_string()).collect(),
                tags: BTreeMap::new(),
                current: Some("develop".to_string()),
                status: WorkingTreeStatus {
                    branch: Some("develop".to_string()),
                    ..Default::default()
                },
                failures: HashSet::new(),
                command_log: Vec::new(),
                mutations: Vec::new(),
            }),
            latency: None,
        }
    }

    /// A repository with only the given branch, checked out
    pub fn with_only_branch(mut self, branch: &str) -> Self {
        let state = self.state.get_mut();
        state.branches = [branch.to_string()].into_iter().collect();
        state.current = Some(branch.to_string());
        self
    }

    pub fn with_branch(mut self, branch: &str) -> Self {
        self.state.get_mut().branches.insert(branch.to_string());
        self
    }

    pub fn without_branch(mut self, branch: &str) -> Self {
        self.state.get_mut().branches.remove(branch);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.state
            .get_mut()
            .tags
            .insert(tag.to_string(), String::new());
        self
    }

    /// Check out `branch`, creating it if the scenario does not have it yet
    pub fn on_branch(mut self, branch: &str) -> Self {
        let state = self.state.get_mut();
        state.branches.insert(branch.to_string());
        state.current = Some(branch.to_string());
        self
    }

    pub fn detached(mut self) -> Self {
        self.state.get_mut().current = None;
        self
    }

    pub fn with_dirty_tree(mut self) -> Self {
        let status = &mut self.state.get_mut().status;
        status.changed.push(PathBuf::from("src/lib.rs"));
        status.untracked.push(PathBuf::from("notes.txt"));
        self
    }

    pub fn not_a_repository(mut self) -> Self {
        self.state.get_mut().is_repository = false;
        self
    }

    pub fn failing(mut self, failure: ScenarioFailure) -> Self {
        self.state.get_mut().failures.insert(failure);
        self
    }

    pub fn failing_merge(self, source: &str, into: &str) -> Self {
        self.failing(ScenarioFailure::Merge {
            source: source.to_string(),
            into: into.to_string(),
        })
    }

    /// Delay every gateway call, for exercising operation deadlines
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn current(&self) -> Option<String> {
        self.state.lock().await.current.clone()
    }

    pub async fn branches(&self) -> Vec<String> {
        self.state.lock().await.branches.iter().cloned().collect()
    }

    pub async fn has_branch(&self, branch: &str) -> bool {
        self.state.lock().await.branches.contains(branch)
    }

    pub async fn tags(&self) -> Vec<String> {
        self.state.lock().await.tags.keys().cloned().collect()
    }

    pub async fn tag_message(&self, tag: &str) -> Option<String> {
        self.state.lock().await.tags.get(tag).cloned()
    }

    /// Every attempted call, in git command-line form
    pub async fn command_log(&self) -> Vec<String> {
        self.state.lock().await.command_log.clone()
    }

    /// Writes that actually changed the repository, in order
    pub async fn mutations(&self) -> Vec<String> {
        self.state.lock().await.mutations.clone()
    }

    /// Lock the state after the configured latency and log the call
    async fn enter(&self, command: String) -> tokio::sync::MutexGuard<'_, ScenarioState> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut state = self.state.lock().await;
        state.command_log.push(command);
        state
    }
}

impl ScenarioState {
    fn ensure_repository(&self) -> GitResult<()> {
        if self.is_repository {
            Ok(())
        } else {
            Err(GitError::NotARepository)
        }
    }

    fn fails(&self, failure: &ScenarioFailure) -> bool {
        self.failures.contains(failure)
    }

    fn record(&mut self, mutation: String) {
        self.mutations.push(mutation);
    }
}

fn failed(command: &str, code: i32, output: &str) -> GitError {
    GitError::CommandFailed {
        command: command.to_string(),
        code: Some(code),
        output: output.to_string(),
    }
}

#[async_trait]
impl GitReader for ScenarioGateway {
    async fn is_repository(&self) -> bool {
        self.enter("rev-parse --git-dir".to_string())
            .await
            .is_repository
    }

    async fn current_branch(&self) -> GitResult<String> {
        let state = self.enter("branch --show-current".to_string()).await;
        state.ensure_repository()?;
        state.current.clone().ok_or(GitError::DetachedHead)
    }

    async fn working_tree_status(&self) -> GitResult<WorkingTreeStatus> {
        let command = "status --porcelain=v2 --branch";
        let state = self.enter(command.to_string()).await;
        state.ensure_repository()?;
        if state.fails(&ScenarioFailure::Status) {
            return Err(failed(command, 128, "fatal: unable to read index"));
        }
        Ok(WorkingTreeStatus {
            branch: state.current.clone(),
            ..state.status.clone()
        })
    }

    async fn branch_exists(&self, name: &str) -> GitResult<bool> {
        let command = format!("show-ref --verify --quiet refs/heads/{name}");
        let state = self.enter(command.clone()).await;
        state.ensure_repository()?;
        if state.fails(&ScenarioFailure::BranchLookup(name.to_string())) {
            return Err(failed(&command, 128, "fatal: bad object"));
        }
        Ok(state.branches.contains(name))
    }

    async fn tag_exists(&self, name: &str) -> GitResult<bool> {
        let state = self
            .enter(format!("show-ref --verify --quiet refs/tags/{name}"))
            .await;
        state.ensure_repository()?;
        Ok(state.tags.contains_key(name))
    }

    async fn list_branches(&self, prefix: &str) -> GitResult<Vec<String>> {
        let state = self
            .enter("for-each-ref --format=%(refname) refs/heads".to_string())
            .await;
        state.ensure_repository()?;
        Ok(state
            .branches
            .iter()
            .filter(|b| b.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GitWriter for ScenarioGateway {
    async fn checkout(&self, branch: &str) -> GitResult<()> {
        let command = format!("checkout {branch}");
        let mut state = self.enter(command.clone()).await;
        state.ensure_repository()?;
        if state.fails(&ScenarioFailure::Checkout(branch.to_string())) {
            return Err(failed(
                &command,
                1,
                "error: Your local changes to the following files would be overwritten by checkout",
            ));
        }
        if !state.branches.contains(branch) {
            return Err(failed(
                &command,
                1,
                &format!("error: pathspec '{branch}' did not match any file(s) known to git"),
            ));
        }
        state.current = Some(branch.to_string());
        state.record(command);
        Ok(())
    }

    async fn create_branch(&self, branch: &str) -> GitResult<()> {
        let command = format!("checkout -b {branch}");
        let mut state = self.enter(command.clone()).await;
        state.ensure_repository()?;
        if state.fails(&ScenarioFailure::CreateBranch(branch.to_string()))
            || state.branches.contains(branch)
        {
            return Err(failed(
                &command,
                128,
                &format!("fatal: a branch named '{branch}' already exists"),
            ));
        }
        state.branches.insert(branch.to_string());
        state.current = Some(branch.to_string());
        state.record(command);
        Ok(())
    }

    async fn merge(&self, branch: &str, no_fast_forward: bool) -> GitResult<()> {
        let command = if no_fast_forward {
            format!("merge --no-ff --no-edit {branch}")
        } else {
            format!("merge --no-edit {branch}")
        };
        let mut state = self.enter(command.clone()).await;
        state.ensure_repository()?;
        let into = state.current.clone().ok_or(GitError::DetachedHead)?;
        if !state.branches.contains(branch) {
            return Err(failed(
                &command,
                1,
                &format!("merge: {branch} - not something we can merge"),
            ));
        }
        let conflict = ScenarioFailure::Merge {
            source: branch.to_string(),
            into,
        };
        if state.fails(&conflict) {
            state.status.conflicts.push(PathBuf::from("conflict.txt"));
            return Err(failed(
                &command,
                1,
                "CONFLICT (content): Merge conflict in conflict.txt\n\
                 Automatic merge failed; fix conflicts and then commit the result.",
            ));
        }
        state.record(command);
        Ok(())
    }

    async fn delete_branch(&self, branch: &str) -> GitResult<()> {
        let command = format!("branch -d {branch}");
        let mut state = self.enter(command.clone()).await;
        state.ensure_repository()?;
        if state.fails(&ScenarioFailure::DeleteBranch(branch.to_string())) {
            return Err(failed(
                &command,
                1,
                &format!("error: The branch '{branch}' is not fully merged."),
            ));
        }
        if state.current.as_deref() == Some(branch) {
            return Err(failed(
                &command,
                1,
                &format!("error: Cannot delete branch '{branch}' checked out"),
            ));
        }
        if !state.branches.remove(branch) {
            return Err(failed(
                &command,
                1,
                &format!("error: branch '{branch}' not found."),
            ));
        }
        state.record(command);
        Ok(())
    }

    async fn create_tag(&self, name: &str, message: &str) -> GitResult<()> {
        let command = format!("tag -a {name}");
        let mut state = self.enter(command.clone()).await;
        state.ensure_repository()?;
        if state.tags.contains_key(name) {
            return Err(failed(
                &command,
                128,
                &format!("fatal: tag '{name}' already exists"),
            ));
        }
        if state.fails(&ScenarioFailure::CreateTag(name.to_string())) {
            return Err(failed(&command, 128, "fatal: unable to write tag object"));
        }
        state.tags.insert(name.to_string(), message.to_string());
        state.record(command);
        Ok(())
    }
}
