//! Common test utilities: throwaway git repositories

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// A real repository in a temporary directory with `master` and `develop`,
/// one initial commit, and `develop` checked out.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let repo = Self::bare_master();
        repo.git(&["branch", "develop"]);
        repo.git(&["checkout", "-q", "develop"]);
        repo
    }

    /// Only `master`, as after a fresh `git init` and first commit
    pub fn bare_master() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Self { dir };

        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/master"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["config", "tag.gpgsign", "false"]);
        repo.commit_file("README.md", "# test\n", "Initial commit");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git and return trimmed stdout, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        let output = self.try_git(args);
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn try_git(&self, args: &[&str]) -> Output {
        Command::new("git")
            .args(args)
            .current_dir(self.path())
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .unwrap()
    }

    pub fn write_file(&self, name: &str, content: &str) {
        fs::write(self.path().join(name), content).unwrap();
    }

    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        self.write_file(name, content);
        self.git(&["add", name]);
        self.git(&["commit", "-q", "-m", message]);
    }

    pub fn current_branch(&self) -> String {
        self.git(&["branch", "--show-current"])
    }

    pub fn branches(&self) -> Vec<String> {
        lines(&self.git(&["for-each-ref", "--format=%(refname:short)", "refs/heads"]))
    }

    pub fn has_branch(&self, branch: &str) -> bool {
        self.branches().iter().any(|b| b == branch)
    }

    pub fn tags(&self) -> Vec<String> {
        lines(&self.git(&["tag", "--list"]))
    }

    pub fn rev(&self, reference: &str) -> String {
        self.git(&["rev-parse", reference])
    }

    /// Contents of `file` as committed on `branch`
    pub fn show(&self, branch: &str, file: &str) -> Option<String> {
        let output = self.try_git(&["show", &format!("{branch}:{file}")]);
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).to_string())
    }
}

fn lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
