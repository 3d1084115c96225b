//! `init`: prepare a repository for the flow model

use crate::config::{write_config_file, ConfigError, ConfigFile, LOCAL_CONFIG_FILE};
use crate::error::FlowError;
use crate::git::{GitReader, GitWriter};
use std::path::{Path, PathBuf};

/// Mainline names tried when the configured one does not exist
const MAINLINE_CANDIDATES: &[&str] = &["master", "main"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// Overwrite an existing `.flowline.yaml`
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub mainline: String,
    pub develop: String,
    pub created_develop: bool,
    pub config_path: PathBuf,
}

/// Detect the mainline, create develop from it if needed and write the
/// local configuration file.
///
/// An existing configuration file without `force` is rejected before the
/// repository is touched.
pub async fn initialize<G>(
    git: &G,
    repo_dir: &Path,
    mut file: ConfigFile,
    options: InitOptions,
) -> Result<InitReport, FlowError>
where
    G: GitReader + GitWriter + ?Sized,
{
    if !git.is_repository().await {
        return Err(FlowError::NotARepository(repo_dir.to_path_buf()));
    }

    let config_path = repo_dir.join(LOCAL_CONFIG_FILE);
    if !options.force && tokio::fs::try_exists(&config_path).await.unwrap_or(false) {
        return Err(ConfigError::AlreadyExists(config_path).into());
    }

    let mainline = detect_mainline(git, &file.branches.mainline).await?;
    if mainline != file.branches.mainline {
        tracing::info!(
            "Configured mainline '{}' not found, using '{}'",
            file.branches.mainline,
            mainline
        );
        file.branches.mainline = mainline.clone();
    }
    let develop = file.branches.develop.clone();

    let created_develop = !exists(git, &develop).await?;
    if created_develop {
        git.checkout(&mainline)
            .await
            .map_err(|source| FlowError::Gateway {
                step: format!("check out '{mainline}'"),
                source,
            })?;
        git.create_branch(&develop)
            .await
            .map_err(|source| FlowError::Gateway {
                step: format!("create branch '{develop}'"),
                source,
            })?;
        tracing::info!("Created {} from {}", develop, mainline);
    }

    write_config_file(&config_path, &file).await?;

    Ok(InitReport {
        mainline,
        develop,
        created_develop,
        config_path,
    })
}

async fn detect_mainline<G>(git: &G, configured: &str) -> Result<String, FlowError>
where
    G: GitReader + ?Sized,
{
    if exists(git, configured).await? {
        return Ok(configured.to_string());
    }
    for candidate in MAINLINE_CANDIDATES {
        if exists(git, candidate).await? {
            return Ok((*candidate).to_string());
        }
    }
    Err(FlowError::BranchNotFound(configured.to_string()))
}

async fn exists<G>(git: &G, branch: &str) -> Result<bool, FlowError>
where
    G: GitReader + ?Sized,
{
    git.branch_exists(branch)
        .await
        .map_err(|source| FlowError::Gateway {
            step: format!("check whether '{branch}' exists"),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::read_config_file;
    use crate::git::ScenarioGateway;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_develop_and_writes_config() {
        let dir = TempDir::new().unwrap();
        let git = ScenarioGateway::new().with_only_branch("master");

        let report = initialize(&git, dir.path(), ConfigFile::default(), InitOptions::default())
            .await
            .unwrap();

        assert!(report.created_develop);
        assert_eq!(report.mainline, "master");
        assert_eq!(git.mutations().await, vec!["checkout master", "checkout -b develop"]);

        let written = read_config_file(&report.config_path).await.unwrap();
        assert_eq!(written, ConfigFile::default());
    }

    #[tokio::test]
    async fn test_detects_main_when_master_is_absent() {
        let dir = TempDir::new().unwrap();
        let git = ScenarioGateway::new()
            .with_only_branch("main")
            .with_branch("develop");

        let report = initialize(&git, dir.path(), ConfigFile::default(), InitOptions::default())
            .await
            .unwrap();

        assert_eq!(report.mainline, "main");
        assert!(!report.created_develop);
        assert!(git.mutations().await.is_empty());

        let written = read_config_file(&report.config_path).await.unwrap();
        assert_eq!(written.branches.mainline, "main");
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(LOCAL_CONFIG_FILE), "branches:\n  develop: dev\n").unwrap();
        let git = ScenarioGateway::new();

        let err = initialize(&git, dir.path(), ConfigFile::default(), InitOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Config(ConfigError::AlreadyExists(_))));

        initialize(&git, dir.path(), ConfigFile::default(), InitOptions { force: true })
            .await
            .unwrap();
        let written = read_config_file(&dir.path().join(LOCAL_CONFIG_FILE))
            .await
            .unwrap();
        assert_eq!(written.branches.develop, "develop");
    }

    #[tokio::test]
    async fn test_outside_repository() {
        let dir = TempDir::new().unwrap();
        let git = ScenarioGateway::new().not_a_repository();

        let err = initialize(&git, dir.path(), ConfigFile::default(), InitOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::NotARepository(_)));
        assert!(!dir.path().join(LOCAL_CONFIG_FILE).exists());
    }

    #[tokio::test]
    async fn test_no_mainline_candidate() {
        let dir = TempDir::new().unwrap();
        let git = ScenarioGateway::new().with_only_branch("trunk");

        let err = initialize(&git, dir.path(), ConfigFile::default(), InitOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::BranchNotFound(ref b) if b == "master"));
    }
}
