use super::{ConfigError, ConfigFile, FlowConfig};
use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Repository-local configuration file name
pub const LOCAL_CONFIG_FILE: &str = ".flowline.yaml";

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Local(PathBuf),
    Global(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Local(path) | ConfigSource::Global(path) => {
                Some(path)
            }
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "{} (--config)", path.display()),
            ConfigSource::Local(path) => write!(f, "{} (local)", path.display()),
            ConfigSource::Global(path) => write!(f, "{} (global)", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Effective configuration for one invocation
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub file: ConfigFile,
    pub config: FlowConfig,
    pub source: ConfigSource,
}

/// Platform configuration file shared by all repositories
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "flowline").map(|dirs| dirs.config_dir().join("config.yaml"))
}

pub async fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn write_config_file(path: &Path, file: &ConfigFile) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(file)?;
    let write_error = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    fs::write(path, content).await.map_err(write_error)?;

    tracing::debug!("Wrote configuration to {}", path.display());
    Ok(())
}

/// Layered configuration discovery: explicit path, then the repository's
/// local file, then the global file, then built-in defaults.
pub struct ConfigLoader {
    repo_dir: PathBuf,
    explicit: Option<PathBuf>,
    global_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            explicit: None,
            global_path: global_config_path(),
        }
    }

    pub fn with_explicit_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn with_global_path(mut self, path: Option<PathBuf>) -> Self {
        self.global_path = path;
        self
    }

    pub fn local_path(&self) -> PathBuf {
        self.repo_dir.join(LOCAL_CONFIG_FILE)
    }

    pub fn global_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Find and parse the configuration document without compiling it
    pub async fn discover(&self) -> Result<(ConfigFile, ConfigSource), ConfigError> {
        if let Some(path) = &self.explicit {
            let file = read_config_file(path).await?;
            return Ok((file, ConfigSource::Explicit(path.clone())));
        }

        let local = self.local_path();
        if fs::try_exists(&local).await.unwrap_or(false) {
            let file = read_config_file(&local).await?;
            return Ok((file, ConfigSource::Local(local)));
        }

        if let Some(global) = &self.global_path {
            if fs::try_exists(global).await.unwrap_or(false) {
                let file = read_config_file(global).await?;
                return Ok((file, ConfigSource::Global(global.clone())));
            }
        }

        Ok((ConfigFile::default(), ConfigSource::Defaults))
    }

    /// Discover, parse and compile. Any failure is fatal to the invocation.
    pub async fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let (file, source) = self.discover().await?;
        let config = FlowConfig::from_file(&file)?;
        tracing::info!("Using configuration from {}", source);
        Ok(LoadedConfig {
            file,
            config,
            source,
        })
    }
}
