//! `config` subcommand: print, get and set persisted settings

use super::CommandContext;
use crate::config::{
    get_value, read_config_file, set_value, write_config_file, ConfigError, ConfigFile,
    FlowConfig,
};
use crate::error::FlowError;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub async fn run_config_command(
    ctx: &CommandContext,
    key: Option<String>,
    value: Option<String>,
    global: bool,
) -> Result<()> {
    match (key, value) {
        (None, _) => show_all(ctx, global).await,
        (Some(key), None) => {
            let (file, _) = read_scope(ctx, global).await?;
            println!("{}", get_value(&file, &key).map_err(FlowError::from)?);
            Ok(())
        }
        (Some(key), Some(value)) => {
            let path = target_path(ctx, global)?;
            let current = read_or_default(&path).await?;
            let updated = set_value(&current, &key, &value).map_err(FlowError::from)?;
            FlowConfig::from_file(&updated).map_err(FlowError::from)?;
            write_config_file(&path, &updated)
                .await
                .map_err(FlowError::from)?;
            println!("✅ Set {key} = {value} in {}", path.display());
            Ok(())
        }
    }
}

async fn show_all(ctx: &CommandContext, global: bool) -> Result<()> {
    let (file, origin) = read_scope(ctx, global).await?;
    let yaml = serde_yaml::to_string(&file).map_err(|e| FlowError::from(ConfigError::from(e)))?;
    println!("# {origin}");
    print!("{yaml}");
    Ok(())
}

/// The document a read should see, and a description of where it came from
async fn read_scope(ctx: &CommandContext, global: bool) -> Result<(ConfigFile, String)> {
    if global {
        let path = target_path(ctx, true)?;
        let file = read_or_default(&path).await?;
        return Ok((file, format!("{} (global)", path.display())));
    }
    let (file, source) = ctx.loader().discover().await.map_err(FlowError::from)?;
    Ok((file, source.to_string()))
}

/// File a write goes to: the global file, the `--config` file or the
/// repository's local file
fn target_path(ctx: &CommandContext, global: bool) -> Result<PathBuf> {
    let loader = ctx.loader();
    if global {
        let path = loader
            .global_path()
            .map(Path::to_path_buf)
            .ok_or_else(|| FlowError::from(ConfigError::NoGlobalDir))?;
        return Ok(path);
    }
    Ok(ctx
        .config_path
        .clone()
        .unwrap_or_else(|| loader.local_path()))
}

async fn read_or_default(path: &Path) -> Result<ConfigFile> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Ok(read_config_file(path).await.map_err(FlowError::from)?)
    } else {
        Ok(ConfigFile::default())
    }
}
