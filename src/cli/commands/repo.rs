//! Repository-level commands: `init`, `list` and `status`

use super::CommandContext;
use crate::config::{ConfigFile, FlowConfig};
use crate::error::FlowError;
use crate::flow::{collect_status, initialize, list_flow_branches, FlowKind, InitOptions};
use crate::interaction::{ConsoleDisplay, ProgressDisplay};
use anyhow::Result;

pub async fn run_init_command(ctx: &CommandContext, defaults: bool, force: bool) -> Result<()> {
    let display = ConsoleDisplay::new();

    let base = if defaults {
        ConfigFile::default()
    } else {
        ctx.loader().discover().await.map_err(FlowError::from)?.0
    };
    // Never write a document that would fail to load
    FlowConfig::from_file(&base).map_err(FlowError::from)?;

    let git = ctx.git();
    let report = initialize(&git, &ctx.repo_dir, base, InitOptions { force }).await?;

    display.info(&format!("Mainline branch: {}", report.mainline));
    if report.created_develop {
        display.success(&format!(
            "Created '{}' from '{}'",
            report.develop, report.mainline
        ));
    } else {
        display.info(&format!("Develop branch: {}", report.develop));
    }
    display.success(&format!(
        "Wrote configuration to {}",
        report.config_path.display()
    ));
    // An untracked config file would fail the clean-tree check on finish
    display.info("Commit .flowline.yaml before finishing any branch");
    Ok(())
}

pub async fn run_list_command(ctx: &CommandContext, kind: Option<FlowKind>) -> Result<()> {
    let loaded = ctx.load_config().await?;
    let git = ctx.repository().await?;

    let listing = list_flow_branches(&git, &loaded.config, kind).await?;
    print!("{}", format_listing(&listing));
    Ok(())
}

pub async fn run_status_command(ctx: &CommandContext) -> Result<()> {
    let loaded = ctx.load_config().await?;
    let git = ctx.repository().await?;

    let status = collect_status(&git, &loaded.config).await?;
    print!("{status}");
    println!("Configuration: {}", loaded.source);
    Ok(())
}

fn format_listing(listing: &[(FlowKind, Vec<String>)]) -> String {
    let mut out = String::new();
    for (kind, branches) in listing {
        if branches.is_empty() {
            out.push_str(&format!("No active {kind} branches\n"));
            continue;
        }
        out.push_str(&format!("{} branches:\n", capitalized(*kind)));
        for branch in branches {
            out.push_str(&format!("  {branch}\n"));
        }
    }
    out
}

fn capitalized(kind: FlowKind) -> &'static str {
    match kind {
        FlowKind::Feature => "Feature",
        FlowKind::Release => "Release",
        FlowKind::Hotfix => "Hotfix",
    }
}
