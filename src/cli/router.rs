//! Command routing and execution

use crate::cli::args::{Cli, Commands};
use crate::cli::commands::flow::{feature_command, versioned_command};
use crate::cli::commands::*;
use crate::flow::FlowKind;
use anyhow::{Context, Result};

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(cli: Cli) -> Result<()> {
    let repo_dir = match cli.repo {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let ctx = CommandContext::new(repo_dir, cli.config);

    match cli.command {
        Some(Commands::Feature { command }) => {
            run_flow_command(&ctx, feature_command(command)).await
        }
        Some(Commands::Release { command }) => {
            run_flow_command(&ctx, versioned_command(FlowKind::Release, command)).await
        }
        Some(Commands::Hotfix { command }) => {
            run_flow_command(&ctx, versioned_command(FlowKind::Hotfix, command)).await
        }
        Some(Commands::Init { defaults, force }) => run_init_command(&ctx, defaults, force).await,
        Some(Commands::List { kind }) => run_list_command(&ctx, kind).await,
        Some(Commands::Status) => run_status_command(&ctx).await,
        Some(Commands::Config { key, value, global }) => {
            run_config_command(&ctx, key, value, global).await
        }
        None => {
            // No command provided, show help
            use crate::cli::help::generate_help;
            println!("{}", generate_help());
            Ok(())
        }
    }
}
