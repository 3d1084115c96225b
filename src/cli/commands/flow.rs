//! `feature`, `release` and `hotfix` subcommands

use super::CommandContext;
use crate::cli::args::{FeatureCommands, VersionedCommands};
use crate::flow::{
    FeatureFinishRequest, FlowCommand, FlowKind, FlowOrchestrator, StartRequest,
    VersionFinishRequest,
};
use crate::interaction::{ConsoleDisplay, ProgressDisplay};
use anyhow::Result;
use std::sync::Arc;

/// Translate a feature subcommand into an orchestrator command
pub fn feature_command(command: FeatureCommands) -> FlowCommand {
    match command {
        FeatureCommands::Start { name, from } => {
            let mut request = StartRequest::new(name);
            if let Some(base) = from {
                request = request.from_base(base);
            }
            FlowCommand::Start(FlowKind::Feature, request)
        }
        FeatureCommands::Finish { name, keep } => {
            FlowCommand::FinishFeature(FeatureFinishRequest { name, keep })
        }
    }
}

/// Translate a release or hotfix subcommand into an orchestrator command
pub fn versioned_command(kind: FlowKind, command: VersionedCommands) -> FlowCommand {
    match command {
        VersionedCommands::Start { version } => {
            FlowCommand::Start(kind, StartRequest::new(version))
        }
        VersionedCommands::Finish {
            version,
            keep,
            no_tag,
            message,
        } => {
            let request = VersionFinishRequest {
                version,
                keep,
                no_tag,
                tag_message: message,
            };
            match kind {
                FlowKind::Hotfix => FlowCommand::FinishHotfix(request),
                _ => FlowCommand::FinishRelease(request),
            }
        }
    }
}

/// Run one flow operation against the repository
pub async fn run_flow_command(ctx: &CommandContext, command: FlowCommand) -> Result<()> {
    let loaded = ctx.load_config().await?;
    let git = ctx.repository().await?;

    let display = Arc::new(ConsoleDisplay::new());
    let orchestrator = FlowOrchestrator::new(
        Arc::new(git),
        Arc::new(loaded.config),
        display.clone(),
    );

    let outcome = orchestrator.execute(command).await?;

    display.success(&format!(
        "{} complete: {}",
        capitalize(&outcome.operation.to_string()),
        outcome.branch
    ));
    if !outcome.warnings.is_empty() {
        display.info(&format!(
            "Finished with {} warning(s)",
            outcome.warnings.len()
        ));
    }
    Ok(())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_start_carries_base() {
        let command = feature_command(FeatureCommands::Start {
            name: "login".to_string(),
            from: Some("feature/api".to_string()),
        });
        assert_eq!(
            command,
            FlowCommand::Start(
                FlowKind::Feature,
                StartRequest::new("login").from_base("feature/api")
            )
        );
    }

    #[test]
    fn test_hotfix_finish_maps_flags() {
        let command = versioned_command(
            FlowKind::Hotfix,
            VersionedCommands::Finish {
                version: "1.0.1".to_string(),
                keep: true,
                no_tag: false,
                message: Some("Fix crash".to_string()),
            },
        );
        match command {
            FlowCommand::FinishHotfix(request) => {
                assert!(request.keep);
                assert_eq!(request.tag_message.as_deref(), Some("Fix crash"));
            }
            other => panic!("expected hotfix finish, got {other:?}"),
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("release finish"), "Release finish");
        assert_eq!(capitalize(""), "");
    }
}
