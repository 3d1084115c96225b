//! CLI argument structures

use crate::flow::FlowKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Disciplined git-flow branch lifecycle
#[derive(Parser)]
#[command(name = "flow")]
#[command(about = "flow - Start and finish feature, release and hotfix branches safely", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file to use instead of discovery
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Repository path (defaults to current directory)
    #[arg(short = 'C', long = "repo", global = true, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Feature branches: branched from and merged back into develop
    Feature {
        #[command(subcommand)]
        command: FeatureCommands,
    },

    /// Release branches: merged into mainline and develop, tagged
    Release {
        #[command(subcommand)]
        command: VersionedCommands,
    },

    /// Hotfix branches: branched from mainline, merged into both, tagged
    Hotfix {
        #[command(subcommand)]
        command: VersionedCommands,
    },

    /// Prepare the repository: detect mainline, create develop, write .flowline.yaml
    Init {
        /// Start from built-in defaults instead of the discovered configuration
        #[arg(long)]
        defaults: bool,

        /// Overwrite an existing .flowline.yaml
        #[arg(short, long)]
        force: bool,
    },

    /// List active flow branches
    List {
        /// Only branches of this kind (feature, release or hotfix)
        kind: Option<FlowKind>,
    },

    /// Show the current branch's role and the active flow branches
    Status,

    /// Show or change configuration
    Config {
        /// Dotted key such as branches.mainline; omit to print everything
        key: Option<String>,

        /// New value; comma-separated for lists
        value: Option<String>,

        /// Read and write the global configuration file
        #[arg(long)]
        global: bool,
    },
}

#[derive(Subcommand)]
pub enum FeatureCommands {
    /// Create feature/<name> from develop
    Start {
        /// Kebab-case name, e.g. user-auth
        name: String,

        /// Branch to start from instead of develop
        #[arg(long, value_name = "BRANCH")]
        from: Option<String>,
    },

    /// Merge feature/<name> into develop
    Finish {
        /// Feature name; detected from the current branch when omitted
        name: Option<String>,

        /// Keep the branch after merging
        #[arg(short, long)]
        keep: bool,
    },
}

#[derive(Subcommand)]
pub enum VersionedCommands {
    /// Create the branch for a version
    Start {
        /// Strict MAJOR.MINOR.PATCH version, e.g. 1.2.0
        version: String,
    },

    /// Merge into mainline, tag, merge into develop, delete
    Finish {
        /// Strict MAJOR.MINOR.PATCH version
        version: String,

        /// Keep the branch after merging
        #[arg(short, long)]
        keep: bool,

        /// Do not create a tag
        #[arg(long)]
        no_tag: bool,

        /// Tag annotation (defaults to "Release version X")
        #[arg(short = 'm', long, value_name = "MESSAGE", conflicts_with = "no_tag")]
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_release_finish_flags() {
        let cli = Cli::try_parse_from([
            "flow", "-vv", "release", "finish", "1.2.0", "--keep", "-m", "Spring release",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Release {
                command:
                    VersionedCommands::Finish {
                        version,
                        keep,
                        no_tag,
                        message,
                    },
            }) => {
                assert_eq!(version, "1.2.0");
                assert!(keep);
                assert!(!no_tag);
                assert_eq!(message.as_deref(), Some("Spring release"));
            }
            _ => panic!("expected release finish"),
        }
    }

    #[test]
    fn test_message_conflicts_with_no_tag() {
        let result = Cli::try_parse_from([
            "flow", "hotfix", "finish", "1.0.1", "--no-tag", "-m", "msg",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_kind_is_parsed() {
        let cli = Cli::try_parse_from(["flow", "list", "hotfix"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::List {
                kind: Some(FlowKind::Hotfix)
            })
        ));
        assert!(Cli::try_parse_from(["flow", "list", "bugfix"]).is_err());
    }

    #[test]
    fn test_global_repo_flag() {
        let cli = Cli::try_parse_from(["flow", "status", "-C", "/tmp/repo"]).unwrap();
        assert_eq!(cli.repo, Some(PathBuf::from("/tmp/repo")));
    }
}
