//! Help text and verbosity utilities

use crate::cli::args::Cli;
use clap::CommandFactory;

/// Generate the top-level help text
pub fn generate_help() -> String {
    Cli::command().render_help().to_string()
}

/// Log filter for a `-v` count; `RUST_LOG` takes precedence when set
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
