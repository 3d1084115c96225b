//! CLI command handlers
//!
//! This module contains all CLI-related functionality including:
//! - Argument parsing structures
//! - Command implementations
//! - Help text and failure rendering

pub mod args;
pub mod commands;
pub mod help;
pub mod output;
pub mod router;

// Re-export the main CLI structures for convenience
pub use args::{Cli, Commands};
pub use help::{generate_help, get_log_level};
pub use output::{format_flow_error, report_failure};
pub use router::execute_command;
