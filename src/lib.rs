//! # Flowline
//!
//! Disciplined git-flow branch lifecycle automation: validated starts,
//! strictly ordered finishes and explicit recovery guidance when a finish
//! only gets part of the way.
//!
//! ## Usage
//!
//! ```bash
//! flow feature start <name> [--from <branch>]
//! flow feature finish [<name>] [--keep]
//! flow release start|finish <version> [--keep] [--no-tag] [-m <message>]
//! flow hotfix start|finish <version> [--keep] [--no-tag] [-m <message>]
//! flow init | list [kind] | status | config [key] [value]
//! ```
//!
//! ## Modules
//!
//! - `cli` - Argument parsing, command routing and failure rendering
//! - `config` - Layered YAML configuration, compiled once per invocation
//! - `error` - `FlowError` taxonomy and stable error codes
//! - `flow` - The lifecycle orchestrator plus `init`, `list` and `status`
//! - `git` - Gateway traits, the `git` CLI implementation and an in-memory scenario
//! - `guardian` - Optional naming policy layered on the validator
//! - `interaction` - User-facing narration
//! - `preflight` - Non-mutating checks run before a finish
//! - `subprocess` - Process execution abstraction for testing
//! - `validator` - Branch fragment and version validation
pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod git;
pub mod guardian;
pub mod interaction;
pub mod preflight;
pub mod subprocess;
pub mod validator;
