//! Identifier validation for flow branch names and release versions
//!
//! Everything here is pure: no I/O, no configuration. The rules are the
//! universal floor every flow identifier must clear; the guardian policy can
//! only add constraints on top of them.

pub mod branch;
pub mod version;

pub use branch::{
    suggest_branch_name, validate_branch_fragment, FORBIDDEN_PATTERNS, MAX_BRANCH_LENGTH,
    RESERVED_NAMES,
};
pub use version::{parse_version, validate_version};

use thiserror::Error;

/// Why an identifier was rejected.
///
/// Each variant corresponds to exactly one rule so callers (and tests) can
/// tell a reserved name apart from a bad character without string matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("identifier cannot be empty")]
    Empty,

    #[error("identifier is {actual} characters long, the maximum is {max}")]
    TooLong { max: usize, actual: usize },

    #[error("'{0}' is a reserved name and cannot be used")]
    Reserved(String),

    #[error("identifier contains forbidden character or pattern '{0}'")]
    ForbiddenPattern(String),

    #[error("{0}")]
    MalformedShape(String),
}

impl ValidationError {
    /// Short machine-readable name of the violated rule
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Empty => "empty",
            ValidationError::TooLong { .. } => "too-long",
            ValidationError::Reserved(_) => "reserved",
            ValidationError::ForbiddenPattern(_) => "forbidden-pattern",
            ValidationError::MalformedShape(_) => "malformed-shape",
        }
    }
}
