//! Guardian: optional, configuration-driven naming policy
//!
//! The guardian layers extra constraints on top of the identifier validator.
//! Its naming pattern is compiled once when configuration is loaded, so a bad
//! pattern is a startup error rather than a failure halfway through a flow.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// What happens when a name violates the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GuardianMode {
    /// Violations abort the operation
    #[default]
    Strict,
    /// Violations are reported as warnings and the operation continues
    Permissive,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("branch name '{name}' does not match required pattern: {pattern}")]
    PatternMismatch { name: String, pattern: String },

    #[error("branch name exceeds maximum length of {max} characters ({actual})")]
    TooLong { max: usize, actual: usize },

    #[error("branch name contains forbidden word: {word}")]
    ForbiddenWord { word: String },
}

/// Compiled guardian policy. Disabled by default.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    enabled: bool,
    mode: GuardianMode,
    naming_pattern: Option<Regex>,
    max_length: usize,
    forbidden_substrings: BTreeSet<String>,
    require_clean_tree: bool,
    require_up_to_date: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

impl PolicyConfig {
    /// A policy whose checks are all no-ops
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            mode: GuardianMode::Strict,
            naming_pattern: None,
            max_length: 0,
            forbidden_substrings: BTreeSet::new(),
            require_clean_tree: true,
            require_up_to_date: true,
        }
    }

    /// Compile a policy. An empty pattern disables the pattern check and a
    /// `max_length` of zero disables the length check.
    pub fn compile<I, S>(pattern: &str, max_length: usize, forbidden: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let naming_pattern = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern)?)
        };

        let forbidden_substrings = forbidden
            .into_iter()
            .map(|word| word.as_ref().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();

        Ok(Self {
            enabled: true,
            naming_pattern,
            max_length,
            forbidden_substrings,
            ..Self::disabled()
        })
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_mode(mut self, mode: GuardianMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_workflow(mut self, require_clean_tree: bool, require_up_to_date: bool) -> Self {
        self.require_clean_tree = require_clean_tree;
        self.require_up_to_date = require_up_to_date;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> GuardianMode {
        self.mode
    }

    pub fn naming_pattern(&self) -> Option<&str> {
        self.naming_pattern.as_ref().map(Regex::as_str)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn forbidden_substrings(&self) -> impl Iterator<Item = &str> {
        self.forbidden_substrings.iter().map(String::as_str)
    }

    pub fn require_clean_tree(&self) -> bool {
        self.require_clean_tree
    }

    pub fn require_up_to_date(&self) -> bool {
        self.require_up_to_date
    }

    /// Check a full branch name against the policy.
    ///
    /// `prefix` is stripped before checking, so `feature/login` with prefix
    /// `feature/` is judged as `login`. When several rules fail, the pattern
    /// violation wins over length, and length over forbidden words.
    pub fn check(&self, full_name: &str, prefix: &str) -> Result<(), PolicyError> {
        match self.violations(full_name, prefix).into_iter().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// Every rule the name breaks, in reporting order
    pub fn violations(&self, full_name: &str, prefix: &str) -> Vec<PolicyError> {
        if !self.enabled {
            return Vec::new();
        }

        let name = strip_flow_prefix(full_name, prefix);
        let mut violations = Vec::new();

        if let Some(pattern) = &self.naming_pattern {
            if !pattern.is_match(name) {
                violations.push(PolicyError::PatternMismatch {
                    name: name.to_string(),
                    pattern: pattern.as_str().to_string(),
                });
            }
        }

        if self.max_length > 0 && name.len() > self.max_length {
            violations.push(PolicyError::TooLong {
                max: self.max_length,
                actual: name.len(),
            });
        }

        let lowered = name.to_lowercase();
        if let Some(word) = self
            .forbidden_substrings
            .iter()
            .find(|word| lowered.contains(word.as_str()))
        {
            violations.push(PolicyError::ForbiddenWord { word: word.clone() });
        }

        if !violations.is_empty() {
            tracing::debug!(
                "Guardian found {} violation(s) for '{}': {:?}",
                violations.len(),
                full_name,
                violations
            );
        }

        violations
    }
}

fn strip_flow_prefix<'a>(full_name: &'a str, prefix: &str) -> &'a str {
    match full_name.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() && !rest.is_empty() => rest,
        _ => full_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(pattern: &str, max_length: usize, forbidden: &[&str]) -> PolicyConfig {
        PolicyConfig::compile(pattern, max_length, forbidden.iter().copied()).unwrap()
    }

    #[test]
    fn test_disabled_policy_accepts_anything() {
        let policy = policy("^x$", 1, &["bad"]).with_enabled(false);
        assert!(policy.check("feature/very-bad-name", "feature/").is_ok());
        assert!(PolicyConfig::default().check("anything", "").is_ok());
    }

    #[test]
    fn test_prefix_is_stripped_before_matching() {
        let policy = policy("^[a-z-]+$", 10, &[]);
        assert!(policy.check("feature/login", "feature/").is_ok());
        // Without stripping, the slash would break the pattern.
        assert!(policy.check("feature/login", "").is_err());
    }

    #[test]
    fn test_pattern_mismatch() {
        let policy = policy("^[a-z]+$", 0, &[]);
        assert_eq!(
            policy.check("feature/login2", "feature/"),
            Err(PolicyError::PatternMismatch {
                name: "login2".to_string(),
                pattern: "^[a-z]+$".to_string()
            })
        );
    }

    #[test]
    fn test_length_limit() {
        let policy = policy("", 5, &[]);
        assert_eq!(
            policy.check("feature/abcdef", "feature/"),
            Err(PolicyError::TooLong { max: 5, actual: 6 })
        );
        assert!(policy.check("feature/abcde", "feature/").is_ok());
    }

    #[test]
    fn test_forbidden_words_are_case_insensitive() {
        let policy = policy("", 0, &["WIP", "temp"]);
        assert_eq!(
            policy.check("feature/my-wip-thing", "feature/"),
            Err(PolicyError::ForbiddenWord {
                word: "wip".to_string()
            })
        );
        assert!(policy.check("feature/TEMPlate", "feature/").is_err());
    }

    #[test]
    fn test_reporting_order_is_pattern_then_length_then_forbidden() {
        let policy = policy("^[a-z]+$", 3, &["x"]);
        let violations = policy.violations("feature/xx-1", "feature/");
        assert_eq!(violations.len(), 3);
        assert!(matches!(violations[0], PolicyError::PatternMismatch { .. }));
        assert!(matches!(violations[1], PolicyError::TooLong { .. }));
        assert!(matches!(violations[2], PolicyError::ForbiddenWord { .. }));
        assert_eq!(policy.check("feature/xx-1", "feature/"), Err(violations[0].clone()));
    }

    #[test]
    fn test_invalid_pattern_fails_at_compile_time() {
        assert!(PolicyConfig::compile("([unclosed", 10, Vec::<String>::new()).is_err());
    }
}
