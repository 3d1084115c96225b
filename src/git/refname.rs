//! Reference-name guard at the process boundary
//!
//! This is independent of the identifier validator: it runs on every branch
//! or tag name right before it is placed on a `git` command line, so nothing
//! that could be read as an option or revision expression reaches the tool.

use super::GitError;

/// Reject names that are unsafe to pass to `git` as a ref argument.
///
/// Allowed characters are ASCII alphanumerics, `.`, `_`, `/` and `-`.
/// Dots are admitted because version-named branches and tags
/// (`release/1.0.0`, `v1.0.0`) must pass.
pub fn validate_ref_name(name: &str) -> Result<(), GitError> {
    let reject = |reason: &str| {
        Err(GitError::InvalidReference {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return reject("name cannot be empty");
    }
    if name.starts_with('-') {
        return reject("name cannot start with '-'");
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-')))
    {
        return reject(&format!("character {:?} is not allowed", c));
    }
    if name.contains("..") || name.contains("//") {
        return reject("name cannot contain '..' or '//'");
    }
    if name.starts_with('/') || name.ends_with('/') {
        return reject("name cannot start or end with '/'");
    }
    if name.starts_with('.') || name.ends_with('.') || name.contains("/.") {
        return reject("name components cannot start or end with '.'");
    }
    if name.ends_with(".lock") {
        return reject("name cannot end with '.lock'");
    }

    Ok(())
}
