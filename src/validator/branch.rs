//! Branch fragment validation and best-effort repair

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a branch fragment (the part after the flow prefix)
pub const MAX_BRANCH_LENGTH: usize = 50;

/// Names that would shadow long-lived branches or git's own refs
pub const RESERVED_NAMES: &[&str] = &["master", "main", "develop", "HEAD", "FETCH_HEAD", "ORIG_HEAD"];

/// Substrings with meaning to a shell or to git revision syntax.
///
/// Whitespace and control characters are rejected as a class in addition
/// to the explicit entries below.
pub const FORBIDDEN_PATTERNS: &[&str] = &[
    "..", "//", "\\", "@{", "$", "`", ";", "|", "&", ">", "<", "*", "?", "[", "]", "~", "^", ":",
    " ", "\t", "\n", "\r",
];

/// Lowercase alphanumeric words joined by single hyphens, optionally split
/// into path segments by single slashes.
static KEBAB_CASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*(/[a-z0-9]+(-[a-z0-9]+)*)*$").expect("static regex")
});

static REPEATED_HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("static regex"));

/// Validate a branch fragment such as `user-auth` or `api/rate-limit`.
///
/// Rules are checked in a fixed order (empty, length, reserved, forbidden
/// patterns, shape) and the first violation is returned.
pub fn validate_branch_fragment(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }

    if name.len() > MAX_BRANCH_LENGTH {
        return Err(ValidationError::TooLong {
            max: MAX_BRANCH_LENGTH,
            actual: name.len(),
        });
    }

    if RESERVED_NAMES.contains(&name) {
        return Err(ValidationError::Reserved(name.to_string()));
    }

    if let Some(pattern) = find_forbidden_pattern(name) {
        return Err(ValidationError::ForbiddenPattern(pattern));
    }

    if name.starts_with('/') {
        return Err(ValidationError::MalformedShape(
            "branch name cannot start with '/'".to_string(),
        ));
    }
    if name.ends_with('/') {
        return Err(ValidationError::MalformedShape(
            "branch name cannot end with '/'".to_string(),
        ));
    }

    if !KEBAB_CASE.is_match(name) {
        return Err(ValidationError::MalformedShape(
            "branch name must be kebab-case (lowercase letters, digits and single hyphens)"
                .to_string(),
        ));
    }

    Ok(())
}

fn find_forbidden_pattern(name: &str) -> Option<String> {
    if let Some(pattern) = FORBIDDEN_PATTERNS.iter().find(|p| name.contains(*p)) {
        return Some((*pattern).to_string());
    }

    name.chars()
        .find(|c| c.is_control() || c.is_whitespace())
        .map(|c| c.escape_default().to_string())
}

/// Propose a valid-looking fragment for a rejected one.
///
/// The suggestion is advisory: it is shown to the user, never applied on
/// their behalf. Applying it twice yields the same result as applying it once.
pub fn suggest_branch_name(input: &str) -> String {
    let lowered = input.to_lowercase().replace(['_', ' '], "-");

    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '/')
        .collect();

    let collapsed = REPEATED_HYPHENS.replace_all(&cleaned, "-");
    let mut result = collapsed.trim_matches('-').to_string();

    if result.len() > MAX_BRANCH_LENGTH {
        result.truncate(MAX_BRANCH_LENGTH);
        result = result.trim_end_matches('-').to_string();
    }

    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(&result))
    {
        result.push_str("-branch");
    }

    result
}
