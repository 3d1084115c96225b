//! Strict `MAJOR.MINOR.PATCH` version validation

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

static STRICT_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("static regex"));

/// Validate a release or hotfix version.
///
/// Only bare `X.Y.Z` is accepted: no `v` prefix, no pre-release, no build
/// metadata.
pub fn validate_version(version: &str) -> Result<(), ValidationError> {
    parse_version(version).map(|_| ())
}

/// Validate and parse a version into its numeric components
pub fn parse_version(version: &str) -> Result<semver::Version, ValidationError> {
    if version.is_empty() {
        return Err(ValidationError::Empty);
    }

    if !STRICT_VERSION.is_match(version) {
        return Err(ValidationError::MalformedShape(
            "invalid version format (expected X.Y.Z, e.g. 1.0.0)".to_string(),
        ));
    }

    // Leading zeros are allowed (`2024.01.15`); only overflow is rejected
    let components = version
        .split('.')
        .map(|part| {
            part.parse::<u64>().map_err(|_| {
                ValidationError::MalformedShape(format!("component '{part}' is too large"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    match components.as_slice() {
        [major, minor, patch] => Ok(semver::Version::new(*major, *minor, *patch)),
        _ => Err(ValidationError::MalformedShape(
            "invalid version format (expected X.Y.Z, e.g. 1.0.0)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_strict_versions() {
        for version in ["1.0.0", "0.0.0", "12.34.56", "2.5.3", "1.01.0", "2024.01.15", "01.0.0"] {
            assert!(validate_version(version).is_ok(), "{version} should be valid");
        }
    }

    #[test]
    fn test_rejects_non_strict_versions() {
        for version in ["v1.0.0", "1.0", "1.0.0-beta", "1.0.0+build", "1.0.0.0", "a.b.c", " 1.0.0"] {
            assert!(
                matches!(validate_version(version), Err(ValidationError::MalformedShape(_))),
                "{version} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_empty_version() {
        assert_eq!(validate_version(""), Err(ValidationError::Empty));
    }

    #[test]
    fn test_rejects_overflowing_component() {
        assert_eq!(
            validate_version("1.0.99999999999999999999999"),
            Err(ValidationError::MalformedShape(
                "component '99999999999999999999999' is too large".to_string()
            ))
        );
    }

    #[test]
    fn test_leading_zeros_keep_numeric_value() {
        let version = parse_version("2024.01.15").unwrap();
        assert_eq!((version.major, version.minor, version.patch), (2024, 1, 15));
    }

    #[test]
    fn test_parse_exposes_components() {
        let version = parse_version("3.14.15").unwrap();
        assert_eq!((version.major, version.minor, version.patch), (3, 14, 15));
    }
}
