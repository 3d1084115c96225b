//! Dotted-key access to the configuration document (`branches.mainline`)

use super::{ConfigError, ConfigFile};
use serde_yaml::Value;

/// Render the value at `key`. Sections are rendered as YAML.
pub fn get_value(file: &ConfigFile, key: &str) -> Result<String, ConfigError> {
    let root = serde_yaml::to_value(file)?;
    let mut current = &root;
    for segment in key.split('.') {
        current = current
            .get(segment)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    }

    Ok(match current {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)?.trim_end().to_string(),
    })
}

/// Return a copy of `file` with `key` set to `raw`.
///
/// The raw text is interpreted according to the type of the existing value;
/// lists take comma-separated items. Sections cannot be set wholesale.
pub fn set_value(file: &ConfigFile, key: &str, raw: &str) -> Result<ConfigFile, ConfigError> {
    let mut root = serde_yaml::to_value(file)?;
    let mut current = &mut root;
    for segment in key.split('.') {
        current = current
            .get_mut(segment)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    }

    let invalid = |reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        reason,
    };

    *current = match &*current {
        Value::Bool(_) => raw
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| invalid(format!("expected true or false, got '{raw}'")))?,
        Value::Number(_) => raw
            .parse::<u64>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| invalid(format!("expected a non-negative integer, got '{raw}'")))?,
        Value::Sequence(_) => Value::Sequence(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        ),
        Value::Mapping(_) => return Err(invalid("is a section, not a value".to_string())),
        _ => Value::String(raw.to_string()),
    };

    serde_yaml::from_value(root).map_err(|e| invalid(e.to_string()))
}
