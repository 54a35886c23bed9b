//! Raw string to typed value conversion.

use crate::config::loader::ConfigError;
use crate::config::schema::{ConfigValue, ParamType, ParameterSpec};

/// Split a list value on commas. Elements are not trimmed.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(',').map(str::to_string).collect()
    }
}

/// Coerce a whitespace-stripped raw value to the parameter's declared type.
///
/// An empty string is the unset sentinel for scalar types and the empty
/// list for list types.
pub fn coerce(spec: &ParameterSpec, raw: &str) -> Result<ConfigValue, ConfigError> {
    let raw = raw.trim();
    let invalid = || ConfigError::InvalidType {
        name: spec.name.to_string(),
        expected: spec.kind,
    };

    let value = match spec.kind {
        ParamType::StringList => ConfigValue::StringList(split_list(raw)),
        _ if raw.is_empty() => ConfigValue::Unset,
        ParamType::Integer => ConfigValue::Integer(raw.parse().map_err(|_| invalid())?),
        ParamType::Float => ConfigValue::Float(raw.parse().map_err(|_| invalid())?),
        ParamType::String => ConfigValue::String(raw.to_string()),
    };

    Ok(value)
}
