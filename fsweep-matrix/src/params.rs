//! Parameter configuration loading
//!
//! The sweep is declared in a flat JSON object mapping parameter names to
//! either a single scalar or an array of scalars. Loading normalizes every
//! value to a sequence (a scalar becomes a one-element sequence) and
//! validates the shape up front, so the rest of the pipeline never has to
//! re-check it. Declaration order is preserved and reused everywhere:
//! command tokens, result `args` maps, and summary columns all follow it.

use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// Reserved parameter name holding per-run duration estimates (milliseconds).
///
/// `time` is swept like any other parameter; its values are additionally used
/// to estimate total sweep duration before execution starts.
pub const TIME_PARAM: &str = "time";

/// Errors from loading or validating the parameter configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration must be a flat JSON object of parameter names to values")]
    NotAnObject,

    #[error("Configuration declares no parameters")]
    Empty,

    #[error("Parameter '{0}' has an empty value list")]
    EmptyValues(String),

    #[error("Parameter '{0}' must be a string, number, bool, or an array of those")]
    UnsupportedValue(String),

    #[error("Combination count overflows a 64-bit integer")]
    CombinationOverflow,
}

/// The normalized parameter space: every parameter maps to a non-empty
/// sequence of candidate scalar values, in declaration order.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    entries: Vec<(String, Vec<Value>)>,
}

impl ParameterSet {
    /// Load and normalize a parameter configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse and normalize a parameter configuration from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_json::from_str(content)?;
        match root {
            Value::Object(map) => Self::from_object(map),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    fn from_object(map: Map<String, Value>) -> Result<Self, ConfigError> {
        if map.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut entries = Vec::with_capacity(map.len());
        for (name, value) in map {
            let values = match value {
                Value::Array(items) => {
                    if items.is_empty() {
                        return Err(ConfigError::EmptyValues(name));
                    }
                    if items.iter().any(|item| !is_scalar(item)) {
                        return Err(ConfigError::UnsupportedValue(name));
                    }
                    items
                }
                scalar if is_scalar(&scalar) => vec![scalar],
                _ => return Err(ConfigError::UnsupportedValue(name)),
            };
            entries.push((name, values));
        }

        Ok(Self { entries })
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set declares no parameters. Never true for a loaded set;
    /// loading rejects an empty configuration.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// The value sequence for a parameter, if declared.
    pub fn values(&self, name: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Total number of combinations: the product of all sequence lengths.
    pub fn combination_count(&self) -> Result<u64, ConfigError> {
        let mut total: u64 = 1;
        for (_, values) in &self.entries {
            total = total
                .checked_mul(values.len() as u64)
                .ok_or(ConfigError::CombinationOverflow)?;
        }
        Ok(total)
    }

    pub(crate) fn values_at(&self, index: usize) -> &[Value] {
        &self.entries[index].1
    }

    pub(crate) fn name_at(&self, index: usize) -> &str {
        &self.entries[index].0
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}
