//! Command Line Construction
//!
//! Renders a [`Combination`] into the argument string handed to the system
//! under test. Every parameter becomes a `-name=value` token in declaration
//! order, followed by the two fixed output-file arguments.

use crate::combos::Combination;
use serde_json::Value;

/// Render a single JSON scalar the way it appears on the command line.
///
/// Strings are taken verbatim, without quotes. Numbers and booleans use
/// their JSON text form, so `0.001` stays `0.001` and `true` stays `true`.
pub fn value_token(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// All `-name=value` tokens for a combination, in declaration order.
pub fn param_tokens(combo: &Combination<'_>) -> Vec<String> {
    combo
        .pairs()
        .map(|(name, value)| format!("-{}={}", name, value_token(value)))
        .collect()
}

/// The space-joined parameter portion of the command line.
pub fn param_string(combo: &Combination<'_>) -> String {
    param_tokens(combo).join(" ")
}

/// The complete shell command for one combination.
///
/// The store file argument always precedes the worker file argument.
pub fn command_line(
    program: &str,
    combo: &Combination<'_>,
    store_file: &str,
    worker_file: &str,
) -> String {
    format!(
        "{} {} -storefile={} -workerfile={}",
        program,
        param_string(combo),
        store_file,
        worker_file
    )
}
