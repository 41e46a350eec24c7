//! Run Records
//!
//! One record per executed combination, accumulated in execution order and
//! never mutated afterwards. A record carries the arguments the run was
//! invoked with and the two parsed result tables; a failed run instead
//! carries the failure message and empty tables, so the final document still
//! accounts for every attempted combination.

use crate::table::Table;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one benchmark invocation.
///
/// `error` is absent from the serialized form on success, so successful
/// records are exactly `{args, workers, stores}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Parameter assignment for this run, in declaration order.
    pub args: Map<String, Value>,
    /// Parsed rows of the worker results CSV.
    pub workers: Vec<Map<String, Value>>,
    /// Parsed rows of the store results CSV.
    pub stores: Vec<Map<String, Value>>,
    /// Failure message when the run did not produce usable results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunRecord {
    /// Record for a run that completed and produced both result tables.
    pub fn success(args: Map<String, Value>, workers: Table, stores: Table) -> Self {
        Self {
            args,
            workers: workers.into_rows(),
            stores: stores.into_rows(),
            error: None,
        }
    }

    /// Record for a run that failed before usable results existed.
    pub fn failure(args: Map<String, Value>, error: impl Into<String>) -> Self {
        Self {
            args,
            workers: Vec::new(),
            stores: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Whether this record describes a failed run.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}
