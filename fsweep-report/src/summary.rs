//! Per-Run Summaries
//!
//! The optional summary CSV condenses each successful run to two numbers:
//! total completed worker transactions, and total aborted store transactions
//! across all four abort indicators. Cells arrive as strings from the result
//! tables and must parse as integers; anything else fails the run it belongs
//! to.

use crate::record::RunRecord;
use serde_json::{Map, Value};
use std::io;
use std::path::Path;

/// Worker table column summed into `WorkerCompleted`.
pub const WORKER_COMPLETED_COLUMN: &str = "Completed";

/// Store table columns summed into `StoreAborted`.
pub const STORE_ABORT_COLUMNS: [&str; 4] = [
    "AbortedLock",
    "AbortedVC",
    "BufferAbortedLock",
    "BufferAbortedVC",
];

/// Errors raised while deriving a summary from parsed result tables.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// A row is missing one of the summed columns.
    #[error("Result row is missing column '{0}'")]
    MissingColumn(String),
    /// A summed cell did not parse as an integer.
    #[error("Column '{column}' has non-integer cell '{value}'")]
    BadCell {
        /// Column the cell belongs to.
        column: String,
        /// The offending cell text.
        value: String,
    },
}

/// One summary CSV row: the run's arguments plus its two derived totals.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    /// Parameter assignment of the summarized run.
    pub args: Map<String, Value>,
    /// Sum of `Completed` over all worker rows.
    pub worker_completed: i64,
    /// Sum of the four abort indicator columns over all store rows.
    pub store_aborted: i64,
}

impl SummaryRow {
    /// Derive the summary totals for a successful run record.
    pub fn derive(record: &RunRecord) -> Result<Self, SummaryError> {
        Ok(Self {
            args: record.args.clone(),
            worker_completed: worker_completed(&record.workers)?,
            store_aborted: store_aborted(&record.stores)?,
        })
    }
}

/// Sum the completed transaction count over all worker rows.
pub fn worker_completed(rows: &[Map<String, Value>]) -> Result<i64, SummaryError> {
    let mut total = 0;
    for row in rows {
        total += cell_as_int(row, WORKER_COMPLETED_COLUMN)?;
    }
    Ok(total)
}

/// Sum the four abort indicator columns over all store rows.
pub fn store_aborted(rows: &[Map<String, Value>]) -> Result<i64, SummaryError> {
    let mut total = 0;
    for row in rows {
        for column in STORE_ABORT_COLUMNS {
            total += cell_as_int(row, column)?;
        }
    }
    Ok(total)
}

fn cell_as_int(row: &Map<String, Value>, column: &str) -> Result<i64, SummaryError> {
    let cell = row
        .get(column)
        .ok_or_else(|| SummaryError::MissingColumn(column.to_string()))?;
    let text = match cell {
        Value::String(s) => s.as_str(),
        other => {
            return Err(SummaryError::BadCell {
                column: column.to_string(),
                value: other.to_string(),
            })
        }
    };
    text.trim().parse().map_err(|_| SummaryError::BadCell {
        column: column.to_string(),
        value: text.to_string(),
    })
}

/// Render the summary CSV.
///
/// Layout: a leading unnamed index column (0, 1, 2, ...), one column per
/// parameter in declaration order, then `WorkerCompleted` and `StoreAborted`.
pub fn render_summary_csv(param_names: &[&str], rows: &[SummaryRow]) -> String {
    let mut out = String::new();

    let mut header: Vec<String> = Vec::with_capacity(param_names.len() + 3);
    header.push(String::new());
    header.extend(param_names.iter().map(|name| csv_field(name)));
    header.push("WorkerCompleted".to_string());
    header.push("StoreAborted".to_string());
    out.push_str(&header.join(","));
    out.push('\n');

    for (index, row) in rows.iter().enumerate() {
        let mut cells: Vec<String> = Vec::with_capacity(param_names.len() + 3);
        cells.push(index.to_string());
        for name in param_names {
            let text = row.args.get(*name).map(scalar_text).unwrap_or_default();
            cells.push(csv_field(&text));
        }
        cells.push(row.worker_completed.to_string());
        cells.push(row.store_aborted.to_string());
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    out
}

/// Write the summary CSV, creating parent directories as needed.
pub fn write_summary_csv(
    path: impl AsRef<Path>,
    param_names: &[&str],
    rows: &[SummaryRow],
) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render_summary_csv(param_names, rows))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_field(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') || text.contains('\r') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
