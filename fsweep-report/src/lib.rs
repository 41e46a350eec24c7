#![warn(missing_docs)]
//! FSweep Report - Result Collection and Output
//!
//! Everything produced by a sweep flows through this crate:
//! - CSV tables written by the benchmark executable, parsed into ordered rows
//! - run records accumulating one `{args, workers, stores}` entry per run
//! - derived per-run summaries (completed work, aborted transactions)
//! - the final JSON document and optional summary CSV
//! - an NDJSON journal that persists each record as soon as it exists

mod journal;
mod json;
mod record;
mod summary;
mod table;

pub use journal::{read_journal, Journal, JournalEntry, JournalError};
pub use json::{render_json_document, write_json_document, DocumentError};
pub use record::RunRecord;
pub use summary::{
    render_summary_csv, write_summary_csv, SummaryError, SummaryRow, STORE_ABORT_COLUMNS,
    WORKER_COMPLETED_COLUMN,
};
pub use table::{Table, TableError};
