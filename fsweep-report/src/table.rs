//! CSV Table Parsing
//!
//! The benchmark executable reports its measurements as two small CSV files,
//! one row per worker and one per store. It writes plain comma-joined lines
//! without any quoting, so parsing is a straight split: the first line names
//! the columns, every following line is one row. Rows become ordered
//! column-to-cell maps and every cell stays a string; interpretation is left
//! to the summary layer.

use serde_json::{Map, Value};
use std::path::Path;

/// Errors raised while reading or parsing a results CSV.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The file could not be read at all.
    #[error("Failed to read results file: {0}")]
    Io(#[from] std::io::Error),
    /// The file contained no header line.
    #[error("Results file is empty")]
    Empty,
    /// A data row had a different number of cells than the header.
    #[error("Row {line} has {found} cells, header has {expected}")]
    RowArity {
        /// 1-based line number of the offending row.
        line: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of cells found in the row.
        found: usize,
    },
    /// A required column is missing from the header.
    #[error("Results file is missing required columns: {0}")]
    MissingColumns(String),
}

/// An ordered CSV table: named columns and string-celled rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl Table {
    /// Read and parse a results CSV from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse results CSV text.
    ///
    /// The first line is the header. Blank lines are skipped; a header-only
    /// file parses to zero rows.
    pub fn parse(content: &str) -> Result<Self, TableError> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.is_empty());

        let (_, header) = lines.next().ok_or(TableError::Empty)?;
        let columns: Vec<String> = header.split(',').map(str::to_string).collect();

        let mut rows = Vec::new();
        for (index, line) in lines {
            let cells: Vec<&str> = line.split(',').collect();
            if cells.len() != columns.len() {
                return Err(TableError::RowArity {
                    line: index + 1,
                    expected: columns.len(),
                    found: cells.len(),
                });
            }
            let mut row = Map::new();
            for (column, cell) in columns.iter().zip(cells) {
                row.insert(column.clone(), Value::String(cell.to_string()));
            }
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Parsed rows in file order.
    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Consume the table, keeping only its rows.
    pub fn into_rows(self) -> Vec<Map<String, Value>> {
        self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ensure every named column exists in the header.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), TableError> {
        let missing: Vec<&str> = required
            .iter()
            .filter(|name| !self.columns.iter().any(|c| c == *name))
            .copied()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TableError::MissingColumns(missing.join(", ")))
        }
    }
}
