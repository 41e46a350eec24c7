//! JSON Output Document
//!
//! The full sweep output is one JSON array of run records, pretty-printed
//! with 4-space indentation and written once after the last run.

use crate::record::RunRecord;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io;
use std::path::Path;

/// Errors raised while producing the output document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document could not be written.
    #[error("Failed to write output document: {0}")]
    Io(#[from] io::Error),
    /// The records could not be serialized.
    #[error("Failed to serialize output document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize the record list as pretty JSON with 4-space indentation.
pub fn render_json_document(records: &[RunRecord]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the output document, creating parent directories as needed.
pub fn write_json_document(
    path: impl AsRef<Path>,
    records: &[RunRecord],
) -> Result<(), DocumentError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let document = render_json_document(records)?;
    std::fs::write(path, document)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;
    use serde_json::{json, Map};

    fn sample_record() -> RunRecord {
        let mut args = Map::new();
        args.insert("workers".into(), json!(4));
        RunRecord::success(
            args,
            Table::parse("Completed\n5\n").unwrap(),
            Table::parse("Pending\n0\n").unwrap(),
        )
    }

    #[test]
    fn document_uses_four_space_indentation() {
        let text = render_json_document(&[sample_record()]).unwrap();

        assert!(text.starts_with("[\n    {\n"));
        assert!(text.contains("\n        \"args\": {"));
        assert!(text.contains("\n            \"workers\": 4"));
    }

    #[test]
    fn empty_sweep_renders_an_empty_array() {
        assert_eq!(render_json_document(&[]).unwrap(), "[]");
    }

    #[test]
    fn document_round_trips() {
        let text = render_json_document(&[sample_record()]).unwrap();
        let back: Vec<RunRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].args["workers"], json!(4));
        assert_eq!(back[0].workers[0]["Completed"], json!("5"));
    }

    #[test]
    fn write_creates_nested_directories_and_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("deep").join("out.json");

        write_json_document(&path, &[sample_record()]).unwrap();
        write_json_document(&path, &[sample_record()]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {"));
    }
}
