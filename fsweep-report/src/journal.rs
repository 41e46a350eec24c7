//! Result Journal
//!
//! Long sweeps can run for hours, and the JSON document only exists once the
//! last combination finishes. The journal closes that gap: every record is
//! appended to an NDJSON file and flushed the moment it is produced, so an
//! interrupted sweep loses at most the run that was in flight. One line per
//! record, each a self-contained `{seq, finished_at, record}` object.

use crate::record::RunRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Errors raised while writing or reading the journal.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// The journal file could not be accessed.
    #[error("Failed to access journal: {0}")]
    Io(#[from] std::io::Error),
    /// A journal line could not be encoded or decoded.
    #[error("Malformed journal entry: {0}")]
    Json(#[from] serde_json::Error),
}

/// One persisted journal line, read back from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Zero-based position of the run within the sweep.
    pub seq: usize,
    /// When the run's record was journaled.
    pub finished_at: DateTime<Utc>,
    /// The run's full record.
    pub record: RunRecord,
}

#[derive(Serialize)]
struct JournalLine<'a> {
    seq: usize,
    finished_at: DateTime<Utc>,
    record: &'a RunRecord,
}

/// Append-only NDJSON journal writer.
#[derive(Debug)]
pub struct Journal {
    writer: BufWriter<File>,
    seq: usize,
}

impl Journal {
    /// Start a fresh journal, creating parent directories as needed.
    ///
    /// An existing file at the path is truncated: the journal describes the
    /// current sweep only.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            seq: 0,
        })
    }

    /// Append one record and flush it to disk immediately.
    pub fn append(&mut self, record: &RunRecord) -> Result<(), JournalError> {
        let line = JournalLine {
            seq: self.seq,
            finished_at: Utc::now(),
            record,
        };
        serde_json::to_writer(&mut self.writer, &line)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.seq += 1;
        Ok(())
    }

    /// Number of entries appended so far.
    pub fn entries_written(&self) -> usize {
        self.seq
    }
}

/// Read all entries of a journal file, in write order.
pub fn read_journal(path: impl AsRef<Path>) -> Result<Vec<JournalEntry>, JournalError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn record(workers: u64) -> RunRecord {
        let mut args = Map::new();
        args.insert("workers".into(), json!(workers));
        RunRecord {
            args,
            workers: Vec::new(),
            stores: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn entries_come_back_in_write_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.ndjson");

        let mut journal = Journal::create(&path).unwrap();
        journal.append(&record(1)).unwrap();
        journal.append(&record(2)).unwrap();
        assert_eq!(journal.entries_written(), 2);

        let entries = read_journal(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].seq, 0);
        assert_eq!(entries[1].seq, 1);
        assert_eq!(entries[0].record.args["workers"], json!(1));
        assert_eq!(entries[1].record.args["workers"], json!(2));
    }

    #[test]
    fn each_append_is_visible_before_the_journal_closes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.ndjson");

        let mut journal = Journal::create(&path).unwrap();
        journal.append(&record(1)).unwrap();

        // The writer is still open; the flushed line must already be on disk.
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        let entry: JournalEntry = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(entry.seq, 0);
    }

    #[test]
    fn failed_runs_are_journaled_with_their_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.ndjson");

        let mut journal = Journal::create(&path).unwrap();
        let mut args = Map::new();
        args.insert("workers".into(), json!(8));
        journal
            .append(&RunRecord::failure(args, "Command exited with code 1"))
            .unwrap();

        let entries = read_journal(&path).unwrap();
        assert_eq!(
            entries[0].record.error.as_deref(),
            Some("Command exited with code 1")
        );
    }

    #[test]
    fn create_truncates_a_previous_journal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.ndjson");

        let mut journal = Journal::create(&path).unwrap();
        journal.append(&record(1)).unwrap();
        drop(journal);

        let journal = Journal::create(&path).unwrap();
        drop(journal);
        assert!(read_journal(&path).unwrap().is_empty());
    }
}
