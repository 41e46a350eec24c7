//! Sweep Execution
//!
//! Core execution logic for running a sweep: one external invocation per
//! planned run, strictly sequential, collecting the two result CSV files
//! after each run and journaling the record before moving on.
//!
//! ## Data Flow
//!
//! ```text
//! SweepPlan (ordered runs)
//!        │
//!        ▼
//! ┌───────────────┐  shell out → wait → parse stores/workers CSV
//! │ SweepExecutor │  → derive summary (optional) → journal
//! └───────┬───────┘
//!         │
//!         ▼
//! SweepOutcome (records, summaries, failure count)
//! ```
//!
//! A failed run (nonzero exit, unreadable or malformed CSV, summary
//! validation) is recorded with its error and the sweep continues, unless
//! `fail_fast` is set.

use crate::planner::{PlannedRun, SweepPlan};
use crate::runner;
use fsweep_report::{
    Journal, RunRecord, SummaryRow, Table, STORE_ABORT_COLUMNS, WORKER_COMPLETED_COLUMN,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Resolved settings for executing one sweep.
#[derive(Debug, Clone)]
pub struct SweepSettings {
    /// Store results CSV path the executable writes each run.
    pub store_file: String,
    /// Worker results CSV path the executable writes each run.
    pub worker_file: String,
    /// NDJSON journal destination; `None` disables journaling.
    pub journal_path: Option<PathBuf>,
    /// Derive per-run summary totals and validate the table schemas.
    pub derive_summaries: bool,
    /// Abort the sweep on the first failed combination.
    pub fail_fast: bool,
}

/// Accumulated outcome of a sweep.
#[derive(Debug)]
pub struct SweepOutcome {
    /// One record per attempted run, in execution order.
    pub records: Vec<RunRecord>,
    /// Summary rows of the successful runs (empty unless summaries are on).
    pub summaries: Vec<SummaryRow>,
    /// Number of failed runs.
    pub failed: usize,
}

/// Execute planned runs and accumulate their records.
pub struct SweepExecutor {
    settings: SweepSettings,
    records: Vec<RunRecord>,
}

impl SweepExecutor {
    /// Create an executor with resolved settings.
    pub fn new(settings: SweepSettings) -> Self {
        Self {
            settings,
            records: Vec::new(),
        }
    }

    /// Execute all planned runs sequentially.
    ///
    /// No two invocations ever overlap: the next run starts only after the
    /// previous run's results are collected and journaled.
    pub fn execute(&mut self, plan: &SweepPlan) -> anyhow::Result<SweepOutcome> {
        let mut journal = match &self.settings.journal_path {
            Some(path) => Some(Journal::create(path)?),
            None => None,
        };

        let pb = ProgressBar::new(plan.runs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let total = plan.runs.len();
        let mut summaries = Vec::new();
        let mut failed = 0;
        let mut aborted = false;

        for (index, run) in plan.runs.iter().enumerate() {
            pb.set_message(run.params.clone());
            println!(
                "Running test {} of {}: {}",
                index + 1,
                total,
                run.command_line
            );

            let mut record = self.execute_single(run);

            if self.settings.derive_summaries && !record.is_failure() {
                match SummaryRow::derive(&record) {
                    Ok(row) => summaries.push(row),
                    Err(e) => record = RunRecord::failure(record.args, e.to_string()),
                }
            }

            if let Some(journal) = journal.as_mut() {
                journal.append(&record)?;
            }

            let failure = record.error.clone();
            self.records.push(record);
            pb.inc(1);

            if let Some(message) = failure {
                failed += 1;
                tracing::warn!("Test {} of {} failed: {}", index + 1, total, message);
                if self.settings.fail_fast {
                    aborted = true;
                    pb.abandon_with_message("Aborted");
                    break;
                }
            }
        }

        if !aborted {
            pb.finish_with_message("Complete");
        }

        Ok(SweepOutcome {
            records: std::mem::take(&mut self.records),
            summaries,
            failed,
        })
    }

    /// Invoke one run and collect its result tables.
    fn execute_single(&self, run: &PlannedRun) -> RunRecord {
        let status = match runner::run_shell(&run.command_line) {
            Ok(status) => status,
            Err(e) => return RunRecord::failure(run.args.clone(), e.to_string()),
        };
        if !status.success() {
            return RunRecord::failure(run.args.clone(), format!("Command {}", status));
        }

        println!("Test finished, collecting results...");
        self.collect(run)
    }

    /// Parse both result files and validate their schemas when summaries
    /// were requested.
    fn collect(&self, run: &PlannedRun) -> RunRecord {
        let workers = match Table::load(&self.settings.worker_file) {
            Ok(table) => table,
            Err(e) => return self.collect_failure(run, &self.settings.worker_file, e),
        };
        let stores = match Table::load(&self.settings.store_file) {
            Ok(table) => table,
            Err(e) => return self.collect_failure(run, &self.settings.store_file, e),
        };

        if self.settings.derive_summaries {
            if let Err(e) = workers.require_columns(&[WORKER_COMPLETED_COLUMN]) {
                return self.collect_failure(run, &self.settings.worker_file, e);
            }
            if let Err(e) = stores.require_columns(&STORE_ABORT_COLUMNS) {
                return self.collect_failure(run, &self.settings.store_file, e);
            }
        }

        RunRecord::success(run.args.clone(), workers, stores)
    }

    fn collect_failure(
        &self,
        run: &PlannedRun,
        file: &str,
        error: fsweep_report::TableError,
    ) -> RunRecord {
        RunRecord::failure(run.args.clone(), format!("{}: {}", file, error))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use fsweep_report::read_journal;
    use serde_json::{json, Map, Value};
    use std::path::Path;

    const WORKERS_CSV: &str = "Completed,Aborted,AbortedLock\\n5,1,0\\n2,0,0\\n";
    const STORES_CSV: &str =
        "Pending,InBuffer,AbortedLock,AbortedVC,BufferResolved,BufferAbortedLock,BufferAbortedVC\\n1,0,1,0,2,1,0\\n";

    fn args(value: u64) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("workers".into(), json!(value));
        args
    }

    fn planned(value: u64, command_line: String) -> PlannedRun {
        PlannedRun {
            args: args(value),
            params: format!("-workers={}", value),
            command_line,
        }
    }

    fn plan_of(runs: Vec<PlannedRun>) -> SweepPlan {
        SweepPlan {
            total_combinations: runs.len() as u64,
            estimate_ms: None,
            runs,
        }
    }

    fn settings(dir: &Path, derive_summaries: bool, fail_fast: bool) -> SweepSettings {
        SweepSettings {
            store_file: dir.join("stores.csv").display().to_string(),
            worker_file: dir.join("workers.csv").display().to_string(),
            journal_path: None,
            derive_summaries,
            fail_fast,
        }
    }

    fn emit_both(settings: &SweepSettings) -> String {
        format!(
            "printf '{}' > {} && printf '{}' > {}",
            WORKERS_CSV, settings.worker_file, STORES_CSV, settings.store_file
        )
    }

    #[test]
    fn successful_run_records_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), false, false);
        let plan = plan_of(vec![planned(4, emit_both(&settings))]);

        let outcome = SweepExecutor::new(settings).execute(&plan).unwrap();

        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert!(!record.is_failure());
        assert_eq!(record.workers.len(), 2);
        assert_eq!(record.workers[0]["Completed"], json!("5"));
        assert_eq!(record.stores[0]["BufferAbortedLock"], json!("1"));
    }

    #[test]
    fn nonzero_exit_is_recorded_and_sweep_continues() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), false, false);
        let plan = plan_of(vec![
            planned(1, "exit 3".to_string()),
            planned(2, emit_both(&settings)),
        ]);

        let outcome = SweepExecutor::new(settings).execute(&plan).unwrap();

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(
            outcome.records[0].error.as_deref(),
            Some("Command exited with code 3")
        );
        assert!(!outcome.records[1].is_failure());
    }

    #[test]
    fn fail_fast_stops_after_the_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), false, true);
        let plan = plan_of(vec![
            planned(1, "exit 3".to_string()),
            planned(2, emit_both(&settings)),
        ]);

        let outcome = SweepExecutor::new(settings).execute(&plan).unwrap();

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn missing_results_file_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), false, false);
        let plan = plan_of(vec![planned(1, "true".to_string())]);

        let outcome = SweepExecutor::new(settings.clone()).execute(&plan).unwrap();

        assert_eq!(outcome.failed, 1);
        let error = outcome.records[0].error.as_deref().unwrap();
        assert!(error.starts_with(&settings.worker_file));
    }

    #[test]
    fn summary_mode_validates_the_table_schemas() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), true, false);
        // Worker table lacks the Completed column.
        let command = format!(
            "printf 'Aborted\\n1\\n' > {} && printf '{}' > {}",
            settings.worker_file, STORES_CSV, settings.store_file
        );
        let plan = plan_of(vec![planned(1, command)]);

        let outcome = SweepExecutor::new(settings).execute(&plan).unwrap();

        assert_eq!(outcome.failed, 1);
        assert!(outcome.summaries.is_empty());
        let error = outcome.records[0].error.as_deref().unwrap();
        assert!(error.contains("missing required columns: Completed"));
    }

    #[test]
    fn summaries_cover_successful_runs_only() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), true, false);
        let plan = plan_of(vec![
            planned(1, emit_both(&settings)),
            planned(2, "exit 1".to_string()),
            planned(3, emit_both(&settings)),
        ]);

        let outcome = SweepExecutor::new(settings).execute(&plan).unwrap();

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.summaries.len(), 2);
        assert_eq!(outcome.summaries[0].worker_completed, 7);
        assert_eq!(outcome.summaries[0].store_aborted, 2);
        assert_eq!(outcome.summaries[0].args["workers"], json!(1));
        assert_eq!(outcome.summaries[1].args["workers"], json!(3));
    }

    #[test]
    fn journal_gets_one_entry_per_attempted_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path(), false, false);
        let journal_path = dir.path().join("sweep.ndjson");
        settings.journal_path = Some(journal_path.clone());
        let plan = plan_of(vec![
            planned(1, emit_both(&settings)),
            planned(2, "exit 9".to_string()),
        ]);

        SweepExecutor::new(settings).execute(&plan).unwrap();

        let entries = read_journal(&journal_path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].seq, 0);
        assert!(entries[0].record.error.is_none());
        assert_eq!(
            entries[1].record.error.as_deref(),
            Some("Command exited with code 9")
        );
    }
}
