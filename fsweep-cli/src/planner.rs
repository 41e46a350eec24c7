//! Sweep Planner
//!
//! Expands the parameter set into the ordered list of runs to execute.
//!
//! Selection options:
//! - Regex pattern matching on the rendered parameter string
//! - A cap on the number of runs, for quick debugging passes
//!
//! Ordering: runs always keep Cartesian product order (rightmost parameter
//! fastest); selection removes runs without reordering them.

use fsweep_matrix::{command_line, estimate_for, param_string, ConfigError, ParameterSet};
use serde_json::{Map, Value};

/// One planned external run.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    /// Parameter assignment, in declaration order.
    pub args: Map<String, Value>,
    /// Rendered `-name=value` parameter string.
    pub params: String,
    /// Full shell command line.
    pub command_line: String,
}

/// Execution plan for a sweep.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    /// Ordered list of runs to execute.
    pub runs: Vec<PlannedRun>,
    /// Combination count of the whole parameter space, before selection.
    pub total_combinations: u64,
    /// Expected total runtime of the selected runs in milliseconds, when the
    /// `time` parameter permits an estimate.
    pub estimate_ms: Option<f64>,
}

/// Build the execution plan for a parameter set.
///
/// Applies the regex filter and the run cap while walking combinations in
/// product order.
pub fn build_plan(
    set: &ParameterSet,
    command: &str,
    store_file: &str,
    worker_file: &str,
    filter: Option<&regex::Regex>,
    limit: Option<usize>,
) -> Result<SweepPlan, ConfigError> {
    let total_combinations = set.combination_count()?;

    let mut runs = Vec::new();
    for combo in set.combinations() {
        if let Some(cap) = limit {
            if runs.len() >= cap {
                break;
            }
        }

        let params = param_string(&combo);
        if let Some(re) = filter {
            if !re.is_match(&params) {
                continue;
            }
        }

        runs.push(PlannedRun {
            args: combo.args(),
            command_line: command_line(command, &combo, store_file, worker_file),
            params,
        });
    }

    let estimate_ms = estimate_for(set, runs.len() as u64);

    Ok(SweepPlan {
        runs,
        total_combinations,
        estimate_ms,
    })
}
