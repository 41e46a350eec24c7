//! Runtime Estimation
//!
//! Before a sweep starts we predict its wall-clock duration from the
//! reserved `time` parameter. Each combination picks one of the configured
//! run times, and the product walks them evenly, so the expected total is
//! the mean run time multiplied by the number of combinations.

use crate::params::{ParameterSet, TIME_PARAM};
use serde_json::Value;

/// Expected total runtime in milliseconds for `runs` combinations drawing
/// from the given `time` values.
///
/// Returns `None` when no estimate can be made: the slice is empty or some
/// value is not numeric.
pub fn estimate_total_ms(times: &[Value], runs: u64) -> Option<f64> {
    if times.is_empty() {
        return None;
    }
    let mut sum = 0.0;
    for time in times {
        sum += time.as_f64()?;
    }
    Some(sum * runs as f64 / times.len() as f64)
}

/// Expected total runtime for a whole parameter set, in milliseconds.
///
/// `None` when the set has no [`TIME_PARAM`] parameter or its values do not
/// support an estimate.
pub fn estimate_for(set: &ParameterSet, runs: u64) -> Option<f64> {
    estimate_total_ms(set.values(TIME_PARAM)?, runs)
}

/// Human-readable rendering of a millisecond estimate.
pub fn format_eta(total_ms: f64) -> String {
    let total_minutes = (total_ms / 60_000.0) as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{} hours and {} minutes", hours, minutes)
}
