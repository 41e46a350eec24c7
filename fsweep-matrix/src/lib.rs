#![warn(missing_docs)]
//! FSweep Matrix - Parameter Space
//!
//! Everything the harness knows about the swept parameter space lives here:
//! loading and normalizing the `config.json` parameter declaration, walking
//! the Cartesian product of all value sequences, formatting the `-name=value`
//! command tokens the benchmark executable expects, and estimating how long
//! the whole sweep will take.
//!
//! The crate is pure data-plumbing: the only I/O is reading the config file.
//! Invoking the executable and collecting its output belong to the CLI and
//! report crates.

mod combos;
mod command;
mod estimate;
mod params;

pub use combos::{Combination, Combinations};
pub use command::{command_line, param_string, param_tokens, value_token};
pub use estimate::{estimate_for, estimate_total_ms, format_eta};
pub use params::{ConfigError, ParameterSet, TIME_PARAM};
