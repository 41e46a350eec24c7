//! Configuration loading from fsweep.toml
//!
//! Sweep defaults can be specified in an `fsweep.toml` file in the project
//! root. The configuration is automatically discovered by walking up from the
//! current directory; explicit CLI flags always take precedence over it.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// fsweep configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FsweepConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for sweep execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Benchmark executable invocation (e.g., "./fbuffer")
    #[serde(default = "default_command")]
    pub command: String,
    /// Parameter configuration file
    #[serde(default = "default_config_file")]
    pub config: String,
    /// Store results CSV the executable writes each run
    #[serde(default = "default_store_file")]
    pub store_file: String,
    /// Worker results CSV the executable writes each run
    #[serde(default = "default_worker_file")]
    pub worker_file: String,
    /// Abort the sweep on the first failed combination
    #[serde(default)]
    pub fail_fast: bool,
    /// Run at most this many combinations
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            config: default_config_file(),
            store_file: default_store_file(),
            worker_file: default_worker_file(),
            fail_fast: false,
            limit: None,
        }
    }
}

fn default_command() -> String {
    "./fbuffer".to_string()
}
fn default_config_file() -> String {
    "config.json".to_string()
}
fn default_store_file() -> String {
    "stores.csv".to_string()
}
fn default_worker_file() -> String {
    "workers.csv".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Journal file path (default derives from the output path)
    #[serde(default)]
    pub journal: Option<String>,
}

impl FsweepConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("fsweep.toml");
            if config_path.exists() {
                tracing::debug!("Using configuration from {}", config_path.display());
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# fsweep Configuration

[runner]
# Benchmark executable invocation
command = "./fbuffer"
# Parameter configuration file
config = "config.json"
# Result CSV files the executable writes each run
store_file = "stores.csv"
worker_file = "workers.csv"
# Abort the sweep on the first failed combination
fail_fast = false
# Run at most this many combinations (uncomment to enable)
# limit = 10

[output]
# Journal file path (uncomment to override the default <output>.ndjson)
# journal = "sweep.ndjson"
"#
        .to_string()
    }
}
