#![warn(missing_docs)]
//! FSweep CLI Library
//!
//! This crate wires the parameter matrix and the report layer into the
//! `fsweep` binary: it parses the command line, discovers `fsweep.toml`
//! defaults, builds the sweep plan, executes it run by run, and writes the
//! JSON document plus the optional summary CSV at the end.
//!
//! # Example
//!
//! ```ignore
//! fsweep results/out.json results/summary.csv --config config.json
//! ```

mod config;
mod executor;
mod planner;
mod runner;

pub use config::*;
pub use executor::{SweepExecutor, SweepOutcome, SweepSettings};
pub use planner::{build_plan, PlannedRun, SweepPlan};
pub use runner::{run_shell, RunError, RunStatus};

use clap::Parser;
use fsweep_matrix::{format_eta, ParameterSet};
use fsweep_report::{write_json_document, write_summary_csv};
use std::path::{Path, PathBuf};

/// FSweep CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fsweep")]
#[command(
    author,
    version,
    about = "fsweep - parameter sweep harness for benchmark executables"
)]
pub struct Cli {
    /// Output path for the full JSON results document
    pub output: PathBuf,

    /// Summary CSV path; supplying one enables summary mode
    pub summary: Option<PathBuf>,

    /// Parameter configuration file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Benchmark executable invocation
    #[arg(long, default_value = "./fbuffer")]
    pub command: String,

    /// Store results CSV the executable writes each run
    #[arg(long, default_value = "stores.csv")]
    pub store_file: String,

    /// Worker results CSV the executable writes each run
    #[arg(long, default_value = "workers.csv")]
    pub worker_file: String,

    /// Run only combinations whose parameter string matches this regex
    #[arg(long, allow_hyphen_values = true)]
    pub filter: Option<String>,

    /// Run at most N combinations
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Journal file path (defaults to the output path with an .ndjson extension)
    #[arg(long)]
    pub journal: Option<PathBuf>,

    /// Disable the journal
    #[arg(long)]
    pub no_journal: bool,

    /// Abort the sweep on the first failed combination
    #[arg(long)]
    pub fail_fast: bool,

    /// List the planned runs without executing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Final tally of a sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepTotals {
    /// Number of runs attempted.
    pub attempted: usize,
    /// Number of runs that failed.
    pub failed: usize,
}

/// Run the fsweep CLI with the given arguments.
/// This is the main entry point for the `fsweep` binary.
///
/// Exits with code 1 when any combination failed, after all output documents
/// were written.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let totals = run_with_cli(cli)?;

    if totals.failed > 0 {
        eprintln!("\n{} of {} tests failed", totals.failed, totals.attempted);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the fsweep CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<SweepTotals> {
    // Initialize logging
    if cli.verbose {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("fsweep=debug")
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("fsweep=info")
            .try_init();
    }

    // Discover fsweep.toml configuration (CLI flags override)
    let config = FsweepConfig::discover().unwrap_or_default();
    let options = resolve_options(&cli, &config);

    let set = ParameterSet::load(&options.config_path)
        .map_err(|e| anyhow::anyhow!("{}: {}", options.config_path.display(), e))?;

    let filter = cli.filter.as_deref().map(regex::Regex::new).transpose()?;
    let plan = build_plan(
        &set,
        &options.command,
        &options.store_file,
        &options.worker_file,
        filter.as_ref(),
        options.limit,
    )?;

    if cli.dry_run {
        list_plan(&plan);
        return Ok(SweepTotals::default());
    }

    if plan.runs.is_empty() {
        println!("No combinations to run.");
        return Ok(SweepTotals::default());
    }

    match plan.estimate_ms {
        Some(ms) => println!(
            "Starting run of {} combinations. Approximate runtime is {}.",
            plan.runs.len(),
            format_eta(ms)
        ),
        None => {
            println!("Starting run of {} combinations.", plan.runs.len());
            eprintln!(
                "Warning: no runtime estimate; add a numeric 'time' parameter to enable one."
            );
        }
    }

    let settings = SweepSettings {
        store_file: options.store_file.clone(),
        worker_file: options.worker_file.clone(),
        journal_path: options.journal_path.clone(),
        derive_summaries: cli.summary.is_some(),
        fail_fast: options.fail_fast,
    };
    let mut executor = SweepExecutor::new(settings);
    let outcome = executor.execute(&plan)?;

    write_json_document(&cli.output, &outcome.records)?;
    println!("Results written to: {}", cli.output.display());

    if let Some(ref summary_path) = cli.summary {
        let names: Vec<&str> = set.names().collect();
        write_summary_csv(summary_path, &names, &outcome.summaries)?;
        println!("Summary written to: {}", summary_path.display());
    }

    Ok(SweepTotals {
        attempted: outcome.records.len(),
        failed: outcome.failed,
    })
}

/// Print the planned runs without executing them.
fn list_plan(plan: &SweepPlan) {
    println!("Sweep plan:");
    for (index, run) in plan.runs.iter().enumerate() {
        println!("  {}: {}", index + 1, run.command_line);
    }
    println!(
        "{} of {} combinations selected.",
        plan.runs.len(),
        plan.total_combinations
    );
    if let Some(ms) = plan.estimate_ms {
        println!("Approximate runtime is {}.", format_eta(ms));
    }
}

/// File and invocation options for one sweep, after CLI/config layering.
#[derive(Debug, Clone)]
struct SweepOptions {
    command: String,
    config_path: PathBuf,
    store_file: String,
    worker_file: String,
    fail_fast: bool,
    limit: Option<usize>,
    journal_path: Option<PathBuf>,
}

/// Layer fsweep.toml defaults under explicit CLI flags.
///
/// clap defaults are command="./fbuffer", config="config.json",
/// store_file="stores.csv", worker_file="workers.csv". If the CLI value
/// differs from clap's default, the user explicitly set it and it wins;
/// otherwise the config file value applies.
fn resolve_options(cli: &Cli, config: &FsweepConfig) -> SweepOptions {
    let command = if cli.command != "./fbuffer" {
        cli.command.clone()
    } else {
        config.runner.command.clone()
    };
    let config_path = if cli.config != Path::new("config.json") {
        cli.config.clone()
    } else {
        PathBuf::from(&config.runner.config)
    };
    let store_file = if cli.store_file != "stores.csv" {
        cli.store_file.clone()
    } else {
        config.runner.store_file.clone()
    };
    let worker_file = if cli.worker_file != "workers.csv" {
        cli.worker_file.clone()
    } else {
        config.runner.worker_file.clone()
    };

    let fail_fast = cli.fail_fast || config.runner.fail_fast;
    let limit = cli.limit.or(config.runner.limit);

    let journal_path = if cli.no_journal {
        None
    } else {
        Some(
            cli.journal
                .clone()
                .or_else(|| config.output.journal.as_ref().map(PathBuf::from))
                .unwrap_or_else(|| cli.output.with_extension("ndjson")),
        )
    };

    SweepOptions {
        command,
        config_path,
        store_file,
        worker_file,
        fail_fast,
        limit,
        journal_path,
    }
}
