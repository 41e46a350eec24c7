//! fsweep binary entry point.

fn main() -> anyhow::Result<()> {
    fsweep_cli::run()
}
