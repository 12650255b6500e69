use anyhow::Result;
use clap::Parser;

/// Worst-case stack usage estimator for embedded binaries.
///
/// This CLI is a thin wrapper around `stack-gauge-core` (exposed in code as
/// `stack_gauge_core`). It disassembles the given binary with objdump and
/// measures the fixed set of entry points compiled into the query plan.
#[derive(Parser, Debug)]
#[command(
    name = "stack-gauge",
    version,
    about = "Estimate worst-case stack usage of an embedded binary",
    long_about = None
)]
struct Cli {
    /// Binary to disassemble (set OBJDUMP to pick the disassembler).
    binary: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    stack_gauge::commands::measure_command(&cli.binary)
}
