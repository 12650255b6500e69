use std::io::{self, Write};

use anyhow::{Context, Result};
use stack_gauge_core::eval::Measurement;
use stack_gauge_core::model::Program;
use stack_gauge_core::plan::QueryPlan;
use stack_gauge_core::services::disassembly::{default_backend, load_program};

use crate::resolve_binary_path;

/// Disassemble `binary` and print the stack usage of every planned entry point.
pub fn measure_command(binary: &str) -> Result<()> {
    let path = resolve_binary_path(binary)?;
    let backend = default_backend();
    let program = load_program(backend.as_ref(), &path)
        .with_context(|| format!("Failed to load program from {}", path.display()))?;
    let plan = QueryPlan::builtin().context("Failed to load built-in query plan")?;
    let program = plan.apply_hints(program);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_plan(&program, &plan, &mut out)
}

/// Measure each query in plan order, writing its trace and total as soon as it is known.
pub fn run_plan(program: &Program, plan: &QueryPlan, out: &mut impl Write) -> Result<()> {
    for entry in &plan.queries {
        let measurement = program
            .measure(entry)
            .with_context(|| format!("Failed to measure stack usage of {entry}"))?;
        write_measurement(&measurement, out)?;
    }
    Ok(())
}

/// Trace lines (indented by call depth) followed by `stack <name> = <bytes>`.
pub fn write_measurement(measurement: &Measurement, out: &mut impl Write) -> Result<()> {
    for step in &measurement.trace {
        writeln!(out, "{step}")?;
    }
    writeln!(out, "{measurement}")?;
    Ok(())
}
