//! Call-graph analysis.
//!
//! Derives, for every ingested function independently, its stack frame size
//! and the set of callees reachable through literal branch targets, then
//! freezes the result into a [`Program`].

use std::collections::HashMap;

use log::{debug, log_enabled, Level};

use crate::ingest::{parse_listing, IngestError};
use crate::model::{Function, FunctionId, InstructionKind, Program};

/// Analyse ingested functions and return the immutable program.
pub fn analyze(mut functions: Vec<Function>) -> Program {
    let by_address = index_entry_addresses(&functions);

    for function in &mut functions {
        function.frame_size = frame_size(function);
        function.callees = direct_callees(function, &by_address);
    }

    let program = Program::from_parts(functions, by_address);
    if log_enabled!(Level::Debug) {
        log_unresolved_targets(&program);
    }
    program
}

/// Parse and analyse a listing in one step.
pub fn analyze_listing(listing: &str) -> Result<Program, IngestError> {
    Ok(analyze(parse_listing(listing)?))
}

/// Entry address -> function. When several symbols share an address the first one wins.
fn index_entry_addresses(functions: &[Function]) -> HashMap<u64, FunctionId> {
    let mut index = HashMap::with_capacity(functions.len());
    for (idx, function) in functions.iter().enumerate() {
        index.entry(function.entry_address).or_insert(FunctionId(idx));
    }
    index
}

/// Immediate of the last stack-pointer decrement, or 0.
///
/// Heuristic only: conditional or multi-instruction frame setups are not tracked.
pub fn frame_size(function: &Function) -> u64 {
    function
        .instructions
        .iter()
        .filter_map(|insn| match insn.kind {
            InstructionKind::StackAdjust { bytes } => Some(bytes),
            _ => None,
        })
        .last()
        .unwrap_or(0)
}

/// Callees named by literal branch targets. Targets outside the listing are dropped.
pub fn direct_callees(function: &Function, by_address: &HashMap<u64, FunctionId>) -> Vec<FunctionId> {
    let mut callees = Vec::new();
    for insn in &function.instructions {
        let InstructionKind::Branch { target } = insn.kind else {
            continue;
        };
        if let Some(&callee) = by_address.get(&target) {
            if !callees.contains(&callee) {
                callees.push(callee);
            }
        }
    }
    callees
}

fn log_unresolved_targets(program: &Program) {
    for function in program.functions() {
        for insn in &function.instructions {
            let InstructionKind::Branch { target } = insn.kind else {
                continue;
            };
            if program.function_at(target).is_some() {
                continue;
            }
            match program.function_containing(target) {
                Some(id) => debug!(
                    "{}: branch at {:#x} lands inside {}; not a call",
                    function.name,
                    insn.address,
                    program.function(id).name
                ),
                None => debug!(
                    "{}: branch at {:#x} targets {:#x} outside the listing; dropped",
                    function.name, insn.address, target
                ),
            }
        }
    }
}
