//! Worst-case stack usage evaluation.
//!
//! `usage(F) = F.frame_size + max(usage(C))` over every static and hinted callee
//! `C` of `F`. Paths are re-walked each time they are reached (no memoization),
//! and a function that reappears on its own call path is reported as a cycle.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hints::HintContext;
use crate::model::{FunctionId, Program};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// Recursion (direct or mutual) makes the worst case unbounded.
    #[error("cyclic call graph: {}", path.join(" -> "))]
    CyclicCallGraph { path: Vec<String> },
}

/// One visited function during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Call depth below the entry point.
    pub depth: usize,
    pub name: String,
    pub frame_size: u64,
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:indent$}stack: {} {} bytes", "", self.name, self.frame_size, indent = self.depth * 4)
    }
}

/// Result of measuring one entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub entry: String,
    /// Worst-case cumulative stack bytes; 0 when the entry is missing or ambiguous.
    pub bytes: u64,
    /// Functions in visiting order.
    pub trace: Vec<TraceStep>,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack {} = {}", self.entry, self.bytes)
    }
}

/// Evaluator borrowing an analysed program.
#[derive(Debug, Clone, Copy)]
pub struct StackEvaluator<'p> {
    program: &'p Program,
}

impl<'p> StackEvaluator<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self { program }
    }

    /// Worst-case stack bytes reachable from the function named `entry`.
    ///
    /// Missing and ambiguous names measure as 0 rather than failing.
    pub fn measure(&self, entry: &str) -> Result<Measurement, EvalError> {
        let mut trace = Vec::new();
        let bytes = match self.program.function_by_name(entry) {
            Some(id) => {
                let hints = HintContext::root(self.program.call_hints());
                self.usage(id, &hints, &mut Vec::new(), &mut trace)?
            }
            None => 0,
        };
        Ok(Measurement { entry: entry.to_string(), bytes, trace })
    }

    fn usage(
        &self,
        id: FunctionId,
        hints: &HintContext<'p>,
        path: &mut Vec<FunctionId>,
        trace: &mut Vec<TraceStep>,
    ) -> Result<u64, EvalError> {
        let function = self.program.function(id);

        if let Some(start) = path.iter().position(|&visited| visited == id) {
            let mut cycle: Vec<String> =
                path[start..].iter().map(|&f| self.program.function(f).name.clone()).collect();
            cycle.push(function.name.clone());
            return Err(EvalError::CyclicCallGraph { path: cycle });
        }

        trace.push(TraceStep {
            depth: path.len(),
            name: function.name.clone(),
            frame_size: function.frame_size,
        });

        let hinted = hints.resolve(self.program, &function.name);
        path.push(id);
        let mut deepest = 0;
        for &callee in function.callees.iter().chain(&hinted.callees) {
            deepest = deepest.max(self.usage(callee, &hinted.context, path, trace)?);
        }
        path.pop();

        Ok(function.frame_size.saturating_add(deepest))
    }
}
