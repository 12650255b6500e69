//! Query plans: which call hints to apply and which entry points to measure.
//!
//! The built-in plan targets the cifra ARM test binary (`plan/cifra.json`) and
//! is compiled into the crate; editing that file is how queries are added.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CallHint, Program};

const BUILTIN_PLAN: &str = include_str!("cifra.json");

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to parse query plan JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryPlan {
    /// Call sequences known to happen through function pointers.
    #[serde(default)]
    pub call_hints: Vec<CallHint>,
    /// Entry points to measure, in reporting order.
    pub queries: Vec<String>,
}

impl QueryPlan {
    pub fn from_json(body: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn builtin() -> Result<Self, PlanError> {
        Self::from_json(BUILTIN_PLAN)
    }

    /// Attach this plan's hints to an analysed program.
    pub fn apply_hints(&self, program: Program) -> Program {
        program.with_call_hints(self.call_hints.iter().cloned())
    }
}
