//! Call-hint resolution.
//!
//! Hints cover calls made through function pointers. A hint `[A, B, C]` means:
//! when visiting `A`, also descend into `B`; while inside that descent, visiting
//! `B` also descends into `C`. The active hint chains are re-filtered at every
//! step of the walk and never mutated.

use log::warn;

use crate::model::{CallHint, FunctionId, NameLookup, Program};

/// Hint chains active at one point of a call-path walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintContext<'a> {
    chains: Vec<&'a [String]>,
}

/// Extra callees for one function plus the context its children inherit.
#[derive(Debug, Clone)]
pub struct HintResolution<'a> {
    pub callees: Vec<FunctionId>,
    pub context: HintContext<'a>,
}

impl<'a> HintContext<'a> {
    /// Context at the entry point: every hint of the program.
    pub fn root(hints: &'a [CallHint]) -> Self {
        Self { chains: hints.iter().map(CallHint::chain).filter(|c| !c.is_empty()).collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn chains(&self) -> &[&'a [String]] {
        &self.chains
    }

    /// Resolve the hints that apply to `function_name`.
    ///
    /// With no matching hint the context is handed on unchanged. Otherwise the
    /// children see only the tails of the matching chains, and each tail's head
    /// becomes an extra callee.
    pub fn resolve(&self, program: &Program, function_name: &str) -> HintResolution<'a> {
        let tails: Vec<&'a [String]> = self
            .chains
            .iter()
            .copied()
            .filter(|chain| chain.first().map(String::as_str) == Some(function_name))
            .map(|chain| &chain[1..])
            .filter(|tail| !tail.is_empty())
            .collect();

        if tails.is_empty() && !self.matches(function_name) {
            return HintResolution { callees: Vec::new(), context: self.clone() };
        }

        let callees = tails.iter().filter_map(|tail| resolve_hinted(program, &tail[0])).collect();
        HintResolution { callees, context: HintContext { chains: tails } }
    }

    fn matches(&self, function_name: &str) -> bool {
        self.chains.iter().any(|chain| chain.first().map(String::as_str) == Some(function_name))
    }
}

fn resolve_hinted(program: &Program, name: &str) -> Option<FunctionId> {
    if program.lookup(name) == NameLookup::Missing {
        warn!("call hint names unknown function {name}");
        return None;
    }
    program.function_by_name(name)
}
