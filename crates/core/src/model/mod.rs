//! Core data model (IR) for disassembly listings.
//!
//! This module contains:
//! - `Instruction`: one decoded line of a listing, with its classification
//! - `Function`: a symbol's contiguous instruction run plus derived facts
//! - `CallHint`: an operator-supplied call chain covering indirect calls
//! - `Program`: the owning aggregate, immutable once analysed

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::eval::{EvalError, Measurement, StackEvaluator};

/// Index of a function inside its owning [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(pub usize);

/// Mnemonics starting with `b` that are not branches.
const NON_BRANCH_B_PREFIXES: &[&str] = &["bic", "bfi", "bfc", "bkpt"];

/// Stack-pointer decrement mnemonics recognised as frame allocation.
const STACK_ADJUST_MNEMONICS: &[&str] = &["sub", "sub.w", "subw"];

/// Classification of a decoded instruction, computed once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    /// `sub sp, #N`: reserves `bytes` of stack.
    StackAdjust { bytes: u64 },
    /// Branch whose target the disassembler resolved to a literal address.
    Branch { target: u64 },
    /// Branch through a register or computed operand.
    IndirectBranch,
    Other,
}

impl InstructionKind {
    /// Classify an instruction from its mnemonic and operand text (comment already removed).
    pub fn classify(opcode: &str, operands: &str) -> Self {
        if let Some(bytes) = stack_adjust_bytes(opcode, operands) {
            return InstructionKind::StackAdjust { bytes };
        }
        if is_branch_mnemonic(opcode) {
            return match literal_branch_target(operands) {
                Some(target) => InstructionKind::Branch { target },
                None => InstructionKind::IndirectBranch,
            };
        }
        InstructionKind::Other
    }
}

fn is_branch_mnemonic(opcode: &str) -> bool {
    opcode.starts_with('b') && !NON_BRANCH_B_PREFIXES.iter().any(|p| opcode.starts_with(p))
}

fn stack_adjust_bytes(opcode: &str, operands: &str) -> Option<u64> {
    if !STACK_ADJUST_MNEMONICS.contains(&opcode) || !operands.starts_with("sp, ") {
        return None;
    }
    let (_, immediate) = operands.split_once('#')?;
    let immediate = immediate.split(|c: char| c == ',' || c.is_whitespace()).next()?;
    parse_immediate(immediate)
}

fn parse_immediate(text: &str) -> Option<u64> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// `8000 <leaf>` or `800c <main+0xc>`: a hex address annotated with its symbol.
fn literal_branch_target(operands: &str) -> Option<u64> {
    let (address, _) = operands.split_once(" <")?;
    let address = address.trim();
    let address = address.strip_prefix("0x").unwrap_or(address);
    u64::from_str_radix(address, 16).ok()
}

/// One disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub address: u64,
    /// Encoded bytes as printed by the disassembler; stored, never interpreted.
    pub raw_bytes: String,
    pub opcode: String,
    pub operands: String,
    pub comment: String,
    pub kind: InstructionKind,
}

impl Instruction {
    /// Build an instruction from the decoded text column of a listing line.
    ///
    /// The mnemonic ends at the first tab (or whitespace when there is no tab);
    /// anything after a `;` in the remainder is the comment.
    pub fn new(address: u64, raw_bytes: impl Into<String>, decoded: &str) -> Self {
        let decoded = decoded.trim();
        let (opcode, rest) = decoded
            .split_once('\t')
            .or_else(|| decoded.split_once(char::is_whitespace))
            .unwrap_or((decoded, ""));
        let (operands, comment) = rest.split_once(';').unwrap_or((rest, ""));
        let opcode = opcode.trim();
        let operands = operands.trim();

        Self {
            address,
            raw_bytes: raw_bytes.into(),
            opcode: opcode.to_string(),
            operands: operands.to_string(),
            comment: comment.trim().to_string(),
            kind: InstructionKind::classify(opcode, operands),
        }
    }
}

/// A symbol's instructions plus the facts the call-graph analyzer derives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub entry_address: u64,
    pub instructions: Vec<Instruction>,
    /// Bytes reserved by the prologue; 0 until analysed or when none is found.
    pub frame_size: u64,
    /// Statically resolved callees, in discovery order, without duplicates.
    pub callees: Vec<FunctionId>,
}

impl Function {
    pub fn new(name: impl Into<String>, entry_address: u64) -> Self {
        Self {
            name: name.into(),
            entry_address,
            instructions: Vec::new(),
            frame_size: 0,
            callees: Vec::new(),
        }
    }

    /// Whether `address` falls within `[entry_address, last instruction]`.
    pub fn contains_address(&self, address: u64) -> bool {
        match self.instructions.last() {
            Some(last) => address >= self.entry_address && address <= last.address,
            None => address == self.entry_address,
        }
    }
}

/// Operator-supplied call chain `[caller, callee, grand-callee, ...]`.
///
/// Used to patch calls made through function pointers into the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallHint {
    chain: Vec<String>,
}

impl CallHint {
    pub fn new<I, S>(chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { chain: chain.into_iter().map(Into::into).collect() }
    }

    pub fn caller(&self) -> Option<&str> {
        self.chain.first().map(String::as_str)
    }

    pub fn chain(&self) -> &[String] {
        &self.chain
    }
}

/// Outcome of resolving a symbol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLookup {
    Found(FunctionId),
    Missing,
    /// The name is shared by this many functions.
    Ambiguous(usize),
}

/// The analysed program: every function of the listing plus call hints.
///
/// Built by [`crate::analysis::analyze`]; afterwards only shared access is handed out.
#[derive(Debug, Clone)]
pub struct Program {
    functions: Vec<Function>,
    call_hints: Vec<CallHint>,
    by_address: HashMap<u64, FunctionId>,
}

impl Program {
    pub(crate) fn from_parts(functions: Vec<Function>, by_address: HashMap<u64, FunctionId>) -> Self {
        Self { functions, call_hints: Vec::new(), by_address }
    }

    /// Attach call hints before evaluation.
    pub fn with_call_hints(mut self, hints: impl IntoIterator<Item = CallHint>) -> Self {
        self.call_hints.extend(hints);
        self
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.0]
    }

    pub fn call_hints(&self) -> &[CallHint] {
        &self.call_hints
    }

    /// Function whose entry address is exactly `address`.
    pub fn function_at(&self, address: u64) -> Option<FunctionId> {
        self.by_address.get(&address).copied()
    }

    /// Function whose address range covers `address` (first in listing order).
    pub fn function_containing(&self, address: u64) -> Option<FunctionId> {
        self.functions.iter().position(|f| f.contains_address(address)).map(FunctionId)
    }

    pub fn lookup(&self, name: &str) -> NameLookup {
        let mut matches = self.functions.iter().enumerate().filter(|(_, f)| f.name == name);
        match (matches.next(), matches.count()) {
            (None, _) => NameLookup::Missing,
            (Some((idx, _)), 0) => NameLookup::Found(FunctionId(idx)),
            (Some(_), rest) => NameLookup::Ambiguous(rest + 1),
        }
    }

    /// Resolve a name, failing closed on duplicates.
    ///
    /// Ambiguous names are reported through the log and treated like missing ones.
    pub fn function_by_name(&self, name: &str) -> Option<FunctionId> {
        match self.lookup(name) {
            NameLookup::Found(id) => Some(id),
            NameLookup::Missing => None,
            NameLookup::Ambiguous(count) => {
                warn!("more than one function named {name} ({count} symbols); ignoring it");
                None
            }
        }
    }

    /// Worst-case stack usage starting at `entry`. See [`StackEvaluator::measure`].
    pub fn measure(&self, entry: &str) -> Result<Measurement, EvalError> {
        StackEvaluator::new(self).measure(entry)
    }
}
