//! Disassembly ingestion.
//!
//! Turns an objdump-style listing into functions populated with instructions,
//! in listing order. Two line shapes are recognised:
//!
//! ```text
//! 00008000 <leaf>:
//!     8000:	b082      	sub	sp, #8
//! ```
//!
//! Everything else (file headers, section markers, blank lines) is skipped.

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::model::{Function, Instruction};

static FUNCTION_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<addr>[0-9a-fA-F]{8}) <(?P<name>[A-Za-z0-9._$]+)>:$")
        .expect("function header pattern")
});

static INSTRUCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+(?P<addr>[0-9a-fA-F]+):\s+(?P<bytes>[0-9a-fA-F ]+)\s+\t(?P<text>.*)$")
        .expect("instruction pattern")
});

#[derive(Debug, Error)]
pub enum IngestError {
    /// An instruction line appeared before any function header.
    #[error("line {line}: instruction outside of any function (truncated listing?): {text}")]
    OrphanInstruction { line: usize, text: String },
    #[error("line {line}: address {text} does not fit in 64 bits")]
    InvalidAddress { line: usize, text: String },
    #[error("failed to read listing: {0}")]
    Io(#[from] std::io::Error),
}

/// Single-pass listing parser; feed it lines in document order.
#[derive(Debug, Default)]
pub struct ListingParser {
    functions: Vec<Function>,
    line: usize,
}

impl ListingParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed_line(&mut self, text: &str) -> Result<(), IngestError> {
        self.line += 1;
        let text = text.trim_end_matches(['\r', '\n']);

        if let Some(caps) = FUNCTION_HEADER_RE.captures(text) {
            let address = self.parse_address(&caps["addr"])?;
            self.functions.push(Function::new(&caps["name"], address));
            return Ok(());
        }

        if let Some(caps) = INSTRUCTION_RE.captures(text) {
            let address = self.parse_address(&caps["addr"])?;
            let Some(current) = self.functions.last_mut() else {
                return Err(IngestError::OrphanInstruction {
                    line: self.line,
                    text: text.to_string(),
                });
            };
            current.instructions.push(Instruction::new(
                address,
                caps["bytes"].trim(),
                &caps["text"],
            ));
        }

        Ok(())
    }

    fn parse_address(&self, text: &str) -> Result<u64, IngestError> {
        u64::from_str_radix(text, 16)
            .map_err(|_| IngestError::InvalidAddress { line: self.line, text: text.to_string() })
    }

    /// Functions seen so far, in listing order.
    pub fn finish(self) -> Vec<Function> {
        self.functions
    }
}

/// Parse a complete listing held in memory.
pub fn parse_listing(listing: &str) -> Result<Vec<Function>, IngestError> {
    let mut parser = ListingParser::new();
    for line in listing.lines() {
        parser.feed_line(line)?;
    }
    Ok(parser.finish())
}

/// Parse a listing from any buffered reader (file, subprocess pipe).
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<Function>, IngestError> {
    let mut parser = ListingParser::new();
    for line in reader.lines() {
        parser.feed_line(&line?)?;
    }
    Ok(parser.finish())
}
