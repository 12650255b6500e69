//! Builders for synthetic objdump listings shared by the integration tests.
#![allow(dead_code)]

use stack_gauge_core::analysis::analyze_listing;
use stack_gauge_core::model::Program;

/// Assembles an ARM objdump-style listing line by line.
pub struct ListingBuilder {
    lines: Vec<String>,
    next_address: u64,
}

impl ListingBuilder {
    pub fn new() -> Self {
        let lines = [
            "",
            "fixture.elf:     file format elf32-littlearm",
            "",
            "",
            "Disassembly of section .text:",
        ];
        Self { lines: lines.iter().map(|l| l.to_string()).collect(), next_address: 0 }
    }

    pub fn function(mut self, address: u64, name: &str) -> Self {
        self.lines.push(String::new());
        self.lines.push(format!("{address:08x} <{name}>:"));
        self.next_address = address;
        self
    }

    pub fn insn(mut self, bytes: &str, text: &str) -> Self {
        let width = bytes.len().max(9) + 1;
        self.lines.push(format!("    {:x}:\t{bytes:<width$}\t{text}", self.next_address));
        self.next_address += if bytes.contains(' ') { 4 } else { 2 };
        self
    }

    pub fn push_lr(self) -> Self {
        self.insn("b500", "push\t{lr}")
    }

    pub fn sub_sp(self, bytes: u64) -> Self {
        self.insn("b082", &format!("sub\tsp, #{bytes}"))
    }

    pub fn bl(self, target: u64, symbol: &str) -> Self {
        self.insn("f7ff fffe", &format!("bl\t{target:x} <{symbol}>"))
    }

    pub fn blx(self, register: &str) -> Self {
        self.insn("4798", &format!("blx\t{register}"))
    }

    pub fn ret(self) -> Self {
        self.insn("4770", "bx\tlr")
    }

    pub fn build(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    pub fn program(self) -> Program {
        analyze_listing(&self.build()).expect("fixture listing should parse")
    }
}

/// `leaf` (8 bytes) <- `mid` (16 bytes) <- `top` (24 bytes).
pub fn leaf_mid_top() -> ListingBuilder {
    ListingBuilder::new()
        .function(0x8000, "leaf")
        .sub_sp(8)
        .insn("2000", "movs\tr0, #0")
        .insn("b002", "add\tsp, #8")
        .ret()
        .function(0x8008, "mid")
        .push_lr()
        .sub_sp(16)
        .bl(0x8000, "leaf")
        .insn("b004", "add\tsp, #16")
        .insn("bd00", "pop\t{pc}")
        .function(0x8014, "top")
        .push_lr()
        .sub_sp(24)
        .bl(0x8008, "mid")
        .insn("b006", "add\tsp, #24")
        .insn("bd00", "pop\t{pc}")
}
