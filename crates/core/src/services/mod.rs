pub mod backends;
pub mod disassembly;
