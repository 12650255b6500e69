//! stack-gauge-core
//!
//! Static worst-case stack usage estimation for embedded binaries.
//!
//! The pipeline is one-way: an objdump listing is ingested into functions
//! (`ingest`), each function's frame size and direct callees are derived
//! (`analysis`), and the resulting immutable `Program` is walked from an
//! entry point (`eval`), with operator call hints (`hints`) covering calls
//! made through function pointers.

pub mod analysis;
pub mod eval;
pub mod hints;
pub mod ingest;
pub mod model;
pub mod plan;
pub mod services;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
