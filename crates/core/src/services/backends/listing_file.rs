use std::fs;
use std::path::{Path, PathBuf};

use crate::services::disassembly::{DisassemblyBackend, DisassemblyError};

/// Reads a listing produced earlier instead of disassembling.
///
/// Lets tests and hosts without a cross toolchain feed canned objdump output.
#[derive(Debug, Clone)]
pub struct ListingFileBackend {
    pub listing: PathBuf,
}

impl ListingFileBackend {
    pub fn new(listing: impl Into<PathBuf>) -> Self {
        Self { listing: listing.into() }
    }
}

impl DisassemblyBackend for ListingFileBackend {
    fn disassemble(&self, _binary: &Path) -> Result<String, DisassemblyError> {
        fs::read_to_string(&self.listing).map_err(|source| DisassemblyError::ReadListing {
            path: self.listing.clone(),
            source,
        })
    }

    fn name(&self) -> &'static str {
        "listing-file"
    }
}
