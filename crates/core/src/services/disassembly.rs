use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

use crate::analysis::analyze;
use crate::ingest::{parse_listing, IngestError};
use crate::model::Program;

/// Environment variable naming a pre-produced listing to use instead of running a disassembler.
pub const FAKE_LISTING_ENV: &str = "STACK_GAUGE_FAKE_LISTING";

#[derive(Debug, Error)]
pub enum DisassemblyError {
    #[error("Binary not found at {0}")]
    MissingBinary(PathBuf),
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed { tool: String, status: ExitStatus, stderr: String },
    #[error("failed to read listing {path}: {source}")]
    ReadListing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Produces a textual disassembly listing for a binary.
pub trait DisassemblyBackend: Send + Sync {
    fn disassemble(&self, binary: &Path) -> Result<String, DisassemblyError>;
    fn name(&self) -> &'static str;
}

/// Disassemble `binary`, ingest the listing, and analyse it.
///
/// The whole listing is collected before ingestion starts.
pub fn load_program(
    backend: &dyn DisassemblyBackend,
    binary: &Path,
) -> Result<Program, DisassemblyError> {
    if !binary.is_file() {
        return Err(DisassemblyError::MissingBinary(binary.to_path_buf()));
    }
    let listing = backend.disassemble(binary)?;
    let functions = parse_listing(&listing)?;
    log::debug!(
        "{}: ingested {} functions from {}",
        backend.name(),
        functions.len(),
        binary.display()
    );
    Ok(analyze(functions))
}

/// Backend selected from the environment: a fake listing when
/// `STACK_GAUGE_FAKE_LISTING` is set, objdump otherwise.
pub fn default_backend() -> Box<dyn DisassemblyBackend> {
    match std::env::var_os(FAKE_LISTING_ENV) {
        Some(path) => Box::new(crate::services::backends::ListingFileBackend::new(path)),
        None => Box::new(crate::services::backends::ObjdumpBackend::from_env()),
    }
}
