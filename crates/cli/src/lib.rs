use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod commands;

/// Resolve the binary argument to an absolute path.
///
/// Existing paths are canonicalized; anything else is joined onto the current
/// directory so the error message names where we looked.
pub fn resolve_binary_path(binary: &str) -> Result<PathBuf> {
    let path = Path::new(binary);
    match path.canonicalize() {
        Ok(p) => Ok(p),
        Err(_) => {
            let cwd = env::current_dir().context("Failed to get current directory")?;
            Ok(cwd.join(path))
        }
    }
}
