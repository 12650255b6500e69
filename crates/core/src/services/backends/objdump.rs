use std::path::{Path, PathBuf};
use std::process::Command;

use crate::services::disassembly::{DisassemblyBackend, DisassemblyError};

/// Disassembler used when `OBJDUMP` is not set.
pub const DEFAULT_OBJDUMP: &str = "arm-none-eabi-objdump";

/// Shells out to `objdump -d` and captures the whole listing.
#[derive(Debug, Clone)]
pub struct ObjdumpBackend {
    pub tool: PathBuf,
}

impl ObjdumpBackend {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    /// Use `$OBJDUMP`, falling back to the ARM cross objdump.
    pub fn from_env() -> Self {
        let tool = std::env::var_os("OBJDUMP").map(PathBuf::from);
        Self::new(tool.unwrap_or_else(|| PathBuf::from(DEFAULT_OBJDUMP)))
    }
}

impl DisassemblyBackend for ObjdumpBackend {
    fn disassemble(&self, binary: &Path) -> Result<String, DisassemblyError> {
        let tool = self.tool.display().to_string();
        log::debug!("running {tool} -d {}", binary.display());
        let output = Command::new(&self.tool)
            .arg("-d")
            .arg(binary)
            .output()
            .map_err(|source| DisassemblyError::Spawn { tool: tool.clone(), source })?;
        if !output.status.success() {
            return Err(DisassemblyError::ToolFailed {
                tool,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn name(&self) -> &'static str {
        "objdump"
    }
}
