use std::path::Path;

use serde::Deserialize;

use crate::config::CaseKind;
use crate::disasm::SymbolSet;
use crate::error::{HarnessError, Result};

/// Read-only description of one golden case, loaded from `<id>.json`
///
/// # Example JSON
/// ```json
/// {
///   "binary_name": "release/**/interp_bench",
///   "function_name": "run_block",
///   "args": ["--iterations", "1"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenCase {
    pub id: String,
    /// Absolute path, or glob resolved to a unique file under the build root
    pub binary_name: String,
    /// Scopes profiler collection to this function
    pub function_name: Option<String>,
    pub args: Vec<String>,
    /// Symbols kept from a disassembly listing
    pub symbols: SymbolSet,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Descriptor {
    binary_name: String,
    #[serde(default)]
    function_name: Option<String>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    symbols: SymbolSet,
}

impl GoldenCase {
    /// Load the descriptor at `path`; the case id is the file stem
    pub fn load(path: &Path, kind: CaseKind) -> Result<Self> {
        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| HarnessError::Descriptor {
                path: path.to_path_buf(),
                message: "file name is not valid UTF-8".to_string(),
            })?
            .to_string();
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::from_json(id, &content, kind).map_err(|message| HarnessError::Descriptor {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_json(id: String, content: &str, kind: CaseKind) -> std::result::Result<Self, String> {
        let descriptor: Descriptor = serde_json::from_str(content).map_err(|e| e.to_string())?;

        if descriptor.binary_name.trim().is_empty() {
            return Err("binary_name is empty".to_string());
        }
        if kind == CaseKind::Disassembly && descriptor.symbols.is_empty() {
            return Err("disassembly cases need at least one symbol".to_string());
        }

        Ok(Self {
            id,
            binary_name: descriptor.binary_name,
            function_name: descriptor.function_name,
            args: descriptor.args,
            symbols: descriptor.symbols,
        })
    }
}
