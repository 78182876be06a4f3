//! Harness configuration
//!
//! One [`HarnessConfig`] value describes a fixture directory: which kind of
//! golden artifact its cases produce, where build outputs live, and how the
//! external tools are invoked. It is passed explicitly into the registry;
//! nothing here is global.
//!
//! Values come from defaults, then an optional `perfgold.toml` in the
//! fixture directory, then command-line overrides.
//!
//! # Example TOML
//! ```toml
//! kind = "disassembly"
//! build_root = "../../build"
//! disassembler = "objdump"
//!
//! [tools]
//! objdump = "/usr/bin/objdump"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::disasm::ListingStyle;
use crate::error::{HarnessError, Result};
use crate::profile::AttributionMode;

/// Name of the per-fixture-directory configuration file
pub const CONFIG_FILE_NAME: &str = "perfgold.toml";

/// What a fixture directory's cases produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseKind {
    /// Per-function instruction counts from the call-graph profiler
    #[default]
    Profile,
    /// Normalized disassembly of the case's symbols
    Disassembly,
}

/// Program names or paths of the external tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolPaths {
    pub valgrind: String,
    pub objdump: String,
    pub gdb: String,
    pub setarch: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            valgrind: "valgrind".to_string(),
            objdump: "objdump".to_string(),
            gdb: "gdb".to_string(),
            setarch: "setarch".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Directory holding case descriptors and golden artifacts
    #[serde(skip)]
    pub fixture_dir: PathBuf,

    /// Root searched recursively for case binaries and objects
    pub build_root: PathBuf,

    pub kind: CaseKind,

    /// Attribution for profile cases; SELF goldens also carry a " total" entry
    pub attribution: AttributionMode,

    /// Tool used for disassembly cases
    pub disassembler: ListingStyle,

    /// Run the profiler under `setarch -R` so the address space layout is fixed
    pub disable_aslr: bool,

    pub tools: ToolPaths,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixture_dir: PathBuf::from("."),
            build_root: PathBuf::from("build"),
            kind: CaseKind::default(),
            attribution: AttributionMode::default(),
            disassembler: ListingStyle::default(),
            disable_aslr: true,
            tools: ToolPaths::default(),
        }
    }
}

impl HarnessConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| HarnessError::Config(e.to_string()))
    }

    /// Configuration for a fixture directory, reading its `perfgold.toml`
    /// when present.
    ///
    /// A relative `build_root` in the file is taken relative to the fixture
    /// directory.
    pub fn for_fixture_dir(fixture_dir: impl Into<PathBuf>) -> Result<Self> {
        let fixture_dir = fixture_dir.into();
        let config_path = fixture_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.is_file() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| HarnessError::io(&config_path, e))?;
            let mut config = Self::from_toml_str(&content)?;
            if config.build_root.is_relative() {
                config.build_root = fixture_dir.join(&config.build_root);
            }
            tracing::debug!("loaded {}", config_path.display());
            config
        } else {
            Self::default()
        };

        config.fixture_dir = fixture_dir;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.fixture_dir.is_dir() {
            return Err(HarnessError::Config(format!(
                "fixture directory {} does not exist",
                self.fixture_dir.display()
            )));
        }
        Ok(())
    }

    /// Where the golden artifact for `case_id` lives
    ///
    /// Profiles: `_<case>.<mode>.json`; disassembly: `<case>.dis`.
    pub fn golden_path(&self, case_id: &str) -> PathBuf {
        self.fixture_dir
            .join(golden_file_name(case_id, self.kind, self.attribution))
    }

    pub fn fixture_dir(&self) -> &Path {
        &self.fixture_dir
    }
}

fn golden_file_name(case_id: &str, kind: CaseKind, attribution: AttributionMode) -> String {
    match kind {
        CaseKind::Profile => format!("_{}.{}.json", case_id, attribution.as_str()),
        CaseKind::Disassembly => format!("{}.dis", case_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.kind, CaseKind::Profile);
        assert_eq!(config.attribution, AttributionMode::SelfCost);
        assert_eq!(config.disassembler, ListingStyle::Static);
        assert!(config.disable_aslr);
        assert_eq!(config.tools.valgrind, "valgrind");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HarnessConfig::from_toml_str(
            "kind = \"disassembly\"\ndisassembler = \"gdb\"\n[tools]\ngdb = \"/opt/gdb\"\n",
        )
        .unwrap();
        assert_eq!(config.kind, CaseKind::Disassembly);
        assert_eq!(config.disassembler, ListingStyle::Debugger);
        assert_eq!(config.tools.gdb, "/opt/gdb");
        assert_eq!(config.tools.objdump, "objdump");
        assert!(config.disable_aslr);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = HarnessConfig::from_toml_str("kindd = \"profile\"\n").unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn test_fixture_dir_config_resolves_build_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(file, "build_root = \"out\"\nattribution = \"total\"").unwrap();

        let config = HarnessConfig::for_fixture_dir(dir.path()).unwrap();
        assert_eq!(config.build_root, dir.path().join("out"));
        assert_eq!(config.attribution, AttributionMode::Total);
        assert_eq!(config.fixture_dir, dir.path());
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_fixture_dir_fails_validation() {
        let config = HarnessConfig::for_fixture_dir("/nonexistent/perfgold/fixtures").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_golden_paths() {
        let mut config = HarnessConfig {
            fixture_dir: PathBuf::from("fx"),
            ..HarnessConfig::default()
        };
        assert_eq!(config.golden_path("add"), PathBuf::from("fx/_add.self.json"));

        config.attribution = AttributionMode::Total;
        assert_eq!(config.golden_path("add"), PathBuf::from("fx/_add.total.json"));

        config.kind = CaseKind::Disassembly;
        assert_eq!(config.golden_path("add"), PathBuf::from("fx/add.dis"));
    }
}
