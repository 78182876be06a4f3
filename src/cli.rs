//! CLI argument parsing for perfgold

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{CaseKind, HarnessConfig};
use crate::disasm::ListingStyle;
use crate::profile::AttributionMode;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per case plus a totals line (default)
    Text,
    /// JSON document for CI tooling
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Profile,
    Disassembly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AttributionArg {
    #[value(name = "self")]
    SelfCost,
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DisassemblerArg {
    Objdump,
    Gdb,
}

#[derive(Parser, Debug)]
#[command(name = "perfgold")]
#[command(version)]
#[command(
    about = "Golden-file regression tests for instruction-count profiles and disassembly",
    long_about = None
)]
pub struct Cli {
    /// Fixture directory holding case descriptors and golden artifacts
    #[arg(short = 'd', long = "fixtures", value_name = "DIR", default_value = ".", global = true)]
    pub fixture_dir: PathBuf,

    /// Root searched for case binaries (overrides perfgold.toml)
    #[arg(long = "build-root", value_name = "DIR", global = true)]
    pub build_root: Option<PathBuf>,

    /// Kind of artifact the cases produce
    #[arg(long, value_enum, global = true)]
    pub kind: Option<KindArg>,

    /// Cost attribution for profile cases
    #[arg(long, value_enum, global = true)]
    pub attribution: Option<AttributionArg>,

    /// Disassembler for disassembly cases
    #[arg(long, value_enum, global = true)]
    pub disassembler: Option<DisassemblerArg>,

    /// Run the profiler without `setarch -R`
    #[arg(long = "no-aslr-wrapper", global = true)]
    pub no_aslr_wrapper: bool,

    /// Only run these cases (repeatable)
    #[arg(long = "case", value_name = "ID", global = true)]
    pub cases: Vec<String>,

    /// Report format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable verbose tracing to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compare fresh output of every case against its golden artifact (default)
    Verify,
    /// Overwrite golden artifacts with fresh output
    Generate,
}

impl Cli {
    /// Subcommand to run; bare `perfgold` verifies
    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or(Command::Verify)
    }

    /// Apply command-line overrides on top of file configuration
    pub fn apply_overrides(&self, config: &mut HarnessConfig) {
        if let Some(build_root) = &self.build_root {
            config.build_root = build_root.clone();
        }
        if let Some(kind) = self.kind {
            config.kind = match kind {
                KindArg::Profile => CaseKind::Profile,
                KindArg::Disassembly => CaseKind::Disassembly,
            };
        }
        if let Some(attribution) = self.attribution {
            config.attribution = match attribution {
                AttributionArg::SelfCost => AttributionMode::SelfCost,
                AttributionArg::Total => AttributionMode::Total,
            };
        }
        if let Some(disassembler) = self.disassembler {
            config.disassembler = match disassembler {
                DisassemblerArg::Objdump => ListingStyle::Static,
                DisassemblerArg::Gdb => ListingStyle::Debugger,
            };
        }
        if self.no_aslr_wrapper {
            config.disable_aslr = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_verifies_current_dir() {
        let cli = Cli::try_parse_from(["perfgold"]).unwrap();
        assert_eq!(cli.selected_command(), Command::Verify);
        assert_eq!(cli.fixture_dir, PathBuf::from("."));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.cases.is_empty());
    }

    #[test]
    fn test_generate_with_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "perfgold",
            "generate",
            "--fixtures",
            "tests/fixtures",
            "--case",
            "add",
            "--case",
            "mul",
        ])
        .unwrap();
        assert_eq!(cli.selected_command(), Command::Generate);
        assert_eq!(cli.fixture_dir, PathBuf::from("tests/fixtures"));
        assert_eq!(cli.cases, vec!["add", "mul"]);
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let cli = Cli::try_parse_from([
            "perfgold",
            "--build-root",
            "/tmp/build",
            "--kind",
            "disassembly",
            "--attribution",
            "total",
            "--disassembler",
            "gdb",
            "--no-aslr-wrapper",
        ])
        .unwrap();

        let mut config = HarnessConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.build_root, PathBuf::from("/tmp/build"));
        assert_eq!(config.kind, CaseKind::Disassembly);
        assert_eq!(config.attribution, AttributionMode::Total);
        assert_eq!(config.disassembler, ListingStyle::Debugger);
        assert!(!config.disable_aslr);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = Cli::try_parse_from(["perfgold", "verify"]).unwrap();
        let mut config = HarnessConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn test_attribution_value_names() {
        assert!(Cli::try_parse_from(["perfgold", "--attribution", "self"]).is_ok());
        assert!(Cli::try_parse_from(["perfgold", "--attribution", "inclusive"]).is_err());
        assert!(Cli::try_parse_from(["perfgold", "--format", "json"]).is_ok());
    }
}
