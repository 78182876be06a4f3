//! External tool boundary
//!
//! Resolves a case's binary or object to a unique file, builds the
//! profiler or disassembler command line, runs it in a fresh scratch
//! directory and hands back the captured text.
//!
//! Each invocation gets its own [`tempfile::TempDir`], so the profiler's
//! fixed-name output file never collides between cases. There is no
//! timeout: a hung tool blocks its case.

mod command;
mod resolve;

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::{HarnessConfig, ToolPaths};
use crate::disasm::{ListingStyle, SymbolSet};
use crate::error::{HarnessError, Result};

pub use command::{
    disassembler_command, profiler_command, OutputSource, ToolCommand, PROFILE_OUTPUT_FILE,
};
pub use resolve::resolve_artifact;

/// Lines of stderr kept in a [`HarnessError::ToolExecution`]
const STDERR_TAIL_LINES: usize = 20;

/// Runs the external profiler and disassembler for golden cases
#[derive(Debug, Clone)]
pub struct ExternalToolRunner {
    tools: ToolPaths,
    build_root: PathBuf,
    style: ListingStyle,
    disable_aslr: bool,
}

impl ExternalToolRunner {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            tools: config.tools.clone(),
            build_root: config.build_root.clone(),
            style: config.disassembler,
            disable_aslr: config.disable_aslr,
        }
    }

    /// Profile `binary` and return the raw profiler output
    pub fn profile(&self, binary: &str, function: Option<&str>, args: &[String]) -> Result<String> {
        let binary = resolve_artifact(binary, &self.build_root)?;
        let command = profiler_command(&self.tools, &binary, function, args, self.disable_aslr);
        self.execute(&command)
    }

    /// Disassemble `object` and return the raw listing
    pub fn disassemble(&self, object: &str, symbols: &SymbolSet) -> Result<String> {
        let object = resolve_artifact(object, &self.build_root)?;
        let command = disassembler_command(&self.tools, self.style, &object, symbols);
        self.execute(&command)
    }

    /// Run a command to completion in a new scratch directory
    ///
    /// # Errors
    /// Spawn failures, any non-zero exit, and an unreadable output file are
    /// all fatal; nothing is retried.
    pub fn execute(&self, command: &ToolCommand) -> Result<String> {
        let scratch = tempfile::tempdir().map_err(|e| HarnessError::io(std::env::temp_dir(), e))?;
        info!("running {}", command);
        debug!("scratch directory {}", scratch.path().display());

        let output = Command::new(&command.program)
            .args(&command.args)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(scratch.path())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| HarnessError::ToolSpawn {
                program: command.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(HarnessError::ToolExecution {
                program: command.program.clone(),
                code: output.status.code(),
                stderr: stderr_tail(&output.stderr),
            });
        }
        debug!("{} exited successfully", command.program);

        match command.output {
            OutputSource::Stdout => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            OutputSource::ScratchFile(name) => {
                let path = scratch.path().join(name);
                let bytes = std::fs::read(&path).map_err(|e| HarnessError::io(&path, e))?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
