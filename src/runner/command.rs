use std::fmt;
use std::path::Path;

use crate::config::ToolPaths;
use crate::disasm::{ListingStyle, SymbolSet};

/// Fixed name of the profiler's output file inside the scratch directory
pub const PROFILE_OUTPUT_FILE: &str = "callgrind.out";

/// Where a tool leaves the text we parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSource {
    Stdout,
    /// File written into the scratch working directory
    ScratchFile(&'static str),
}

/// Fully built external tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub output: OutputSource,
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Callgrind invocation for one case
///
/// `function` scopes collection with `--toggle-collect`. Lazy binding is
/// disabled so PLT resolution never shows up as cost, and with
/// `disable_aslr` the run is wrapped in `setarch <arch> -R`.
pub fn profiler_command(
    tools: &ToolPaths,
    binary: &Path,
    function: Option<&str>,
    process_args: &[String],
    disable_aslr: bool,
) -> ToolCommand {
    let mut argv: Vec<String> = Vec::new();
    if disable_aslr {
        argv.push(tools.setarch.clone());
        argv.push(std::env::consts::ARCH.to_string());
        argv.push("-R".to_string());
    }
    argv.push(tools.valgrind.clone());
    argv.push("--tool=callgrind".to_string());
    argv.push(format!("--callgrind-out-file={}", PROFILE_OUTPUT_FILE));
    if let Some(function) = function {
        argv.push(format!("--toggle-collect={}", function));
    }
    argv.push(binary.display().to_string());
    argv.extend(process_args.iter().cloned());

    let program = argv.remove(0);
    ToolCommand {
        program,
        args: argv,
        env: vec![("LD_BIND_NOW".to_string(), "1".to_string())],
        output: OutputSource::ScratchFile(PROFILE_OUTPUT_FILE),
    }
}

/// Disassembler invocation for one case
pub fn disassembler_command(
    tools: &ToolPaths,
    style: ListingStyle,
    object: &Path,
    symbols: &SymbolSet,
) -> ToolCommand {
    let object = object.display().to_string();

    match style {
        ListingStyle::Static => ToolCommand {
            program: tools.objdump.clone(),
            args: vec![
                "-d".to_string(),
                "-C".to_string(),
                "-r".to_string(),
                "--no-show-raw-insn".to_string(),
                object,
            ],
            env: Vec::new(),
            output: OutputSource::Stdout,
        },
        ListingStyle::Debugger => {
            let mut args = vec![
                "-batch".to_string(),
                "-nx".to_string(),
                "-ex".to_string(),
                "set disassembly-flavor att".to_string(),
                "-ex".to_string(),
                "set print asm-demangle on".to_string(),
            ];
            for symbol in symbols.iter() {
                args.push("-ex".to_string());
                args.push(format!("disassemble '{}'", symbol));
            }
            args.push(object);

            ToolCommand {
                program: tools.gdb.clone(),
                args,
                env: Vec::new(),
                output: OutputSource::Stdout,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_profiler_command_scoped_without_aslr_wrapper() {
        let cmd = profiler_command(
            &ToolPaths::default(),
            &PathBuf::from("/build/bench"),
            Some("run_block"),
            &["--iterations".to_string(), "3".to_string()],
            false,
        );

        assert_eq!(cmd.program, "valgrind");
        assert_eq!(
            cmd.args,
            vec![
                "--tool=callgrind",
                "--callgrind-out-file=callgrind.out",
                "--toggle-collect=run_block",
                "/build/bench",
                "--iterations",
                "3",
            ]
        );
        assert_eq!(cmd.env, vec![("LD_BIND_NOW".to_string(), "1".to_string())]);
        assert_eq!(cmd.output, OutputSource::ScratchFile(PROFILE_OUTPUT_FILE));
    }

    #[test]
    fn test_profiler_command_with_aslr_disabled() {
        let cmd = profiler_command(
            &ToolPaths::default(),
            &PathBuf::from("bench"),
            None,
            &[],
            true,
        );

        assert_eq!(cmd.program, "setarch");
        assert_eq!(cmd.args[0], std::env::consts::ARCH);
        assert_eq!(cmd.args[1], "-R");
        assert_eq!(cmd.args[2], "valgrind");
        assert!(!cmd.args.iter().any(|a| a.starts_with("--toggle-collect")));
    }

    #[test]
    fn test_objdump_command() {
        let cmd = disassembler_command(
            &ToolPaths::default(),
            ListingStyle::Static,
            &PathBuf::from("lib.o"),
            &SymbolSet::new(["f"]),
        );
        assert_eq!(cmd.to_string(), "objdump -d -C -r --no-show-raw-insn lib.o");
        assert_eq!(cmd.output, OutputSource::Stdout);
    }

    #[test]
    fn test_gdb_command_disassembles_each_symbol() {
        let cmd = disassembler_command(
            &ToolPaths::default(),
            ListingStyle::Debugger,
            &PathBuf::from("bench"),
            &SymbolSet::new(["main", "add"]),
        );
        assert_eq!(cmd.program, "gdb");
        let disassembles: Vec<&String> = cmd
            .args
            .iter()
            .filter(|a| a.starts_with("disassemble"))
            .collect();
        assert_eq!(disassembles, ["disassemble 'main'", "disassemble 'add'"]);
        assert_eq!(cmd.args.last().map(String::as_str), Some("bench"));
    }
}
