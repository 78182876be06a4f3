//! perfgold - golden-file regression harness for native performance artifacts
//!
//! This library attributes call-graph profiler output to per-function
//! instruction counts, normalizes disassembly listings so they survive
//! relinking and toolchain upgrades, and compares both against a checked-in
//! golden corpus.

pub mod cli;
pub mod config;
pub mod disasm;
pub mod error;
pub mod golden;
pub mod profile;
pub mod report;
pub mod runner;

pub use error::{HarnessError, Result};
