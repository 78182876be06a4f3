//! Disassembly normalization
//!
//! Turns a raw listing into text that is stable across builds:
//!
//! 1. extraction, by source style: debugger listings lose their address
//!    field, static listings are cut down to the requested symbols' blocks
//! 2. target masking: direct jump/call addresses are dropped
//! 3. toolchain skew: known cross-version spellings are unified
//!
//! # Example
//! ```
//! use perfgold::disasm::{normalize, ListingStyle, SymbolSet};
//!
//! let raw = "0000000000401130 <main>:\n  401130:\tcallq  401126 <add>\n  401135:\tretq\n\n";
//! let listing = normalize(raw, &SymbolSet::new(["main"]), ListingStyle::Static)?;
//! assert_eq!(listing.lines(), ["<main>:", "call   <add>", "ret"]);
//! # Ok::<(), perfgold::HarnessError>(())
//! ```

mod debugger;
mod masking;
mod objdump;
mod skew;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use masking::mask_targets;
pub use skew::correct_skew;

/// Which tool produced the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStyle {
    /// `objdump -d`: whole object, cut down to the requested symbols
    #[default]
    #[serde(rename = "objdump")]
    Static,
    /// `gdb -batch -ex 'disassemble sym'`: already scoped per symbol
    #[serde(rename = "gdb")]
    Debugger,
}

/// Ordered, duplicate-free symbol names a case is scoped to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymbolSet {
    names: Vec<String>,
}

impl SymbolSet {
    /// Build a set keeping the first occurrence of each name
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = SymbolSet::default();
        for name in names {
            let name = name.into();
            if set.contains(&name) {
                tracing::warn!("duplicate symbol '{}' ignored", name);
                continue;
            }
            set.names.push(name);
        }
        set
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<'de> Deserialize<'de> for SymbolSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer).map(SymbolSet::new)
    }
}

/// Listing lines with addresses and branch targets removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedListing {
    lines: Vec<String>,
}

impl NormalizedListing {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Golden-file form: one line per entry, newline terminated
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();
        Self { lines }
    }
}

/// Normalize a raw disassembly listing
///
/// # Errors
/// Returns [`crate::HarnessError::Format`] when a debugger listing has
/// something other than a function annotation after an address field.
pub fn normalize(raw: &str, symbols: &SymbolSet, style: ListingStyle) -> Result<NormalizedListing> {
    let extracted = match style {
        ListingStyle::Debugger => debugger::extract(raw)?,
        ListingStyle::Static => objdump::extract(raw, symbols),
    };

    let lines = extracted
        .iter()
        .map(|line| {
            let masked = mask_targets(line);
            correct_skew(&masked).into_owned()
        })
        .collect();

    Ok(NormalizedListing { lines })
}
