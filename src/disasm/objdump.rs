//! Static-disassembler listings (`objdump -d`)
//!
//! ```text
//! 0000000000401126 <add>:
//!   401126:	lea    (%rdi,%rsi,1),%eax
//!   40112a:	ret
//!
//! 0000000000401130 <main>:
//! ```

use std::sync::OnceLock;

use regex::Regex;

use super::SymbolSet;

fn symbol_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"^[0-9a-fA-F]+ <(?P<symbol>.+)>:$").expect("valid regex"))
}

fn address_column() -> &'static Regex {
    static COLUMN: OnceLock<Regex> = OnceLock::new();
    COLUMN.get_or_init(|| Regex::new(r"^\s*[0-9a-fA-F]+:\s*").expect("valid regex"))
}

/// Keep the blocks of the requested symbols, in listing order.
///
/// A block starts at its `<symbol>:` boundary and runs to the next blank
/// line. The boundary is emitted as `<symbol>:` and the address column of
/// every body line is dropped.
pub fn extract(raw: &str, symbols: &SymbolSet) -> Vec<String> {
    let mut out = Vec::new();
    let mut inside_block = false;

    for line in raw.lines() {
        let line = line.trim_end_matches('\r');

        if inside_block {
            if line.trim().is_empty() {
                inside_block = false;
            } else {
                out.push(address_column().replace(line, "").into_owned());
            }
            continue;
        }

        let Some(captures) = symbol_marker().captures(line) else {
            continue;
        };
        let symbol = &captures["symbol"];
        if symbols.contains(symbol) {
            tracing::trace!("entering block for {}", symbol);
            out.push(format!("<{}>:", symbol));
            inside_block = true;
        }
    }

    out
}
