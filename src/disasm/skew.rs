//! Spelling differences between disassembler versions
//!
//! Newer binutils dropped the `q` suffix on several AT&T mnemonics and
//! changed how some padding NOPs print. The table maps the old spelling to
//! the new one so goldens survive a toolchain bump. Extend it when a new
//! skew shows up; it is deliberately not an instruction equivalence engine.

use std::borrow::Cow;

const SKEW_TABLE: &[(&str, &str)] = &[
    ("callq", "call"),
    ("jmpq", "jmp"),
    ("retq", "ret"),
    ("leaveq", "leave"),
    ("repz retq", "repz ret"),
    ("data16 cs nopw", "cs nopw"),
];

/// Rewrite a known old spelling of the line's instruction, keeping the
/// operand column where it was
pub fn correct_skew(line: &str) -> Cow<'_, str> {
    let start = instruction_start(line);
    let instruction = &line[start..];

    for (from, to) in SKEW_TABLE {
        let Some(rest) = instruction.strip_prefix(from) else {
            continue;
        };
        if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
            continue;
        }

        let operands = rest.trim_start();
        let padding = &rest[..rest.len() - operands.len()];

        let mut out = String::with_capacity(line.len());
        out.push_str(&line[..start]);
        out.push_str(to);
        if !operands.is_empty() {
            if padding.contains('\t') || padding.len() == 1 {
                out.push_str(padding);
            } else {
                let column = from.len() + padding.len();
                let width = column.saturating_sub(to.len()).max(1);
                out.push_str(&" ".repeat(width));
            }
            out.push_str(operands);
        }
        return Cow::Owned(out);
    }

    Cow::Borrowed(line)
}

/// Byte offset of the mnemonic, past any `<+off>:` annotation and indent
fn instruction_start(line: &str) -> usize {
    let annotated_end = if line.starts_with('<') {
        line.find(">:").map_or(0, |end| end + 2)
    } else {
        0
    };
    let rest = &line[annotated_end..];
    annotated_end + (rest.len() - rest.trim_start().len())
}
