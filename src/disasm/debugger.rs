//! Interactive-debugger listings (`gdb -batch -ex 'disassemble ...'`)
//!
//! ```text
//! Dump of assembler code for function add:
//!    0x0000000000401126 <+0>:	push   %rbp
//! => 0x0000000000401127 <+1>:	mov    %rsp,%rbp
//! End of assembler dump.
//! ```

use crate::error::{HarnessError, Result};

const GUTTER_WIDTH: usize = 3;

/// Strip the address field from every address line.
///
/// The rest of an address line must start with the `<+offset>` function
/// annotation; anything else means the listing is not what we think it is.
pub fn extract(raw: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();

    for (index, line) in raw.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        let Some(field_end) = address_field_end(line) else {
            out.push(line.to_string());
            continue;
        };

        let rest = &line[field_end..];
        if !rest.starts_with('<') {
            return Err(HarnessError::Format(format!(
                "line {}: expected function annotation after address, got {:?}",
                index + 1,
                line
            )));
        }
        out.push(rest.to_string());
    }

    Ok(out)
}

/// Byte offset just past the address field: gutter (`   ` or `=> `), `0x`,
/// the address in hex at whatever width the target uses, one space.
fn address_field_end(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let gutter = bytes.get(..GUTTER_WIDTH)?;
    if gutter != b"   " && gutter != b"=> " {
        return None;
    }

    let digits_start = GUTTER_WIDTH + 2;
    if bytes.get(GUTTER_WIDTH..digits_start)? != b"0x" {
        return None;
    }

    let digits = bytes[digits_start..]
        .iter()
        .take_while(|b| b.is_ascii_hexdigit())
        .count();
    let space = digits_start + digits;
    (digits > 0 && bytes.get(space) == Some(&b' ')).then_some(space + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_address_field() {
        let raw = "Dump of assembler code for function add:\n   0x0000000000401126 <+0>:\tpush   %rbp\n=> 0x0000000000401127 <+1>:\tmov    %rsp,%rbp\nEnd of assembler dump.\n";
        let lines = extract(raw).unwrap();
        assert_eq!(
            lines,
            vec![
                "Dump of assembler code for function add:",
                "<+0>:\tpush   %rbp",
                "<+1>:\tmov    %rsp,%rbp",
                "End of assembler dump.",
            ]
        );
    }

    #[test]
    fn test_unexpected_field_after_address_fails() {
        let raw = "   0x0000000000401126 push   %rbp\n";
        let err = extract(raw).unwrap_err();
        assert!(matches!(err, HarnessError::Format(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_strips_narrow_address_field() {
        let raw = "Dump of assembler code for function add:\n   0x08049000 <+0>:\tpush   %ebp\n=> 0x08049001 <+1>:\tmov    %esp,%ebp\n   0x401126 <+2>:\tret\n";
        let lines = extract(raw).unwrap();
        assert_eq!(
            lines,
            vec![
                "Dump of assembler code for function add:",
                "<+0>:\tpush   %ebp",
                "<+1>:\tmov    %esp,%ebp",
                "<+2>:\tret",
            ]
        );
    }

    #[test]
    fn test_narrow_address_without_annotation_fails() {
        let err = extract("=> 0x08049000 push   %ebp\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_non_address_lines_pass_through() {
        let raw = "   0x\n   0xzz <+0>:\tret\n  0x401126 <+0>:\tret\n";
        assert_eq!(
            extract(raw).unwrap(),
            vec!["   0x", "   0xzz <+0>:\tret", "  0x401126 <+0>:\tret"]
        );
    }
}
