use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Direct jumps and calls: x86 `j*`, `call`, `loop*` and `xbegin`, AArch64
/// `b`, `bl` and `b.<cond>`.
///
/// A target is either `0x`-prefixed or a bare hex number with at least one
/// decimal digit that ends the line or precedes a `<symbol>` annotation. A
/// bare operand such as `add` is a symbol, not an address.
fn control_flow_target() -> &'static Regex {
    static TARGET: OnceLock<Regex> = OnceLock::new();
    TARGET.get_or_init(|| {
        Regex::new(concat!(
            r"(?P<head>(?:^|[\s:])(?:j[a-z]{1,4}|call[lq]?|loop[a-z]{0,2}|xbegin|bl?|b\.[a-z]{2})\s+)",
            r"(?:0x[0-9a-fA-F]+\b\s*|[0-9a-fA-F]*[0-9][0-9a-fA-F]*(?:\s+(?P<annot><)|\s*$))",
        ))
        .expect("valid regex")
    })
}

/// Drop the numeric target of a direct jump or call.
///
/// The mnemonic and any `<symbol+offset>` annotation are kept, so layout
/// shifts disappear while opcode and callee changes still show.
pub fn mask_targets(line: &str) -> Cow<'_, str> {
    let masked = control_flow_target().replace_all(line, "${head}${annot}");
    match masked {
        Cow::Borrowed(_) => masked,
        Cow::Owned(text) => Cow::Owned(text.trim_end().to_string()),
    }
}
