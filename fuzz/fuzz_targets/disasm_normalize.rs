#![no_main]

use libfuzzer_sys::fuzz_target;
use perfgold::disasm::{normalize, ListingStyle, SymbolSet};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let symbols = SymbolSet::new(["main", "add"]);
        let _ = normalize(input, &symbols, ListingStyle::Static);
        // Debugger listings may be rejected, but must not panic
        let _ = normalize(input, &symbols, ListingStyle::Debugger);
    }
});
