#![no_main]

use libfuzzer_sys::fuzz_target;
use perfgold::profile::{attribute_text, AttributionMode};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let own = attribute_text(input, AttributionMode::SelfCost);
        let total = attribute_text(input, AttributionMode::Total);

        // Malformed lines are skipped, never fatal, and SELF never keeps zeros
        assert!(own.iter().all(|(_, count)| count > 0));
        for (name, count) in own.iter() {
            assert!(total.get(name).is_some_and(|t| t >= count));
        }
    }
});
