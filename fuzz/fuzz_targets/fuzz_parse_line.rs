#![no_main]

use libfuzzer_sys::fuzz_target;
use linspector::trace::parse_line;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        // Any line either parses, skips, or errors; it must never panic.
        let _ = parse_line(line);
    }
});
