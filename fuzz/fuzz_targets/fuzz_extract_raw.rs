#![no_main]

use libfuzzer_sys::fuzz_target;
use linspector::signal::extract_raw;
use linspector::ByteOrder;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let start_bit = u16::from(data[0]);
    let length = u16::from(data[1] % 65);
    let order = if data[2] & 1 == 0 {
        ByteOrder::Intel
    } else {
        ByteOrder::Motorola
    };
    let payload = &data[3..data.len().min(67)];
    // Extraction is total over arbitrary layouts and payloads.
    let _ = extract_raw(payload, start_bit, length, order);
});
