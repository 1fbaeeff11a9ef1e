#![no_main]

use bounded_thrift::{BinaryDeserializer, DecodeError, StructOutline};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // The first two bytes pick the range, the rest is the buffer
    let (selector, buffer) = data.split_at(2);
    let offset = selector[0] as usize;
    let len = selector[1] as usize;

    let mut deserializer = BinaryDeserializer::new();
    let mut ranged = StructOutline::new();
    match deserializer.deserialize_range(&mut ranged, buffer, offset, len) {
        Ok(consumed) => {
            assert!(consumed <= len);

            // Decoding a copy of the range gives the same result
            let copy = buffer[offset..offset + len].to_vec();
            let mut copied = StructOutline::new();
            assert_eq!(deserializer.deserialize(&mut copied, &copy), Ok(consumed));
            assert_eq!(ranged, copied);
        },
        Err(DecodeError::InvalidRange { .. }) => assert!(offset + len > buffer.len()),
        Err(_) => {},
    }
});
