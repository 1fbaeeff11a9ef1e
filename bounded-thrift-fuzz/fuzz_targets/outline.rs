#![no_main]

use bounded_thrift::{BinaryDeserializer, StructOutline, Unlimited};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Capped decode: consumption never exceeds the input
    let mut outline = StructOutline::new();
    if let Ok(consumed) = BinaryDeserializer::new().deserialize(&mut outline, data) {
        assert!(consumed <= data.len());

        // A reader without the cap must accept the same struct
        let mut uncapped = StructOutline::new();
        let uncapped_len =
            BinaryDeserializer::<Unlimited>::default().deserialize(&mut uncapped, data).unwrap();
        assert_eq!(consumed, uncapped_len);
        assert_eq!(outline, uncapped);
    }
});
