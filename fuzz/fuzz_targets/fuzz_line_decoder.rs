//! Fuzz target: `LineDecoder::feed` + `parse_fields`
//!
//! Pushes arbitrary serial noise through the line decoder in two chunks
//! and parses whatever line comes out.  Neither step may panic, and a
//! successful parse must hold exactly the requested number of finite
//! fields.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use irrigator::link::codec::{LineDecoder, parse_fields};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&expected, rest)) = data.split_first() else {
        return;
    };
    let expected = usize::from(expected % 4) + 1;
    let split = rest.len() / 2;

    let mut decoder = LineDecoder::new();
    let line = decoder
        .feed(&rest[..split])
        .or_else(|| decoder.feed(&rest[split..]))
        .or_else(|| decoder.take_partial());

    if let Some(line) = line {
        assert!(line.chars().count() <= 256, "decoder buffered past its cap");
        if let Ok(fields) = parse_fields(&line, expected) {
            assert_eq!(fields.len(), expected);
            assert!(fields.iter().all(|f| f.is_finite()));
        }
    }
});
