#![no_main]

use libfuzzer_sys::fuzz_target;
use sly_core::Length;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(length) = Length::parse(text) {
        assert!(length.get().is_finite(), "parsed non-finite length from {text:?}");
        let rendered = length.to_string();
        let reparsed = Length::parse(&rendered).expect("rendered length parses");
        assert_eq!(reparsed, length, "render/parse mismatch for {text:?}");
    }
});
