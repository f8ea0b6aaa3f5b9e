#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sly_core::Length;
use sly_layout::{DragAnchor, DragInput, constrain};

#[derive(Debug, Arbitrary)]
struct Input {
    start: f64,
    current: f64,
    base: f64,
    min: f64,
    max: f64,
    anchor: u8,
}

fuzz_target!(|input: Input| {
    let anchor = match input.anchor % 4 {
        0 => DragAnchor::Left,
        1 => DragAnchor::Right,
        2 => DragAnchor::Top,
        _ => DragAnchor::Bottom,
    };
    let drag = DragInput {
        start: input.start,
        current: input.current,
        base: Length::px(input.base),
        min: Length::px(input.min),
        max: Length::px(input.max),
        direction: anchor.direction(),
    };
    let expr = constrain(&drag);
    let size = expr
        .resolve_literal()
        .expect("literal expression always resolves");

    // Clamp semantics: the lower bound wins when bounds cross.
    let (min, max) = (drag.min.get(), drag.max.get());
    let value = size.get();
    if !value.is_nan() {
        assert!(value >= min, "{value} below min {min}");
        if min <= max {
            assert!(value <= max, "{value} above max {max}");
        }
    }
    assert_eq!(constrain(&drag), expr, "constrain is not deterministic");
    let _ = expr.to_string();
});
