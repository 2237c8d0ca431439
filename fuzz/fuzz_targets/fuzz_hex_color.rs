#![no_main]

use helper_kit::colors::{self, ContentCandidates};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(color) = std::str::from_utf8(data) else {
        return;
    };

    let normalized = colors::normalize_hex_color(color);
    assert_eq!(normalized.chars().count(), 6);

    let _ = colors::yiq_contrast_score(&normalized);
    let _ = colors::high_contrast_content_on_background_color(color, ContentCandidates { dark: (), light: () });
});
