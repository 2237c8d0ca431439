#![no_main]

use chrono::NaiveDate;
use helper_kit::date_pattern::DatePattern;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // First line is the pattern, the rest is parsed with it
    let (pattern, input) = text.split_once('\n').unwrap_or((text, ""));

    let Ok(compiled) = DatePattern::compile(pattern) else {
        return;
    };
    let Some(reference) = NaiveDate::from_ymd_opt(2026, 10, 19) else {
        return;
    };

    let _ = compiled.format(&reference.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default());
    let _ = compiled.parse(input, reference);
});
