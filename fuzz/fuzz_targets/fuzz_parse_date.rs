#![no_main]

use chrono::NaiveDate;
use helper_kit::{dates, iso8601, ExceptionKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Some(reference) = NaiveDate::from_ymd_opt(2026, 10, 19) else {
        return;
    };

    // Anything the ISO reader accepts must come back unchanged through the full parser
    if let Some(iso) = iso8601::parse_iso8601(input) {
        assert_eq!(dates::parse_date_string_with_reference(input, reference).ok(), Some(iso));
    }

    match dates::parse_date_string_with_reference(input, reference) {
        Ok(parsed) => {
            let _ = dates::format_us_locale_time(parsed);
        }
        Err(err) => assert_eq!(err.kind(), ExceptionKind::InvalidArgumentError),
    }
});
