// benches/date_parsing.rs
//! Benchmarks for helper_kit hot paths
//!
//! Covers the ISO fast path against each fallback position, the failure path
//! (which walks every pattern), formatting, contrast selection and exception
//! construction/logging.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use helper_kit::colors::{self, ContentCandidates};
use helper_kit::date_pattern::DatePattern;
use helper_kit::{dates, reporter, Exception, RingBufferReporter};
use std::sync::Arc;

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default()
}

// ============================================================================
// Parsing
// ============================================================================

fn bench_iso_fast_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_iso");

    for input in ["2019-10-21", "2019-10-21T08:15:30Z", "2019-W43-1", "2019-294", "2019-10-21T08:15:30.250+02:00"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| dates::parse_date_string_with_reference(black_box(input), reference()))
        });
    }

    group.finish();
}

fn bench_fallback_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_fallback");

    // One canonical input per fallback, in list order
    let inputs = [
        "10/21/19",
        "10/21/2019",
        "2019/10/21",
        "1/2/2020",
        "Oct 21, 2019",
        "Oct 2019",
        "10/21/2019 13:45:10",
    ];

    for (position, input) in inputs.iter().enumerate() {
        group.bench_with_input(BenchmarkId::new(position.to_string(), input), input, |b, input| {
            b.iter(|| dates::parse_date_string_with_reference(black_box(input), reference()))
        });
    }

    group.finish();
}

fn bench_parse_failure(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_failure");

    group.bench_function("no_reporter", |b| {
        reporter::clear_reporter();
        b.iter(|| dates::parse_date_string_with_reference(black_box("ABCDE"), reference()))
    });

    group.bench_function("ring_buffer_reporter", |b| {
        reporter::set_reporter(Arc::new(RingBufferReporter::new(1000, 2048)));
        b.iter(|| dates::parse_date_string_with_reference(black_box("ABCDE"), reference()));
        reporter::clear_reporter();
    });

    group.finish();
}

fn bench_pattern_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_compile");

    for pattern in dates::FALLBACK_PATTERNS {
        group.bench_with_input(BenchmarkId::from_parameter(pattern), pattern, |b, pattern| {
            b.iter(|| DatePattern::compile(black_box(pattern)))
        });
    }

    group.finish();
}

// ============================================================================
// Formatting
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let value = reference().and_hms_opt(13, 45, 10).unwrap_or_default();
    let mut group = c.benchmark_group("format");

    group.bench_function("iso_date", |b| b.iter(|| dates::format_iso_date(black_box(value))));
    group.bench_function("us_locale_time", |b| b.iter(|| dates::format_us_locale_time(black_box(value))));
    group.bench_function("medium_date", |b| b.iter(|| dates::format_medium_date(black_box(value))));
    group.bench_function("text_input", |b| {
        b.iter(|| dates::format_iso_date(black_box("Oct 21, 2019")))
    });
    group.bench_function("empty_input", |b| b.iter(|| dates::format_iso_date(black_box(""))));

    group.finish();
}

// ============================================================================
// Colors
// ============================================================================

fn bench_contrast(c: &mut Criterion) {
    let mut group = c.benchmark_group("contrast");
    let candidates = ContentCandidates { dark: "black", light: "white" };

    for color in ["#17daa9", "fff", "#ffefc", "not a color"] {
        group.bench_with_input(BenchmarkId::from_parameter(color), color, |b, color| {
            b.iter(|| colors::high_contrast_content_on_background_color(black_box(color), candidates))
        });
    }

    group.bench_function("normalize", |b| b.iter(|| colors::normalize_hex_color(black_box("#f1f"))));

    group.finish();
}

// ============================================================================
// Exceptions
// ============================================================================

fn bench_exception_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("exception");

    group.bench_function("static_message", |b| {
        b.iter(|| Exception::invalid_argument(black_box("Input cannot be null or undefined")))
    });

    group.bench_function("formatted_message", |b| {
        b.iter(|| Exception::invalid_argument(format!("Invalid Date: unable to parse date string - {}", black_box("ABCDE"))))
    });

    group.bench_function("with_cause", |b| {
        b.iter(|| Exception::range("outer").with_cause(Exception::overflow(black_box("inner"))))
    });

    group.finish();
}

fn bench_log_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_write");

    for size in [16, 1024, 8192] {
        let err = Exception::bad_method_call("x".repeat(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &err, |b, err| {
            let mut line = String::with_capacity(2048);
            b.iter(|| {
                line.clear();
                black_box(err.log().write_to(&mut line))
            })
        });
    }

    group.finish();
}

criterion_group!(
    parse_benches,
    bench_iso_fast_path,
    bench_fallback_positions,
    bench_parse_failure,
    bench_pattern_compile,
);

criterion_group!(format_benches, bench_formatting);

criterion_group!(color_benches, bench_contrast);

criterion_group!(exception_benches, bench_exception_creation, bench_log_write);

criterion_main!(parse_benches, format_benches, color_benches, exception_benches);
