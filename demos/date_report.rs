use helper_kit::{dates, reporter, RingBufferReporter};
use std::sync::Arc;

fn main() {
    println!("--- Date Import Report ---\n");

    // Max 10 entries, 256 bytes per entry
    let sink = RingBufferReporter::new(10, 256);
    reporter::set_reporter(Arc::new(sink.clone()));

    let rows = [
        "2019-10-21",
        "2019-10-21T08:15:00+02:00",
        "10/21/19",
        "Oct 21, 2019",
        "Oct 2019",
        "10/21/2019 13:45:10",
        "21.10.2019",
        "yesterday",
        "",
    ];

    println!("1. Normalizing imported rows:");
    for row in rows {
        match dates::format_iso_date(row) {
            Ok(iso) if iso.is_empty() => println!("   {row:<28} -> (blank)"),
            Ok(iso) => println!("   {row:<28} -> {iso}"),
            Err(err) => println!("   {row:<28} -> {err}"),
        }
    }

    reporter::clear_reporter();

    println!("\n2. Reported failures ({} held, {} evicted):", sink.len(), sink.eviction_count());
    for entry in sink.get_all() {
        println!(
            "   [{}] {} input={:?}",
            entry.level,
            entry.kind,
            entry.extra("input").unwrap_or_default()
        );
    }
}
