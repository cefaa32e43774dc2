use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use deezer_match::client::{DeezerClient, DEFAULT_SEARCH_LIMIT, MIN_REQUEST_DELAY};
use deezer_match::output::{load_records, output_base, save_csv, save_json, validate_output_path};
use deezer_match::progress::set_log_only;
use deezer_match::runner::run;

#[derive(Parser)]
#[command(name = "deezer-match")]
#[command(about = "Match scanned song cards against the Deezer catalog")]
struct Args {
    /// Input card list: a JSON array with id, title, artist, year
    input: PathBuf,

    /// Maximum search results considered per query
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    limit: usize,

    /// Minimum delay between catalog requests, in milliseconds
    #[arg(long, default_value_t = MIN_REQUEST_DELAY.as_millis() as u64)]
    delay_ms: u64,

    /// Hide progress bars for tail-friendly output
    #[arg(long)]
    log_only: bool,
}

fn main() -> Result<()> {
    colog::init();
    let args = Args::parse();
    set_log_only(args.log_only);

    let records = load_records(&args.input)?;
    println!(
        "Loaded {} records from {}",
        records.len(),
        args.input.display()
    );

    let base = output_base(&args.input);
    let json_path = base.with_extension("json");
    let csv_path = base.with_extension("csv");
    validate_output_path(&json_path, &[&args.input])?;
    validate_output_path(&csv_path, &[&args.input])?;

    let client = DeezerClient::new(Duration::from_millis(args.delay_ms));
    let (enriched, stats) = run(&records, &client, args.limit);

    save_json(&enriched, &json_path)?;
    println!("JSON written: {}", json_path.display());
    save_csv(&enriched, &csv_path)?;
    println!("CSV written: {}", csv_path.display());

    println!("\n{:=<60}", "");
    println!("Matching complete!");
    println!(
        "  Matched: {}/{} ({:.1}%)",
        stats.matched,
        stats.total,
        stats.match_rate()
    );
    println!("  No match: {}", stats.no_match);
    println!("  Skipped (unreadable): {}", stats.skipped);
    println!("  Elapsed: {:.2}s", stats.elapsed_seconds);
    println!("{:=<60}", "");

    Ok(())
}
