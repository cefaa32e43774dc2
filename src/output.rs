//! Input loading and output persistence.
//!
//! Input is a JSON array of card records; output is the enriched array
//! as JSON plus a CSV rendering whose columns are the union of keys
//! across all records in first-seen order.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::models::{EnrichedRecord, RecordStatus, SourceRecord};

// ============================================================================
// Input
// ============================================================================

/// Load the input card list. A missing or malformed file is fatal
/// before any matching starts.
pub fn load_records(path: &Path) -> Result<Vec<SourceRecord>> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    parse_records(&body).with_context(|| format!("invalid input in {}", path.display()))
}

fn parse_records(body: &str) -> Result<Vec<SourceRecord>> {
    let mut records: Vec<SourceRecord> =
        serde_json::from_str(body).context("expected a JSON array of card records")?;
    for record in &mut records {
        record.status = RecordStatus::detect(&record.title, &record.artist);
    }
    Ok(records)
}

// ============================================================================
// Output Paths
// ============================================================================

/// Derive the output stem next to the input: `cards.json` → `cards_deezer`.
pub fn output_base(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}_deezer"))
}

/// Refuse to write output over one of the source files.
pub fn validate_output_path(output: &Path, sources: &[&Path]) -> Result<()> {
    for source in sources {
        if output == *source {
            bail!(
                "output '{}' would overwrite source '{}'",
                output.display(),
                source.display()
            );
        }
    }
    Ok(())
}

// ============================================================================
// Persistence
// ============================================================================

pub fn save_json(records: &[EnrichedRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

pub fn save_csv(records: &[EnrichedRecord], path: &Path) -> Result<()> {
    let csv = render_csv(records)?;
    fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

/// Render the tabular form. Columns are the union of keys across all
/// records, ordered by first appearance; null cells render empty.
pub fn render_csv(records: &[EnrichedRecord]) -> Result<String> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::to_value(record)? {
            Value::Object(map) => rows.push(map),
            other => bail!("expected a JSON object per record, got {other}"),
        }
    }

    let mut columns: Vec<String> = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for row in &rows {
        for key in row.keys() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
    }

    let mut out = String::new();
    out.push_str(
        &columns
            .iter()
            .map(|c| csv_field(c))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');

    for row in &rows {
        let line = columns
            .iter()
            .map(|col| row.get(col).map(csv_value).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }

    Ok(out)
}

/// Render one JSON value as a CSV cell. Null becomes an empty cell.
fn csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => csv_field(s),
        other => csv_field(&other.to_string()),
    }
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn csv_field(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
