//! Result-Document Flattening

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::FlattenError;

/// A flattened result table: sorted headers plus one row per hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    /// Field names of the first hit, sorted
    pub headers: Vec<String>,
    /// One row per hit, values in header order
    pub rows: Vec<Vec<String>>,
}

/// Flatten one search-result document into a table.
///
/// Headers come from the first hit's `_source` field names, sorted. Fields
/// absent from a later hit render as empty cells; fields a later hit adds
/// beyond the header set are dropped.
pub fn flatten_results(document: &Value) -> Result<ResultTable, FlattenError> {
    let hits = document
        .get("hits")
        .and_then(|outer| outer.get("hits"))
        .and_then(Value::as_array)
        .ok_or(FlattenError::MissingHits)?;

    let first = hits.first().ok_or(FlattenError::NoResults)?;
    let mut headers: Vec<String> = source_of(first, 0)?.keys().cloned().collect();
    headers.sort();

    let mut rows = Vec::with_capacity(hits.len());
    for (index, hit) in hits.iter().enumerate() {
        let source = source_of(hit, index)?;
        let row = headers
            .iter()
            .map(|header| source.get(header).map_or_else(String::new, render_value))
            .collect();
        rows.push(row);
    }

    Ok(ResultTable { headers, rows })
}

fn source_of(hit: &Value, index: usize) -> Result<&serde_json::Map<String, Value>, FlattenError> {
    hit.get("_source")
        .and_then(Value::as_object)
        .ok_or(FlattenError::MissingSource { index })
}

/// Strings render verbatim, null as empty; everything else keeps its JSON
/// rendering (numbers, booleans, nested arrays and objects).
fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Write a flattened table as CSV.
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<(), FlattenError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&table.headers)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Flatten a JSON file into a sibling `.csv` file, returning its path.
pub fn flatten_file(src: &Path) -> Result<PathBuf, FlattenError> {
    let document: Value = serde_json::from_reader(BufReader::new(File::open(src)?))?;
    let table = flatten_results(&document)?;

    let dst = src.with_extension("csv");
    write_csv(&table, BufWriter::new(File::create(&dst)?))?;
    debug!(rows = table.rows.len(), "flattened result document");
    Ok(dst)
}
