use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::Table;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`          – comma separated, first row is the header
/// * `.tsv` / `.txt` – tab separated, first row is the header
/// * `.json`         – `[{ "CTL##": "CTL0001", "P-value": 0.01, ... }, ...]`
/// * `.parquet`      – any flat schema; every cell is rendered as text
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" | "txt" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Write `table` as delimited text, header first.
pub fn write_table(path: &Path, table: &Table, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer
        .write_record(&table.headers)
        .context("writing header row")?;
    for (row_no, row) in table.rows.iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("writing row {row_no}"))?;
    }
    writer.flush().context("flushing output")?;

    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Rows may be shorter or longer than the header; the core decides what a
/// short row means. Cells that are not valid UTF-8 (cp1252 Excel dumps)
/// are decoded lossily so one bad byte never drops the batch.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = reader
        .byte_headers()
        .context("reading header row")?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        if std::str::from_utf8(record.as_slice()).is_err() {
            warn!("Row {row_no}: invalid UTF-8 replaced with U+FFFD");
        }
        rows.push(
            record
                .iter()
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect(),
        );
    }

    Ok(Table::new(headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Column order is
/// taken from the first object; keys missing from later objects become
/// empty cells.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let headers: Vec<String> = match records.first() {
        Some(first) => first
            .as_object()
            .context("Row 0 is not a JSON object")?
            .keys()
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        rows.push(
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or_default())
                .collect(),
        );
    }

    Ok(Table::new(headers, rows))
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas or Polars. Column names come from
/// the schema; nulls become empty cells.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let mut cells = Vec::with_capacity(batch.num_columns());
            for (col_idx, col) in batch.columns().iter().enumerate() {
                if col.is_null(row) {
                    cells.push(String::new());
                    continue;
                }
                let cell = array_value_to_string(col.as_ref(), row)
                    .with_context(|| format!("Row {row}: failed to render column {col_idx}"))?;
                cells.push(cell);
            }
            rows.push(cells);
        }
    }

    Ok(Table::new(headers, rows))
}
