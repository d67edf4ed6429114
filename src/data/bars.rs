//! OHLCV bar loading from CSV or Parquet

use crate::signal::Bar;
use anyhow::{anyhow, bail, Context};
use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

const TIMESTAMP_COLUMNS: [&str; 3] = ["date", "datetime", "timestamp"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Load bars from `path`, picking the reader by extension
///
/// Files ending in `.parquet` go through the Parquet reader, everything else
/// is read as CSV with a header row.
pub fn load_bars(path: &Path) -> anyhow::Result<Vec<Bar>> {
    let is_parquet = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    let bars = if is_parquet {
        read_parquet(path)
    } else {
        read_csv(path)
    }
    .with_context(|| format!("Failed to load bars from {}", path.display()))?;

    tracing::info!(path = %path.display(), count = bars.len(), "Loaded bars");
    Ok(bars)
}

fn read_csv(path: &Path) -> anyhow::Result<Vec<Bar>> {
    let format = Format::default().with_header(true);
    let (inferred, _) = format.infer_schema(File::open(path)?, Some(1))?;

    // Read every column as text so prices keep their exact decimal form
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(schema)
        .with_format(format)
        .build(File::open(path)?)?;

    let mut bars = Vec::new();
    for batch in reader {
        append_bars(&batch?, &mut bars)?;
    }
    Ok(bars)
}

fn read_parquet(path: &Path) -> anyhow::Result<Vec<Bar>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut bars = Vec::new();
    for batch in reader {
        append_bars(&batch?, &mut bars)?;
    }
    Ok(bars)
}

fn append_bars(batch: &RecordBatch, out: &mut Vec<Bar>) -> anyhow::Result<()> {
    let timestamps = text_column(batch, &TIMESTAMP_COLUMNS)?;
    let open = text_column(batch, &["open"])?;
    let high = text_column(batch, &["high"])?;
    let low = text_column(batch, &["low"])?;
    let close = text_column(batch, &["close"])?;
    let volume = text_column(batch, &["volume"])?;

    let offset = out.len();
    for row in 0..batch.num_rows() {
        let line = offset + row + 1;
        out.push(Bar {
            timestamp: parse_timestamp(cell(&timestamps, row, "date", line)?)?,
            open: parse_decimal(cell(&open, row, "open", line)?)?,
            high: parse_decimal(cell(&high, row, "high", line)?)?,
            low: parse_decimal(cell(&low, row, "low", line)?)?,
            close: parse_decimal(cell(&close, row, "close", line)?)?,
            volume: parse_decimal(cell(&volume, row, "volume", line)?)?,
        });
    }
    Ok(())
}

/// Find a column by any of `names` (case-insensitive) and view it as text
fn text_column(batch: &RecordBatch, names: &[&str]) -> anyhow::Result<StringArray> {
    let schema = batch.schema();
    let index = schema
        .fields()
        .iter()
        .position(|f| names.iter().any(|n| f.name().trim().eq_ignore_ascii_case(n)))
        .ok_or_else(|| anyhow!("Missing column {:?}", names[0]))?;

    let column: &ArrayRef = batch.column(index);
    let text = cast(column, &DataType::Utf8)?;
    text.as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| anyhow!("Column {:?} is not readable as text", names[0]))
}

fn cell<'a>(
    column: &'a StringArray,
    row: usize,
    name: &str,
    line: usize,
) -> anyhow::Result<&'a str> {
    if column.is_null(row) {
        bail!("Row {}: missing {} value", line, name);
    }
    Ok(column.value(row))
}

/// Parse a bar timestamp; values without an offset are taken as UTC
pub fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
        .ok_or_else(|| anyhow!("Unrecognized timestamp {:?}", value))
}

/// Parse a price or volume, accepting scientific notation
pub fn parse_decimal(value: &str) -> anyhow::Result<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| anyhow!("Invalid number {:?}: {}", value, e))
}
