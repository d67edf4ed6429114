//! Closed trade log export

use crate::execution::{ExitReason, Trade};
use arrow::array::{ArrayRef, StringArray, TimestampMicrosecondArray};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, Utc};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

/// Offset-form timezone; the CSV writer cannot resolve zone names like "UTC"
const UTC_OFFSET: &str = "+00:00";

/// One closed trade as written to the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeLogRow {
    /// Exit time
    pub date: DateTime<Utc>,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub reason: ExitReason,
    pub trade_pnl: Decimal,
    /// Trading day the exit was booked to
    pub day: NaiveDate,
}

impl TradeLogRow {
    /// Row for a closed trade; None while the trade is open
    pub fn from_trade(trade: &Trade) -> Option<Self> {
        let exit = trade.exit()?;
        Some(Self {
            date: exit.time,
            entry_price: trade.entry_price(),
            exit_price: exit.price,
            reason: exit.reason,
            trade_pnl: exit.pnl,
            day: exit.time.date_naive(),
        })
    }
}

/// Trade log schema
pub fn trade_log_schema() -> Schema {
    Schema::new(vec![
        Field::new(
            "Date",
            DataType::Timestamp(TimeUnit::Microsecond, Some(UTC_OFFSET.into())),
            false,
        ),
        Field::new("EntryPrice", DataType::Utf8, false), // Store as string for Decimal precision
        Field::new("ExitPrice", DataType::Utf8, false),
        Field::new("Reason", DataType::Utf8, false),
        Field::new("TradePnL", DataType::Utf8, false),
        Field::new("Day", DataType::Utf8, false),
    ])
}

/// Write closed trades to `path`, one row per trade in the given order
///
/// Parquet when the path ends in `.parquet`, CSV otherwise. Open trades are
/// skipped and nothing is written when no closed trades remain. Returns the
/// number of rows written.
pub fn write_trade_log(path: &Path, trades: &[Trade]) -> anyhow::Result<usize> {
    let rows: Vec<TradeLogRow> = trades.iter().filter_map(TradeLogRow::from_trade).collect();
    if rows.is_empty() {
        tracing::info!("No closed trades, trade log not written");
        return Ok(0);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let batch = build_batch(&rows)?;
    let is_parquet = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(File::create(path)?, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
    } else {
        let mut writer = WriterBuilder::new()
            .with_header(true)
            .build(File::create(path)?);
        writer.write(&batch)?;
    }

    tracing::info!(path = %path.display(), count = rows.len(), "Trade log exported");
    Ok(rows.len())
}

fn build_batch(rows: &[TradeLogRow]) -> anyhow::Result<RecordBatch> {
    let dates: Vec<i64> = rows.iter().map(|r| r.date.timestamp_micros()).collect();
    let entry_prices: Vec<String> = rows.iter().map(|r| r.entry_price.to_string()).collect();
    let exit_prices: Vec<String> = rows.iter().map(|r| r.exit_price.to_string()).collect();
    let reasons: Vec<&str> = rows.iter().map(|r| r.reason.as_str()).collect();
    let pnls: Vec<String> = rows.iter().map(|r| r.trade_pnl.to_string()).collect();
    let days: Vec<String> = rows.iter().map(|r| r.day.to_string()).collect();

    let batch = RecordBatch::try_new(
        Arc::new(trade_log_schema()),
        vec![
            Arc::new(TimestampMicrosecondArray::from(dates).with_timezone(UTC_OFFSET)) as ArrayRef,
            Arc::new(StringArray::from(entry_prices)) as ArrayRef,
            Arc::new(StringArray::from(exit_prices)) as ArrayRef,
            Arc::new(StringArray::from(reasons)) as ArrayRef,
            Arc::new(StringArray::from(pnls)) as ArrayRef,
            Arc::new(StringArray::from(days)) as ArrayRef,
        ],
    )?;
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn closed_trade(id: &str, exit_price: Decimal) -> Trade {
        let entry = Utc.with_ymd_and_hms(2024, 3, 4, 9, 15, 0).unwrap();
        let mut trade = Trade::new(id, dec!(100), dec!(99), dec!(102), dec!(1), entry).unwrap();
        trade
            .close_at_price(
                exit_price,
                entry + chrono::Duration::minutes(5),
                ExitReason::ManualExit,
            )
            .unwrap();
        trade
    }

    #[test]
    fn test_trade_log_schema() {
        let schema = trade_log_schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            vec!["Date", "EntryPrice", "ExitPrice", "Reason", "TradePnL", "Day"]
        );
    }

    #[test]
    fn test_row_from_trade() {
        let row = TradeLogRow::from_trade(&closed_trade("T1", dec!(101.5))).unwrap();
        assert_eq!(row.trade_pnl, dec!(1.5));
        assert_eq!(row.reason, ExitReason::ManualExit);
        assert_eq!(row.day, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());

        let entry = Utc.with_ymd_and_hms(2024, 3, 4, 9, 15, 0).unwrap();
        let open = Trade::new("T2", dec!(100), dec!(99), dec!(102), dec!(1), entry).unwrap();
        assert!(TradeLogRow::from_trade(&open).is_none());
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("trades.csv");
        let trades = vec![closed_trade("T1", dec!(101.5)), closed_trade("T2", dec!(98))];

        assert_eq!(write_trade_log(&path, &trades).unwrap(), 2);

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Date,EntryPrice,ExitPrice,Reason,TradePnL,Day")
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("2024-03-04T09:20:00"));
        assert!(first.contains("101.5"));
        assert!(first.contains("MANUAL_EXIT"));
        assert!(first.ends_with("2024-03-04"));
        assert!(lines.next().unwrap().contains(",-2,"));
    }

    #[test]
    fn test_write_parquet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.parquet");
        write_trade_log(&path, &[closed_trade("T1", dec!(103))]).unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_write_nothing_when_no_closed_trades() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        assert_eq!(write_trade_log(&path, &[]).unwrap(), 0);
        assert!(!path.exists());
    }
}
