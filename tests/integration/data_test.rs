//! Integration tests for bar loading and trade log export

use chrono::{TimeZone, Utc};
use ema_vwap_trader::data::{load_bars, write_trade_log};
use ema_vwap_trader::execution::PaperTrader;
use rust_decimal_macros::dec;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_lowercase_headers_with_dates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("daily.csv");
    fs::write(
        &path,
        "date,open,high,low,close,volume\n\
         2024-03-04,100,102,99,101,5000\n\
         2024-03-05,101,103,100,102.5,6000\n",
    )
    .unwrap();

    let bars = load_bars(&path).unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(
        bars[0].timestamp,
        Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
    );
    assert_eq!(bars[1].close, dec!(102.5));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(load_bars(&dir.path().join("missing.csv")).is_err());
}

#[test]
fn test_trade_log_skips_open_trades() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trades.csv");
    let ts = Utc.with_ymd_and_hms(2024, 3, 4, 9, 15, 0).unwrap();

    let mut ledger = PaperTrader::new();
    ledger
        .enter_trade("T1", dec!(100), dec!(99), dec!(102), dec!(1), ts)
        .unwrap();
    ledger
        .enter_trade("T2", dec!(100), dec!(99), dec!(102), dec!(1), ts)
        .unwrap();
    ledger.exit_trade_at_stop_loss("T2", ts);

    let written = write_trade_log(&path, &ledger.get_all_trades()).unwrap();
    assert_eq!(written, 1);

    let log = fs::read_to_string(&path).unwrap();
    assert!(log.contains("STOP_LOSS_HIT"));
}
