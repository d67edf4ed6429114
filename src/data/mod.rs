//! Data module
//!
//! Loads OHLCV bars and exports the closed trade log, as CSV or Parquet

mod bars;
mod trade_log;

pub use bars::{load_bars, parse_decimal, parse_timestamp};
pub use trade_log::{trade_log_schema, write_trade_log, TradeLogRow};
