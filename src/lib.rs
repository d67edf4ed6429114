//! ema-vwap-trader: Paper trading engine with a daily loss limit
//!
//! This library provides the core components for:
//! - EMA, VWAP and RSI indicators over OHLCV bars
//! - Long-only entry signals
//! - Simulated trades with fixed stop and target levels
//! - A trade ledger with realized P&L statistics
//! - A daily loss limit that latches trading off until the next day
//! - Backtesting with per-day bookkeeping
//! - Bar loading and trade log export (CSV or Parquet)
//! - Structured logging and metrics

pub mod backtest;
pub mod cli;
pub mod config;
pub mod data;
pub mod execution;
pub mod indicator;
pub mod risk;
pub mod signal;
pub mod telemetry;
