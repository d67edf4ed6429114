//! Technical indicators
//!
//! Incremental EMA, VWAP and RSI estimators fed one bar at a time

mod ema;
mod rsi;
mod vwap;

pub use ema::Ema;
pub use rsi::Rsi;
pub use vwap::Vwap;
