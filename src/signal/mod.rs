//! Signal generation module
//!
//! Turns OHLCV bars into BUY/NONE samples for the execution loop

mod generator;
mod strategy;
mod types;

pub use generator::SignalGenerator;
pub use strategy::{strategy_from_config, EmaVwapStrategy, Strategy, TrendRsiStrategy};
pub use types::{Bar, IndicatorSnapshot, Sample, Signal};
