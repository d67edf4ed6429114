//! Signal types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Indicator values after a bar has been applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ema_fast: Option<Decimal>,
    pub ema_slow: Option<Decimal>,
    pub vwap: Option<Decimal>,
    pub rsi: Option<Decimal>,
}

/// Entry signal for a long-only strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "BUY")]
    Buy,
    #[default]
    #[serde(rename = "NONE")]
    NoTrade,
}

impl Signal {
    pub fn is_buy(&self) -> bool {
        *self == Signal::Buy
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => f.write_str("BUY"),
            Signal::NoTrade => f.write_str("NONE"),
        }
    }
}

/// Input to the execution loop: one price and signal per timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    pub signal: Signal,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, price: Decimal, signal: Signal) -> Self {
        Self {
            timestamp,
            price,
            signal,
        }
    }
}
