//! Entry rules

use super::{Bar, IndicatorSnapshot, Signal};
use crate::config::{StrategyConfig, StrategyKind};
use rust_decimal::Decimal;

/// Trait for entry rule implementations
pub trait Strategy: Send + Sync {
    /// Decide on the signal for a bar given its indicator values
    fn evaluate(&self, bar: &Bar, indicators: &IndicatorSnapshot) -> Signal;

    fn name(&self) -> &'static str;
}

/// Build the strategy selected in the config
pub fn strategy_from_config(config: &StrategyConfig) -> Box<dyn Strategy> {
    match config.kind {
        StrategyKind::EmaVwap => Box::new(EmaVwapStrategy),
        StrategyKind::TrendRsi => Box::new(TrendRsiStrategy::new(
            config.rsi_lower,
            config.rsi_upper,
        )),
    }
}

/// BUY when the close is above both the fast EMA and VWAP
#[derive(Debug, Clone, Copy, Default)]
pub struct EmaVwapStrategy;

impl Strategy for EmaVwapStrategy {
    fn evaluate(&self, bar: &Bar, indicators: &IndicatorSnapshot) -> Signal {
        match (indicators.ema_fast, indicators.vwap) {
            (Some(ema), Some(vwap)) if bar.close > ema && bar.close > vwap => Signal::Buy,
            _ => Signal::NoTrade,
        }
    }

    fn name(&self) -> &'static str {
        "ema_vwap"
    }
}

/// BUY on an up-trend (fast EMA over slow EMA) with the close above VWAP and
/// RSI inside `[rsi_lower, rsi_upper]`
#[derive(Debug, Clone)]
pub struct TrendRsiStrategy {
    pub rsi_lower: Decimal,
    pub rsi_upper: Decimal,
}

impl TrendRsiStrategy {
    pub fn new(rsi_lower: Decimal, rsi_upper: Decimal) -> Self {
        Self {
            rsi_lower,
            rsi_upper,
        }
    }
}

impl Strategy for TrendRsiStrategy {
    fn evaluate(&self, bar: &Bar, indicators: &IndicatorSnapshot) -> Signal {
        let (Some(fast), Some(slow), Some(vwap), Some(rsi)) = (
            indicators.ema_fast,
            indicators.ema_slow,
            indicators.vwap,
            indicators.rsi,
        ) else {
            return Signal::NoTrade;
        };

        let trending = fast > slow;
        let above_vwap = bar.close > vwap;
        let rsi_in_band = rsi >= self.rsi_lower && rsi <= self.rsi_upper;

        if trending && above_vwap && rsi_in_band {
            Signal::Buy
        } else {
            Signal::NoTrade
        }
    }

    fn name(&self) -> &'static str {
        "trend_rsi"
    }
}
