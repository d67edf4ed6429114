//! Bar-by-bar signal generation

use super::{strategy_from_config, Bar, IndicatorSnapshot, Sample, Signal, Strategy};
use crate::config::StrategyConfig;
use crate::indicator::{Ema, Rsi, Vwap};

/// Feeds bars through the indicators and asks the strategy for a signal
pub struct SignalGenerator {
    ema_fast: Ema,
    ema_slow: Ema,
    vwap: Vwap,
    rsi: Rsi,
    strategy: Box<dyn Strategy>,
}

impl SignalGenerator {
    /// Create from strategy config
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::with_strategy(config, strategy_from_config(config))
    }

    /// Create with indicator settings from `config` and a custom strategy
    pub fn with_strategy(config: &StrategyConfig, strategy: Box<dyn Strategy>) -> Self {
        Self {
            ema_fast: Ema::new(config.ema_fast),
            ema_slow: Ema::new(config.ema_slow),
            vwap: Vwap::new(config.vwap_price),
            rsi: Rsi::new(config.rsi_period),
            strategy,
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Apply a bar, returning its indicator values and signal
    pub fn process(&mut self, bar: &Bar) -> (IndicatorSnapshot, Signal) {
        let indicators = IndicatorSnapshot {
            ema_fast: Some(self.ema_fast.update(bar.close)),
            ema_slow: Some(self.ema_slow.update(bar.close)),
            vwap: self.vwap.update(bar),
            rsi: self.rsi.update(bar.close),
        };
        let signal = self.strategy.evaluate(bar, &indicators);

        tracing::debug!(
            timestamp = %bar.timestamp,
            %signal,
            close = %bar.close,
            ema = ?indicators.ema_fast,
            vwap = ?indicators.vwap,
            rsi = ?indicators.rsi,
            "Bar evaluated"
        );

        (indicators, signal)
    }

    /// Map a bar series to execution samples priced at the close
    pub fn generate(&mut self, bars: &[Bar]) -> Vec<Sample> {
        bars.iter()
            .map(|bar| {
                let (_, signal) = self.process(bar);
                Sample::new(bar.timestamp, bar.close, signal)
            })
            .collect()
    }
}
