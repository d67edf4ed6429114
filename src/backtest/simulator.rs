//! Backtest simulator engine

use super::{validate_samples, BacktestError, BacktestResult, ExecutionLoop};
use crate::config::TradingConfig;
use crate::signal::Sample;
use chrono::NaiveDate;

/// Runs a full sample series through a fresh execution loop
pub struct BacktestSimulator {
    config: TradingConfig,
}

impl BacktestSimulator {
    /// Create a new simulator
    pub fn new(config: TradingConfig) -> Self {
        Self { config }
    }

    /// Run the backtest
    ///
    /// The risk session starts on the day of the first sample.
    pub fn run(&self, samples: &[Sample]) -> Result<BacktestResult, BacktestError> {
        validate_samples(samples)?;

        let start_date = first_trading_day(samples).unwrap_or_default();
        let mut engine = ExecutionLoop::from_config(&self.config, start_date)?;

        tracing::info!(
            samples = samples.len(),
            start = %start_date,
            capital = %self.config.capital,
            daily_loss_limit = %self.config.daily_loss_limit(),
            "Starting backtest"
        );

        for sample in samples {
            engine.step(sample)?;
        }

        Ok(engine.finish())
    }

    pub fn config(&self) -> &TradingConfig {
        &self.config
    }
}

impl Default for BacktestSimulator {
    fn default() -> Self {
        Self::new(TradingConfig::default())
    }
}

/// First day covered by a sample series
pub fn first_trading_day(samples: &[Sample]) -> Option<NaiveDate> {
    samples.first().map(|s| s.timestamp.date_naive())
}
