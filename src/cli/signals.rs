//! Signals command implementation

use crate::config::Config;
use crate::data::load_bars;
use crate::signal::SignalGenerator;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SignalsArgs {
    /// Bar file (CSV or Parquet), overrides `data.input`
    #[arg(long)]
    pub data: Option<PathBuf>,
}

impl SignalsArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let input = self.data.as_ref().unwrap_or(&config.data.input);
        let bars = load_bars(input)?;
        let mut generator = SignalGenerator::from_config(&config.strategy);

        println!(
            "{:<25} {:>12} {:>12} {:>12} {:>12} {:>8}  SIGNAL",
            "TIMESTAMP", "CLOSE", "EMA_FAST", "EMA_SLOW", "VWAP", "RSI"
        );
        for bar in &bars {
            let (ind, signal) = generator.process(bar);
            println!(
                "{:<25} {:>12.2} {:>12} {:>12} {:>12} {:>8}  {}",
                bar.timestamp.to_rfc3339(),
                bar.close,
                fmt_opt(ind.ema_fast),
                fmt_opt(ind.ema_slow),
                fmt_opt(ind.vwap),
                fmt_opt(ind.rsi),
                signal
            );
        }
        Ok(())
    }
}

fn fmt_opt(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}
