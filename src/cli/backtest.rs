//! Backtest command implementation

use crate::backtest::{BacktestResult, BacktestSimulator};
use crate::config::Config;
use crate::data::{load_bars, write_trade_log};
use crate::signal::SignalGenerator;
use anyhow::Context;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Summary output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// Bar file (CSV or Parquet), overrides `data.input`
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Trade log destination, overrides `data.trade_log`
    #[arg(long)]
    pub trade_log: Option<PathBuf>,

    /// Output format: table or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl BacktestArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let input = self.data.as_ref().unwrap_or(&config.data.input);
        let bars = load_bars(input)?;

        let mut generator = SignalGenerator::from_config(&config.strategy);
        let samples = generator.generate(&bars);
        tracing::info!(
            strategy = generator.strategy_name(),
            samples = samples.len(),
            buy_signals = samples.iter().filter(|s| s.signal.is_buy()).count(),
            "Signals generated"
        );

        let result = BacktestSimulator::new(config.trading.clone())
            .run(&samples)
            .context("Backtest failed")?;

        self.print(&result)?;

        let trade_log = self
            .trade_log
            .as_ref()
            .or(config.data.trade_log.as_ref())
            .filter(|p| !p.as_os_str().is_empty());
        if let Some(path) = trade_log {
            write_trade_log(path, &result.trades)
                .with_context(|| format!("Failed to write trade log to {}", path.display()))?;
        }

        Ok(())
    }

    fn print(&self, result: &BacktestResult) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Table => {
                println!("{}", result.summary.format_table());
                for day in &result.days {
                    println!(
                        "{}  pnl {:>12.2}  cumulative {:>12.2}  trades {:>3}  blocked {:>3}{}",
                        day.date,
                        day.pnl,
                        day.cumulative_pnl,
                        day.trades_closed,
                        day.entries_blocked,
                        if day.halted { "  HALTED" } else { "" }
                    );
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "summary": result.summary,
                    "days": result.days,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
        Ok(())
    }
}
