//! CLI interface for ema-vwap-trader
//!
//! Provides subcommands for:
//! - `backtest`: Replay bars through the paper trader and risk gate
//! - `signals`: Print indicator values and entry signals per bar
//! - `config`: Show the effective configuration

mod backtest;
mod signals;

pub use backtest::{BacktestArgs, OutputFormat};
pub use signals::SignalsArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ema-vwap-trader")]
#[command(about = "Paper trading engine with a daily loss limit for EMA/VWAP strategies")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a backtest over historical bars
    Backtest(BacktestArgs),
    /// Print per-bar indicators and signals
    Signals(SignalsArgs),
    /// Show configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backtest_args() {
        let cli = Cli::parse_from([
            "ema-vwap-trader",
            "--config",
            "custom.toml",
            "backtest",
            "--data",
            "bars.csv",
            "--format",
            "json",
        ]);
        assert_eq!(cli.config, "custom.toml");
        match cli.command {
            Commands::Backtest(args) => {
                assert_eq!(args.data.unwrap().to_str(), Some("bars.csv"));
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.trade_log.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::parse_from(["ema-vwap-trader", "config"]);
        assert_eq!(cli.config, "config.toml");
        assert!(matches!(cli.command, Commands::Config));
    }
}
