//! End-to-end integration tests

use ema_vwap_trader::backtest::BacktestSimulator;
use ema_vwap_trader::config::{Config, ExecutionMode, StrategyKind};
use ema_vwap_trader::data::{load_bars, write_trade_log};
use ema_vwap_trader::signal::SignalGenerator;
use rust_decimal_macros::dec;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_example_loads() {
    let toml = include_str!("../../config.toml.example");

    let config: Config = toml::from_str(toml).unwrap();
    assert_eq!(config.trading.capital, dec!(100000));
    assert_eq!(config.trading.daily_loss_limit(), dec!(-2000));
    assert_eq!(config.execution.mode, ExecutionMode::Paper);
    assert_eq!(config.strategy.kind, StrategyKind::EmaVwap);
    assert!(config.validate().is_ok());
}

#[test]
fn test_csv_to_trade_log() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bars.csv");
    let output = dir.path().join("trade_log.csv");

    // Rising then falling closes with constant volume
    let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
    let closes = [100, 101, 102, 103, 104, 105, 104, 102, 101, 100];
    for (i, close) in closes.iter().enumerate() {
        csv.push_str(&format!(
            "2024-03-04 09:{:02}:00,{c},{c},{c},{c},1000\n",
            15 + i,
            c = close
        ));
    }
    fs::write(&input, csv).unwrap();

    let mut config = Config::default();
    config.strategy.ema_fast = 3;

    let bars = load_bars(&input).unwrap();
    let samples = SignalGenerator::from_config(&config.strategy).generate(&bars);
    let result = BacktestSimulator::new(config.trading.clone())
        .run(&samples)
        .unwrap();

    assert!(result.summary.trade_count > 0);
    assert_eq!(result.summary.open_trades, 0);
    assert_eq!(result.days.len(), 1);
    assert_eq!(
        result.days[0].cumulative_pnl,
        result.trades.iter().filter_map(|t| t.pnl()).sum()
    );

    let written = write_trade_log(&output, &result.trades).unwrap();
    assert_eq!(written, result.trades.len());

    let log = fs::read_to_string(&output).unwrap();
    assert!(log.starts_with("Date,EntryPrice,ExitPrice,Reason,TradePnL,Day"));
    assert_eq!(log.lines().count(), written + 1);
}
