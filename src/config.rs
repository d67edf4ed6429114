//! Configuration types for ema-vwap-trader

use crate::telemetry::LogFormat;
use anyhow::{bail, ensure};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Capital, risk limits and exit levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Trading capital in currency units
    #[serde(default = "default_capital")]
    pub capital: Decimal,

    /// Fraction of capital risked per trade
    #[serde(default = "default_max_risk_per_trade")]
    pub max_risk_per_trade: Decimal,

    /// Maximum daily loss as a fraction of capital
    #[serde(default = "default_max_daily_loss")]
    pub max_daily_loss: Decimal,

    /// Stop loss distance below entry, as a fraction
    #[serde(default = "default_stop_loss")]
    pub stop_loss: Decimal,

    /// Target distance above entry, as a fraction
    #[serde(default = "default_target")]
    pub target: Decimal,

    /// Units per trade (fixed sizing) or minimum units (risk sizing)
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,

    #[serde(default)]
    pub sizing: SizingMode,

    #[serde(default)]
    pub exit_fill: ExitFill,

    /// Close any open position when the trading day changes
    #[serde(default = "default_true")]
    pub flatten_at_day_end: bool,
}

fn default_capital() -> Decimal {
    dec!(100000)
}
fn default_max_risk_per_trade() -> Decimal {
    dec!(0.01)
}
fn default_max_daily_loss() -> Decimal {
    dec!(0.02)
}
fn default_stop_loss() -> Decimal {
    dec!(0.01)
}
fn default_target() -> Decimal {
    dec!(0.02)
}
fn default_quantity() -> Decimal {
    dec!(1)
}
fn default_true() -> bool {
    true
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            capital: default_capital(),
            max_risk_per_trade: default_max_risk_per_trade(),
            max_daily_loss: default_max_daily_loss(),
            stop_loss: default_stop_loss(),
            target: default_target(),
            quantity: default_quantity(),
            sizing: SizingMode::default(),
            exit_fill: ExitFill::default(),
            flatten_at_day_end: true,
        }
    }
}

impl TradingConfig {
    /// Daily loss limit in currency units, negative
    pub fn daily_loss_limit(&self) -> Decimal {
        -(self.capital * self.max_daily_loss)
    }
}

/// Sizing mode for position sizing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// Constant quantity per trade
    #[default]
    Fixed,
    /// Quantity from capital at risk between entry and stop
    Risk,
}

/// Price at which stop/target exits are filled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExitFill {
    /// Fill at the stop or target level
    #[default]
    Level,
    /// Fill at the bar close that crossed the level
    Close,
}

/// Execution engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
}

/// Execution mode: paper trading or live
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Paper,
    Live,
}

/// Signal strategy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(default)]
    pub kind: StrategyKind,

    #[serde(default = "default_ema_fast")]
    pub ema_fast: usize,

    #[serde(default = "default_ema_slow")]
    pub ema_slow: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Lowest RSI accepted for entries (trend_rsi)
    #[serde(default = "default_rsi_lower")]
    pub rsi_lower: Decimal,

    /// Highest RSI accepted for entries (trend_rsi)
    #[serde(default = "default_rsi_upper")]
    pub rsi_upper: Decimal,

    #[serde(default)]
    pub vwap_price: VwapPrice,
}

fn default_ema_fast() -> usize {
    20
}
fn default_ema_slow() -> usize {
    50
}
fn default_rsi_period() -> usize {
    14
}
fn default_rsi_lower() -> Decimal {
    dec!(50)
}
fn default_rsi_upper() -> Decimal {
    dec!(65)
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::default(),
            ema_fast: default_ema_fast(),
            ema_slow: default_ema_slow(),
            rsi_period: default_rsi_period(),
            rsi_lower: default_rsi_lower(),
            rsi_upper: default_rsi_upper(),
            vwap_price: VwapPrice::default(),
        }
    }
}

/// Entry rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Close above fast EMA and above VWAP
    #[default]
    EmaVwap,
    /// Fast EMA above slow EMA, close above VWAP, RSI inside band
    TrendRsi,
}

/// Price fed into the VWAP accumulator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VwapPrice {
    #[default]
    Close,
    /// (high + low + close) / 3
    Typical,
}

/// Input and output paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// OHLCV bars, CSV or Parquet
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Trade log export, CSV or Parquet; an empty path skips export
    #[serde(default = "default_trade_log")]
    pub trade_log: Option<PathBuf>,
}

fn default_input() -> PathBuf {
    PathBuf::from("data.csv")
}

fn default_trade_log() -> Option<PathBuf> {
    Some(PathBuf::from("trade_log.csv"))
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            trade_log: default_trade_log(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Reject settings the simulator cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let t = &self.trading;
        ensure!(t.capital > dec!(0), "trading.capital must be positive");
        ensure!(t.quantity > dec!(0), "trading.quantity must be positive");
        for (name, value) in [
            ("trading.max_risk_per_trade", t.max_risk_per_trade),
            ("trading.max_daily_loss", t.max_daily_loss),
            ("trading.stop_loss", t.stop_loss),
            ("trading.target", t.target),
        ] {
            ensure!(
                value > dec!(0) && value < dec!(1),
                "{name} must be a fraction between 0 and 1, got {value}"
            );
        }

        if self.execution.mode == ExecutionMode::Live {
            bail!("live execution is not supported; set execution.mode = \"paper\"");
        }

        let s = &self.strategy;
        ensure!(s.ema_fast > 0, "strategy.ema_fast must be at least 1");
        ensure!(s.ema_slow > 0, "strategy.ema_slow must be at least 1");
        ensure!(s.rsi_period > 0, "strategy.rsi_period must be at least 1");
        ensure!(
            s.rsi_lower <= s.rsi_upper,
            "strategy.rsi_lower ({}) must not exceed strategy.rsi_upper ({})",
            s.rsi_lower,
            s.rsi_upper
        );
        Ok(())
    }
}
