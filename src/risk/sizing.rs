//! Position sizing implementations
//!
//! Quantity for a new long entry, either fixed or derived from the capital
//! put at risk between entry and stop.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::{SizingMode, TradingConfig};

/// Trait for position sizing implementations
pub trait PositionSizer: Send + Sync {
    /// Quantity to buy at `entry_price` with a stop at `stop_loss`
    fn quantity(&self, entry_price: Decimal, stop_loss: Decimal) -> Decimal;

    /// Get the sizing mode name
    fn mode_name(&self) -> &'static str;
}

/// Build the sizer selected in the trading config
pub fn sizer_from_config(config: &TradingConfig) -> Box<dyn PositionSizer> {
    match config.sizing {
        SizingMode::Fixed => Box::new(FixedSizer::new(config.quantity)),
        SizingMode::Risk => Box::new(RiskSizer::from_config(config)),
    }
}

/// Same quantity on every trade
#[derive(Debug, Clone)]
pub struct FixedSizer {
    pub quantity: Decimal,
}

impl FixedSizer {
    pub fn new(quantity: Decimal) -> Self {
        Self { quantity }
    }
}

impl Default for FixedSizer {
    fn default() -> Self {
        Self { quantity: dec!(1) }
    }
}

impl PositionSizer for FixedSizer {
    fn quantity(&self, _entry_price: Decimal, _stop_loss: Decimal) -> Decimal {
        self.quantity
    }

    fn mode_name(&self) -> &'static str {
        "fixed"
    }
}

/// Sizes so that a stop-out loses roughly `capital * risk_pct`
///
/// Quantity is rounded down to whole units and never drops below
/// `min_quantity`.
#[derive(Debug, Clone)]
pub struct RiskSizer {
    /// Trading capital
    pub capital: Decimal,
    /// Fraction of capital risked per trade (e.g., 0.01 = 1%)
    pub risk_pct: Decimal,
    /// Floor on the computed quantity
    pub min_quantity: Decimal,
}

impl RiskSizer {
    pub fn new(capital: Decimal, risk_pct: Decimal) -> Self {
        Self {
            capital,
            risk_pct,
            min_quantity: dec!(1),
        }
    }

    pub fn from_config(config: &TradingConfig) -> Self {
        Self {
            capital: config.capital,
            risk_pct: config.max_risk_per_trade,
            min_quantity: config.quantity,
        }
    }

    /// Set minimum quantity
    pub fn with_min_quantity(mut self, min_quantity: Decimal) -> Self {
        self.min_quantity = min_quantity;
        self
    }

    /// Currency amount risked per trade
    pub fn risk_amount(&self) -> Decimal {
        self.capital * self.risk_pct
    }
}

impl PositionSizer for RiskSizer {
    fn quantity(&self, entry_price: Decimal, stop_loss: Decimal) -> Decimal {
        let per_unit = entry_price - stop_loss;
        if per_unit <= dec!(0) {
            return self.min_quantity;
        }
        self.risk_amount()
            .checked_div(per_unit)
            .map_or(self.min_quantity, |q| q.floor().max(self.min_quantity))
    }

    fn mode_name(&self) -> &'static str {
        "risk"
    }
}
