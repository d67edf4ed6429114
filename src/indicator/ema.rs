//! Exponential moving average

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Recursive EMA seeded with the first observation
///
/// Smoothing factor is `2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: Decimal,
    value: Option<Decimal>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            alpha: dec!(2) / Decimal::from(period + 1),
            value: None,
        }
    }

    /// Add a price and return the updated average
    pub fn update(&mut self, price: Decimal) -> Decimal {
        let next = match self.value {
            None => price,
            Some(prev) => self.alpha * price + (Decimal::ONE - self.alpha) * prev,
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn period(&self) -> usize {
        self.period
    }
}
