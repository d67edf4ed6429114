//! Cumulative volume-weighted average price

use crate::config::VwapPrice;
use crate::signal::Bar;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// VWAP accumulated from the first bar of the series
#[derive(Debug, Clone)]
pub struct Vwap {
    source: VwapPrice,
    cum_pv: Decimal,
    cum_volume: Decimal,
}

impl Vwap {
    pub fn new(source: VwapPrice) -> Self {
        Self {
            source,
            cum_pv: dec!(0),
            cum_volume: dec!(0),
        }
    }

    /// Add a bar; `None` until some volume has traded
    pub fn update(&mut self, bar: &Bar) -> Option<Decimal> {
        let price = match self.source {
            VwapPrice::Close => bar.close,
            VwapPrice::Typical => (bar.high + bar.low + bar.close) / dec!(3),
        };
        self.cum_pv += price * bar.volume;
        self.cum_volume += bar.volume;
        self.value()
    }

    pub fn value(&self) -> Option<Decimal> {
        if self.cum_volume.is_zero() {
            return None;
        }
        Some(self.cum_pv / self.cum_volume)
    }
}
