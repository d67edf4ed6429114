//! Relative strength index over simple rolling means

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;

/// RSI from the mean gain and mean loss of the last `period` price changes
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    last_price: Option<Decimal>,
    changes: VecDeque<Decimal>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            last_price: None,
            changes: VecDeque::with_capacity(period + 1),
        }
    }

    /// Add a price; `None` until `period` changes are available
    pub fn update(&mut self, price: Decimal) -> Option<Decimal> {
        if let Some(prev) = self.last_price {
            self.changes.push_back(price - prev);
            if self.changes.len() > self.period {
                self.changes.pop_front();
            }
        }
        self.last_price = Some(price);
        self.value()
    }

    pub fn value(&self) -> Option<Decimal> {
        if self.changes.len() < self.period {
            return None;
        }

        let n = Decimal::from(self.period);
        let gain: Decimal = self.changes.iter().filter(|c| **c > dec!(0)).sum::<Decimal>() / n;
        let loss: Decimal = -self.changes.iter().filter(|c| **c < dec!(0)).sum::<Decimal>() / n;

        if loss.is_zero() {
            // Flat window has no defined RSI
            return if gain.is_zero() { None } else { Some(dec!(100)) };
        }

        let rs = gain / loss;
        Some(dec!(100) - dec!(100) / (Decimal::ONE + rs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_warmup() {
        let mut rsi = Rsi::new(3);
        assert!(rsi.update(dec!(10)).is_none());
        assert!(rsi.update(dec!(11)).is_none());
        assert!(rsi.update(dec!(12)).is_none());
        assert!(rsi.update(dec!(13)).is_some());
    }

    #[test]
    fn test_rsi_all_gains() {
        let mut rsi = Rsi::new(2);
        rsi.update(dec!(10));
        rsi.update(dec!(11));
        assert_eq!(rsi.update(dec!(12)), Some(dec!(100)));
    }

    #[test]
    fn test_rsi_balanced() {
        let mut rsi = Rsi::new(2);
        rsi.update(dec!(10));
        rsi.update(dec!(12));
        // +2 then -2: RS = 1, RSI = 50
        assert_eq!(rsi.update(dec!(10)), Some(dec!(50)));
    }

    #[test]
    fn test_rsi_rolling_window_drops_old_changes() {
        let mut rsi = Rsi::new(2);
        rsi.update(dec!(10));
        rsi.update(dec!(5)); // -5, falls out of the window below
        rsi.update(dec!(8)); // +3
        // window: +3, -1 -> gain 1.5, loss 0.5, RS 3, RSI 75
        assert_eq!(rsi.update(dec!(7)), Some(dec!(75)));
    }

    #[test]
    fn test_rsi_flat_is_undefined() {
        let mut rsi = Rsi::new(2);
        rsi.update(dec!(10));
        rsi.update(dec!(10));
        assert!(rsi.update(dec!(10)).is_none());
    }
}
