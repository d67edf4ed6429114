//! Simulated long trade with fixed stop and target

use super::{ExitReason, TradeError, TradeStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Exit details, set in one step when a trade closes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExit {
    /// Fill price of the exit
    pub price: Decimal,
    /// Exit timestamp
    pub time: DateTime<Utc>,
    /// Why the trade was closed
    pub reason: ExitReason,
    /// Realized P&L: (exit - entry) * quantity
    pub pnl: Decimal,
    /// Realized P&L as a percentage of entry price
    pub pnl_percent: Decimal,
}

/// One simulated long position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    id: String,
    entry_price: Decimal,
    stop_loss: Decimal,
    target_price: Decimal,
    quantity: Decimal,
    entry_time: DateTime<Utc>,
    status: TradeStatus,
    exit: Option<TradeExit>,
}

impl Trade {
    /// Create an open trade after validating prices and quantity
    pub fn new(
        id: impl Into<String>,
        entry_price: Decimal,
        stop_loss: Decimal,
        target_price: Decimal,
        quantity: Decimal,
        entry_time: DateTime<Utc>,
    ) -> Result<Self, TradeError> {
        for (field, value) in [
            ("entry_price", entry_price),
            ("stop_loss", stop_loss),
            ("target_price", target_price),
            ("quantity", quantity),
        ] {
            if value <= dec!(0) {
                return Err(TradeError::NonPositive { field, value });
            }
        }
        if stop_loss >= entry_price {
            return Err(TradeError::StopNotBelowEntry {
                stop_loss,
                entry_price,
            });
        }
        if target_price <= entry_price {
            return Err(TradeError::TargetNotAboveEntry {
                target_price,
                entry_price,
            });
        }

        Ok(Self {
            id: id.into(),
            entry_price,
            stop_loss,
            target_price,
            quantity,
            entry_time,
            status: TradeStatus::Open,
            exit: None,
        })
    }

    /// Close at the target price
    pub fn close_at_target(&mut self, exit_time: DateTime<Utc>) -> Result<(), TradeError> {
        self.close(
            self.target_price,
            exit_time,
            ExitReason::TargetHit,
            TradeStatus::ClosedProfit,
        )
    }

    /// Close at the stop loss price
    pub fn close_at_stop_loss(&mut self, exit_time: DateTime<Utc>) -> Result<(), TradeError> {
        self.close(
            self.stop_loss,
            exit_time,
            ExitReason::StopLossHit,
            TradeStatus::ClosedStopped,
        )
    }

    /// Close at an arbitrary price
    ///
    /// Status follows the thresholds, not the sign of the P&L: an exit above
    /// entry but below target is still `ClosedLoss`.
    pub fn close_at_price(
        &mut self,
        exit_price: Decimal,
        exit_time: DateTime<Utc>,
        reason: ExitReason,
    ) -> Result<(), TradeError> {
        let status = if exit_price >= self.target_price {
            TradeStatus::ClosedProfit
        } else if exit_price <= self.stop_loss {
            TradeStatus::ClosedStopped
        } else {
            TradeStatus::ClosedLoss
        };
        self.close(exit_price, exit_time, reason, status)
    }

    fn close(
        &mut self,
        price: Decimal,
        time: DateTime<Utc>,
        reason: ExitReason,
        status: TradeStatus,
    ) -> Result<(), TradeError> {
        if !self.is_open() {
            return Err(TradeError::AlreadyClosed(self.id.clone()));
        }

        let diff = price - self.entry_price;
        self.exit = Some(TradeExit {
            price,
            time,
            reason,
            pnl: diff * self.quantity,
            pnl_percent: diff / self.entry_price * dec!(100),
        });
        self.status = status;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn entry_price(&self) -> Decimal {
        self.entry_price
    }

    pub fn stop_loss(&self) -> Decimal {
        self.stop_loss
    }

    pub fn target_price(&self) -> Decimal {
        self.target_price
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    pub fn status(&self) -> TradeStatus {
        self.status
    }

    /// Exit details, `None` while open
    pub fn exit(&self) -> Option<&TradeExit> {
        self.exit.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// Realized P&L, `None` while open
    pub fn pnl(&self) -> Option<Decimal> {
        self.exit.as_ref().map(|e| e.pnl)
    }

    /// Realized P&L percent, `None` while open
    pub fn pnl_percent(&self) -> Option<Decimal> {
        self.exit.as_ref().map(|e| e.pnl_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap()
    }

    fn open_trade(quantity: Decimal) -> Trade {
        Trade::new("T1", dec!(100), dec!(95), dec!(110), quantity, ts(9)).unwrap()
    }

    #[test]
    fn test_new_trade_is_open_without_exit() {
        let trade = open_trade(dec!(1));
        assert!(trade.is_open());
        assert_eq!(trade.status(), TradeStatus::Open);
        assert!(trade.exit().is_none());
        assert!(trade.pnl().is_none());
        assert!(trade.pnl_percent().is_none());
    }

    #[test]
    fn test_new_rejects_non_positive_inputs() {
        let err = Trade::new("T1", dec!(0), dec!(95), dec!(110), dec!(1), ts(9)).unwrap_err();
        assert!(matches!(
            err,
            TradeError::NonPositive {
                field: "entry_price",
                ..
            }
        ));

        let err = Trade::new("T1", dec!(100), dec!(95), dec!(110), dec!(-1), ts(9)).unwrap_err();
        assert!(matches!(
            err,
            TradeError::NonPositive {
                field: "quantity",
                ..
            }
        ));
    }

    #[test]
    fn test_new_rejects_bad_ordering() {
        let err = Trade::new("T1", dec!(100), dec!(100), dec!(110), dec!(1), ts(9)).unwrap_err();
        assert!(matches!(err, TradeError::StopNotBelowEntry { .. }));

        let err = Trade::new("T1", dec!(100), dec!(95), dec!(100), dec!(1), ts(9)).unwrap_err();
        assert!(matches!(err, TradeError::TargetNotAboveEntry { .. }));
    }

    #[test]
    fn test_close_at_target() {
        let mut trade = open_trade(dec!(10));
        trade.close_at_target(ts(11)).unwrap();

        let exit = trade.exit().unwrap();
        assert_eq!(trade.status(), TradeStatus::ClosedProfit);
        assert_eq!(exit.price, dec!(110));
        assert_eq!(exit.reason, ExitReason::TargetHit);
        assert_eq!(exit.time, ts(11));
        assert_eq!(exit.pnl, dec!(100));
        assert_eq!(exit.pnl_percent, dec!(10));
    }

    #[test]
    fn test_close_at_stop_loss() {
        let mut trade = open_trade(dec!(2));
        trade.close_at_stop_loss(ts(10)).unwrap();

        assert_eq!(trade.status(), TradeStatus::ClosedStopped);
        assert_eq!(trade.pnl(), Some(dec!(-10)));
        assert_eq!(trade.pnl_percent(), Some(dec!(-5)));
        assert_eq!(trade.exit().unwrap().reason, ExitReason::StopLossHit);
    }

    #[test]
    fn test_close_at_price_between_thresholds_is_closed_loss() {
        let mut trade = open_trade(dec!(1));
        trade
            .close_at_price(dec!(102), ts(10), ExitReason::ManualExit)
            .unwrap();

        // Profitable, but below target
        assert_eq!(trade.status(), TradeStatus::ClosedLoss);
        assert_eq!(trade.pnl(), Some(dec!(2)));
    }

    #[test]
    fn test_close_at_price_classification() {
        let mut above = open_trade(dec!(1));
        above
            .close_at_price(dec!(112), ts(10), ExitReason::TargetHit)
            .unwrap();
        assert_eq!(above.status(), TradeStatus::ClosedProfit);

        let mut below = open_trade(dec!(1));
        below
            .close_at_price(dec!(94), ts(10), ExitReason::StopLossHit)
            .unwrap();
        assert_eq!(below.status(), TradeStatus::ClosedStopped);
        assert_eq!(below.pnl(), Some(dec!(-6)));
    }

    #[test]
    fn test_double_close_is_rejected_and_keeps_first_exit() {
        let mut trade = open_trade(dec!(1));
        trade.close_at_target(ts(10)).unwrap();

        let err = trade
            .close_at_price(dec!(90), ts(11), ExitReason::ManualExit)
            .unwrap_err();
        assert_eq!(err, TradeError::AlreadyClosed("T1".to_string()));
        assert_eq!(trade.status(), TradeStatus::ClosedProfit);
        assert_eq!(trade.exit().unwrap().price, dec!(110));
    }

    #[test]
    fn test_pnl_percent_fractional() {
        let mut trade =
            Trade::new("T2", dec!(250.50), dec!(240), dec!(260), dec!(3), ts(9)).unwrap();
        trade
            .close_at_price(dec!(255.51), ts(10), ExitReason::ManualExit)
            .unwrap();

        let diff = dec!(255.51) - dec!(250.50);
        assert_eq!(trade.pnl(), Some(diff * dec!(3)));
        assert_eq!(trade.pnl_percent(), Some(diff / dec!(250.50) * dec!(100)));
    }
}
