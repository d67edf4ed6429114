//! Execution types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    /// Position is live
    Open,
    /// Closed at or above target
    ClosedProfit,
    /// Closed between stop and target
    ClosedLoss,
    /// Closed at or below stop loss
    ClosedStopped,
}

impl TradeStatus {
    /// Whether the trade has left the open state
    pub fn is_closed(&self) -> bool {
        !matches!(self, TradeStatus::Open)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "OPEN",
            TradeStatus::ClosedProfit => "CLOSED_PROFIT",
            TradeStatus::ClosedLoss => "CLOSED_LOSS",
            TradeStatus::ClosedStopped => "CLOSED_STOPPED",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a trade was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    TargetHit,
    StopLossHit,
    #[default]
    ManualExit,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::TargetHit => "TARGET_HIT",
            ExitReason::StopLossHit => "STOP_LOSS_HIT",
            ExitReason::ManualExit => "MANUAL_EXIT",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade entry and lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    /// Trade ID was used before, open or closed
    #[error("Trade with ID '{0}' already exists")]
    DuplicateId(String),
    /// Price or quantity is zero or negative
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: Decimal },
    /// Long stop must sit below entry
    #[error("Stop loss {stop_loss} must be below entry price {entry_price}")]
    StopNotBelowEntry {
        stop_loss: Decimal,
        entry_price: Decimal,
    },
    /// Long target must sit above entry
    #[error("Target {target_price} must be above entry price {entry_price}")]
    TargetNotAboveEntry {
        target_price: Decimal,
        entry_price: Decimal,
    },
    /// Trade has already left the open state
    #[error("Trade '{0}' is already closed")]
    AlreadyClosed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade_status_is_closed() {
        assert!(!TradeStatus::Open.is_closed());
        assert!(TradeStatus::ClosedProfit.is_closed());
        assert!(TradeStatus::ClosedLoss.is_closed());
        assert!(TradeStatus::ClosedStopped.is_closed());
    }

    #[test]
    fn test_exit_reason_display() {
        assert_eq!(ExitReason::TargetHit.to_string(), "TARGET_HIT");
        assert_eq!(ExitReason::StopLossHit.to_string(), "STOP_LOSS_HIT");
        assert_eq!(ExitReason::default(), ExitReason::ManualExit);
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_string(&TradeStatus::ClosedStopped).unwrap();
        assert_eq!(json, "\"CLOSED_STOPPED\"");
    }

    #[test]
    fn test_error_messages() {
        let err = TradeError::NonPositive {
            field: "quantity",
            value: dec!(0),
        };
        assert_eq!(err.to_string(), "quantity must be positive, got 0");

        let err = TradeError::DuplicateId("T1".to_string());
        assert!(err.to_string().contains("T1"));
    }
}
