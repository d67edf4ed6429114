//! Backtest types

use crate::execution::{ExitReason, TradeError};
use crate::risk::RiskError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that stop a backtest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BacktestError {
    /// Sample timestamp earlier than the one before it
    #[error("Sample {index} at {timestamp} is earlier than previous sample at {previous}")]
    OutOfOrder {
        index: usize,
        timestamp: DateTime<Utc>,
        previous: DateTime<Utc>,
    },
    /// Sample price is zero or negative
    #[error("Sample {index} at {timestamp} has non-positive price {price}")]
    NonPositivePrice {
        index: usize,
        timestamp: DateTime<Utc>,
        price: Decimal,
    },
    #[error(transparent)]
    Trade(#[from] TradeError),
    #[error(transparent)]
    Risk(#[from] RiskError),
}

/// What the execution loop did with one sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// No position and no entry signal
    Idle,
    /// New position opened
    Entered { trade_id: String },
    /// BUY signal refused by the risk gate
    Blocked,
    /// BUY signal whose entry the ledger refused, e.g. stop rounding onto
    /// the entry price
    Rejected(TradeError),
    /// Position open, neither level reached
    Held,
    /// Position closed at stop or target
    Exited {
        trade_id: String,
        reason: ExitReason,
        pnl: Decimal,
    },
}
