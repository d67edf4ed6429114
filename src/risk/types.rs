//! Risk management types

use rust_decimal::Decimal;
use thiserror::Error;

/// Risk management errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskError {
    /// Daily loss limit must be expressed as a negative amount
    #[error("max_daily_loss must be negative (e.g. -1000), got {0}")]
    NonNegativeDailyLoss(Decimal),
}
