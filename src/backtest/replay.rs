//! Sample validation ahead of replay

use super::BacktestError;
use crate::signal::Sample;
use rust_decimal_macros::dec;

/// Reject samples the execution loop must never see
///
/// Prices must be positive and timestamps must not go backwards. Equal
/// timestamps are allowed.
pub fn validate_samples(samples: &[Sample]) -> Result<(), BacktestError> {
    let mut previous = None;
    for (index, sample) in samples.iter().enumerate() {
        if sample.price <= dec!(0) {
            return Err(BacktestError::NonPositivePrice {
                index,
                timestamp: sample.timestamp,
                price: sample.price,
            });
        }
        if let Some(prev) = previous {
            if sample.timestamp < prev {
                return Err(BacktestError::OutOfOrder {
                    index,
                    timestamp: sample.timestamp,
                    previous: prev,
                });
            }
        }
        previous = Some(sample.timestamp);
    }
    Ok(())
}
