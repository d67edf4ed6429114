//! Risk management module
//!
//! Daily loss gate and position sizing

mod limits;
mod sizing;
mod types;

pub use limits::{HaltReason, PnlEntry, RiskManager, RiskStatus};
pub use sizing::{sizer_from_config, FixedSizer, PositionSizer, RiskSizer};
pub use types::RiskError;
