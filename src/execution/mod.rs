//! Paper execution module
//!
//! Trade records, their lifecycle, and the ledger that owns them

mod ledger;
mod trade;
mod types;

pub use ledger::{PaperTrader, TradeStatistics};
pub use trade::{Trade, TradeExit};
pub use types::{ExitReason, TradeError, TradeStatus};
