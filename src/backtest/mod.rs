//! Backtesting module
//!
//! Replays price and signal samples through the paper trader and risk gate

mod analytics;
mod engine;
mod replay;
mod simulator;
mod types;

pub use analytics::{BacktestResult, BacktestSummary, DaySummary};
pub use engine::ExecutionLoop;
pub use replay::validate_samples;
pub use simulator::{first_trading_day, BacktestSimulator};
pub use types::{BacktestError, StepOutcome};
