//! Backtest analytics and reporting

use crate::execution::{Trade, TradeStatistics};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Realized activity for one trading day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Realized P&L of trades closed this day
    pub pnl: Decimal,
    /// Realized P&L of the run up to and including this day
    pub cumulative_pnl: Decimal,
    pub trades_closed: usize,
    pub entries_blocked: usize,
    /// Whether the risk gate halted trading during the day
    pub halted: bool,
}

/// Summary statistics from backtest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    /// Total realized P&L
    pub total_pnl: Decimal,
    /// Win rate percentage (0-100)
    pub win_rate: Decimal,
    /// Average winning trade
    pub avg_win: Decimal,
    /// Average losing trade (negative)
    pub avg_loss: Decimal,
    /// Profit factor, 0 when there were no losses
    pub profit_factor: Decimal,
    /// Trades entered
    pub trade_count: usize,
    /// Trades closed
    pub closed_trades: usize,
    /// Trades still open at the end of the run
    pub open_trades: usize,
    /// BUY signals refused by the risk gate
    pub entries_blocked: usize,
    /// Distinct trading days seen
    pub trading_days: usize,
    /// Days on which the risk gate halted trading
    pub halted_days: usize,
}

impl BacktestSummary {
    /// Combine ledger statistics with per-day bookkeeping
    pub fn from_parts(stats: &TradeStatistics, days: &[DaySummary]) -> Self {
        Self {
            total_pnl: stats.total_pnl,
            win_rate: stats.win_rate,
            avg_win: stats.avg_win,
            avg_loss: stats.avg_loss,
            profit_factor: stats.profit_factor,
            trade_count: stats.total_trades,
            closed_trades: stats.closed_trades,
            open_trades: stats.open_trades,
            entries_blocked: days.iter().map(|d| d.entries_blocked).sum(),
            trading_days: days.len(),
            halted_days: days.iter().filter(|d| d.halted).count(),
        }
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
               BACKTEST RESULTS
══════════════════════════════════════════════════════

PERFORMANCE
───────────────────────────────────────────────────────
Total P&L:        {:+.2}
Win Rate:         {:.1}%
Avg Win:          {:.2}
Avg Loss:         {:.2}
Profit Factor:    {:.2}

ACTIVITY
───────────────────────────────────────────────────────
Trades:           {} ({} closed, {} open)
Blocked Entries:  {}
Trading Days:     {} ({} halted)
══════════════════════════════════════════════════════
"#,
            self.total_pnl,
            self.win_rate,
            self.avg_win,
            self.avg_loss,
            self.profit_factor,
            self.trade_count,
            self.closed_trades,
            self.open_trades,
            self.entries_blocked,
            self.trading_days,
            self.halted_days,
        )
    }
}

/// Complete backtest results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Summary statistics
    pub summary: BacktestSummary,
    /// Per-day P&L in date order
    pub days: Vec<DaySummary>,
    /// Closed trades in closure order
    pub trades: Vec<Trade>,
}
