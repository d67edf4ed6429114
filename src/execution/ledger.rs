//! Paper trading ledger
//!
//! Owns every simulated trade, keeps the open/closed split consistent and
//! derives aggregate statistics from realized P&L.

use super::{ExitReason, Trade, TradeError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate statistics over the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStatistics {
    pub total_trades: usize,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub total_pnl: Decimal,
    /// Percentage of closed trades with positive P&L (0-100)
    pub win_rate: Decimal,
    pub avg_win: Decimal,
    /// Mean of losing P&Ls, negative when there are losses
    pub avg_loss: Decimal,
    /// Gross profit over gross loss, 0 when there are no losses
    pub profit_factor: Decimal,
}

/// Ledger of simulated trades
#[derive(Debug, Default)]
pub struct PaperTrader {
    /// Every trade ever entered, in entry order
    trades: Vec<Trade>,
    /// Trade ID to index into `trades`, for all trades
    index: HashMap<String, usize>,
    /// Open trade IDs to index into `trades`
    open: HashMap<String, usize>,
    /// Indexes of closed trades, in closure order
    closed: Vec<usize>,
    total_pnl: Decimal,
}

impl PaperTrader {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new long trade
    ///
    /// Fails without touching the ledger if the ID was ever used or the
    /// prices and quantity are invalid.
    pub fn enter_trade(
        &mut self,
        trade_id: &str,
        entry_price: Decimal,
        stop_loss: Decimal,
        target_price: Decimal,
        quantity: Decimal,
        entry_time: DateTime<Utc>,
    ) -> Result<&Trade, TradeError> {
        if self.index.contains_key(trade_id) {
            return Err(TradeError::DuplicateId(trade_id.to_string()));
        }

        let trade = Trade::new(
            trade_id,
            entry_price,
            stop_loss,
            target_price,
            quantity,
            entry_time,
        )?;

        let idx = self.trades.len();
        self.trades.push(trade);
        self.index.insert(trade_id.to_string(), idx);
        self.open.insert(trade_id.to_string(), idx);

        tracing::debug!(
            trade_id,
            %entry_price,
            %stop_loss,
            %target_price,
            %quantity,
            "Trade entered"
        );
        Ok(&self.trades[idx])
    }

    /// Exit an open trade at its target. Returns false if not open.
    pub fn exit_trade_at_target(&mut self, trade_id: &str, exit_time: DateTime<Utc>) -> bool {
        self.exit_with(trade_id, |trade| trade.close_at_target(exit_time))
    }

    /// Exit an open trade at its stop loss. Returns false if not open.
    pub fn exit_trade_at_stop_loss(&mut self, trade_id: &str, exit_time: DateTime<Utc>) -> bool {
        self.exit_with(trade_id, |trade| trade.close_at_stop_loss(exit_time))
    }

    /// Exit an open trade at a given price. Returns false if not open.
    pub fn exit_trade_at_price(
        &mut self,
        trade_id: &str,
        exit_price: Decimal,
        exit_time: DateTime<Utc>,
        reason: ExitReason,
    ) -> bool {
        self.exit_with(trade_id, |trade| {
            trade.close_at_price(exit_price, exit_time, reason)
        })
    }

    fn exit_with<F>(&mut self, trade_id: &str, close: F) -> bool
    where
        F: FnOnce(&mut Trade) -> Result<(), TradeError>,
    {
        let Some(&idx) = self.open.get(trade_id) else {
            return false;
        };

        let trade = &mut self.trades[idx];
        if let Err(err) = close(trade) {
            // Open map only ever holds open trades
            tracing::error!(trade_id, error = %err, "Open trade refused to close");
            return false;
        }

        self.open.remove(trade_id);
        self.closed.push(idx);
        if let Some(pnl) = trade.pnl() {
            self.total_pnl += pnl;
        }

        tracing::debug!(
            trade_id,
            status = %trade.status(),
            pnl = ?trade.pnl(),
            "Trade closed"
        );
        true
    }

    /// Look up a trade by ID, open or closed
    pub fn get_trade(&self, trade_id: &str) -> Option<&Trade> {
        self.index.get(trade_id).map(|&idx| &self.trades[idx])
    }

    /// Snapshot of open trades in entry order
    pub fn get_open_trades(&self) -> Vec<Trade> {
        let mut idxs: Vec<usize> = self.open.values().copied().collect();
        idxs.sort_unstable();
        idxs.into_iter().map(|idx| self.trades[idx].clone()).collect()
    }

    /// Snapshot of closed trades in closure order
    pub fn get_closed_trades(&self) -> Vec<Trade> {
        self.closed_iter().cloned().collect()
    }

    /// Snapshot of all trades in entry order
    pub fn get_all_trades(&self) -> Vec<Trade> {
        self.trades.clone()
    }

    /// Realized P&L of closed trades, in closure order
    pub fn get_pnl_list(&self) -> Vec<Decimal> {
        self.closed_iter().filter_map(Trade::pnl).collect()
    }

    pub fn get_total_pnl(&self) -> Decimal {
        self.total_pnl
    }

    /// Winning percentage of closed trades (0-100)
    pub fn get_win_rate(&self) -> Decimal {
        let pnls = self.get_pnl_list();
        win_rate(&pnls, self.closed.len())
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }

    pub fn has_open_trades(&self) -> bool {
        !self.open.is_empty()
    }

    /// Aggregate statistics over closed trades
    pub fn get_statistics(&self) -> TradeStatistics {
        let pnls = self.get_pnl_list();
        let mut stats = TradeStatistics {
            total_trades: self.trades.len(),
            open_trades: self.open.len(),
            closed_trades: self.closed.len(),
            ..Default::default()
        };

        if pnls.is_empty() {
            return stats;
        }

        let (wins, losses): (Vec<Decimal>, Vec<Decimal>) = pnls
            .iter()
            .copied()
            .filter(|p| !p.is_zero())
            .partition(|p| *p > dec!(0));

        let gross_profit: Decimal = wins.iter().copied().sum();
        let gross_loss: Decimal = losses.iter().copied().sum::<Decimal>().abs();

        if !wins.is_empty() {
            stats.avg_win = gross_profit / Decimal::from(wins.len());
        }
        if !losses.is_empty() {
            stats.avg_loss = -gross_loss / Decimal::from(losses.len());
        }
        if gross_loss > dec!(0) {
            stats.profit_factor = gross_profit / gross_loss;
        }

        stats.total_pnl = self.total_pnl;
        stats.win_rate = win_rate(&pnls, self.closed.len());
        stats
    }

    fn closed_iter(&self) -> impl Iterator<Item = &Trade> {
        self.closed.iter().map(|&idx| &self.trades[idx])
    }
}

fn win_rate(pnls: &[Decimal], closed: usize) -> Decimal {
    if closed == 0 {
        return dec!(0);
    }
    let wins = pnls.iter().filter(|p| **p > dec!(0)).count();
    Decimal::from(wins) * dec!(100) / Decimal::from(closed)
}
