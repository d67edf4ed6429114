//! Daily loss limit and trading halt latch

use super::RiskError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Reason for trading halt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// Daily P&L reached the configured maximum daily loss
    MaxDailyLossReached(Decimal),
    /// A realized loss would have pushed daily P&L past the limit
    LossLimitOvershoot(Decimal),
}

/// One accepted P&L update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlEntry {
    pub timestamp: DateTime<Utc>,
    pub pnl: Decimal,
    pub cumulative_pnl: Decimal,
    pub trade_id: Option<String>,
}

/// Point-in-time view of the risk gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskStatus {
    pub trading_allowed: bool,
    pub daily_pnl: Decimal,
    pub max_daily_loss: Decimal,
    pub remaining_loss_budget: Decimal,
    pub num_trades: usize,
    pub session_date: NaiveDate,
}

/// Tracks realized P&L for the session day and latches trading off once the
/// daily loss limit is reached.
///
/// Day changes are detected from the timestamps callers pass in; the latch
/// only re-opens on a rollover.
#[derive(Debug, Clone)]
pub struct RiskManager {
    max_daily_loss: Decimal,
    daily_pnl: Decimal,
    trading_allowed: bool,
    session_date: NaiveDate,
    trades: Vec<PnlEntry>,
    halt_reason: Option<HaltReason>,
}

impl RiskManager {
    /// Create a gate for the given session day
    ///
    /// `max_daily_loss` is a currency amount and must be strictly negative.
    pub fn new(max_daily_loss: Decimal, session_date: NaiveDate) -> Result<Self, RiskError> {
        if max_daily_loss >= dec!(0) {
            return Err(RiskError::NonNegativeDailyLoss(max_daily_loss));
        }

        Ok(Self {
            max_daily_loss,
            daily_pnl: dec!(0),
            trading_allowed: true,
            session_date,
            trades: vec![],
            halt_reason: None,
        })
    }

    /// Roll over to a new session if `now` falls on a different day
    ///
    /// Returns true when a rollover happened.
    pub fn check_date_reset(&mut self, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        if today == self.session_date {
            return false;
        }
        self.roll_to(today);
        true
    }

    /// Start a new session on `date`
    pub fn roll_to(&mut self, date: NaiveDate) {
        tracing::debug!(
            from = %self.session_date,
            to = %date,
            daily_pnl = %self.daily_pnl,
            "Risk session rollover"
        );
        self.reset_daily_pnl();
        self.session_date = date;
    }

    /// Zero daily P&L, re-enable trading and clear the day's log
    pub fn reset_daily_pnl(&mut self) {
        self.daily_pnl = dec!(0);
        self.trading_allowed = true;
        self.trades.clear();
        self.halt_reason = None;
    }

    /// Whether new trades may be opened at `now`
    pub fn is_trading_allowed(&mut self, now: DateTime<Utc>) -> bool {
        self.check_date_reset(now);
        self.trading_allowed
    }

    /// Record realized P&L from a closed trade
    ///
    /// Returns false without changing state if trading is halted or if the
    /// update would take daily P&L below the limit. An update landing exactly
    /// on the limit is accepted and halts trading for the rest of the day.
    pub fn update_pnl(
        &mut self,
        pnl: Decimal,
        trade_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> bool {
        self.check_date_reset(now);

        if !self.trading_allowed {
            return false;
        }

        let new_pnl = self.daily_pnl + pnl;
        if new_pnl < self.max_daily_loss {
            tracing::warn!(
                %pnl,
                daily_pnl = %self.daily_pnl,
                max_daily_loss = %self.max_daily_loss,
                "P&L update rejected: would breach max daily loss"
            );
            return false;
        }

        self.daily_pnl = new_pnl;
        self.trades.push(PnlEntry {
            timestamp: now,
            pnl,
            cumulative_pnl: new_pnl,
            trade_id: trade_id.map(str::to_string),
        });

        if self.daily_pnl <= self.max_daily_loss {
            self.halt(HaltReason::MaxDailyLossReached(self.daily_pnl));
        }

        true
    }

    /// Latch trading off until the next rollover
    pub fn halt(&mut self, reason: HaltReason) {
        if self.trading_allowed {
            tracing::warn!(
                ?reason,
                daily_pnl = %self.daily_pnl,
                session = %self.session_date,
                "Trading halted for the day"
            );
        }
        self.trading_allowed = false;
        self.halt_reason.get_or_insert(reason);
    }

    /// Loss budget left before the limit; negative while there is room
    pub fn remaining_loss_budget(&self) -> Decimal {
        self.max_daily_loss - self.daily_pnl
    }

    pub fn daily_pnl(&self) -> Decimal {
        self.daily_pnl
    }

    pub fn max_daily_loss(&self) -> Decimal {
        self.max_daily_loss
    }

    pub fn session_date(&self) -> NaiveDate {
        self.session_date
    }

    pub fn halt_reason(&self) -> Option<&HaltReason> {
        self.halt_reason.as_ref()
    }

    /// Accepted updates for the current session day
    pub fn trade_history(&self) -> &[PnlEntry] {
        &self.trades
    }

    /// Status report, after applying any pending rollover
    pub fn status(&mut self, now: DateTime<Utc>) -> RiskStatus {
        self.check_date_reset(now);
        RiskStatus {
            trading_allowed: self.trading_allowed,
            daily_pnl: self.daily_pnl,
            max_daily_loss: self.max_daily_loss,
            remaining_loss_budget: self.remaining_loss_budget(),
            num_trades: self.trades.len(),
            session_date: self.session_date,
        }
    }
}
