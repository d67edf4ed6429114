//! Execution loop
//!
//! Steps through samples one at a time, opening a single long position on
//! BUY when the risk gate allows it and closing it at the stop or target.

use super::{BacktestError, BacktestResult, BacktestSummary, DaySummary, StepOutcome};
use crate::config::{ExitFill, TradingConfig};
use crate::execution::{ExitReason, PaperTrader, TradeError};
use crate::risk::{sizer_from_config, HaltReason, PositionSizer, RiskError, RiskManager};
use crate::signal::Sample;
use crate::telemetry::{increment, set_gauge, CounterMetric, GaugeMetric};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Running totals for the day in progress
#[derive(Debug, Clone)]
struct DayState {
    date: NaiveDate,
    pnl: Decimal,
    trades_closed: usize,
    entries_blocked: usize,
}

impl DayState {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            pnl: dec!(0),
            trades_closed: 0,
            entries_blocked: 0,
        }
    }
}

/// Single-position paper trading loop
pub struct ExecutionLoop {
    config: TradingConfig,
    sizer: Box<dyn PositionSizer>,
    ledger: PaperTrader,
    risk: RiskManager,
    open_trade: Option<String>,
    day: Option<DayState>,
    days: Vec<DaySummary>,
    last_seen: Option<(DateTime<Utc>, Decimal)>,
    cumulative_pnl: Decimal,
    next_id: u64,
}

impl ExecutionLoop {
    /// Create a loop whose risk session starts on `start_date`
    ///
    /// Fails if the configured daily loss does not yield a negative limit.
    pub fn from_config(config: &TradingConfig, start_date: NaiveDate) -> Result<Self, RiskError> {
        let risk = RiskManager::new(config.daily_loss_limit(), start_date)?;
        Ok(Self::new(config.clone(), risk, sizer_from_config(config)))
    }

    /// Create a loop from explicit parts
    pub fn new(config: TradingConfig, risk: RiskManager, sizer: Box<dyn PositionSizer>) -> Self {
        Self {
            config,
            sizer,
            ledger: PaperTrader::new(),
            risk,
            open_trade: None,
            day: None,
            days: vec![],
            last_seen: None,
            cumulative_pnl: dec!(0),
            next_id: 1,
        }
    }

    pub fn ledger(&self) -> &PaperTrader {
        &self.ledger
    }

    pub fn risk(&self) -> &RiskManager {
        &self.risk
    }

    /// ID of the open position, if any
    pub fn open_trade(&self) -> Option<&str> {
        self.open_trade.as_deref()
    }

    /// Summaries of completed days
    pub fn days(&self) -> &[DaySummary] {
        &self.days
    }

    /// Realized P&L of completed days plus the day in progress
    pub fn cumulative_pnl(&self) -> Decimal {
        self.cumulative_pnl + self.day.as_ref().map_or(dec!(0), |d| d.pnl)
    }

    /// Process one sample
    ///
    /// Samples must already be validated. Entries whose levels the ledger
    /// refuses are reported as `StepOutcome::Rejected`; errors only come from
    /// a trade ID collision.
    pub fn step(&mut self, sample: &Sample) -> Result<StepOutcome, BacktestError> {
        let ts = sample.timestamp;
        let price = sample.price;
        self.observe_day(ts.date_naive());

        let outcome = match self.open_trade.clone() {
            None if sample.signal.is_buy() => self.try_enter(price, ts)?,
            None => StepOutcome::Idle,
            Some(trade_id) => self.check_exit(&trade_id, price, ts),
        };

        self.last_seen = Some((ts, price));
        Ok(outcome)
    }

    /// Close out the run and build the result
    pub fn finish(mut self) -> BacktestResult {
        if self.config.flatten_at_day_end {
            self.flatten();
        }
        self.close_day();

        let stats = self.ledger.get_statistics();
        let summary = BacktestSummary::from_parts(&stats, &self.days);

        tracing::info!(
            total_pnl = %summary.total_pnl,
            trades = summary.trade_count,
            win_rate = %summary.win_rate,
            "Backtest complete"
        );

        BacktestResult {
            summary,
            days: self.days,
            trades: self.ledger.get_closed_trades(),
        }
    }

    fn observe_day(&mut self, date: NaiveDate) {
        match self.day.as_ref().map(|d| d.date) {
            Some(current) if current == date => {}
            Some(_) => {
                if self.config.flatten_at_day_end {
                    self.flatten();
                }
                self.close_day();
                self.start_day(date);
            }
            None => self.start_day(date),
        }
    }

    fn start_day(&mut self, date: NaiveDate) {
        if self.risk.session_date() != date {
            self.risk.roll_to(date);
        }
        self.day = Some(DayState::new(date));
        set_gauge(GaugeMetric::DailyPnl, 0.0);
        tracing::info!(day = %date, "New trading day");
    }

    fn close_day(&mut self) {
        let Some(day) = self.day.take() else {
            return;
        };

        self.cumulative_pnl += day.pnl;
        tracing::info!(
            day = %day.date,
            daily_pnl = %day.pnl,
            cumulative_pnl = %self.cumulative_pnl,
            "End of trading day"
        );

        self.days.push(DaySummary {
            date: day.date,
            pnl: day.pnl,
            cumulative_pnl: self.cumulative_pnl,
            trades_closed: day.trades_closed,
            entries_blocked: day.entries_blocked,
            halted: self.risk.halt_reason().is_some(),
        });
    }

    fn try_enter(
        &mut self,
        price: Decimal,
        ts: DateTime<Utc>,
    ) -> Result<StepOutcome, BacktestError> {
        if !self.risk.is_trading_allowed(ts) {
            if let Some(day) = self.day.as_mut() {
                day.entries_blocked += 1;
            }
            increment(CounterMetric::EntriesBlocked);
            tracing::info!(
                %ts,
                %price,
                daily_pnl = %self.risk.daily_pnl(),
                "Trade blocked: daily loss limit reached"
            );
            return Ok(StepOutcome::Blocked);
        }

        let stop_loss = price * (Decimal::ONE - self.config.stop_loss);
        let target = price * (Decimal::ONE + self.config.target);
        let quantity = self.sizer.quantity(price, stop_loss);
        let trade_id = format!("T{:05}", self.next_id);

        match self
            .ledger
            .enter_trade(&trade_id, price, stop_loss, target, quantity, ts)
        {
            Ok(_) => {}
            Err(e @ TradeError::DuplicateId(_)) => return Err(e.into()),
            Err(e) => {
                // Levels can collapse onto the entry at extreme prices
                tracing::warn!(%ts, %price, error = %e, "Entry refused by ledger");
                return Ok(StepOutcome::Rejected(e));
            }
        }
        self.next_id += 1;
        self.open_trade = Some(trade_id.clone());

        increment(CounterMetric::TradesEntered);
        set_gauge(GaugeMetric::OpenPositions, 1.0);
        tracing::info!(
            %ts,
            trade_id = %trade_id,
            %price,
            %stop_loss,
            %target,
            %quantity,
            risk = %((price - stop_loss) * quantity),
            sizing = self.sizer.mode_name(),
            "ENTER LONG"
        );

        Ok(StepOutcome::Entered { trade_id })
    }

    fn check_exit(&mut self, trade_id: &str, price: Decimal, ts: DateTime<Utc>) -> StepOutcome {
        let Some(trade) = self.ledger.get_trade(trade_id) else {
            self.open_trade = None;
            return StepOutcome::Idle;
        };

        let reason = if price >= trade.target_price() {
            ExitReason::TargetHit
        } else if price <= trade.stop_loss() {
            ExitReason::StopLossHit
        } else {
            return StepOutcome::Held;
        };

        let closed = match (self.config.exit_fill, reason) {
            (ExitFill::Level, ExitReason::TargetHit) => {
                self.ledger.exit_trade_at_target(trade_id, ts)
            }
            (ExitFill::Level, _) => self.ledger.exit_trade_at_stop_loss(trade_id, ts),
            (ExitFill::Close, _) => self.ledger.exit_trade_at_price(trade_id, price, ts, reason),
        };

        match self.record_exit(trade_id, closed, ts) {
            Some(pnl) => StepOutcome::Exited {
                trade_id: trade_id.to_string(),
                reason,
                pnl,
            },
            None => StepOutcome::Held,
        }
    }

    /// Close any open position at the last seen price
    fn flatten(&mut self) {
        let (Some(trade_id), Some((ts, price))) = (self.open_trade.clone(), self.last_seen) else {
            return;
        };

        let closed = self
            .ledger
            .exit_trade_at_price(&trade_id, price, ts, ExitReason::ManualExit);
        if self.record_exit(&trade_id, closed, ts).is_some() {
            tracing::info!(%ts, trade_id = %trade_id, %price, "Position flattened at day end");
        }
    }

    /// Book a closed trade into the day and forward its P&L to the risk gate
    fn record_exit(&mut self, trade_id: &str, closed: bool, ts: DateTime<Utc>) -> Option<Decimal> {
        if !closed {
            return None;
        }
        self.open_trade = None;

        let trade = self.ledger.get_trade(trade_id)?;
        let pnl = trade.pnl()?;
        let exit_price = trade.exit().map(|e| e.price);
        let reason = trade.exit().map(|e| e.reason);

        if let Some(day) = self.day.as_mut() {
            day.pnl += pnl;
            day.trades_closed += 1;
        }

        if !self.risk.update_pnl(pnl, Some(trade_id), ts) {
            increment(CounterMetric::PnlRejected);
            let overshoot = self.risk.daily_pnl() + pnl;
            self.risk.halt(HaltReason::LossLimitOvershoot(overshoot));
        }

        increment(CounterMetric::TradesClosed);
        set_gauge(GaugeMetric::OpenPositions, 0.0);
        set_gauge(
            GaugeMetric::DailyPnl,
            self.risk.daily_pnl().to_f64().unwrap_or_default(),
        );
        set_gauge(
            GaugeMetric::RealizedPnl,
            self.ledger.get_total_pnl().to_f64().unwrap_or_default(),
        );

        tracing::info!(
            %ts,
            trade_id,
            exit_price = ?exit_price,
            reason = ?reason,
            %pnl,
            daily_pnl = %self.risk.daily_pnl(),
            "EXIT LONG"
        );

        Some(pnl)
    }
}
