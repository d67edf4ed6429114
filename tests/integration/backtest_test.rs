//! Integration tests for the execution loop and risk gate

use chrono::{DateTime, Duration, TimeZone, Utc};
use ema_vwap_trader::backtest::{BacktestError, BacktestSimulator, ExecutionLoop, StepOutcome};
use ema_vwap_trader::config::TradingConfig;
use ema_vwap_trader::execution::{ExitReason, PaperTrader, TradeStatus};
use ema_vwap_trader::risk::RiskManager;
use ema_vwap_trader::signal::{Sample, Signal};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn at(day: u32, minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 9, 15, 0).unwrap() + Duration::minutes(minute)
}

fn buy(day: u32, minute: i64, price: Decimal) -> Sample {
    Sample::new(at(day, minute), price, Signal::Buy)
}

fn hold(day: u32, minute: i64, price: Decimal) -> Sample {
    Sample::new(at(day, minute), price, Signal::NoTrade)
}

fn config() -> TradingConfig {
    TradingConfig {
        capital: dec!(100000),
        max_daily_loss: dec!(0.01), // -1000
        stop_loss: dec!(0.01),
        target: dec!(0.02),
        quantity: dec!(100),
        ..Default::default()
    }
}

#[test]
fn test_ledger_target_scenario() {
    let mut ledger = PaperTrader::new();
    let ts = at(4, 0);
    ledger
        .enter_trade("T1", dec!(100), dec!(99), dec!(102), dec!(50), ts)
        .unwrap();
    assert!(ledger.exit_trade_at_target("T1", at(4, 5)));

    let trade = ledger.get_trade("T1").unwrap();
    assert_eq!(trade.pnl(), Some(dec!(100)));
    assert_eq!(trade.status(), TradeStatus::ClosedProfit);
    assert!(!ledger.exit_trade_at_target("T1", at(4, 6)));
}

#[test]
fn test_risk_gate_boundary_sequence() {
    let mut gate = RiskManager::new(dec!(-1000), at(4, 0).date_naive()).unwrap();
    let now = at(4, 0);

    assert!(gate.update_pnl(dec!(-500), None, now));
    assert!(!gate.update_pnl(dec!(-600), None, now));
    assert_eq!(gate.daily_pnl(), dec!(-500));
    assert!(gate.update_pnl(dec!(-500), None, now));
    assert!(!gate.is_trading_allowed(now));
    assert!(!gate.update_pnl(dec!(1), None, now));

    // Next day re-opens the gate
    assert!(gate.is_trading_allowed(at(5, 0)));
    assert_eq!(gate.daily_pnl(), dec!(0));
}

#[test]
fn test_losing_day_then_recovery() {
    // Each stop-out loses 100 * 1 = 100 on a 100 entry
    let mut samples = vec![];
    for i in 0..10 {
        samples.push(buy(4, i * 2, dec!(100)));
        samples.push(hold(4, i * 2 + 1, dec!(99)));
    }
    // Eleventh attempt on day one is blocked
    samples.push(buy(4, 30, dec!(100)));
    // Day two: one winner
    samples.push(buy(5, 0, dec!(100)));
    samples.push(hold(5, 1, dec!(102)));

    let result = BacktestSimulator::new(config()).run(&samples).unwrap();

    assert_eq!(result.days.len(), 2);
    assert_eq!(result.days[0].pnl, dec!(-1000));
    assert!(result.days[0].halted);
    assert_eq!(result.days[0].entries_blocked, 1);
    assert_eq!(result.days[1].pnl, dec!(200));
    assert!(!result.days[1].halted);
    assert_eq!(result.days[1].cumulative_pnl, dec!(-800));

    assert_eq!(result.summary.total_pnl, dec!(-800));
    assert_eq!(result.summary.trade_count, 11);
    assert_eq!(result.summary.entries_blocked, 1);
    assert_eq!(result.summary.halted_days, 1);
    assert_eq!(result.trades[10].exit().unwrap().reason, ExitReason::TargetHit);
}

#[test]
fn test_step_by_step_outcomes() {
    let config = config();
    let mut engine = ExecutionLoop::from_config(&config, at(4, 0).date_naive()).unwrap();

    assert_eq!(engine.step(&hold(4, 0, dec!(100))).unwrap(), StepOutcome::Idle);
    assert!(matches!(
        engine.step(&buy(4, 1, dec!(100))).unwrap(),
        StepOutcome::Entered { .. }
    ));
    assert_eq!(engine.step(&hold(4, 2, dec!(101))).unwrap(), StepOutcome::Held);
    assert!(matches!(
        engine.step(&hold(4, 3, dec!(98))).unwrap(),
        StepOutcome::Exited {
            reason: ExitReason::StopLossHit,
            ..
        }
    ));
    assert_eq!(engine.cumulative_pnl(), dec!(-100));
    assert_eq!(engine.ledger().get_total_pnl(), dec!(-100));
}

#[test]
fn test_invalid_samples_rejected() {
    let samples = vec![buy(4, 0, dec!(100)), hold(4, 1, dec!(0))];
    assert!(matches!(
        BacktestSimulator::new(config()).run(&samples),
        Err(BacktestError::NonPositivePrice { index: 1, .. })
    ));
}
