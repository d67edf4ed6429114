//! Metrics facade
//!
//! Emits through the `metrics` crate; nothing is recorded unless the host
//! installs a recorder.

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Trades opened by the execution loop
    TradesEntered,
    /// Trades closed by the execution loop
    TradesClosed,
    /// BUY signals refused by the risk gate
    EntriesBlocked,
    /// Realized losses the risk gate refused to absorb
    PnlRejected,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeMetric {
    /// Realized P&L for the current trading day
    DailyPnl,
    /// Realized P&L for the whole run
    RealizedPnl,
    /// Open position count
    OpenPositions,
}

impl CounterMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::TradesEntered => "emavwap_trades_entered_total",
            CounterMetric::TradesClosed => "emavwap_trades_closed_total",
            CounterMetric::EntriesBlocked => "emavwap_entries_blocked_total",
            CounterMetric::PnlRejected => "emavwap_pnl_rejected_total",
        }
    }
}

impl GaugeMetric {
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::DailyPnl => "emavwap_daily_pnl",
            GaugeMetric::RealizedPnl => "emavwap_realized_pnl",
            GaugeMetric::OpenPositions => "emavwap_open_positions",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    ::metrics::gauge!(metric.name()).set(value);
    tracing::trace!(metric = metric.name(), value, "Setting gauge");
}
