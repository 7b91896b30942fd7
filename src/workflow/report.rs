//! Call accounting and the end-of-run summary.

use std::collections::BTreeMap;
use std::time::Duration;

use rust_decimal::Decimal;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::types::{OrderId, OrderStatus};

/// Steps of the integration workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// Last price of every pair from the ticker.
    PriceDiscovery,
    /// Order book freshness and spread.
    OrderBook,
    /// Free balances.
    Balance,
    /// Probe order placement.
    OrderPlacement,
    /// Status of each probe order.
    StatusCheck,
    /// Cancellation of each probe order.
    Cancellation,
    /// Status of each probe order after cancellation.
    FinalStatusCheck,
}

impl Step {
    /// Section title used in logs.
    pub fn title(&self) -> &'static str {
        match self {
            Step::PriceDiscovery => "Check prices using ticker",
            Step::OrderBook => "Check prices using Order Book",
            Step::Balance => "Get balances",
            Step::OrderPlacement => "Make orders",
            Step::StatusCheck => "Check order status",
            Step::Cancellation => "Cancel orders",
            Step::FinalStatusCheck => "Check order status again",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Success/failure counters. Every API call resolves into exactly one of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    success: u32,
    fail: u32,
}

impl Tally {
    /// Count a successful check.
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    /// Count a failed check.
    pub fn record_failure(&mut self) {
        self.fail += 1;
    }

    /// Successful checks so far.
    pub fn success(&self) -> u32 {
        self.success
    }

    /// Failed checks so far.
    pub fn fail(&self) -> u32 {
        self.fail
    }

    /// All checks so far.
    pub fn total(&self) -> u32 {
        self.success + self.fail
    }

    /// Success rate in whole percent, 0 when nothing was checked.
    pub fn success_rate(&self) -> u32 {
        match self.total() {
            0 => 0,
            total => (f64::from(self.success) / f64::from(total) * 100.0).round() as u32,
        }
    }
}

/// A probe order accepted by the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    /// Trading pair.
    pub symbol: String,
    /// Exchange-assigned ID.
    pub order_id: OrderId,
    /// Limit price sent.
    pub price: Decimal,
    /// Quantity sent.
    pub quantity: Decimal,
}

/// Outcome of one status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusObservation {
    /// Which pass produced the observation.
    pub step: Step,
    /// Trading pair.
    pub symbol: String,
    /// Order queried.
    pub order_id: OrderId,
    /// Raw status code, `None` if the exchange returned no record.
    pub code: Option<i64>,
}

impl StatusObservation {
    /// Decoded status, `None` when missing or outside the known table.
    pub fn status(&self) -> Option<OrderStatus> {
        self.code.and_then(OrderStatus::from_code)
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    /// Wall-clock start.
    pub started_at: OffsetDateTime,
    /// Wall-clock end.
    pub finished_at: OffsetDateTime,
    /// Time spent in the run.
    pub elapsed: Duration,
    /// Final counters.
    pub tally: Tally,
    /// Pairs whose price survived the ticker and order book checks.
    pub prices: BTreeMap<String, Decimal>,
    /// Orders the exchange accepted.
    pub orders: Vec<PlacedOrder>,
    /// Status queries that succeeded, both passes.
    pub statuses: Vec<StatusObservation>,
    /// Orders cancelled successfully.
    pub cancelled: Vec<OrderId>,
    /// First step that was skipped because a prerequisite failed.
    pub halted_before: Option<Step>,
}

impl WorkflowReport {
    /// Average seconds per call, rounded to 2 decimals; 0 when nothing was called.
    pub fn seconds_per_call(&self) -> f64 {
        match self.tally.total() {
            0 => 0.0,
            total => (self.elapsed.as_secs_f64() / f64::from(total) * 100.0).round() / 100.0,
        }
    }

    /// Whether every check passed and every step ran.
    pub fn is_clean(&self) -> bool {
        self.tally.fail() == 0 && self.halted_before.is_none()
    }

    /// Observations from one pass.
    pub fn statuses_for(&self, step: Step) -> impl Iterator<Item = &StatusObservation> {
        self.statuses.iter().filter(move |s| s.step == step)
    }
}

/// `YYYY-MM-DD HH:MM:SS` rendering used in summaries.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

impl std::fmt::Display for WorkflowReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "TEST SUMMARY:")?;
        writeln!(
            f,
            "======================================= {}",
            format_timestamp(self.finished_at)
        )?;
        writeln!(
            f,
            "Made {} API calls in about {} seconds ({:.2} second per call)",
            self.tally.total(),
            self.elapsed.as_secs(),
            self.seconds_per_call()
        )?;
        writeln!(f, "{} failed.", self.tally.fail())?;
        write!(f, "Success rate is {}%", self.tally.success_rate())
    }
}
