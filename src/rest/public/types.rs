//! Types for public REST API endpoints.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use crate::types::serde_helpers::string_or_i64;

/// Ticker response.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    /// Unix timestamp of the ticker snapshot (seconds).
    #[serde(deserialize_with = "string_or_i64::deserialize", default)]
    pub date: i64,
    /// Highest price.
    #[serde(default)]
    pub high: Decimal,
    /// Last traded price; absent when the market has no trades.
    #[serde(default)]
    pub last: Option<Decimal>,
    /// Lowest price.
    #[serde(default)]
    pub low: Decimal,
    /// Best buy price.
    #[serde(default)]
    pub buy: Decimal,
    /// Best sell price.
    #[serde(default)]
    pub sell: Decimal,
}

impl Ticker {
    /// The last price if it is strictly positive.
    pub fn positive_last(&self) -> Option<Decimal> {
        self.last.filter(|price| price.is_sign_positive() && !price.is_zero())
    }
}

/// A single order book level as `(price, volume)`.
pub type BookLevel = (Decimal, Decimal);

/// Order book response.
///
/// The exchange lists bids best-first and asks worst-first (the best ask is
/// the last entry). The accessors below do not rely on that ordering; use
/// [`OrderBook::has_exchange_ordering`] to check it.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBook {
    /// Unix timestamp of the snapshot (seconds).
    #[serde(deserialize_with = "string_or_i64::deserialize")]
    pub timestamp: i64,
    /// Bid levels.
    #[serde(default)]
    pub bids: Vec<BookLevel>,
    /// Ask levels.
    #[serde(default)]
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    /// Highest bid price.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.iter().map(|(price, _)| *price).max()
    }

    /// Lowest ask price.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.iter().map(|(price, _)| *price).min()
    }

    /// Whether both sides are sorted by descending price, which puts the best
    /// bid first and the best ask last.
    pub fn has_exchange_ordering(&self) -> bool {
        let descending = |levels: &[BookLevel]| levels.windows(2).all(|w| w[0].0 >= w[1].0);
        descending(&self.bids) && descending(&self.asks)
    }

    /// Seconds elapsed between the snapshot and `now` (unix seconds).
    pub fn age_secs(&self, now: i64) -> i64 {
        now.saturating_sub(self.timestamp)
    }

    /// Whether the snapshot is younger than `max_age_secs` at `now`.
    pub fn is_fresh(&self, now: i64, max_age_secs: i64) -> bool {
        self.age_secs(now) < max_age_secs
    }

    /// Bid/ask spread in percent of the midpoint, see [`spread_percent`].
    pub fn spread_percent(&self) -> Option<Decimal> {
        spread_percent(self.best_ask()?, self.best_bid()?)
    }
}

/// Spread `(ask - bid) / ((ask + bid) / 2) * 100`, rounded to 2 decimals
/// (half away from zero). `None` when the midpoint is zero.
///
/// ```rust
/// use rust_decimal::Decimal;
/// use c2cx_api_client::rest::public::spread_percent;
///
/// let spread = spread_percent(Decimal::from(7920), Decimal::from(7864)).unwrap();
/// assert_eq!(spread.to_string(), "0.71");
/// ```
pub fn spread_percent(ask: Decimal, bid: Decimal) -> Option<Decimal> {
    let midpoint = (ask + bid) / Decimal::TWO;
    if midpoint.is_zero() {
        return None;
    }
    let spread = (ask - bid) / midpoint * Decimal::ONE_HUNDRED;
    Some(spread.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
