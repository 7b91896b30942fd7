//! End-to-end integration workflow against the exchange.
//!
//! The workflow checks prices, reads balances, places orders that cannot
//! execute (too large and priced above the market), verifies their status,
//! cancels them and verifies again. Every call is counted in a [`Tally`].
//!
//! Steps run once, in order, without retries. A failure local to one pair or
//! order only costs that entity; a hard API error in the price checks or a
//! failed balance call skips everything that depends on it.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use c2cx_api_client::auth::StaticCredentials;
//! use c2cx_api_client::rest::C2cxRestClient;
//! use c2cx_api_client::workflow::{WorkflowConfig, WorkflowRunner};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = C2cxRestClient::builder()
//!         .credentials(Arc::new(StaticCredentials::new("key", "secret")))
//!         .build();
//!     let report = WorkflowRunner::new(client, WorkflowConfig::default()).run().await;
//!     println!("{report}");
//! }
//! ```

mod report;
mod sizing;

pub use report::{PlacedOrder, StatusObservation, Step, Tally, WorkflowReport, format_timestamp};
pub use sizing::{DEFAULT_PRICE_MARKUP, probe_ask_price, probe_quantity};

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{Instrument, info, info_span, warn};

use crate::auth::Credentials;
use crate::error::C2cxError;
use crate::rest::C2cxClient;
use crate::rest::private::{Balance, SubmitOrderRequest};
use crate::types::{OrderId, Side, available_pairs, pair_for_currency};

/// Default maximum age of an order book snapshot.
pub const DEFAULT_STALENESS_WINDOW: Duration = Duration::from_secs(10);

/// Workflow settings.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Order books older than this are treated as stale.
    pub staleness_window: Duration,
    /// Markup over the last price for probe orders.
    pub price_markup: Decimal,
    /// Side of the probe orders.
    pub side: Side,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            staleness_window: DEFAULT_STALENESS_WINDOW,
            price_markup: DEFAULT_PRICE_MARKUP,
            side: Side::Sell,
        }
    }
}

/// Runs the integration workflow against a [`C2cxClient`].
pub struct WorkflowRunner<C> {
    client: C,
    config: WorkflowConfig,
    tally: Tally,
    proceed: bool,
    prices: BTreeMap<String, Decimal>,
    balance: Option<Balance>,
    orders: Vec<PlacedOrder>,
    statuses: Vec<StatusObservation>,
    cancelled: Vec<OrderId>,
}

impl<C: C2cxClient> WorkflowRunner<C> {
    /// Create a runner around an existing client.
    pub fn new(client: C, config: WorkflowConfig) -> Self {
        Self {
            client,
            config,
            tally: Tally::default(),
            proceed: true,
            prices: BTreeMap::new(),
            balance: None,
            orders: Vec::new(),
            statuses: Vec::new(),
            cancelled: Vec::new(),
        }
    }

    /// Load credentials from `path` and build the client from them.
    ///
    /// `build_client` is only called once the credentials are loaded, so a
    /// missing or malformed file never leads to an API call.
    pub fn from_credentials_file<F>(
        path: impl AsRef<Path>,
        config: WorkflowConfig,
        build_client: F,
    ) -> Result<Self, C2cxError>
    where
        F: FnOnce(Credentials) -> C,
    {
        let credentials = Credentials::from_file(path)?;
        Ok(Self::new(build_client(credentials), config))
    }

    /// Counters so far.
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Run every step and produce the report.
    pub async fn run(mut self) -> WorkflowReport {
        let started_at = OffsetDateTime::now_utc();
        let start = Instant::now();
        info!(at = %format_timestamp(started_at), "starting tests");

        let halted_before = self.run_steps().await;
        if let Some(step) = halted_before {
            warn!(step = %step, "prerequisite failed, skipping remaining steps");
        }

        WorkflowReport {
            started_at,
            finished_at: OffsetDateTime::now_utc(),
            elapsed: start.elapsed(),
            tally: self.tally,
            prices: self.prices,
            orders: self.orders,
            statuses: self.statuses,
            cancelled: self.cancelled,
            halted_before,
        }
    }

    /// Returns the first step skipped, if any.
    async fn run_steps(&mut self) -> Option<Step> {
        self.discover_prices()
            .instrument(info_span!("step", name = %Step::PriceDiscovery))
            .await;
        self.check_order_books()
            .instrument(info_span!("step", name = %Step::OrderBook))
            .await;
        if !self.proceed {
            return Some(Step::Balance);
        }

        if !self
            .fetch_balance()
            .instrument(info_span!("step", name = %Step::Balance))
            .await
        {
            return Some(Step::OrderPlacement);
        }

        self.place_orders()
            .instrument(info_span!("step", name = %Step::OrderPlacement))
            .await;
        if self.orders.is_empty() {
            return Some(Step::StatusCheck);
        }

        self.check_statuses(Step::StatusCheck)
            .instrument(info_span!("step", name = %Step::StatusCheck))
            .await;
        self.cancel_orders()
            .instrument(info_span!("step", name = %Step::Cancellation))
            .await;
        self.check_statuses(Step::FinalStatusCheck)
            .instrument(info_span!("step", name = %Step::FinalStatusCheck))
            .await;
        None
    }

    async fn discover_prices(&mut self) {
        for &symbol in available_pairs() {
            match self.client.get_ticker(symbol).await {
                Ok(ticker) => match ticker.positive_last() {
                    Some(last) => {
                        self.tally.record_success();
                        self.prices.insert(symbol.to_string(), last);
                        info!(symbol, %last, "last price");
                    }
                    None => {
                        self.tally.record_failure();
                        warn!(
                            symbol,
                            last = ?ticker.last,
                            "ticker succeeded but last price is not greater than 0, ignoring pair"
                        );
                    }
                },
                Err(e) => {
                    self.tally.record_failure();
                    self.proceed = false;
                    warn!(symbol, error = %e, "not able to get last price");
                }
            }
        }
    }

    async fn check_order_books(&mut self) {
        let max_age = i64::try_from(self.config.staleness_window.as_secs()).unwrap_or(i64::MAX);
        for &symbol in available_pairs() {
            match self.client.get_order_book(symbol).await {
                Ok(book) => {
                    let now = OffsetDateTime::now_utc().unix_timestamp();
                    if book.is_fresh(now, max_age) {
                        self.tally.record_success();
                        if !book.has_exchange_ordering() {
                            warn!(symbol, "order book levels are not in the expected order");
                        }
                        match (book.best_ask(), book.best_bid(), book.spread_percent()) {
                            (Some(ask), Some(bid), Some(spread)) => {
                                info!(symbol, %ask, %bid, %spread, "ask/bid spread from order book")
                            }
                            _ => warn!(symbol, "order book has an empty side, no spread"),
                        }
                    } else {
                        self.tally.record_failure();
                        self.prices.remove(symbol);
                        warn!(
                            symbol,
                            age_secs = book.age_secs(now),
                            max_age,
                            "order book is stale, ignoring pair"
                        );
                    }
                }
                Err(e) => {
                    self.tally.record_failure();
                    self.proceed = false;
                    warn!(symbol, error = %e, "not able to get order book");
                }
            }
        }
    }

    async fn fetch_balance(&mut self) -> bool {
        match self.client.get_balance().await {
            Ok(balance) => {
                self.tally.record_success();
                for (currency, amount) in &balance.funds.free {
                    info!(currency = %currency, %amount, "available balance");
                }
                self.balance = Some(balance);
                true
            }
            Err(e) => {
                self.tally.record_failure();
                self.proceed = false;
                warn!(error = %e, "not able to get balances");
                false
            }
        }
    }

    async fn place_orders(&mut self) {
        let Some(balance) = self.balance.take() else {
            return;
        };

        for (currency, free) in &balance.funds.free {
            let symbol = pair_for_currency(currency);
            if !available_pairs().contains(&symbol.as_str()) {
                continue;
            }
            let Some(&last) = self.prices.get(&symbol) else {
                continue;
            };

            let quantity = probe_quantity(*free);
            let price = probe_ask_price(last, self.config.price_markup);
            let request = SubmitOrderRequest::new(&symbol, self.config.side, price, quantity);
            info!(side = %self.config.side, %quantity, symbol = %symbol, %price, "making an order");

            match self.client.submit_trade_order(&request).await {
                Ok(response) => {
                    self.tally.record_success();
                    info!(symbol = %symbol, order_id = %response.order_id, "order placed");
                    self.orders.push(PlacedOrder {
                        symbol,
                        order_id: response.order_id,
                        price,
                        quantity,
                    });
                }
                Err(e) => {
                    self.tally.record_failure();
                    warn!(symbol = %symbol, error = %e, "order failed");
                }
            }
        }

        self.balance = Some(balance);
    }

    async fn check_statuses(&mut self, step: Step) {
        for order in &self.orders {
            match self
                .client
                .check_orders(&order.symbol, Some(&order.order_id))
                .await
            {
                Ok(records) => {
                    self.tally.record_success();
                    // A query by ID returns that single order.
                    let observation = StatusObservation {
                        step,
                        symbol: order.symbol.clone(),
                        order_id: order.order_id.clone(),
                        code: records.first().map(|r| r.status),
                    };
                    match (observation.code, observation.status()) {
                        (_, Some(status)) => info!(
                            order_id = %order.order_id,
                            symbol = %order.symbol,
                            status = %status,
                            "order status"
                        ),
                        (Some(code), None) => warn!(
                            order_id = %order.order_id,
                            symbol = %order.symbol,
                            code,
                            "unknown order status code"
                        ),
                        (None, None) => warn!(
                            order_id = %order.order_id,
                            symbol = %order.symbol,
                            "exchange returned no order record"
                        ),
                    }
                    self.statuses.push(observation);
                }
                Err(e) => {
                    self.tally.record_failure();
                    warn!(
                        order_id = %order.order_id,
                        symbol = %order.symbol,
                        error = %e,
                        "was not able to get order status"
                    );
                }
            }
        }
    }

    async fn cancel_orders(&mut self) {
        for order in &self.orders {
            match self.client.cancel_order(&order.symbol, &order.order_id).await {
                Ok(_) => {
                    self.tally.record_success();
                    self.cancelled.push(order.order_id.clone());
                    info!(order_id = %order.order_id, symbol = %order.symbol, "canceled order");
                }
                Err(e) => {
                    self.tally.record_failure();
                    warn!(
                        order_id = %order.order_id,
                        symbol = %order.symbol,
                        error = %e,
                        "was not able to cancel order"
                    );
                }
            }
        }
    }
}
