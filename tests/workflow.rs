use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use time::OffsetDateTime;

use c2cx_api_client::error::CREDENTIALS_LOAD_MESSAGE;
use c2cx_api_client::rest::C2cxClient;
use c2cx_api_client::rest::private::{
    Balance, CancelledOrder, OrderInfo, OrdersByStatusRequest, SubmitOrderRequest,
    SubmitOrderResponse,
};
use c2cx_api_client::rest::public::{OrderBook, Ticker};
use c2cx_api_client::workflow::{Step, WorkflowConfig, WorkflowReport, WorkflowRunner};
use c2cx_api_client::{ApiError, C2cxError, OrderId, OrderStatus, Side};

type Scripted = Result<Value, (i64, &'static str)>;

#[derive(Default)]
struct ExchangeState {
    tickers: HashMap<String, Scripted>,
    books: HashMap<String, Scripted>,
    balance: Option<Scripted>,
    rejected_orders: HashMap<String, (i64, &'static str)>,
    records_missing: bool,
    next_order_id: i64,
    open: HashMap<String, String>,
    submitted: Vec<SubmitOrderRequest>,
    cancelled: HashSet<String>,
    calls: u32,
}

/// Scripted in-memory exchange.
#[derive(Clone, Default)]
struct MockExchange {
    state: Arc<Mutex<ExchangeState>>,
}

fn decode<T: DeserializeOwned>(scripted: &Scripted) -> Result<T, C2cxError> {
    match scripted {
        Ok(value) => Ok(serde_json::from_value(value.clone())?),
        Err((code, message)) => Err(C2cxError::Api(ApiError::new(Some(*code), *message))),
    }
}

fn missing(what: &str) -> C2cxError {
    C2cxError::Api(ApiError::new(Some(400), format!("no script for {what}")))
}

impl MockExchange {
    fn with(configure: impl FnOnce(&mut ExchangeState)) -> Self {
        let exchange = Self::default();
        {
            let mut state = exchange.state.lock().unwrap();
            state.next_order_id = 5_170_063;
            configure(&mut *state);
        }
        exchange
    }

    fn calls(&self) -> u32 {
        self.state.lock().unwrap().calls
    }

    fn submitted(&self) -> Vec<SubmitOrderRequest> {
        self.state.lock().unwrap().submitted.clone()
    }

    fn cancelled(&self) -> usize {
        self.state.lock().unwrap().cancelled.len()
    }

    fn balance_called(&self) -> bool {
        self.state.lock().unwrap().balance.is_none()
    }
}

impl C2cxClient for MockExchange {
    async fn get_ticker(&self, symbol: &str) -> Result<Ticker, C2cxError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        state
            .tickers
            .get(symbol)
            .map(decode)
            .unwrap_or_else(|| Err(missing(symbol)))
    }

    async fn get_order_book(&self, symbol: &str) -> Result<OrderBook, C2cxError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        state
            .books
            .get(symbol)
            .map(decode)
            .unwrap_or_else(|| Err(missing(symbol)))
    }

    async fn get_balance(&self) -> Result<Balance, C2cxError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        // Taken so tests can tell whether the balance was ever requested.
        match state.balance.take() {
            Some(scripted) => decode(&scripted),
            None => Err(missing("balance")),
        }
    }

    async fn submit_trade_order(
        &self,
        request: &SubmitOrderRequest,
    ) -> Result<SubmitOrderResponse, C2cxError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        state.submitted.push(request.clone());
        if let Some((code, message)) = state.rejected_orders.get(&request.symbol) {
            return Err(C2cxError::Api(ApiError::new(Some(*code), *message)));
        }
        let id = state.next_order_id;
        state.next_order_id += 1;
        state.open.insert(id.to_string(), request.symbol.clone());
        decode(&Ok(json!({ "orderId": id })))
    }

    async fn check_orders(
        &self,
        symbol: &str,
        order_id: Option<&OrderId>,
    ) -> Result<Vec<OrderInfo>, C2cxError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.records_missing {
            return Ok(Vec::new());
        }
        let id = order_id.ok_or_else(|| missing("all orders"))?.as_str();
        if state.open.get(id).map(String::as_str) != Some(symbol) {
            return Err(C2cxError::Api(ApiError::new(Some(400), "Order not found")));
        }
        let status = if state.cancelled.contains(id) { 5 } else { 7 };
        decode(&Ok(json!([{ "orderId": id, "status": status, "type": "Sell" }])))
    }

    async fn check_orders_by_status(
        &self,
        _request: &OrdersByStatusRequest,
    ) -> Result<Vec<OrderInfo>, C2cxError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        Ok(Vec::new())
    }

    async fn cancel_order(
        &self,
        symbol: &str,
        order_id: &OrderId,
    ) -> Result<Vec<CancelledOrder>, C2cxError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.open.get(order_id.as_str()).map(String::as_str) != Some(symbol) {
            return Err(C2cxError::Api(ApiError::new(Some(400), "Order not found")));
        }
        state.cancelled.insert(order_id.as_str().to_string());
        decode(&Ok(json!([{ "orderId": order_id.as_str() }])))
    }
}

fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

fn ticker(last: Value) -> Scripted {
    Ok(json!({ "date": now(), "high": 0, "last": last, "low": 0, "buy": 0, "sell": 0 }))
}

fn book(timestamp: i64) -> Scripted {
    Ok(json!({
        "timestamp": timestamp.to_string(),
        "bids": [["85", "1"], ["84", "2"]],
        "asks": [["91", "2"], ["90", "1"]]
    }))
}

fn balance() -> Scripted {
    Ok(json!({
        "funds": {
            "asset": { "net": 1000, "total": 1000 },
            "free": { "btc": "1", "cny": "500", "etc": "0", "eth": "0.25" },
            "freezed": {}
        }
    }))
}

/// All pairs priced, fresh books, balances in every traded currency.
fn healthy_exchange(configure: impl FnOnce(&mut ExchangeState)) -> MockExchange {
    MockExchange::with(|state| {
        state.tickers.insert("CNY_BTC".into(), ticker(json!(88)));
        state.tickers.insert("CNY_ETC".into(), ticker(json!("18.6")));
        state.tickers.insert("CNY_ETH".into(), ticker(json!("327.2")));
        for pair in ["CNY_BTC", "CNY_ETC", "CNY_ETH"] {
            state.books.insert(pair.into(), book(now()));
        }
        state.balance = Some(balance());
        configure(state);
    })
}

async fn run(exchange: &MockExchange) -> WorkflowReport {
    let report = WorkflowRunner::new(exchange.clone(), WorkflowConfig::default())
        .run()
        .await;
    assert_eq!(
        report.tally.total(),
        exchange.calls(),
        "every call resolves into exactly one counter"
    );
    report
}

fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

#[tokio::test]
async fn test_full_run_places_checks_and_cancels() {
    let exchange = healthy_exchange(|_| {});
    let report = run(&exchange).await;

    assert_eq!(report.tally.success(), 19);
    assert_eq!(report.tally.fail(), 0);
    assert!(report.is_clean());
    assert_eq!(report.prices.len(), 3);

    let submitted = exchange.submitted();
    assert_eq!(submitted.len(), 3);
    let btc = &submitted[0];
    assert_eq!(btc.symbol, "CNY_BTC");
    assert_eq!(btc.side, Side::Sell);
    assert_eq!(btc.quantity, dec(3));
    assert_eq!(btc.price, dec(92));
    assert!(!btc.is_advance_order());
    assert_eq!((submitted[1].quantity, submitted[1].price), (dec(1), dec(20)));
    assert_eq!((submitted[2].quantity, submitted[2].price), (dec(2), dec(344)));

    assert_eq!(report.cancelled.len(), 3);
    assert_eq!(exchange.cancelled(), 3);
    assert!(
        report
            .statuses_for(Step::StatusCheck)
            .all(|s| s.status() == Some(OrderStatus::Suspended))
    );
    assert_eq!(report.statuses_for(Step::FinalStatusCheck).count(), 3);
    assert!(
        report
            .statuses_for(Step::FinalStatusCheck)
            .all(|s| s.status() == Some(OrderStatus::Canceled))
    );
    assert!(report.to_string().contains("Made 19 API calls"));
}

#[tokio::test]
async fn test_ticker_error_skips_account_steps() {
    let exchange = healthy_exchange(|state| {
        state
            .tickers
            .insert("CNY_ETC".into(), Err((500, "system error")));
    });
    let report = run(&exchange).await;

    assert_eq!(exchange.calls(), 6);
    assert_eq!(report.tally.fail(), 1);
    assert_eq!(report.tally.success(), 5);
    assert_eq!(report.halted_before, Some(Step::Balance));
    assert!(!exchange.balance_called());
    assert!(exchange.submitted().is_empty());
}

#[tokio::test]
async fn test_order_book_error_skips_account_steps() {
    let exchange = healthy_exchange(|state| {
        state.books.insert("CNY_BTC".into(), Err((400, "Invalid symbol")));
    });
    let report = run(&exchange).await;

    assert_eq!(report.halted_before, Some(Step::Balance));
    assert_eq!(report.tally.fail(), 1);
    assert!(!exchange.balance_called());
}

#[tokio::test]
async fn test_non_positive_last_price_drops_only_that_pair() {
    let exchange = healthy_exchange(|state| {
        state.tickers.insert("CNY_ETH".into(), ticker(json!(0)));
    });
    let report = run(&exchange).await;

    assert!(!report.prices.contains_key("CNY_ETH"));
    assert_eq!(report.tally.fail(), 1);
    assert_eq!(report.halted_before, None);
    let symbols: Vec<_> = exchange.submitted().into_iter().map(|r| r.symbol).collect();
    assert_eq!(symbols, ["CNY_BTC", "CNY_ETC"]);
}

#[tokio::test]
async fn test_stale_order_book_drops_pair() {
    let exchange = healthy_exchange(|state| {
        state.books.insert("CNY_ETH".into(), book(now() - 60));
    });
    let report = run(&exchange).await;

    assert!(!report.prices.contains_key("CNY_ETH"));
    assert_eq!(report.tally.fail(), 1);
    assert_eq!(report.orders.len(), 2);
    assert_eq!(report.cancelled.len(), 2);
    assert!(exchange.submitted().iter().all(|r| r.symbol != "CNY_ETH"));
}

#[tokio::test]
async fn test_balance_failure_skips_orders() {
    let exchange = healthy_exchange(|state| {
        state.balance = Some(Err((401, "Invalid API key")));
    });
    let report = run(&exchange).await;

    assert_eq!(report.halted_before, Some(Step::OrderPlacement));
    assert_eq!(report.tally.success(), 6);
    assert_eq!(report.tally.fail(), 1);
    assert!(exchange.submitted().is_empty());
}

#[tokio::test]
async fn test_rejected_order_is_isolated() {
    let exchange = healthy_exchange(|state| {
        state
            .rejected_orders
            .insert("CNY_ETC".into(), (400, "Insufficient balance"));
    });
    let report = run(&exchange).await;

    assert_eq!(exchange.submitted().len(), 3);
    assert_eq!(report.orders.len(), 2);
    assert_eq!(report.tally.fail(), 1);
    assert_eq!(report.statuses_for(Step::StatusCheck).count(), 2);
    assert_eq!(report.cancelled.len(), 2);
    assert_eq!(report.halted_before, None);
}

#[tokio::test]
async fn test_no_orders_placed_ends_run() {
    let exchange = healthy_exchange(|state| {
        for pair in ["CNY_BTC", "CNY_ETC", "CNY_ETH"] {
            state.rejected_orders.insert(pair.into(), (400, "Insufficient balance"));
        }
    });
    let report = run(&exchange).await;

    assert_eq!(report.halted_before, Some(Step::StatusCheck));
    assert_eq!(report.tally.fail(), 3);
    assert!(report.statuses.is_empty());
}

#[tokio::test]
async fn test_missing_status_record_counts_as_success() {
    let exchange = healthy_exchange(|state| state.records_missing = true);
    let report = run(&exchange).await;

    assert_eq!(report.tally.fail(), 0);
    assert_eq!(report.statuses.len(), 6);
    assert!(report.statuses.iter().all(|s| s.code.is_none() && s.status().is_none()));
}

#[test]
fn test_missing_credentials_file_makes_no_calls() {
    let dir = tempfile::tempdir().unwrap();
    let mut built = false;

    let result = WorkflowRunner::<MockExchange>::from_credentials_file(
        dir.path().join("c2cx-api-creds.json"),
        WorkflowConfig::default(),
        |_| {
            built = true;
            MockExchange::default()
        },
    );

    let err = result.err().expect("credentials should fail to load");
    assert!(matches!(err, C2cxError::Credentials(_)));
    assert!(err.to_string().starts_with(CREDENTIALS_LOAD_MESSAGE));
    assert!(!built);
}

#[test]
fn test_malformed_credentials_file_makes_no_calls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("c2cx-api-creds.json");
    std::fs::write(&path, "{\"apiKey\": \"abc\"").unwrap();

    let result = WorkflowRunner::<MockExchange>::from_credentials_file(
        &path,
        WorkflowConfig::default(),
        |_| MockExchange::default(),
    );

    assert!(matches!(result.err(), Some(C2cxError::Credentials(_))));
}

#[test]
fn test_credentials_file_builds_runner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("c2cx-api-creds.json");
    std::fs::write(&path, r#"{"apiKey": "abc", "secretKey": "xyz"}"#).unwrap();
    let exchange = healthy_exchange(|_| {});

    let runner = WorkflowRunner::from_credentials_file(&path, WorkflowConfig::default(), |creds| {
        assert_eq!(creds.api_key, "abc");
        assert_eq!(creds.expose_secret(), "xyz");
        exchange.clone()
    })
    .unwrap();

    let report = tokio_test::block_on(runner.run());
    assert_eq!(report.tally.fail(), 0);
    assert_eq!(report.tally.total(), exchange.calls());
}
