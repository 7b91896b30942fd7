//! Public REST API endpoints (no authentication required).

mod types;

pub use types::*;

use crate::auth::RequestParams;
use crate::error::C2cxError;
use crate::rest::C2cxRestClient;
use crate::rest::endpoints::public;

impl C2cxRestClient {
    /// Get ticker information for a pair.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Trading pair, e.g. `"CNY_BTC"` (case-insensitive on the exchange side).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use c2cx_api_client::rest::C2cxRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = C2cxRestClient::new();
    ///     let ticker = client.get_ticker("CNY_ETH").await?;
    ///     println!("high={} low={} last={:?}", ticker.high, ticker.low, ticker.last);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_ticker(&self, symbol: &str) -> Result<Ticker, C2cxError> {
        let params: RequestParams = [("symbol", symbol)].into_iter().collect();
        self.public_get(public::TICKER, &params).await
    }

    /// Get the order book for a pair.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Trading pair, e.g. `"CNY_BTC"`.
    pub async fn get_order_book(&self, symbol: &str) -> Result<OrderBook, C2cxError> {
        let params: RequestParams = [("symbol", symbol)].into_iter().collect();
        self.public_get(public::ORDER_BOOK, &params).await
    }
}
