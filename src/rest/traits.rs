//! Trait definition for the C2CX REST API client.
//!
//! The [`C2cxClient`] trait abstracts every exchange call so the integration
//! workflow can run against the real client or a scripted mock.
//!
//! # Example
//!
//! ```rust,ignore
//! use c2cx_api_client::rest::{C2cxClient, C2cxRestClient};
//!
//! async fn last_price<C: C2cxClient>(client: &C) -> Result<(), c2cx_api_client::C2cxError> {
//!     let ticker = client.get_ticker("CNY_BTC").await?;
//!     println!("Last: {:?}", ticker.last);
//!     Ok(())
//! }
//! ```

use std::future::Future;

use crate::error::C2cxError;
use crate::rest::private::{
    Balance, CancelledOrder, OrderInfo, OrdersByStatusRequest, SubmitOrderRequest,
    SubmitOrderResponse,
};
use crate::rest::public::{OrderBook, Ticker};
use crate::types::OrderId;

/// Trait defining all C2CX REST API operations.
///
/// All methods are async and return `Result<T, C2cxError>`. A non-200
/// envelope code surfaces as [`C2cxError::Api`]; transport problems use the
/// other variants.
pub trait C2cxClient: Send + Sync {
    // ========== Public Endpoints ==========

    /// Get ticker information for a pair.
    fn get_ticker(&self, symbol: &str)
    -> impl Future<Output = Result<Ticker, C2cxError>> + Send;

    /// Get the order book for a pair.
    fn get_order_book(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<OrderBook, C2cxError>> + Send;

    // ========== Private Endpoints ==========

    /// Get account balances.
    fn get_balance(&self) -> impl Future<Output = Result<Balance, C2cxError>> + Send;

    /// Submit an order.
    fn submit_trade_order(
        &self,
        request: &SubmitOrderRequest,
    ) -> impl Future<Output = Result<SubmitOrderResponse, C2cxError>> + Send;

    /// Query orders of a symbol; `None` selects all of them.
    fn check_orders(
        &self,
        symbol: &str,
        order_id: Option<&OrderId>,
    ) -> impl Future<Output = Result<Vec<OrderInfo>, C2cxError>> + Send;

    /// Query orders of a symbol by status.
    fn check_orders_by_status(
        &self,
        request: &OrdersByStatusRequest,
    ) -> impl Future<Output = Result<Vec<OrderInfo>, C2cxError>> + Send;

    /// Cancel an order.
    fn cancel_order(
        &self,
        symbol: &str,
        order_id: &OrderId,
    ) -> impl Future<Output = Result<Vec<CancelledOrder>, C2cxError>> + Send;
}
