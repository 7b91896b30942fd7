//! Private REST API endpoints (authentication required).
//!
//! These endpoints require API credentials to be configured on the client.

mod types;

pub use types::*;

use serde_json::Value;

use crate::auth::RequestParams;
use crate::error::C2cxError;
use crate::rest::C2cxRestClient;
use crate::rest::endpoints::private;
use crate::types::OrderId;
use crate::types::serde_helpers::one_or_many;

impl C2cxRestClient {
    /// Get account balances.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use c2cx_api_client::rest::C2cxRestClient;
    /// use c2cx_api_client::auth::StaticCredentials;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let credentials = Arc::new(StaticCredentials::new("key", "secret"));
    ///     let client = C2cxRestClient::builder().credentials(credentials).build();
    ///
    ///     let balance = client.get_balance().await?;
    ///     for (currency, amount) in &balance.funds.free {
    ///         println!("{}: {}", currency, amount);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_balance(&self) -> Result<Balance, C2cxError> {
        self.private_post(private::USER_INFO, RequestParams::new())
            .await
    }

    /// Submit a buy or sell order.
    ///
    /// If an order ID comes back the order has reached the order book.
    pub async fn submit_trade_order(
        &self,
        request: &SubmitOrderRequest,
    ) -> Result<SubmitOrderResponse, C2cxError> {
        self.private_post(private::CREATE_ORDER, request.to_params())
            .await
    }

    /// Query orders of a symbol.
    ///
    /// `None` queries every order of the symbol (the exchange's `-1` sentinel).
    pub async fn check_orders(
        &self,
        symbol: &str,
        order_id: Option<&OrderId>,
    ) -> Result<Vec<OrderInfo>, C2cxError> {
        let mut params = RequestParams::new();
        params.insert("symbol", symbol);
        match order_id {
            Some(id) => params.insert("orderId", id),
            None => params.insert("orderId", ALL_ORDERS),
        };
        let data: Value = self.private_post(private::ORDER_INFO, params).await?;
        Ok(one_or_many::deserialize(data)?)
    }

    /// Query orders of a symbol that are in a given status.
    pub async fn check_orders_by_status(
        &self,
        request: &OrdersByStatusRequest,
    ) -> Result<Vec<OrderInfo>, C2cxError> {
        let params = RequestParams::from_serialize(request)?;
        let data: Value = self.private_post(private::ORDERS_BY_STATUS, params).await?;
        Ok(one_or_many::deserialize(data)?)
    }

    /// Cancel an order.
    pub async fn cancel_order(
        &self,
        symbol: &str,
        order_id: &OrderId,
    ) -> Result<Vec<CancelledOrder>, C2cxError> {
        let mut params = RequestParams::new();
        params.insert("symbol", symbol).insert("orderId", order_id);
        let data: Value = self.private_post(private::CANCEL_ORDER, params).await?;
        Ok(one_or_many::deserialize(data)?)
    }
}
