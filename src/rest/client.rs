//! C2CX REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::{CredentialsProvider, RequestParams};
use crate::error::{ApiError, C2cxError};
use crate::rest::endpoints::{C2CX_BASE_URL, C2CX_USER_AGENT};
use crate::rest::private::{
    Balance, CancelledOrder, OrderInfo, OrdersByStatusRequest, SubmitOrderRequest,
    SubmitOrderResponse,
};
use crate::rest::public::{OrderBook, Ticker};
use crate::rest::traits::C2cxClient;
use crate::types::OrderId;

/// Envelope code that marks a successful call.
pub const SUCCESS_CODE: i64 = 200;

/// The C2CX REST API client.
///
/// Public endpoints are plain GET requests with a query string. Private
/// endpoints are POST requests whose form body carries the `apiKey` and an
/// MD5 `sign` over all parameters.
///
/// # Example
///
/// ```rust,no_run
/// use c2cx_api_client::rest::C2cxRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = C2cxRestClient::new();
///     let ticker = client.get_ticker("CNY_BTC").await?;
///     println!("Last price: {:?}", ticker.last);
///     Ok(())
/// }
/// ```
///
/// For private endpoints, provide credentials:
///
/// ```rust,no_run
/// use c2cx_api_client::rest::C2cxRestClient;
/// use c2cx_api_client::auth::StaticCredentials;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(StaticCredentials::new("api_key", "secret_key"));
///     let client = C2cxRestClient::builder()
///         .credentials(credentials)
///         .build();
///
///     let balance = client.get_balance().await?;
///     println!("Free: {:?}", balance.funds.free);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct C2cxRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
}

impl C2cxRestClient {
    /// Create a new client with default settings.
    ///
    /// This client can only access public endpoints.
    /// Use [`C2cxRestClient::builder()`] to configure credentials for private endpoints.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> C2cxRestClientBuilder {
        C2cxRestClientBuilder::new()
    }

    /// Whether credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    fn action_url(&self, action: &str) -> Result<Url, C2cxError> {
        Ok(Url::parse(&format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            action
        ))?)
    }

    /// Make a public GET request with query parameters.
    pub(crate) async fn public_get<T>(
        &self,
        action: &str,
        params: &RequestParams,
    ) -> Result<T, C2cxError>
    where
        T: DeserializeOwned,
    {
        let mut url = self.action_url(action)?;
        if !params.is_empty() {
            url.set_query(Some(&params.to_query_string()?));
        }

        tracing::debug!(action, "GET");
        let response = self.http_client.get(url).send().await?;
        self.parse_response(action, response).await
    }

    /// Make an authenticated POST request.
    ///
    /// The `apiKey` parameter is injected here; callers pass only the
    /// endpoint-specific parameters.
    pub(crate) async fn private_post<T>(
        &self,
        action: &str,
        mut params: RequestParams,
    ) -> Result<T, C2cxError>
    where
        T: DeserializeOwned,
    {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(C2cxError::MissingCredentials)?;
        let creds = credentials.get_credentials();

        params.insert("apiKey", &creds.api_key);
        let form_data = params.to_signed_form(creds)?;

        let url = self.action_url(action)?;
        tracing::debug!(action, fields = params.len(), "POST");
        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form_data)
            .send()
            .await?;

        self.parse_response(action, response).await
    }

    /// Parse a response from the C2CX API.
    async fn parse_response<T>(
        &self,
        action: &str,
        response: reqwest::Response,
    ) -> Result<T, C2cxError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(action, %status, "transport-level failure");
            return Err(C2cxError::HttpStatus { status, body });
        }

        let envelope: ApiResponse<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| {
                C2cxError::InvalidResponse(format!(
                    "Failed to parse response: {}. Body: {}",
                    e, body
                ))
            })?;

        let data = envelope.into_result()?;
        serde_json::from_value(data).map_err(|e| {
            C2cxError::InvalidResponse(format!("Unexpected `data` for {action}: {e}"))
        })
    }
}

impl Default for C2cxRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for C2cxRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("C2cxRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

/// Builder for [`C2cxRestClient`].
pub struct C2cxRestClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    danger_accept_invalid_certs: bool,
}

impl C2cxRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: C2CX_BASE_URL.to_string(),
            credentials: None,
            user_agent: None,
            timeout: None,
            danger_accept_invalid_certs: false,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the credentials provider for authenticated requests.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom user agent. Defaults to `C2CX/v1`.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set a per-request timeout. By default requests wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable TLS certificate and hostname verification.
    ///
    /// Only for talking to legacy endpoints with broken certificates. Never
    /// enable this against the production exchange.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    /// Build the client, failing if the HTTP client cannot be created with
    /// the configured timeout and TLS settings.
    pub fn try_build(self) -> Result<C2cxRestClient, C2cxError> {
        let reqwest_client = self.http_builder().build()?;
        Ok(self.finish(reqwest_client))
    }

    /// Build the client.
    ///
    /// If the HTTP client cannot be created with the configured settings, a
    /// client with only the default headers is used instead and the
    /// `timeout` and `danger_accept_invalid_certs` settings are lost. Use
    /// [`C2cxRestClientBuilder::try_build`] to get the error instead.
    pub fn build(self) -> C2cxRestClient {
        let reqwest_client = self.http_builder().build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default HTTP client settings");
            reqwest::Client::builder()
                .default_headers(self.default_headers())
                .build()
                .unwrap_or_else(|_| reqwest::Client::new())
        });
        self.finish(reqwest_client)
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let header_value = self
            .user_agent
            .as_deref()
            .and_then(|ua| HeaderValue::from_str(ua).ok())
            .unwrap_or_else(|| HeaderValue::from_static(C2CX_USER_AGENT));
        headers.insert(USER_AGENT, header_value);
        headers
    }

    fn http_builder(&self) -> reqwest::ClientBuilder {
        let mut builder = reqwest::Client::builder().default_headers(self.default_headers());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if self.danger_accept_invalid_certs {
            tracing::warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder
    }

    fn finish(self, reqwest_client: reqwest::Client) -> C2cxRestClient {
        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        C2cxRestClient {
            http_client: client,
            base_url: self.base_url,
            credentials: self.credentials,
        }
    }
}

impl Default for C2cxRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The `{code, message, data}` envelope wrapping every C2CX response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Result code; only 200 means success.
    #[serde(default)]
    pub code: Option<i64>,
    /// Human-readable status or error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Call-specific payload.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Whether the envelope reports success.
    pub fn is_success(&self) -> bool {
        self.code == Some(SUCCESS_CODE)
    }
}

impl ApiResponse<serde_json::Value> {
    /// Split the envelope into its payload or a business error.
    pub fn into_result(self) -> Result<serde_json::Value, C2cxError> {
        if self.is_success() {
            Ok(self.data.unwrap_or(serde_json::Value::Null))
        } else {
            Err(C2cxError::Api(ApiError::new(
                self.code,
                self.message.unwrap_or_default(),
            )))
        }
    }
}

// C2cxClient trait implementation.

impl C2cxClient for C2cxRestClient {
    async fn get_ticker(&self, symbol: &str) -> Result<Ticker, C2cxError> {
        C2cxRestClient::get_ticker(self, symbol).await
    }

    async fn get_order_book(&self, symbol: &str) -> Result<OrderBook, C2cxError> {
        C2cxRestClient::get_order_book(self, symbol).await
    }

    async fn get_balance(&self) -> Result<Balance, C2cxError> {
        C2cxRestClient::get_balance(self).await
    }

    async fn submit_trade_order(
        &self,
        request: &SubmitOrderRequest,
    ) -> Result<SubmitOrderResponse, C2cxError> {
        C2cxRestClient::submit_trade_order(self, request).await
    }

    async fn check_orders(
        &self,
        symbol: &str,
        order_id: Option<&OrderId>,
    ) -> Result<Vec<OrderInfo>, C2cxError> {
        C2cxRestClient::check_orders(self, symbol, order_id).await
    }

    async fn check_orders_by_status(
        &self,
        request: &OrdersByStatusRequest,
    ) -> Result<Vec<OrderInfo>, C2cxError> {
        C2cxRestClient::check_orders_by_status(self, request).await
    }

    async fn cancel_order(
        &self,
        symbol: &str,
        order_id: &OrderId,
    ) -> Result<Vec<CancelledOrder>, C2cxError> {
        C2cxRestClient::cancel_order(self, symbol, order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let envelope: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"code":200,"message":"success","data":{"orderId":"298"}}"#)
                .unwrap();
        assert!(envelope.is_success());
        let data = envelope.into_result().unwrap();
        assert_eq!(data["orderId"], "298");
    }

    #[test]
    fn test_envelope_business_error_keeps_message() {
        let envelope: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"code":400,"message":"Insufficient balance ","data":null}"#)
                .unwrap();
        match envelope.into_result() {
            Err(C2cxError::Api(e)) => {
                assert_eq!(e.code, Some(400));
                assert_eq!(e.message, "Insufficient balance ");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_missing_code_is_failure() {
        let envelope: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"data":{"last":88}}"#).unwrap();
        assert!(!envelope.is_success());
        assert!(matches!(
            envelope.into_result(),
            Err(C2cxError::Api(ApiError { code: None, .. }))
        ));
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client = C2cxRestClient::builder()
            .credentials(Arc::new(crate::auth::StaticCredentials::new("k", "s3cr3t")))
            .build();
        let debug = format!("{client:?}");
        assert!(debug.contains("has_credentials: true"));
        assert!(!debug.contains("s3cr3t"));
    }
}
