//! # C2CX Client
//!
//! An async Rust client library for the C2CX exchange REST API, plus an
//! end-to-end integration workflow that exercises it against a live account.
//!
//! ## Features
//!
//! - Public market data (ticker, order book) over unsigned GET requests
//! - Private account and order endpoints over MD5-signed form POSTs
//! - Uniform `{code, message, data}` envelope handling
//! - Financial precision with `rust_decimal`
//! - A sequential integration workflow with a success/fail tally
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use c2cx_api_client::rest::C2cxRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = C2cxRestClient::new();
//!     let ticker = client.get_ticker("CNY_BTC").await?;
//!     println!("Last: {:?}", ticker.last);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;
pub mod types;
pub mod workflow;

// Re-export commonly used types at crate root
pub use error::{ApiError, C2cxError};
pub use rest::{C2cxClient, C2cxRestClient};
pub use types::common::{OrderId, OrderStatus, Side};

/// Result type alias using C2cxError
pub type Result<T> = std::result::Result<T, C2cxError>;
