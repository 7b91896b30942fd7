//! C2CX REST API client.
//!
//! Public endpoints are unsigned GET requests; private endpoints are signed
//! form POSTs. Every response is a `{code, message, data}` envelope and only
//! `code == 200` counts as success.
//!
//! # Trait-based API
//!
//! The [`C2cxClient`] trait abstracts all REST API operations, enabling mock
//! implementations for testing the workflow without a network.

mod client;
mod endpoints;
pub mod private;
pub mod public;
mod traits;

pub use client::{ApiResponse, C2cxRestClient, C2cxRestClientBuilder, SUCCESS_CODE};
pub use endpoints::*;
pub use traits::C2cxClient;
