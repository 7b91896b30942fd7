//! Authentication module for the C2CX API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Loading credentials from the JSON credentials document
//! - MD5 request signatures for authenticated POST calls

mod credentials;
mod signature;

pub use credentials::{
    Credentials, CredentialsProvider, DEFAULT_CREDENTIALS_FILE, EnvCredentials, StaticCredentials,
};
pub use signature::{RequestParams, SIGN_FIELD, sign_params};
