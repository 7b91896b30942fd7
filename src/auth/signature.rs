//! MD5 request signatures for C2CX API authentication.
//!
//! Authenticated endpoints require a `sign` form field computed as:
//! ```text
//! UPPER(HEX(MD5("k1=v1&k2=v2&...&kn=vn&secretKey=<secret>")))
//! ```
//!
//! Keys are sorted in ascending byte order (case-sensitive) and values are the
//! raw, un-encoded parameter values. The `apiKey` parameter takes part in the
//! signature like any other field; `sign` itself never does.

use std::collections::BTreeMap;

use md5::{Digest, Md5};
use serde::Serialize;

use crate::auth::Credentials;
use crate::error::C2cxError;

/// Name of the form field carrying the signature.
pub const SIGN_FIELD: &str = "sign";

/// Request parameters for one API call, kept sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the fields of a serializable request into a parameter set.
    ///
    /// `None` fields skipped by serde are left out.
    pub fn from_serialize<P>(params: &P) -> Result<Self, C2cxError>
    where
        P: Serialize + ?Sized,
    {
        let encoded =
            serde_urlencoded::to_string(params).map_err(|e| C2cxError::Encoding(e.to_string()))?;
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(&encoded).map_err(|e| C2cxError::Encoding(e.to_string()))?;
        Ok(Self(pairs.into_iter().collect()))
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    /// Look up a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate parameters in signing order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The exact string that is hashed for the signature.
    pub fn signing_payload(&self, secret_key: &str) -> String {
        let mut payload = self
            .iter()
            .filter(|(key, _)| *key != SIGN_FIELD)
            .fold(String::new(), |mut acc, (key, value)| {
                acc.push_str(key);
                acc.push('=');
                acc.push_str(value);
                acc.push('&');
                acc
            });
        payload.push_str("secretKey=");
        payload.push_str(secret_key);
        payload
    }

    /// URL-encode the parameters as a query string (unsigned).
    pub fn to_query_string(&self) -> Result<String, C2cxError> {
        serde_urlencoded::to_string(&self.0).map_err(|e| C2cxError::Encoding(e.to_string()))
    }

    /// URL-encode the parameters as a form body with `sign` appended last.
    pub fn to_signed_form(&self, credentials: &Credentials) -> Result<String, C2cxError> {
        let signature = sign_params(credentials, self);
        let mut fields: Vec<(&str, &str)> =
            self.iter().filter(|(key, _)| *key != SIGN_FIELD).collect();
        fields.push((SIGN_FIELD, signature.as_str()));
        serde_urlencoded::to_string(&fields).map_err(|e| C2cxError::Encoding(e.to_string()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

/// Sign a parameter set for C2CX's authenticated API.
///
/// # Returns
///
/// A 32-character uppercase hexadecimal MD5 digest.
///
/// # Example
///
/// ```rust
/// use c2cx_api_client::auth::{Credentials, RequestParams, sign_params};
///
/// let credentials = Credentials::new("abc", "xyz");
/// let mut params = RequestParams::new();
/// params.insert("symbol", "CNY_BTC").insert("apiKey", &credentials.api_key);
///
/// let signature = sign_params(&credentials, &params);
/// assert_eq!(signature, "225A2082125C02B740BEED826E4992AA");
/// ```
pub fn sign_params(credentials: &Credentials, params: &RequestParams) -> String {
    let payload = params.signing_payload(credentials.expose_secret());
    hex::encode_upper(Md5::digest(payload.as_bytes()))
}
