//! Credential management for C2CX API authentication.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::C2cxError;

/// File name the integration workflow looks for when no path is given.
pub const DEFAULT_CREDENTIALS_FILE: &str = "c2cx-api-creds.json";

/// API credentials containing the key and secret.
#[derive(Clone)]
pub struct Credentials {
    /// The API key (public identifier, sent as `apiKey`)
    pub api_key: String,
    /// The secret key (private, only ever hashed into the signature)
    secret_key: SecretString,
}

/// On-disk shape of the credentials document.
#[derive(Deserialize)]
struct CredentialsDocument {
    #[serde(rename = "apiKey")]
    api_key: String,
    #[serde(rename = "secretKey")]
    secret_key: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and secret key.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Parse credentials from a `{"apiKey": ..., "secretKey": ...}` JSON document.
    pub fn from_json(json: &str) -> Result<Self, C2cxError> {
        let doc: CredentialsDocument =
            serde_json::from_str(json).map_err(|e| C2cxError::Credentials(e.to_string()))?;
        if doc.api_key.is_empty() || doc.secret_key.expose_secret().is_empty() {
            return Err(C2cxError::Credentials(
                "apiKey and secretKey must not be empty".to_string(),
            ));
        }
        Ok(Self {
            api_key: doc.api_key,
            secret_key: doc.secret_key,
        })
    }

    /// Load credentials from a JSON file on disk.
    ///
    /// A missing file and malformed content both yield [`C2cxError::Credentials`],
    /// whose message is suitable for showing to the user as-is.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, C2cxError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| C2cxError::Credentials(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Get the secret key for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Trait for providing API credentials.
///
/// Implement this trait to customize how credentials are retrieved,
/// for example from a secrets manager or environment variables.
pub trait CredentialsProvider: Send + Sync {
    /// Get the credentials.
    fn get_credentials(&self) -> &Credentials;
}

/// Static credentials provider that holds credentials directly.
#[derive(Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Create a new static credentials provider.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(api_key, secret_key),
        }
    }
}

impl From<Credentials> for StaticCredentials {
    fn from(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Credentials provider that reads from environment variables.
///
/// By default, reads from `C2CX_API_KEY` and `C2CX_SECRET_KEY`.
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Try to create credentials from default environment variables.
    ///
    /// Returns `None` if the environment variables are not set.
    pub fn try_from_env() -> Option<Self> {
        Self::try_from_env_vars("C2CX_API_KEY", "C2CX_SECRET_KEY")
    }

    /// Try to create credentials from custom environment variable names.
    ///
    /// Returns `None` if the environment variables are not set.
    pub fn try_from_env_vars(key_var: &str, secret_var: &str) -> Option<Self> {
        let api_key = std::env::var(key_var).ok()?;
        let secret_key = std::env::var(secret_var).ok()?;

        Some(Self {
            credentials: Credentials::new(api_key, secret_key),
        })
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}
