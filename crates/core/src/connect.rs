//! Connection types
//!
//! - `Credentials`: operator username/password pair
//! - `ConnectOptions`: everything a connector needs besides credentials
//! - `ConnectError`: connection failures, rendered as operator-facing text

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StoreError;

/// Operator credential pair
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account secret
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection settings handed to a [`Connector`](crate::traits::Connector)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// URI scheme, e.g. `mongodb+srv`
    pub scheme: String,
    /// Server address without credentials, e.g. `cluster.example.net`
    pub host: String,
    /// Database to open
    pub database: String,
    /// Upper bound on pooled connections
    pub max_pool_size: u32,
    /// How long to wait for a usable server
    pub server_selection_timeout: Duration,
    /// Per-socket inactivity timeout
    pub socket_timeout: Duration,
}

/// Connection failure
///
/// The `Display` text of each variant is meant to be shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Credentials were rejected
    #[error("Invalid username or password. Please check your credentials.")]
    AuthenticationFailed,

    /// Host name did not resolve
    #[error("Cannot connect to the database server. Please check your internet connection.")]
    HostNotFound {
        /// Host that failed to resolve
        host: String,
    },

    /// No server answered in time
    #[error("Connection timeout. Please check your internet connection and try again.")]
    Timeout,

    /// Connected, but the probe after connecting failed
    #[error("Connection check failed: {0}")]
    Probe(StoreError),

    /// Anything else, with the driver's own message
    #[error("{0}")]
    Other(String),
}

impl ConnectError {
    /// Classify a raw driver error message
    ///
    /// Drivers that only report text are mapped onto the typed variants by
    /// the phrases they use for each failure.
    pub fn from_driver_message(host: &str, message: &str) -> Self {
        if message.contains("Authentication failed") {
            ConnectError::AuthenticationFailed
        } else if message.contains("ENOTFOUND")
            || message.contains("failed to lookup address")
            || message.contains("no record found")
        {
            ConnectError::HostNotFound {
                host: host.to_string(),
            }
        } else if message.contains("serverSelectionTimeoutMS")
            || message.contains("Server selection timeout")
        {
            ConnectError::Timeout
        } else {
            ConnectError::Other(message.to_string())
        }
    }
}
