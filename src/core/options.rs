//! Connection options
//!
//! Options are passed in-process to [`Tarantool::connect`](crate::Tarantool::connect).
//! They can be built fluently or loaded from JSON.

use super::error::{DatabaseError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default connect timeout (30 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Options handed to a connector when opening a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    /// User name; `guest` when unset
    pub user: Option<String>,
    /// Password for `user`
    pub password: Option<String>,
    /// Connect and request timeout in milliseconds
    pub timeout: u64,
    /// Delay between reconnect attempts in milliseconds, 0 keeps the driver default
    pub reconnect: u64,
    /// Maximum reconnect attempts, 0 means unlimited
    pub max_reconnects: u32,
    /// Emit diagnostic output such as the spaces list
    pub debug: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            user: None,
            password: None,
            timeout: DEFAULT_TIMEOUT_MS,
            reconnect: 0,
            max_reconnects: 0,
            debug: false,
        }
    }
}

impl ConnectOptions {
    /// Start a fluent builder
    pub fn builder() -> ConnectOptionsBuilder {
        ConnectOptionsBuilder::new()
    }

    /// Parse options from a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: ConnectOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject option combinations the driver cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            return Err(DatabaseError::config("timeout must be greater than zero"));
        }
        if self.password.is_some() && self.user.is_none() {
            return Err(DatabaseError::config("password given without user"));
        }
        Ok(())
    }

    /// Timeout as a duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// User name to authenticate with
    pub fn user_or_guest(&self) -> &str {
        self.user.as_deref().unwrap_or("guest")
    }
}

/// Fluent builder for [`ConnectOptions`]
#[derive(Debug, Clone, Default)]
pub struct ConnectOptionsBuilder {
    opts: ConnectOptions,
}

impl ConnectOptionsBuilder {
    /// Create a builder holding default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user name
    pub fn user<S: Into<String>>(mut self, user: S) -> Self {
        self.opts.user = Some(user.into());
        self
    }

    /// Set the password
    pub fn password<S: Into<String>>(mut self, password: S) -> Self {
        self.opts.password = Some(password.into());
        self
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout.as_millis() as u64;
        self
    }

    /// Set the reconnect delay
    pub fn reconnect(mut self, delay: Duration) -> Self {
        self.opts.reconnect = delay.as_millis() as u64;
        self
    }

    /// Set the reconnect attempt limit
    pub fn max_reconnects(mut self, attempts: u32) -> Self {
        self.opts.max_reconnects = attempts;
        self
    }

    /// Enable diagnostic output
    pub fn debug(mut self, debug: bool) -> Self {
        self.opts.debug = debug;
        self
    }

    /// Validate and return the options
    pub fn build(self) -> Result<ConnectOptions> {
        self.opts.validate()?;
        Ok(self.opts)
    }
}

/// Check that `address` is a TCP `host:port`
pub fn validate_address(address: &str) -> Result<()> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| DatabaseError::InvalidAddress(address.to_string()))?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(DatabaseError::InvalidAddress(address.to_string()));
    }
    Ok(())
}
