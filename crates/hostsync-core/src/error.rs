//! Error types for the hostsync core
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for hostsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the hostsync system
#[derive(Error, Debug)]
pub enum Error {
    /// A hosts line that has an address but no hostnames
    #[error("invalid hosts line: {0}")]
    InvalidHostsLine(String),

    /// A hostname that does not match the accepted hostname grammar
    #[error("invalid hostname: {0}")]
    InvalidHostname(String),

    /// A record target that is not an IPv4 or IPv6 literal
    #[error("invalid IP: {0}")]
    InvalidIp(String),

    /// Filesystem errors (temp file creation, write, rename)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Persistence backend errors that are not plain I/O
    #[error("Store error: {0}")]
    Store(String),

    /// The initial hosts source could not be fetched
    #[error("Seed error: {0}")]
    Seed(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid hosts line error
    pub fn invalid_line(line: impl Into<String>) -> Self {
        Self::InvalidHostsLine(line.into())
    }

    /// Create an invalid hostname error
    pub fn invalid_hostname(hostname: impl Into<String>) -> Self {
        Self::InvalidHostname(hostname.into())
    }

    /// Create an invalid IP error
    pub fn invalid_ip(target: impl Into<String>) -> Self {
        Self::InvalidIp(target.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a seed error
    pub fn seed(msg: impl Into<String>) -> Self {
        Self::Seed(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns `true` for errors caused by malformed input rather than I/O
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidHostsLine(_) | Self::InvalidHostname(_) | Self::InvalidIp(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Seed(err.to_string())
    }
}
