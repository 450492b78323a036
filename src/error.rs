// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for pagelift
//!
//! One enum for the whole crate. Variants carry the context a caller needs
//! to decide what to do (URL, status, field name, container index).

use thiserror::Error;

/// Result type alias for pagelift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pagelift
#[derive(Error, Debug)]
pub enum Error {
    /// Session could not be constructed (bad proxy, client build failure)
    #[error("Launch failed: {0}")]
    Launch(String),

    /// Navigation failed (DNS, TLS, timeout, non-HTML where HTML required)
    #[error("Navigation failed to {url}: {reason}")]
    Navigation {
        url: String,
        reason: String,
        status: Option<u16>,
    },

    /// Operation exceeded its time bound
    #[error("Operation timed out after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// A required field selector matched nothing inside a container
    #[error("Field '{field}' missing in container {container}")]
    FieldMissing { field: String, container: usize },

    /// A route's real-fetch step failed
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Selector parsing failed
    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session has been closed
    #[error("Session has been closed")]
    SessionClosed,

    /// Routes can only be registered before the first navigation
    #[error("Route table is sealed: navigation has already started")]
    RoutesSealed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a launch error
    pub fn launch<S: Into<String>>(msg: S) -> Self {
        Error::Launch(msg.into())
    }

    /// Create a navigation error without a status code
    pub fn navigation(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Navigation {
            url: url.into(),
            reason: reason.into(),
            status: None,
        }
    }

    /// Create a navigation error with a status code
    pub fn navigation_status(
        url: impl Into<String>,
        status: u16,
        reason: impl Into<String>,
    ) -> Self {
        Error::Navigation {
            url: url.into(),
            reason: reason.into(),
            status: Some(status),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration_ms,
        }
    }

    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a selector error
    pub fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Selector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this is a navigation error
    pub fn is_navigation(&self) -> bool {
        matches!(self, Error::Navigation { .. })
    }

    /// Check if this is a missing-field error
    pub fn is_field_missing(&self) -> bool {
        matches!(self, Error::FieldMissing { .. })
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Navigation { status, .. } => *status,
            _ => None,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Navigation { url, .. } => Some(url),
            Error::Fetch { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_error() {
        let err = Error::navigation_status("https://example.com", 403, "Forbidden");
        assert!(err.is_navigation());
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(err.url(), Some("https://example.com"));
    }

    #[test]
    fn test_field_missing_error() {
        let err = Error::FieldMissing {
            field: "price".to_string(),
            container: 3,
        };
        assert!(err.is_field_missing());
        assert_eq!(err.to_string(), "Field 'price' missing in container 3");
    }

    #[test]
    fn test_timeout_error() {
        let err = Error::timeout("navigation", 5000);
        assert!(err.is_timeout());
    }
}
