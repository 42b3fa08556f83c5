// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for Volley
//!
//! Every pipeline step returns an explicit [`Result`]. When a step fails after a
//! response has been received, the response travels inside the error so callers
//! never lose it (see [`Error::response`] and [`Error::into_response`]).

use thiserror::Error;

use crate::client::Stage;
use crate::http::Response;

/// Result type alias for Volley operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by user supplied interceptors and codecs
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for Volley
#[derive(Error, Debug)]
pub enum Error {
    /// Transport level failure (connection, TLS, protocol)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Method is not one of the supported HTTP verbs
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Neither the call nor the client supplied a usable URL
    #[error("no url")]
    NoUrl,

    /// No codec is registered for the requested content type tag
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// A response helper was invoked without a response body
    #[error("invalid response")]
    InvalidResponse,

    /// The response was received but rejected by the status predicate
    #[error("request failed with status code {status}")]
    StatusValidationFailed { status: u16, response: Box<Response> },

    /// An outbound or inbound interceptor returned an error
    #[error("{stage} interceptor aborted the request: {source}")]
    InterceptorAborted {
        stage: Stage,
        #[source]
        source: BoxError,
        response: Option<Box<Response>>,
    },

    /// The response body could not be inflated
    #[error("failed to decode {encoding} response body: {source}")]
    Decompression {
        encoding: String,
        #[source]
        source: std::io::Error,
        response: Box<Response>,
    },

    /// Timeout error
    #[error("Operation timed out after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        url: Option<String>,
    },

    /// The execution context was cancelled before the call completed
    #[error("request cancelled")]
    Cancelled { url: Option<String> },

    /// Body codec failure
    #[error("Codec error: {0}")]
    Codec(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration_ms,
            url: None,
        }
    }

    /// Create a timeout error with URL
    pub fn timeout_with_url(
        operation: impl Into<String>,
        duration_ms: u64,
        url: impl Into<String>,
    ) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration_ms,
            url: Some(url.into()),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a codec error
    pub fn codec<S: Into<String>>(msg: S) -> Self {
        Error::Codec(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Check if this is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Timeout { .. } | Error::Cancelled { .. })
    }

    /// Check if the status predicate rejected the response
    pub fn is_status(&self) -> bool {
        matches!(self, Error::StatusValidationFailed { .. })
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::StatusValidationFailed { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            other => other.response().map(Response::status_code),
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Timeout { url: Some(u), .. } => Some(u),
            Error::Cancelled { url: Some(u) } => Some(u),
            Error::Http(e) => e.url().map(|u| u.as_str()),
            other => other.response().map(Response::url_str),
        }
    }

    /// The response received before the failing step, if any
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::StatusValidationFailed { response, .. } => Some(response),
            Error::Decompression { response, .. } => Some(response),
            Error::InterceptorAborted {
                response: Some(response),
                ..
            } => Some(response),
            _ => None,
        }
    }

    /// Take ownership of the response carried by this error, if any
    pub fn into_response(self) -> Option<Response> {
        match self {
            Error::StatusValidationFailed { response, .. } => Some(*response),
            Error::Decompression { response, .. } => Some(*response),
            Error::InterceptorAborted {
                response: Some(response),
                ..
            } => Some(*response),
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
