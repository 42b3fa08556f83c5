// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Outgoing HTTP request
//!
//! A [`Request`] is what the pipeline produces after resolving options. It is
//! the value outbound interceptors inspect and mutate before it is sent.

use base64::Engine;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use super::headers;
use crate::error::{Error, Result};

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Encoded request body
    pub body: Option<Bytes>,
}

impl Request {
    /// Create a request without headers or body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set a header, replacing existing values
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<()> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Append a header value, keeping existing values
    pub fn append_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<()> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.append(name, value);
        Ok(())
    }

    /// First value of a header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set HTTP basic auth, overwriting any existing `Authorization` header
    pub fn set_basic_auth(&mut self, username: &str, password: &str) -> Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", username, password));
        self.set_header(headers::AUTHORIZATION, format!("Basic {}", encoded))
    }

    /// Get the URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Get the host
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Get the origin
    pub fn origin(&self) -> String {
        format!(
            "{}://{}{}",
            self.url.scheme(),
            self.url.host_str().unwrap_or(""),
            self.url
                .port()
                .map(|p| format!(":{}", p))
                .unwrap_or_default()
        )
    }
}

/// Parse a header name/value pair
pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::try_from(name)
        .map_err(|e| Error::config(format!("invalid header name {:?}: {}", name, e)))?;
    let header_value = HeaderValue::try_from(value)
        .map_err(|e| Error::config(format!("invalid value for header {}: {}", name, e)))?;
    Ok((header_name, header_value))
}
