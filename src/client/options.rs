// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-call request options

use reqwest::header::HeaderMap;
use serde::Serialize;

use super::config::{Parameters, ParameterSerializer, ProxyConfig, StatusValidator};
use super::context::ExecutionContext;
use crate::error::Result;
use crate::http::parse_header;
use crate::http::Body;

/// HTTP basic auth credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// Options for a single call
///
/// Unset fields fall back to the client configuration, then to built-in
/// defaults. Built fresh per call and consumed by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Basic auth, overwrites any `Authorization` header
    pub auth: Option<BasicAuth>,
    /// Base URL for a relative call URL, overrides the client's
    pub base_url: Option<String>,
    /// Request body
    pub body: Option<Body>,
    /// Content type tag selecting the body codec, default `json`
    pub content_type: Option<String>,
    /// Caller owned execution context; disables timeout handling
    pub context: Option<ExecutionContext>,
    /// Keep compressed response bodies as they are
    pub disable_decompress: bool,
    /// Call headers, each name replaces the client's values for that name
    pub headers: HeaderMap,
    /// Maximum redirects, `-1` for none
    pub max_redirects: Option<i64>,
    /// HTTP method, default GET
    pub method: Option<String>,
    /// Query parameters, each key replaces the client's values for that key
    pub parameters: Parameters,
    /// Query string serializer
    pub parameters_serializer: Option<ParameterSerializer>,
    /// Proxy server
    pub proxy: Option<ProxyConfig>,
    /// Timeout in milliseconds, `-1` for no limit
    pub timeout: Option<i64>,
    /// User agent
    pub user_agent: Option<String>,
    /// Status predicate
    pub validate_status: Option<StatusValidator>,
}

impl RequestOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set basic auth credentials
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(BasicAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Set base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the body
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a structured body from any serializable value
    pub fn json<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self> {
        self.body = Some(Body::json(data)?);
        Ok(self)
    }

    /// Set content type tag
    pub fn content_type(mut self, tag: impl Into<String>) -> Self {
        self.content_type = Some(tag.into());
        self
    }

    /// Set execution context
    pub fn context(mut self, context: ExecutionContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Disable response decompression
    pub fn disable_decompress(mut self, disable: bool) -> Self {
        self.disable_decompress = disable;
        self
    }

    /// Append a header value
    pub fn add_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Replace the values of one header
    pub fn set_header<I, V>(mut self, name: impl AsRef<str>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for value in values {
            parsed.push(parse_header(name.as_ref(), value.as_ref())?);
        }
        if let Some((header, _)) = parsed.first() {
            self.headers.remove(header);
        }
        for (header, value) in parsed {
            self.headers.append(header, value);
        }
        Ok(self)
    }

    /// Replace all headers
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: i64) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Set HTTP method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Append a query parameter value
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace the values of one query parameter
    pub fn set_parameter<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.parameters
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Replace all query parameters
    pub fn parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set query string serializer
    pub fn parameters_serializer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Parameters) -> String + Send + Sync + 'static,
    {
        self.parameters_serializer = Some(ParameterSerializer::new(f));
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set timeout in milliseconds, `-1` for no limit
    pub fn timeout(mut self, timeout_ms: i64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set status predicate
    pub fn validate_status<F>(mut self, f: F) -> Self
    where
        F: Fn(u16) -> bool + Send + Sync + 'static,
    {
        self.validate_status = Some(StatusValidator::new(f));
        self
    }
}
