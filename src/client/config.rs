// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use url::Url;

use super::url::encode_parameters;
use crate::error::{Error, Result};
use crate::http::parse_header;
use crate::http::CodecRegistry;

/// Multi-valued query parameters, iterated in key order
pub type Parameters = BTreeMap<String, Vec<String>>;

/// Default maximum number of idle transports kept by a client
pub const DEFAULT_POOL_MAX_IDLE: usize = 32;

/// Predicate deciding whether a response status is acceptable
#[derive(Clone)]
pub struct StatusValidator(Arc<dyn Fn(u16) -> bool + Send + Sync>);

impl StatusValidator {
    /// Wrap a predicate
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(u16) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Accept 200 up to and including 399
    pub fn default_range() -> Self {
        Self::new(|status| (200..400).contains(&status))
    }

    /// Evaluate the predicate
    pub fn validate(&self, status: u16) -> bool {
        (self.0)(status)
    }
}

impl fmt::Debug for StatusValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatusValidator(..)")
    }
}

/// Function turning parameters into a query string
#[derive(Clone)]
pub struct ParameterSerializer(Arc<dyn Fn(&Parameters) -> String + Send + Sync>);

impl ParameterSerializer {
    /// Wrap a serializer function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Parameters) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Escaped `key=value` pairs joined by `&`, keys sorted
    pub fn standard() -> Self {
        Self::new(encode_parameters)
    }

    /// Serialize parameters
    pub fn serialize(&self, parameters: &Parameters) -> String {
        (self.0)(parameters)
    }
}

impl fmt::Debug for ParameterSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParameterSerializer(..)")
    }
}

/// Proxy server settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy protocol (`http`, `https`, `socks5`)
    pub protocol: String,
    /// Proxy host
    pub host: String,
    /// Proxy port
    pub port: String,
    /// Username for proxy authentication
    pub username: String,
    /// Password for proxy authentication
    pub password: String,
}

impl ProxyConfig {
    /// Create a proxy config without credentials
    pub fn new(
        protocol: impl Into<String>,
        host: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port: port.into(),
            ..Default::default()
        }
    }

    /// Set proxy credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Resolve into a proxy URL
    pub fn to_url(&self) -> Result<Url> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let authority = if self.port.is_empty() {
            host
        } else {
            format!("{}:{}", host, self.port)
        };

        let mut url = Url::parse(&format!("{}://{}", self.protocol, authority))
            .map_err(|e| Error::config(format!("Invalid proxy URL: {}", e)))?;

        if !self.username.is_empty() || !self.password.is_empty() {
            url.set_username(&self.username)
                .and_then(|_| url.set_password(Some(&self.password)))
                .map_err(|_| Error::config("Invalid proxy URL: cannot carry credentials"))?;
        }

        Ok(url)
    }
}

/// HTTP client configuration
///
/// Every field is a client-wide default that per-call
/// [`RequestOptions`](super::RequestOptions) may override. Numeric fields use
/// `None` for "unset"; `-1` is the explicit "no limit" / "no redirects" value.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Prepended to every relative request URL
    pub base_url: Option<String>,
    /// Default headers, overridden per name by call headers
    pub headers: HeaderMap,
    /// Maximum redirects to follow, default 5
    pub max_redirects: Option<i64>,
    /// Default query parameters, overridden per key by call parameters
    pub parameters: Parameters,
    /// Query string serializer
    pub parameters_serializer: Option<ParameterSerializer>,
    /// Proxy server
    pub proxy: Option<ProxyConfig>,
    /// Request timeout in milliseconds, default 1000
    pub timeout: Option<i64>,
    /// User agent string
    pub user_agent: Option<String>,
    /// Status predicate, default accepts 200..=399
    pub validate_status: Option<StatusValidator>,
    /// Body codecs by content type tag
    pub codecs: CodecRegistry,
    /// Maximum number of idle transports kept for reuse
    pub pool_max_idle: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            headers: HeaderMap::new(),
            max_redirects: None,
            parameters: Parameters::new(),
            parameters_serializer: None,
            proxy: None,
            timeout: None,
            user_agent: None,
            validate_status: None,
            codecs: CodecRegistry::default(),
            pool_max_idle: DEFAULT_POOL_MAX_IDLE,
        }
    }
}

impl ClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header value
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Replace all default headers
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: i64) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Add a default query parameter value
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace all default query parameters
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

    /// Replace the codec registry
    pub fn codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    /// Set the idle transport bound
    pub fn pool_max_idle(mut self, max_idle: usize) -> Self {
        self.pool_max_idle = max_idle;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_url() {
        let url = ProxyConfig::new("http", "127.0.0.1", "8888").to_url().unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8888/");

        let url = ProxyConfig::new("http", "proxy.local", "3128")
            .credentials("user", "p@ss")
            .to_url()
            .unwrap();
        assert_eq!(url.username(), "user");
        assert_eq!(url.password(), Some("p%40ss"));
        assert_eq!(url.host_str(), Some("proxy.local"));

        let url = ProxyConfig::new("socks5", "::1", "1080").to_url().unwrap();
        assert_eq!(url.port(), Some(1080));
    }

    #[test]
    fn test_invalid_proxy() {
        assert!(ProxyConfig::new("http", "bad host", "80").to_url().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new()
            .base_url("https://api.example.com")
            .header("X-Key", "V1")
            .unwrap()
            .parameter("status", "0")
            .parameter("status", "10")
            .timeout(3000)
            .max_redirects(3);

        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.headers.get("x-key").unwrap(), "V1");
        assert_eq!(config.parameters["status"], vec!["0", "10"]);
        assert_eq!(config.timeout, Some(3000));
        assert_eq!(config.max_redirects, Some(3));
    }

    #[test]
    fn test_default_status_range() {
        let validator = StatusValidator::default_range();
        assert!(validator.validate(200));
        assert!(validator.validate(399));
        assert!(!validator.validate(199));
        assert!(!validator.validate(400));
    }
}
