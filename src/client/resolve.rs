// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Effective option resolution
//!
//! Every setting resolves as call value, else client value, else the built-in
//! default. A value of `0` counts as unset at both layers.

use std::time::Duration;

use reqwest::Method;
use url::Url;

use super::config::{ClientConfig, ParameterSerializer, ProxyConfig, StatusValidator};
use super::options::RequestOptions;
use super::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_MS, NO_REDIRECTS, TIMEOUT_NO_LIMIT};
use crate::error::{Error, Result};
use crate::http::codec::{ContentCodec, CONTENT_TYPE_JSON};
use crate::http::DEFAULT_USER_AGENT;

lazy_static::lazy_static! {
    static ref DEFAULT_VALIDATOR: StatusValidator = StatusValidator::default_range();
}

/// Resolves effective settings for one call
#[derive(Debug, Clone, Copy)]
pub struct OptionResolver<'a> {
    client: &'a ClientConfig,
    call: &'a RequestOptions,
}

impl<'a> OptionResolver<'a> {
    pub fn new(client: &'a ClientConfig, call: &'a RequestOptions) -> Self {
        Self { client, call }
    }

    /// Client layer
    pub fn client(&self) -> &'a ClientConfig {
        self.client
    }

    /// Call layer
    pub fn call(&self) -> &'a RequestOptions {
        self.call
    }

    /// HTTP method: the entry point's verb, else the call's, else GET
    pub fn method(&self, explicit: Option<&str>) -> Result<Method> {
        match explicit.or(self.call.method.as_deref()) {
            None | Some("") => Ok(Method::GET),
            Some(method) => parse_method(method),
        }
    }

    /// Maximum number of requests in a redirect chain.
    ///
    /// `-1` disables redirects. Zero and anything below `-1` resolve to the
    /// default, and a call value other than zero is never replaced by the
    /// client's.
    pub fn max_redirects(&self) -> i64 {
        let max = match self.call.max_redirects {
            None | Some(0) => self.client.max_redirects.unwrap_or(0),
            Some(max) => max,
        };

        if max == 0 || max < NO_REDIRECTS {
            DEFAULT_MAX_REDIRECTS
        } else {
            max
        }
    }

    /// Effective timeout, `None` meaning no limit
    pub fn timeout(&self) -> Option<Duration> {
        let usable = |t: &i64| *t > 0 || *t == TIMEOUT_NO_LIMIT;
        let timeout = self
            .call
            .timeout
            .filter(usable)
            .or(self.client.timeout.filter(usable))
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        if timeout == TIMEOUT_NO_LIMIT {
            None
        } else {
            Some(Duration::from_millis(timeout as u64))
        }
    }

    /// User agent
    pub fn user_agent(&self) -> &'a str {
        [&self.call.user_agent, &self.client.user_agent]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|ua| !ua.is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Status predicate
    pub fn status_validator(&self) -> &'a StatusValidator {
        self.call
            .validate_status
            .as_ref()
            .or(self.client.validate_status.as_ref())
            .unwrap_or(&DEFAULT_VALIDATOR)
    }

    /// Query string serializer, `None` meaning the standard encoder
    pub fn parameters_serializer(&self) -> Option<&'a ParameterSerializer> {
        self.call
            .parameters_serializer
            .as_ref()
            .or(self.client.parameters_serializer.as_ref())
    }

    /// Proxy settings, `None` meaning the environment decides
    pub fn proxy(&self) -> Option<&'a ProxyConfig> {
        self.call.proxy.as_ref().or(self.client.proxy.as_ref())
    }

    /// Proxy URL resolved from [`OptionResolver::proxy`]
    pub fn proxy_url(&self) -> Result<Option<Url>> {
        self.proxy().map(ProxyConfig::to_url).transpose()
    }

    /// Content type tag
    pub fn content_type_tag(&self) -> &'a str {
        self.call
            .content_type
            .as_deref()
            .filter(|tag| !tag.trim().is_empty())
            .unwrap_or(CONTENT_TYPE_JSON)
    }

    /// Codec for the content type tag
    pub fn codec(&self) -> Result<std::sync::Arc<dyn ContentCodec>> {
        self.client.codecs.get(self.content_type_tag())
    }
}

/// Methods accepted by the pipeline
const ALLOWED_METHODS: [Method; 9] = [
    Method::CONNECT,
    Method::DELETE,
    Method::GET,
    Method::HEAD,
    Method::OPTIONS,
    Method::PATCH,
    Method::POST,
    Method::PUT,
    Method::TRACE,
];

/// Parse a method name case-insensitively against the allow-list
pub fn parse_method(method: &str) -> Result<Method> {
    let upper = method.to_ascii_uppercase();
    ALLOWED_METHODS
        .iter()
        .find(|m| m.as_str() == upper)
        .cloned()
        .ok_or_else(|| Error::InvalidMethod(method.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_max_redirects(client: Option<i64>, call: Option<i64>) -> i64 {
        let client = ClientConfig {
            max_redirects: client,
            ..Default::default()
        };
        let call = RequestOptions {
            max_redirects: call,
            ..Default::default()
        };
        OptionResolver::new(&client, &call).max_redirects()
    }

    fn resolver_timeout(client: Option<i64>, call: Option<i64>) -> Option<Duration> {
        let client = ClientConfig {
            timeout: client,
            ..Default::default()
        };
        let call = RequestOptions {
            timeout: call,
            ..Default::default()
        };
        OptionResolver::new(&client, &call).timeout()
    }

    #[test]
    fn test_method() {
        let client = ClientConfig::default();
        let call = RequestOptions::default();
        let resolver = OptionResolver::new(&client, &call);

        assert_eq!(resolver.method(None).unwrap(), Method::GET);
        for method in ["Connect", "delete", "get", "HEAD", "Options", "PATCH", "PoST", "PuT", "TRACE"] {
            assert_eq!(
                resolver.method(Some(method)).unwrap().as_str(),
                method.to_ascii_uppercase()
            );
        }
        assert!(matches!(
            resolver.method(Some("UNKNOWN")),
            Err(Error::InvalidMethod(m)) if m == "UNKNOWN"
        ));

        let call = RequestOptions::new().method("post");
        let resolver = OptionResolver::new(&client, &call);
        assert_eq!(resolver.method(None).unwrap(), Method::POST);
        assert_eq!(resolver.method(Some("PUT")).unwrap(), Method::PUT);
    }

    #[test]
    fn test_max_redirects_precedence() {
        assert_eq!(resolver_max_redirects(None, None), DEFAULT_MAX_REDIRECTS);
        assert_eq!(resolver_max_redirects(Some(3), None), 3);
        assert_eq!(resolver_max_redirects(Some(3), Some(7)), 7);
        assert_eq!(resolver_max_redirects(None, Some(NO_REDIRECTS)), NO_REDIRECTS);
        assert_eq!(resolver_max_redirects(Some(NO_REDIRECTS), None), NO_REDIRECTS);
        assert_eq!(resolver_max_redirects(Some(3), Some(-7)), DEFAULT_MAX_REDIRECTS);
    }

    #[test]
    fn test_zero_redirects_is_unset() {
        assert_eq!(resolver_max_redirects(Some(3), Some(0)), 3);
        assert_eq!(resolver_max_redirects(Some(0), Some(0)), DEFAULT_MAX_REDIRECTS);
        assert_eq!(resolver_max_redirects(Some(0), None), DEFAULT_MAX_REDIRECTS);
    }

    #[test]
    fn test_timeout_precedence() {
        let ms = |ms| Some(Duration::from_millis(ms));

        assert_eq!(resolver_timeout(None, None), ms(1000));
        assert_eq!(resolver_timeout(Some(3000), None), ms(3000));
        assert_eq!(resolver_timeout(Some(3000), Some(500)), ms(500));
        assert_eq!(resolver_timeout(Some(3000), Some(TIMEOUT_NO_LIMIT)), None);
        assert_eq!(resolver_timeout(Some(TIMEOUT_NO_LIMIT), None), None);
        assert_eq!(resolver_timeout(Some(TIMEOUT_NO_LIMIT), Some(200)), ms(200));
        assert_eq!(resolver_timeout(Some(3000), Some(0)), ms(3000));
        assert_eq!(resolver_timeout(Some(-5), Some(-9)), ms(1000));
    }

    #[test]
    fn test_user_agent() {
        let mut client = ClientConfig::default();
        let call = RequestOptions::default();
        assert_eq!(OptionResolver::new(&client, &call).user_agent(), DEFAULT_USER_AGENT);

        client.user_agent = Some("Test-HTTP-Client".to_string());
        assert_eq!(OptionResolver::new(&client, &call).user_agent(), "Test-HTTP-Client");

        let call = RequestOptions::new().user_agent("Test-Client");
        assert_eq!(OptionResolver::new(&client, &call).user_agent(), "Test-Client");

        let call = RequestOptions::new().user_agent("");
        assert_eq!(OptionResolver::new(&client, &call).user_agent(), "Test-HTTP-Client");
    }

    #[test]
    fn test_status_validator() {
        let client = ClientConfig::default();
        let call = RequestOptions::default();
        let validator = OptionResolver::new(&client, &call).status_validator();
        assert!(validator.validate(200) && validator.validate(399));
        assert!(!validator.validate(400) && !validator.validate(500));

        let client = ClientConfig::new().validate_status(|s| s == 400);
        assert!(OptionResolver::new(&client, &call).status_validator().validate(400));

        let call = RequestOptions::new().validate_status(|s| s == 418);
        let validator = OptionResolver::new(&client, &call).status_validator();
        assert!(validator.validate(418));
        assert!(!validator.validate(400));
    }

    #[test]
    fn test_proxy_precedence() {
        let client = ClientConfig::new().proxy(ProxyConfig::new("http", "client.proxy", "80"));
        let call = RequestOptions::default();
        assert_eq!(
            OptionResolver::new(&client, &call).proxy_url().unwrap().unwrap().host_str(),
            Some("client.proxy")
        );

        let call = RequestOptions::new().proxy(ProxyConfig::new("http", "call.proxy", "80"));
        assert_eq!(
            OptionResolver::new(&client, &call).proxy_url().unwrap().unwrap().host_str(),
            Some("call.proxy")
        );

        let client = ClientConfig::default();
        let call = RequestOptions::default();
        assert!(OptionResolver::new(&client, &call).proxy_url().unwrap().is_none());
    }

    #[test]
    fn test_content_type_tag() {
        let client = ClientConfig::default();
        let call = RequestOptions::default();
        let resolver = OptionResolver::new(&client, &call);
        assert_eq!(resolver.content_type_tag(), "json");
        assert_eq!(resolver.codec().unwrap().mime_type(), "application/json");

        let call = RequestOptions::new().content_type("unknown");
        assert!(matches!(
            OptionResolver::new(&client, &call).codec(),
            Err(Error::UnsupportedContentType(_))
        ));
    }
}
