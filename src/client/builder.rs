// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fluent request builder

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;

use super::config::{Parameters, ProxyConfig};
use super::context::ExecutionContext;
use super::options::RequestOptions;
use super::pipeline::HttpClient;
use crate::error::Result;
use crate::http::{Body, Response};

/// Builder for one call on an [`HttpClient`]
///
/// Header and JSON setters that can fail keep the first error and report it
/// from [`RequestBuilder::send`].
#[derive(Debug)]
pub struct RequestBuilder {
    client: HttpClient,
    url: String,
    verb: Option<Method>,
    options: Result<RequestOptions>,
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            verb: None,
            options: Ok(RequestOptions::default()),
        }
    }

    fn map(mut self, f: impl FnOnce(RequestOptions) -> RequestOptions) -> Self {
        self.options = self.options.map(f);
        self
    }

    fn try_map(mut self, f: impl FnOnce(RequestOptions) -> Result<RequestOptions>) -> Self {
        self.options = self.options.and_then(f);
        self
    }

    /// Set the method by name
    pub fn method(self, method: impl Into<String>) -> Self {
        self.map(|o| o.method(method))
    }

    /// Send as GET
    pub fn get(mut self) -> Self {
        self.verb = Some(Method::GET);
        self
    }

    /// Send as POST
    pub fn post(mut self) -> Self {
        self.verb = Some(Method::POST);
        self
    }

    /// Send as PUT
    pub fn put(mut self) -> Self {
        self.verb = Some(Method::PUT);
        self
    }

    /// Send as PATCH
    pub fn patch(mut self) -> Self {
        self.verb = Some(Method::PATCH);
        self
    }

    /// Send as DELETE
    pub fn delete(mut self) -> Self {
        self.verb = Some(Method::DELETE);
        self
    }

    /// Send as HEAD
    pub fn head(mut self) -> Self {
        self.verb = Some(Method::HEAD);
        self
    }

    /// Add a header value
    pub fn header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.try_map(|o| o.add_header(name, value))
    }

    /// Replace all call headers
    pub fn headers(self, headers: HeaderMap) -> Self {
        self.map(|o| o.headers(headers))
    }

    /// Add a query parameter value
    pub fn query(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|o| o.parameter(key, value))
    }

    /// Replace all call query parameters
    pub fn parameters(self, parameters: Parameters) -> Self {
        self.map(|o| o.parameters(parameters))
    }

    /// Set the body
    pub fn body(self, body: impl Into<Body>) -> Self {
        self.map(|o| o.body(body))
    }

    /// Set a structured body
    pub fn json<T: Serialize + ?Sized>(self, data: &T) -> Self {
        self.try_map(|o| o.json(data))
    }

    /// Set the content type tag
    pub fn content_type(self, tag: impl Into<String>) -> Self {
        self.map(|o| o.content_type(tag))
    }

    /// Set the timeout in milliseconds, `-1` for no limit
    pub fn timeout(self, timeout_ms: i64) -> Self {
        self.map(|o| o.timeout(timeout_ms))
    }

    /// Set max redirects, `-1` for none
    pub fn max_redirects(self, max: i64) -> Self {
        self.map(|o| o.max_redirects(max))
    }

    /// Set basic auth credentials
    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.map(|o| o.basic_auth(username, password))
    }

    /// Set the user agent
    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        self.map(|o| o.user_agent(user_agent))
    }

    /// Set the proxy
    pub fn proxy(self, proxy: ProxyConfig) -> Self {
        self.map(|o| o.proxy(proxy))
    }

    /// Run under a caller owned context
    pub fn context(self, context: ExecutionContext) -> Self {
        self.map(|o| o.context(context))
    }

    /// Keep compressed bodies as received
    pub fn disable_decompress(self) -> Self {
        self.map(|o| o.disable_decompress(true))
    }

    /// Set the status predicate
    pub fn validate_status<F>(self, f: F) -> Self
    where
        F: Fn(u16) -> bool + Send + Sync + 'static,
    {
        self.map(|o| o.validate_status(f))
    }

    /// Apply any other option
    pub fn with(self, f: impl FnOnce(RequestOptions) -> RequestOptions) -> Self {
        self.map(f)
    }

    /// Options built so far, `None` once a setter has failed
    pub fn options(&self) -> Option<&RequestOptions> {
        self.options.as_ref().ok()
    }

    /// Send the request
    pub async fn send(self) -> Result<Response> {
        let options = self.options?;
        self.client.execute(self.verb, &self.url, options).await
    }
}
