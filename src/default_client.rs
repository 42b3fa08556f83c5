// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Module-level default client
//!
//! Thin functions over one lazily built [`HttpClient`] with the default
//! configuration. Interceptors registered here apply to every call made
//! through these functions.

use crate::client::{HttpClient, RequestBuilder, RequestOptions};
use crate::error::{BoxError, Result};
use crate::http::{Request, Response};
use crate::network::InterceptorId;

lazy_static::lazy_static! {
    static ref DEFAULT_CLIENT: HttpClient = HttpClient::new();
}

/// The shared default client
pub fn default_client() -> &'static HttpClient {
    &DEFAULT_CLIENT
}

/// Send a request using the options' method, GET when unset
pub async fn request(
    url: impl AsRef<str>,
    options: impl Into<Option<RequestOptions>>,
) -> Result<Response> {
    DEFAULT_CLIENT.request(url, options).await
}

/// Send a GET request
pub async fn get(url: impl AsRef<str>, options: impl Into<Option<RequestOptions>>) -> Result<Response> {
    DEFAULT_CLIENT.get(url, options).await
}

/// Send a POST request
pub async fn post(url: impl AsRef<str>, options: impl Into<Option<RequestOptions>>) -> Result<Response> {
    DEFAULT_CLIENT.post(url, options).await
}

/// Send a PUT request
pub async fn put(url: impl AsRef<str>, options: impl Into<Option<RequestOptions>>) -> Result<Response> {
    DEFAULT_CLIENT.put(url, options).await
}

/// Send a PATCH request
pub async fn patch(url: impl AsRef<str>, options: impl Into<Option<RequestOptions>>) -> Result<Response> {
    DEFAULT_CLIENT.patch(url, options).await
}

/// Send a DELETE request
pub async fn delete(url: impl AsRef<str>, options: impl Into<Option<RequestOptions>>) -> Result<Response> {
    DEFAULT_CLIENT.delete(url, options).await
}

/// Send a HEAD request
pub async fn head(url: impl AsRef<str>, options: impl Into<Option<RequestOptions>>) -> Result<Response> {
    DEFAULT_CLIENT.head(url, options).await
}

/// Send an OPTIONS request
pub async fn options(url: impl AsRef<str>, options: impl Into<Option<RequestOptions>>) -> Result<Response> {
    DEFAULT_CLIENT.options(url, options).await
}

/// Fluent builder on the default client
pub fn req(url: impl Into<String>) -> RequestBuilder {
    DEFAULT_CLIENT.req(url)
}

/// Register an outbound interceptor on the default client
pub fn use_request_interceptor<F>(f: F) -> InterceptorId
where
    F: Fn(&mut Request) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
{
    DEFAULT_CLIENT.use_request_interceptor(f)
}

/// Register an inbound interceptor on the default client
pub fn use_response_interceptor<F>(f: F) -> InterceptorId
where
    F: Fn(&mut Response) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
{
    DEFAULT_CLIENT.use_response_interceptor(f)
}

/// Remove an outbound interceptor from the default client
pub fn remove_request_interceptor(id: InterceptorId) -> bool {
    DEFAULT_CLIENT.remove_request_interceptor(id)
}

/// Remove an inbound interceptor from the default client
pub fn remove_response_interceptor(id: InterceptorId) -> bool {
    DEFAULT_CLIENT.remove_response_interceptor(id)
}
