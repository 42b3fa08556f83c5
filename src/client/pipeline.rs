// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request pipeline
//!
//! One call runs build → outbound interceptors → execute → decompress →
//! status validation → inbound interceptors. The first failing step ends the
//! call; once a response exists it travels inside the error.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use reqwest::Method;
use tracing::debug;
use url::Url;

use super::builder::RequestBuilder;
use super::config::ClientConfig;
use super::context::{derive_context, ExecutionContext};
use super::options::RequestOptions;
use super::pool::{PoolStats, TransportPool};
use super::redirect::RedirectPolicy;
use super::resolve::OptionResolver;
use super::url::UrlBuilder;
use crate::error::{BoxError, Error, Result};
use crate::http::decompress::decompress;
use crate::http::{headers, CodecRegistry, Request, Response};
use crate::network::{InterceptorChain, InterceptorId};

/// Pipeline step, reported by errors raised inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    BuildRequest,
    InterceptOutbound,
    Execute,
    DecodeCompression,
    ValidateStatus,
    InterceptInbound,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::BuildRequest => "build request",
            Stage::InterceptOutbound => "outbound",
            Stage::Execute => "execute",
            Stage::DecodeCompression => "decompress",
            Stage::ValidateStatus => "validate status",
            Stage::InterceptInbound => "inbound",
        };
        f.write_str(name)
    }
}

/// HTTP client with layered configuration
///
/// Cloning is cheap; clones share the configuration, the transport pool and
/// the interceptor registries.
///
/// # Example
///
/// ```rust,no_run
/// use volley::{ClientConfig, HttpClient, RequestOptions};
///
/// # async fn run() -> volley::Result<()> {
/// let client = HttpClient::with_config(
///     ClientConfig::new().base_url("https://api.example.com").timeout(3000),
/// );
///
/// let mut resp = client
///     .get("/users", RequestOptions::new().parameter("page", "2"))
///     .await?;
/// let users: Option<serde_json::Value> = resp.to_object()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: Arc<ClientConfig>,
    pool: Arc<TransportPool>,
    interceptors: Arc<InterceptorChain>,
    codecs: Arc<CodecRegistry>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Client with the default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Client with a custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let pool = TransportPool::new(config.pool_max_idle);
        let codecs = Arc::new(config.codecs.clone());
        Self {
            config: Arc::new(config),
            pool: Arc::new(pool),
            interceptors: Arc::new(InterceptorChain::new()),
            codecs,
        }
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Interceptor registries
    pub fn interceptors(&self) -> &InterceptorChain {
        &self.interceptors
    }

    /// Transport pool statistics
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Register an outbound interceptor, returning its id
    pub fn use_request_interceptor<F>(&self, f: F) -> InterceptorId
    where
        F: Fn(&mut Request) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.interceptors.use_request(f)
    }

    /// Register an inbound interceptor, returning its id
    pub fn use_response_interceptor<F>(&self, f: F) -> InterceptorId
    where
        F: Fn(&mut Response) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.interceptors.use_response(f)
    }

    /// Remove an outbound interceptor, `false` if the id is unknown
    pub fn remove_request_interceptor(&self, id: InterceptorId) -> bool {
        self.interceptors.remove_request(id)
    }

    /// Remove an inbound interceptor, `false` if the id is unknown
    pub fn remove_response_interceptor(&self, id: InterceptorId) -> bool {
        self.interceptors.remove_response(id)
    }

    /// Fluent builder for one call
    pub fn req(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), url)
    }

    /// Send a request using the options' method, GET when unset
    pub async fn request(
        &self,
        url: impl AsRef<str>,
        options: impl Into<Option<RequestOptions>>,
    ) -> Result<Response> {
        self.execute(None, url.as_ref(), options.into().unwrap_or_default())
            .await
    }

    /// Send a GET request
    pub async fn get(
        &self,
        url: impl AsRef<str>,
        options: impl Into<Option<RequestOptions>>,
    ) -> Result<Response> {
        self.execute(Some(Method::GET), url.as_ref(), options.into().unwrap_or_default())
            .await
    }

    /// Send a POST request
    pub async fn post(
        &self,
        url: impl AsRef<str>,
        options: impl Into<Option<RequestOptions>>,
    ) -> Result<Response> {
        self.execute(Some(Method::POST), url.as_ref(), options.into().unwrap_or_default())
            .await
    }

    /// Send a PUT request
    pub async fn put(
        &self,
        url: impl AsRef<str>,
        options: impl Into<Option<RequestOptions>>,
    ) -> Result<Response> {
        self.execute(Some(Method::PUT), url.as_ref(), options.into().unwrap_or_default())
            .await
    }

    /// Send a PATCH request
    pub async fn patch(
        &self,
        url: impl AsRef<str>,
        options: impl Into<Option<RequestOptions>>,
    ) -> Result<Response> {
        self.execute(Some(Method::PATCH), url.as_ref(), options.into().unwrap_or_default())
            .await
    }

    /// Send a DELETE request
    pub async fn delete(
        &self,
        url: impl AsRef<str>,
        options: impl Into<Option<RequestOptions>>,
    ) -> Result<Response> {
        self.execute(Some(Method::DELETE), url.as_ref(), options.into().unwrap_or_default())
            .await
    }

    /// Send a HEAD request; the response has no body
    pub async fn head(
        &self,
        url: impl AsRef<str>,
        options: impl Into<Option<RequestOptions>>,
    ) -> Result<Response> {
        self.execute(Some(Method::HEAD), url.as_ref(), options.into().unwrap_or_default())
            .await
    }

    /// Send an OPTIONS request
    pub async fn options(
        &self,
        url: impl AsRef<str>,
        options: impl Into<Option<RequestOptions>>,
    ) -> Result<Response> {
        self.execute(Some(Method::OPTIONS), url.as_ref(), options.into().unwrap_or_default())
            .await
    }

    /// Send several calls concurrently, each with its own options
    ///
    /// Results come back in input order.
    pub async fn send_all<I, U>(&self, calls: I) -> Vec<Result<Response>>
    where
        I: IntoIterator<Item = (U, RequestOptions)>,
        U: AsRef<str>,
    {
        let futures: Vec<_> = calls
            .into_iter()
            .map(|(url, options)| async move { self.request(url, options).await })
            .collect();
        futures::future::join_all(futures).await
    }

    pub(crate) async fn execute(
        &self,
        verb: Option<Method>,
        target: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let resolver = OptionResolver::new(&self.config, &options);

        let mut request = self.build_request(&resolver, verb, target)?;
        let (context, _guard) = derive_context(&resolver);

        self.interceptors
            .process_request(&mut request)
            .map_err(|source| Error::InterceptorAborted {
                stage: Stage::InterceptOutbound,
                source,
                response: None,
            })?;

        let response = self.send(&resolver, &context, request).await?;

        let response = if options.disable_decompress {
            response
        } else {
            decompress(response)?
        };

        let status = response.status_code();
        if !resolver.status_validator().validate(status) {
            debug!(status, url = %response.url, "Status rejected");
            return Err(Error::StatusValidationFailed {
                status,
                response: Box::new(response),
            });
        }

        let mut response = response;
        if let Err(source) = self.interceptors.process_response(&mut response) {
            return Err(Error::InterceptorAborted {
                stage: Stage::InterceptInbound,
                source,
                response: Some(Box::new(response)),
            });
        }

        Ok(response)
    }

    fn build_request(
        &self,
        resolver: &OptionResolver<'_>,
        verb: Option<Method>,
        target: &str,
    ) -> Result<Request> {
        let call = resolver.call();
        let client = resolver.client();

        let method = resolver.method(verb.as_ref().map(Method::as_str))?;
        let url = UrlBuilder::new(client, call).build(target)?;
        let body = call
            .body
            .as_ref()
            .map(|body| body.encode(resolver.content_type_tag(), &client.codecs))
            .transpose()?;

        let mut request = Request::new(method, url);
        request.body = body;
        request.headers = call.headers.clone();
        for name in client.headers.keys() {
            if request.headers.contains_key(name) {
                continue;
            }
            for value in client.headers.get_all(name) {
                request.headers.append(name.clone(), value.clone());
            }
        }

        if !request.headers.contains_key(headers::CONTENT_TYPE) {
            let codec = resolver.codec()?;
            request.set_header(headers::CONTENT_TYPE, codec.mime_type())?;
        }
        request.set_header(headers::USER_AGENT, resolver.user_agent())?;

        if let Some(auth) = &call.auth {
            request.set_basic_auth(&auth.username, &auth.password)?;
        }

        debug!(method = %request.method, url = %request.url, "Built request");
        Ok(request)
    }

    async fn send(
        &self,
        resolver: &OptionResolver<'_>,
        context: &ExecutionContext,
        request: Request,
    ) -> Result<Response> {
        let transport = self.pool.checkout(
            RedirectPolicy::new(resolver.max_redirects()),
            resolver.proxy_url()?,
        )?;

        let Request {
            method,
            url,
            headers,
            body,
        } = request;
        let head = method == Method::HEAD;

        let mut builder = transport
            .client()
            .request(method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        debug!(method = %method, url = %url, transport = transport.id(), "Sending request");
        let start = Instant::now();

        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let final_url = response.url().clone();
            let body = response.bytes().await?;
            Ok::<_, Error>((status, headers, final_url, body))
        };

        let (status, headers, final_url, body) = context
            .run(exchange)
            .await
            .map_err(|e| with_url(e, &url))??;

        let response_time = start.elapsed().as_millis() as u64;
        let redirected = final_url != url;
        debug!(
            status = status.as_u16(),
            url = %final_url,
            redirected,
            elapsed_ms = response_time,
            "Received response"
        );

        Ok(Response::new(
            status,
            headers,
            if head { None } else { Some(body) },
            final_url,
            redirected,
            response_time,
        )
        .with_codecs(Arc::clone(&self.codecs)))
    }
}

fn with_url(err: Error, url: &Url) -> Error {
    match err {
        Error::Timeout {
            operation,
            duration_ms,
            url: None,
        } => Error::timeout_with_url(operation, duration_ms, url.as_str()),
        Error::Cancelled { url: None } => Error::Cancelled {
            url: Some(url.to_string()),
        },
        other => other,
    }
}
