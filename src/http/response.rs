// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use super::codec::{media_type, CodecRegistry, DEFAULT_CODECS};
use super::headers;
use crate::error::{Error, Result};

/// HTTP response representation
///
/// The body is fully buffered. It is `None` when the exchange carries no body
/// at all (HEAD requests) or once one of the consuming helpers has taken it.
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Option<Bytes>,
    /// Final URL (after redirects)
    pub url: Url,
    /// Whether this was a redirect
    pub redirected: bool,
    /// Response time in milliseconds
    pub response_time_ms: u64,
    codecs: Option<Arc<CodecRegistry>>,
}

impl Response {
    /// Create a new response
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Option<Bytes>,
        url: Url,
        redirected: bool,
        response_time_ms: u64,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            redirected,
            response_time_ms,
            codecs: None,
        }
    }

    /// Attach the registry [`Response::to_object`] decodes with
    pub fn with_codecs(mut self, codecs: Arc<CodecRegistry>) -> Self {
        self.codecs = Some(codecs);
        self
    }

    /// Registry used by [`Response::to_object`], the built-in codecs unless
    /// the sending client attached its own
    pub fn codecs(&self) -> &CodecRegistry {
        self.codecs.as_deref().unwrap_or(&DEFAULT_CODECS)
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Raw body bytes, if the response has a body
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Get body as text without consuming it
    pub fn text(&self) -> Result<String> {
        let body = self.body.as_ref().ok_or(Error::InvalidResponse)?;
        String::from_utf8(body.to_vec()).map_err(|e| Error::Other(e.to_string()))
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }

    /// Parse body as JSON regardless of the declared content type
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self.body.as_ref().ok_or(Error::InvalidResponse)?;
        serde_json::from_slice(body).map_err(Error::from)
    }

    /// Take the body and decode it with the codec matching the declared content type.
    ///
    /// Codecs come from the client that sent the request. Returns `Ok(None)` for an empty body and when no codec matches the
    /// declared type. Fails with [`Error::InvalidResponse`] when there is no
    /// body to read.
    pub fn to_object<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match self.codecs.clone() {
            Some(codecs) => self.to_object_with(&codecs),
            None => self.to_object_with(&DEFAULT_CODECS),
        }
    }

    /// Same as [`Response::to_object`] with a caller supplied codec registry
    pub fn to_object_with<T: DeserializeOwned>(
        &mut self,
        codecs: &CodecRegistry,
    ) -> Result<Option<T>> {
        let body = self.body.take().ok_or(Error::InvalidResponse)?;
        if body.is_empty() {
            return Ok(None);
        }

        let codec = match self.media_type().and_then(|mime| codecs.for_mime_type(mime)) {
            Some(codec) => codec,
            None => return Ok(None),
        };

        let value = codec.decode(&body)?;
        serde_json::from_value(value).map(Some).map_err(Error::from)
    }

    /// Take the body and return it as a string
    pub fn to_text(&mut self) -> Result<String> {
        let body = self.body.take().ok_or(Error::InvalidResponse)?;
        String::from_utf8(body.to_vec()).map_err(|e| Error::Other(e.to_string()))
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get all values for a header
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(headers::CONTENT_TYPE)
    }

    /// Content type without parameters such as `charset`
    pub fn media_type(&self) -> Option<&str> {
        self.content_type().map(media_type).filter(|m| !m.is_empty())
    }

    /// Check if content type is JSON
    pub fn is_json(&self) -> bool {
        self.media_type() == Some("application/json")
    }

    /// Get content encoding
    pub fn content_encoding(&self) -> Option<&str> {
        self.header(headers::CONTENT_ENCODING)
    }

    /// Get content length
    pub fn content_length(&self) -> Option<usize> {
        self.header(headers::CONTENT_LENGTH)
            .and_then(|v| v.parse().ok())
    }

    /// Get the final URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map(Bytes::len).unwrap_or(0)
    }
}

/// Decode the body of a pipeline result as a typed object.
///
/// Errors from the call are passed through untouched. The response is handed
/// back alongside the decoded value.
pub fn to_object<T: DeserializeOwned>(result: Result<Response>) -> Result<(Option<T>, Response)> {
    let mut response = result?;
    let value = response.to_object()?;
    Ok((value, response))
}

/// Read the body of a pipeline result as text
pub fn to_text(result: Result<Response>) -> Result<(String, Response)> {
    let mut response = result?;
    let text = response.to_text()?;
    Ok((text, response))
}
