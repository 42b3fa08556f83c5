// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Content negotiation
//!
//! A [`CodecRegistry`] maps a content type tag (`"json"`, `"form"`, ...) to a
//! [`ContentCodec`] able to turn a structured [`serde_json::Value`] into body
//! bytes and back. Request bodies are encoded by tag, response bodies are
//! decoded by the declared media type.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Tag of the built-in JSON codec, also the default tag
pub const CONTENT_TYPE_JSON: &str = "json";

/// Tag of the built-in form codec
pub const CONTENT_TYPE_FORM: &str = "form";

lazy_static::lazy_static! {
    /// Registry with the built-in codecs, used when no client registry is at hand
    pub static ref DEFAULT_CODECS: CodecRegistry = CodecRegistry::default();
}

/// Encode/decode capability for one content type
pub trait ContentCodec: Send + Sync {
    /// Media type sent as `Content-Type` and matched on responses
    fn mime_type(&self) -> &str;

    /// Serialize a structured value into body bytes
    fn encode(&self, value: &Value) -> Result<Vec<u8>>;

    /// Parse body bytes into a structured value
    fn decode(&self, data: &[u8]) -> Result<Value>;
}

/// JSON codec backed by serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ContentCodec for JsonCodec {
    fn mime_type(&self) -> &str {
        "application/json"
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(Error::from)
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        serde_json::from_slice(data).map_err(Error::from)
    }
}

/// `application/x-www-form-urlencoded` codec
///
/// Only flat objects encode; nested values are rejected by serde_urlencoded.
/// Decoded forms become an object of strings, with repeated keys collected
/// into arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormCodec;

impl ContentCodec for FormCodec {
    fn mime_type(&self) -> &str {
        "application/x-www-form-urlencoded"
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        serde_urlencoded::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| Error::codec(format!("form encoding failed: {}", e)))
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(data)
            .map_err(|e| Error::codec(format!("form decoding failed: {}", e)))?;

        let mut map = Map::new();
        for (key, value) in pairs {
            match map.get_mut(&key) {
                Some(Value::Array(values)) => values.push(Value::String(value)),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
                None => {
                    map.insert(key, Value::String(value));
                }
            }
        }
        Ok(Value::Object(map))
    }
}

/// Registry of codecs keyed by normalized tag
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn ContentCodec>>,
}

impl CodecRegistry {
    /// Create a registry without any codec
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Register a codec under a tag, replacing any previous one
    pub fn register<C: ContentCodec + 'static>(&mut self, tag: impl AsRef<str>, codec: C) {
        self.codecs.insert(normalize_tag(tag.as_ref()), Arc::new(codec));
    }

    /// Builder style [`CodecRegistry::register`]
    pub fn with<C: ContentCodec + 'static>(mut self, tag: impl AsRef<str>, codec: C) -> Self {
        self.register(tag, codec);
        self
    }

    /// Look a codec up by tag; an empty tag selects JSON
    pub fn get(&self, tag: &str) -> Result<Arc<dyn ContentCodec>> {
        let tag = match normalize_tag(tag) {
            t if t.is_empty() => CONTENT_TYPE_JSON.to_string(),
            t => t,
        };
        self.codecs
            .get(&tag)
            .cloned()
            .ok_or(Error::UnsupportedContentType(tag))
    }

    /// Find the codec producing the given media type
    pub fn for_mime_type(&self, mime: &str) -> Option<Arc<dyn ContentCodec>> {
        self.codecs
            .values()
            .find(|c| c.mime_type().eq_ignore_ascii_case(mime))
            .cloned()
    }

    /// Encode a structured value with the codec registered under `tag`
    pub fn encode(&self, tag: &str, value: &Value) -> Result<Bytes> {
        self.get(tag)?.encode(value).map(Bytes::from)
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::empty()
            .with(CONTENT_TYPE_JSON, JsonCodec)
            .with(CONTENT_TYPE_FORM, FormCodec)
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Request body
///
/// Raw bytes and text are sent verbatim. Structured values go through the
/// codec selected by the request's content type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Raw bytes, never encoded
    Bytes(Bytes),
    /// Plain text, never encoded
    Text(String),
    /// Structured value, encoded by codec
    Value(Value),
}

impl Body {
    /// Build a structured body from any serializable value
    pub fn json<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        Ok(Body::Value(serde_json::to_value(data)?))
    }

    /// Produce the wire bytes for this body
    pub fn encode(&self, tag: &str, codecs: &CodecRegistry) -> Result<Bytes> {
        match self {
            Body::Bytes(bytes) => Ok(bytes.clone()),
            Body::Text(text) => Ok(Bytes::from(text.clone())),
            Body::Value(value) => codecs.encode(tag, value),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Body::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Value(value)
    }
}

/// Strip parameters such as `charset` from a content type header value
pub fn media_type(content_type: &str) -> &str {
    content_type
        .split_once(';')
        .map(|(mime, _)| mime)
        .unwrap_or(content_type)
        .trim()
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}
