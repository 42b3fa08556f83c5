// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP message layer for Volley
//!
//! Request and response representations, body codecs and response
//! decompression. Everything here is independent of the client pipeline.

pub mod codec;
pub mod decompress;
mod request;
mod response;

pub use codec::{Body, CodecRegistry, ContentCodec, FormCodec, JsonCodec};
pub use request::Request;
pub(crate) use request::parse_header;
pub use response::{to_object, to_text, Response};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("volley/", env!("CARGO_PKG_VERSION"));

/// Common HTTP headers
pub mod headers {
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_ENCODING: &str = "content-encoding";
    pub const CONTENT_LENGTH: &str = "content-length";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const LOCATION: &str = "location";
    pub const USER_AGENT: &str = "user-agent";
}
