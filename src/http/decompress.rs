// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response body decompression

use std::io::Read;

use bytes::Bytes;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};

use super::headers;
use super::Response;
use crate::error::{Error, Result};

/// Content encodings the pipeline knows how to inflate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip,
    Deflate,
}

impl Encoding {
    /// Parse a `Content-Encoding` value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gzip" | "x-gzip" => Some(Encoding::Gzip),
            "deflate" => Some(Encoding::Deflate),
            _ => None,
        }
    }
}

/// Inflate the body in place according to `Content-Encoding`.
///
/// Responses with an unknown or missing encoding are returned untouched. On
/// success the `Content-Encoding` and the now stale `Content-Length` headers are
/// removed. A body that fails to inflate is an error carrying the original
/// response.
pub fn decompress(mut response: Response) -> Result<Response> {
    let encoding = match response.content_encoding().and_then(Encoding::parse) {
        Some(encoding) => encoding,
        None => return Ok(response),
    };

    let body = match response.body.as_ref() {
        Some(body) if !body.is_empty() => body,
        _ => {
            response.headers.remove(headers::CONTENT_ENCODING);
            return Ok(response);
        }
    };

    match inflate(encoding, body) {
        Ok(decoded) => {
            tracing::trace!(
                encoding = ?encoding,
                compressed = body.len(),
                decoded = decoded.len(),
                "Inflated response body"
            );
            response.body = Some(Bytes::from(decoded));
            response.headers.remove(headers::CONTENT_ENCODING);
            response.headers.remove(headers::CONTENT_LENGTH);
            Ok(response)
        }
        Err(source) => Err(Error::Decompression {
            encoding: response.content_encoding().unwrap_or_default().to_string(),
            source,
            response: Box::new(response),
        }),
    }
}

fn inflate(encoding: Encoding, data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoded = Vec::with_capacity(data.len() * 2);
    match encoding {
        Encoding::Gzip => {
            GzDecoder::new(data).read_to_end(&mut decoded)?;
        }
        // Servers disagree on whether "deflate" means zlib-wrapped or raw.
        Encoding::Deflate if has_zlib_header(data) => {
            ZlibDecoder::new(data).read_to_end(&mut decoded)?;
        }
        Encoding::Deflate => {
            DeflateDecoder::new(data).read_to_end(&mut decoded)?;
        }
    }
    Ok(decoded)
}

fn has_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => cmf & 0x0f == 8 && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0,
        _ => false,
    }
}
