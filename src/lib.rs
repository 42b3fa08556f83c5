// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Volley - Configurable HTTP Request Client
//!
//! An async HTTP client built on reqwest with layered configuration: every
//! setting has a client-wide default that each call may override.
//!
//! ## Features
//!
//! - Layered options: call value, else client value, else built-in default
//! - URL building: base URLs, path joining, multi-valued query merging
//! - Redirect control per call, including "never follow"
//! - Timeouts and caller owned cancellation
//! - Request and response interceptors with removable ids
//! - Body codecs by content type tag (JSON, form), extensible
//! - gzip/deflate response decompression
//! - Pooled transports shared by concurrent callers
//!
//! ## Example
//!
//! ```rust,no_run
//! use volley::{ClientConfig, HttpClient, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::with_config(
//!         ClientConfig::new()
//!             .base_url("https://api.example.com")
//!             .user_agent("my-app/1.0"),
//!     );
//!
//!     client.use_request_interceptor(|req| {
//!         req.set_header("x-request-id", "42")?;
//!         Ok(())
//!     });
//!
//!     let mut resp = client
//!         .post("/messages", RequestOptions::new().json(&serde_json::json!({"message": "Hello"}))?)
//!         .await?;
//!     println!("{} {}", resp.status_code(), resp.to_text()?);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod default_client;
pub mod error;
pub mod http;
pub mod network;

// Re-exports for convenience

// Client
pub use client::{
    BasicAuth, ClientConfig, ExecutionContext, HttpClient, PoolStats, ProxyConfig, RequestBuilder,
    RequestOptions, Stage,
};

// Errors
pub use error::{BoxError, Error, Result};

// HTTP
pub use http::{to_object, to_text, Body, CodecRegistry, ContentCodec, Request, Response};

// Network
pub use network::{InterceptorChain, InterceptorId, RequestInterceptor, ResponseInterceptor};

/// Volley version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
