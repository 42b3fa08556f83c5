// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client, option resolution and the request pipeline

mod builder;
mod config;
mod context;
mod options;
mod pipeline;
mod pool;
mod redirect;
mod resolve;
mod url;

pub use builder::RequestBuilder;
pub use config::{
    ClientConfig, ParameterSerializer, Parameters, ProxyConfig, StatusValidator,
    DEFAULT_POOL_MAX_IDLE,
};
pub use context::{derive_context, ContextGuard, ExecutionContext};
pub use options::{BasicAuth, RequestOptions};
pub use pipeline::{HttpClient, Stage};
pub use pool::{env_proxy, PoolStats, PooledTransport, Transport, TransportPool};
pub use redirect::RedirectPolicy;
pub use resolve::{parse_method, OptionResolver};
pub use self::url::{encode_parameters, is_absolute, UrlBuilder};

/// Default timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: i64 = 1000;

/// Timeout value meaning "no limit"
pub const TIMEOUT_NO_LIMIT: i64 = -1;

/// Default maximum number of requests in a redirect chain
pub const DEFAULT_MAX_REDIRECTS: i64 = 5;

/// Max-redirects value meaning "never follow"
pub const NO_REDIRECTS: i64 = -1;
