// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request and response interception

mod interceptor;

pub use interceptor::{InterceptorChain, InterceptorId, RequestInterceptor, ResponseInterceptor};
