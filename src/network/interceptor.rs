// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request/response interceptor chain
//!
//! Outbound interceptors run over the built request before it is sent, inbound
//! interceptors over the received response. Each registry runs in registration
//! order and stops at the first error.
//!
//! # Example
//!
//! ```rust
//! use volley::network::InterceptorChain;
//!
//! let chain = InterceptorChain::new();
//! let id = chain.use_request(|req| {
//!     req.set_header("x-trace", "1")?;
//!     Ok(())
//! });
//! assert!(chain.remove_request(id));
//! assert!(!chain.remove_request(id));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::error::BoxError;
use crate::http::{Request, Response};

/// Id of a registered interceptor, never `0`
pub type InterceptorId = u64;

/// Mutates or rejects an outgoing request
pub trait RequestInterceptor: Send + Sync {
    /// Inspect or modify the request; an error aborts the call before it is sent
    fn intercept(&self, request: &mut Request) -> Result<(), BoxError>;
}

/// Mutates or rejects a received response
pub trait ResponseInterceptor: Send + Sync {
    /// Inspect or modify the response; an error fails the call
    fn intercept(&self, response: &mut Response) -> Result<(), BoxError>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(&mut Request) -> Result<(), BoxError> + Send + Sync,
{
    fn intercept(&self, request: &mut Request) -> Result<(), BoxError> {
        self(request)
    }
}

impl<F> ResponseInterceptor for F
where
    F: Fn(&mut Response) -> Result<(), BoxError> + Send + Sync,
{
    fn intercept(&self, response: &mut Response) -> Result<(), BoxError> {
        self(response)
    }
}

type Registry<T> = RwLock<Vec<(InterceptorId, Arc<T>)>>;

/// Ordered outbound and inbound interceptor registries
pub struct InterceptorChain {
    next_id: AtomicU64,
    requests: Registry<dyn RequestInterceptor>,
    responses: Registry<dyn ResponseInterceptor>,
}

impl Default for InterceptorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("requests", &self.request_count())
            .field("responses", &self.response_count())
            .finish()
    }
}

impl InterceptorChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            requests: RwLock::new(Vec::new()),
            responses: RwLock::new(Vec::new()),
        }
    }

    fn next_id(&self) -> InterceptorId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Register an outbound interceptor closure
    pub fn use_request<F>(&self, f: F) -> InterceptorId
    where
        F: Fn(&mut Request) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.add_request(f)
    }

    /// Register an inbound interceptor closure
    pub fn use_response<F>(&self, f: F) -> InterceptorId
    where
        F: Fn(&mut Response) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.add_response(f)
    }

    /// Register an outbound interceptor
    pub fn add_request<I: RequestInterceptor + 'static>(&self, interceptor: I) -> InterceptorId {
        let mut requests = self.requests.write();
        let id = self.next_id();
        requests.push((id, Arc::new(interceptor)));
        id
    }

    /// Register an inbound interceptor
    pub fn add_response<I: ResponseInterceptor + 'static>(&self, interceptor: I) -> InterceptorId {
        let mut responses = self.responses.write();
        let id = self.next_id();
        responses.push((id, Arc::new(interceptor)));
        id
    }

    /// Remove an outbound interceptor, `false` if the id is unknown
    pub fn remove_request(&self, id: InterceptorId) -> bool {
        remove(&self.requests, id)
    }

    /// Remove an inbound interceptor, `false` if the id is unknown
    pub fn remove_response(&self, id: InterceptorId) -> bool {
        remove(&self.responses, id)
    }

    /// Number of outbound interceptors
    pub fn request_count(&self) -> usize {
        self.requests.read().len()
    }

    /// Number of inbound interceptors
    pub fn response_count(&self) -> usize {
        self.responses.read().len()
    }

    /// Run outbound interceptors in order until one fails
    ///
    /// The read lock is held for the whole run; registering from inside an
    /// interceptor deadlocks.
    pub fn process_request(&self, request: &mut Request) -> Result<(), BoxError> {
        let requests = self.requests.read();
        for (id, interceptor) in requests.iter() {
            trace!(interceptor = id, url = %request.url, "Running request interceptor");
            interceptor.intercept(request)?;
        }
        Ok(())
    }

    /// Run inbound interceptors in order until one fails
    pub fn process_response(&self, response: &mut Response) -> Result<(), BoxError> {
        let responses = self.responses.read();
        for (id, interceptor) in responses.iter() {
            trace!(interceptor = id, status = response.status_code(), "Running response interceptor");
            interceptor.intercept(response)?;
        }
        Ok(())
    }
}

fn remove<T: ?Sized>(registry: &Registry<T>, id: InterceptorId) -> bool {
    let mut entries = registry.write();
    match entries.iter().position(|(existing, _)| *existing == id) {
        Some(index) => {
            entries.remove(index);
            true
        }
        None => false,
    }
}
