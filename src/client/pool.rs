// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport pool
//!
//! A transport is one underlying `reqwest::Client` bound to a fixed proxy
//! route, plus a per-call redirect slot. The client keeps keep-alive
//! connections per destination, so a transport only ever serves the route it
//! was built for; idle transports are grouped by route. Calls check a
//! transport out, rewrite the redirect slot, use it exclusively and hand it
//! back when the guard drops.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};
use url::Url;

use super::redirect::{shared_policy, RedirectPolicy};
use crate::error::Result;

/// Pool statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Transports built
    pub created: u64,
    /// Successful checkouts
    pub checkouts: u64,
    /// Transports returned to the idle list
    pub returned: u64,
    /// Transports dropped because the idle list was full
    pub discarded: u64,
    /// Transports currently checked out
    pub in_use: u64,
    /// Peak concurrent checkouts
    pub peak_in_use: u64,
    /// Transports currently idle
    pub idle: u64,
}

/// One reusable HTTP client with a fixed proxy route and a per-call redirect slot
pub struct Transport {
    id: u64,
    client: reqwest::Client,
    redirect: Arc<RwLock<RedirectPolicy>>,
    proxy: Option<Url>,
}

impl Transport {
    /// `proxy` routes every request through that proxy; `None` defers to the
    /// environment for each target.
    fn build(id: u64, proxy: Option<Url>) -> Result<Self> {
        let redirect = Arc::new(RwLock::new(RedirectPolicy::default()));

        let route = match &proxy {
            Some(url) => reqwest::Proxy::all(url.clone())?,
            None => reqwest::Proxy::custom(env_proxy),
        };
        let client = reqwest::Client::builder()
            .redirect(shared_policy(Arc::clone(&redirect)))
            .proxy(route)
            .no_gzip()
            .no_brotli()
            .no_deflate()
            .build()?;

        Ok(Self {
            id,
            client,
            redirect,
            proxy,
        })
    }

    /// Pool-unique id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Underlying client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Redirect policy currently installed
    pub fn redirect_policy(&self) -> RedirectPolicy {
        *self.redirect.read()
    }

    /// Proxy this transport routes through, `None` meaning the environment decides
    pub fn proxy(&self) -> Option<&Url> {
        self.proxy.as_ref()
    }

    fn set_redirect_policy(&self, redirect: RedirectPolicy) {
        *self.redirect.write() = redirect;
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("id", &self.id)
            .field("redirect", &self.redirect_policy())
            .field("proxy", &self.proxy)
            .finish()
    }
}

/// Concurrent pool of idle transports
#[derive(Debug)]
pub struct TransportPool {
    idle: Mutex<HashMap<Option<Url>, Vec<Transport>>>,
    max_idle: usize,
    next_id: AtomicU64,
    stats: RwLock<PoolStats>,
}

/// A transport checked out of the pool
///
/// Dereferences to [`Transport`]; dropping it returns the transport.
pub struct PooledTransport {
    transport: Option<Transport>,
    pool: Arc<TransportPool>,
}

impl std::ops::Deref for PooledTransport {
    type Target = Transport;

    fn deref(&self) -> &Self::Target {
        self.transport
            .as_ref()
            .expect("pooled transport is present until dropped")
    }
}

impl Drop for PooledTransport {
    fn drop(&mut self) {
        if let Some(transport) = self.transport.take() {
            self.pool.release(transport);
        }
    }
}

impl TransportPool {
    /// Create an empty pool keeping at most `max_idle` idle transports
    pub fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(HashMap::new()),
            max_idle,
            next_id: AtomicU64::new(1),
            stats: RwLock::new(PoolStats::default()),
        }
    }

    /// Check out a transport routed through `proxy` with `redirect` installed
    ///
    /// Reuses an idle transport built for the same route when one is
    /// available, otherwise builds a new one. The redirect slot is overwritten
    /// regardless of what the previous user installed.
    pub fn checkout(
        self: &Arc<Self>,
        redirect: RedirectPolicy,
        proxy: Option<Url>,
    ) -> Result<PooledTransport> {
        let reused = self
            .idle
            .lock()
            .get_mut(&proxy)
            .and_then(|transports| transports.pop());
        let transport = match reused {
            Some(transport) => transport,
            None => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let transport = Transport::build(id, proxy)?;
                self.stats.write().created += 1;
                debug!(transport = id, proxy = ?transport.proxy(), "Created transport");
                transport
            }
        };

        transport.set_redirect_policy(redirect);

        {
            let mut stats = self.stats.write();
            stats.checkouts += 1;
            stats.in_use += 1;
            if stats.in_use > stats.peak_in_use {
                stats.peak_in_use = stats.in_use;
            }
        }

        Ok(PooledTransport {
            transport: Some(transport),
            pool: Arc::clone(self),
        })
    }

    fn release(&self, transport: Transport) {
        let kept = {
            let mut idle = self.idle.lock();
            if idle.values().map(Vec::len).sum::<usize>() < self.max_idle {
                idle.entry(transport.proxy.clone()).or_default().push(transport);
                true
            } else {
                false
            }
        };

        let mut stats = self.stats.write();
        stats.in_use = stats.in_use.saturating_sub(1);
        if kept {
            stats.returned += 1;
        } else {
            stats.discarded += 1;
        }
    }

    /// Snapshot of the pool statistics
    pub fn stats(&self) -> PoolStats {
        let mut stats = self.stats.read().clone();
        stats.idle = self.idle_count() as u64;
        stats
    }

    /// Number of idle transports across all routes
    pub fn idle_count(&self) -> usize {
        self.idle.lock().values().map(Vec::len).sum()
    }

    /// Idle bound
    pub fn max_idle(&self) -> usize {
        self.max_idle
    }
}

/// Proxy for `target` taken from the environment.
///
/// `HTTPS_PROXY` applies to https targets and `HTTP_PROXY` to http targets,
/// upper case first. Loopback hosts and hosts matched by `NO_PROXY` are never
/// proxied. Inside a CGI process (`REQUEST_METHOD` set) http targets are never
/// proxied, since a client controlled `Proxy:` header shows up as `HTTP_PROXY`.
pub fn env_proxy(target: &Url) -> Option<Url> {
    proxy_from(target, |key| std::env::var(key).ok())
}

fn proxy_from<F>(target: &Url, lookup: F) -> Option<Url>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |keys: &[&str]| {
        keys.iter()
            .filter_map(|&key| lookup(key))
            .find(|value| !value.trim().is_empty())
    };

    let host = target.host_str()?;
    if is_loopback(host) {
        return None;
    }

    let raw = match target.scheme() {
        "https" => var(&["HTTPS_PROXY", "https_proxy"])?,
        "http" => {
            let raw = var(&["HTTP_PROXY", "http_proxy"])?;
            if var(&["REQUEST_METHOD"]).is_some() {
                warn!(proxy = %raw, "Refusing HTTP_PROXY inside a CGI environment");
                return None;
            }
            raw
        }
        _ => return None,
    };

    let no_proxy = var(&["NO_PROXY", "no_proxy"]).unwrap_or_default();
    if bypasses_proxy(host, &no_proxy) {
        return None;
    }

    parse_proxy_url(&raw)
}

fn parse_proxy_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    let parsed = match Url::parse(raw) {
        Ok(url) if url.has_host() => Ok(url),
        _ => Url::parse(&format!("http://{}", raw)),
    };

    match parsed {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(proxy = raw, error = %e, "Ignoring invalid proxy from environment");
            None
        }
    }
}

fn is_loopback(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

/// Match `host` against a comma separated `NO_PROXY` list
fn bypasses_proxy(host: &str, no_proxy: &str) -> bool {
    let host = host.to_ascii_lowercase();
    no_proxy
        .split(',')
        .map(|entry| entry.trim().to_ascii_lowercase())
        .filter(|entry| !entry.is_empty())
        .any(|entry| {
            if entry == "*" {
                return true;
            }
            let entry = strip_port(&entry);
            let domain = entry.trim_start_matches("*.").trim_start_matches('.');
            host == domain || host.ends_with(&format!(".{}", domain))
        })
}

fn strip_port(entry: &str) -> &str {
    if entry.starts_with('[') {
        return entry
            .split_once(']')
            .map(|(ip, _)| ip.trim_start_matches('['))
            .unwrap_or(entry);
    }
    match entry.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            host
        }
        _ => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_and_return() {
        let pool = Arc::new(TransportPool::new(4));

        let first = pool.checkout(RedirectPolicy::new(3), None).unwrap();
        let first_id = first.id();
        assert_eq!(first.redirect_policy().max_redirects(), 3);
        assert_eq!(pool.stats().in_use, 1);
        drop(first);

        let stats = pool.stats();
        assert_eq!(stats.in_use, 0);
        assert_eq!(stats.returned, 1);
        assert_eq!(stats.idle, 1);

        let second = pool.checkout(RedirectPolicy::none(), None).unwrap();
        assert_eq!(second.id(), first_id);
        assert_eq!(second.redirect_policy(), RedirectPolicy::none());
        assert!(second.proxy().is_none());
        drop(second);

        let third = pool.checkout(RedirectPolicy::default(), None).unwrap();
        assert_eq!(third.id(), first_id);
        assert_eq!(third.redirect_policy(), RedirectPolicy::default());
        assert_eq!(pool.stats().created, 1);
    }

    #[test]
    fn test_transports_keep_their_route() {
        let pool = Arc::new(TransportPool::new(4));
        let proxy = Url::parse("http://127.0.0.1:8888").unwrap();

        let proxied = pool.checkout(RedirectPolicy::default(), Some(proxy.clone())).unwrap();
        let proxied_id = proxied.id();
        assert_eq!(proxied.proxy(), Some(&proxy));
        drop(proxied);

        // An idle proxied transport is never handed to a direct call
        let direct = pool.checkout(RedirectPolicy::default(), None).unwrap();
        assert_ne!(direct.id(), proxied_id);
        assert!(direct.proxy().is_none());
        drop(direct);

        let other = Url::parse("http://127.0.0.1:9999").unwrap();
        let elsewhere = pool.checkout(RedirectPolicy::default(), Some(other)).unwrap();
        assert_ne!(elsewhere.id(), proxied_id);
        drop(elsewhere);

        let again = pool.checkout(RedirectPolicy::new(1), Some(proxy)).unwrap();
        assert_eq!(again.id(), proxied_id);
        assert_eq!(again.redirect_policy().max_redirects(), 1);

        let stats = pool.stats();
        assert_eq!(stats.created, 3);
        assert_eq!(stats.idle, 2);
    }

    #[test]
    fn test_concurrent_checkouts_are_exclusive() {
        let pool = Arc::new(TransportPool::new(4));

        let a = pool.checkout(RedirectPolicy::new(2), None).unwrap();
        let b = pool.checkout(RedirectPolicy::new(7), None).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.redirect_policy().max_redirects(), 2);
        assert_eq!(b.redirect_policy().max_redirects(), 7);

        let stats = pool.stats();
        assert_eq!(stats.created, 2);
        assert_eq!(stats.in_use, 2);
        assert_eq!(stats.peak_in_use, 2);
    }

    #[test]
    fn test_idle_bound() {
        let pool = Arc::new(TransportPool::new(1));

        let a = pool.checkout(RedirectPolicy::default(), None).unwrap();
        let b = pool.checkout(RedirectPolicy::default(), None).unwrap();
        drop(a);
        drop(b);

        let stats = pool.stats();
        assert_eq!(stats.returned, 1);
        assert_eq!(stats.discarded, 1);
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_loopback_never_proxied() {
        assert!(is_loopback("localhost"));
        assert!(is_loopback("127.0.0.1"));
        assert!(is_loopback("[::1]"));
        assert!(!is_loopback("example.com"));

        let target = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert!(env_proxy(&target).is_none());
    }

    #[test]
    fn test_proxy_from_environment() {
        let env = |vars: &'static [(&'static str, &'static str)]| {
            move |key: &str| {
                vars.iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| value.to_string())
            }
        };
        let http = Url::parse("http://api.example.com/").unwrap();
        let https = Url::parse("https://api.example.com/").unwrap();

        let vars = env(&[
            ("HTTP_PROXY", "http://plain.proxy:3128"),
            ("https_proxy", "secure.proxy:3129"),
        ]);
        assert_eq!(
            proxy_from(&http, &vars).unwrap().as_str(),
            "http://plain.proxy:3128/"
        );
        assert_eq!(
            proxy_from(&https, &vars).unwrap().as_str(),
            "http://secure.proxy:3129/"
        );

        let bypass = env(&[("HTTP_PROXY", "plain.proxy:3128"), ("NO_PROXY", "example.com")]);
        assert!(proxy_from(&http, bypass).is_none());

        let blank = env(&[("HTTPS_PROXY", "  ")]);
        assert!(proxy_from(&https, blank).is_none());
    }

    #[test]
    fn test_http_proxy_ignored_under_cgi() {
        let cgi = |key: &str| match key {
            "REQUEST_METHOD" => Some("GET".to_string()),
            "HTTP_PROXY" => Some("http://attacker.example:8080".to_string()),
            "HTTPS_PROXY" => Some("http://secure.proxy:3129".to_string()),
            _ => None,
        };

        let http = Url::parse("http://api.example.com/").unwrap();
        assert!(proxy_from(&http, cgi).is_none());

        let https = Url::parse("https://api.example.com/").unwrap();
        assert_eq!(
            proxy_from(&https, cgi).unwrap().as_str(),
            "http://secure.proxy:3129/"
        );
    }

    #[test]
    fn test_no_proxy_matching() {
        assert!(bypasses_proxy("api.example.com", "example.com"));
        assert!(bypasses_proxy("api.example.com", ".example.com"));
        assert!(bypasses_proxy("example.com", "other.org, example.com:443"));
        assert!(bypasses_proxy("anything", "*"));
        assert!(!bypasses_proxy("notexample.com", "example.com"));
        assert!(!bypasses_proxy("example.com", ""));
    }

    #[test]
    fn test_parse_proxy_url() {
        assert_eq!(
            parse_proxy_url("proxy.local:3128").unwrap().as_str(),
            "http://proxy.local:3128/"
        );
        assert_eq!(
            parse_proxy_url("socks5://10.0.0.1:1080").unwrap().scheme(),
            "socks5"
        );
    }
}
