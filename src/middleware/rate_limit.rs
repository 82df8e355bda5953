//! Fixed-window request limiter keyed by caller address.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

use crate::errors::AppError;

/// Window table size past which expired entries are swept.
const SWEEP_THRESHOLD: usize = 1024;

struct Window {
    count: u32,
    started: Instant,
}

/// Shared per-caller request counter.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    max_requests: u32,
    window: Duration,
    trust_proxy: bool,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
            trust_proxy: false,
        }
    }

    /// Key callers on the first `X-Forwarded-For` hop. Only safe behind a proxy
    /// that overwrites the header.
    pub fn trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Record a request for `key`. Returns `false` once the window is exhausted.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().await;

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < self.window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.count = 0;
            entry.started = now;
        }

        entry.count = entry.count.saturating_add(1);
        entry.count <= self.max_requests
    }
}

/// Middleware rejecting callers that exceeded their window with 429.
pub async fn rate_limit_layer(limiter: RateLimiter, request: Request, next: Next) -> Response {
    let caller = caller_key(&request, limiter.trust_proxy);

    if !limiter.check(&caller).await {
        tracing::warn!(%caller, "Rate limit exceeded");
        return AppError::TooManyRequests.into_response();
    }

    next.run(request).await
}

/// Identify the caller by peer address, or by the first `X-Forwarded-For`
/// hop when the proxy is trusted.
pub fn caller_key<B>(request: &axum::http::Request<B>, trust_proxy: bool) -> String {
    let forwarded = || {
        request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    trust_proxy
        .then(forwarded)
        .flatten()
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
