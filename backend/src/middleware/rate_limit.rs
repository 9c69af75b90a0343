use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;

use crate::core;

/// Rate limiting entry for tracking requests
#[derive(Clone, Debug)]
pub struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

/// In-memory rate limiter, held by the application context so that each
/// constructed application has its own window state (in production, use Redis)
pub type RateLimiter = Arc<RwLock<HashMap<String, RateLimitEntry>>>;

#[must_use]
pub fn create_rate_limiter() -> RateLimiter {
    Arc::new(RwLock::new(HashMap::new()))
}

// Rate limit: 10 login attempts per minute per IP
const MAX_REQUESTS: u32 = 10;
const WINDOW_DURATION: Duration = Duration::from_secs(60);

/// Rate limiting middleware for the password login endpoint
pub async fn login_rate_limit_middleware(
    State(context): State<core::ArcContext>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Only the credential-guessing surface is limited
    if req.uri().path() != "/auth/login" {
        return Ok(next.run(req).await);
    }

    let client_ip = client_ip_from_headers(req.headers());
    let now = Instant::now();
    let mut limiter = context.rate_limiter.write().await;

    // Clean up expired entries
    limiter.retain(|_, entry| now.duration_since(entry.window_start) <= WINDOW_DURATION);

    let entry = limiter.entry(client_ip.clone()).or_insert_with(|| RateLimitEntry {
        count: 0,
        window_start: now,
    });

    // Reset window if expired
    if now.duration_since(entry.window_start) > WINDOW_DURATION {
        entry.count = 0;
        entry.window_start = now;
    }

    entry.count += 1;

    if entry.count > MAX_REQUESTS {
        tracing::warn!("Login rate limit exceeded for IP: {}", client_ip);
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    drop(limiter); // Release the lock
    Ok(next.run(req).await)
}

/// Extract client IP from request headers (considering proxies)
#[must_use]
pub fn client_ip_from_headers(headers: &axum::http::HeaderMap) -> String {
    // Check common proxy headers first
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(value) = forwarded_for.to_str() {
            if let Some(ip) = value.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            return value.to_string();
        }
    }

    "unknown".to_string()
}
