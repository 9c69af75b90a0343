use crate::auth;
use crate::cfg;
use crate::core;
use crate::middleware::rate_limit;

pub type ArcContext = std::sync::Arc<Context>;

#[derive(Clone)]
pub struct Context {
    pub db: core::DbContext,
    pub jwt: auth::JwtContext,
    pub settings: cfg::AppSettings,
    pub rate_limiter: rate_limit::RateLimiter,
}

impl Context {
    #[must_use]
    pub fn new(db: core::DbContext, jwt: auth::JwtContext, settings: cfg::AppSettings) -> ArcContext {
        Self {
            db,
            jwt,
            settings,
            rate_limiter: rate_limit::create_rate_limiter(),
        }
        .into()
    }
}
