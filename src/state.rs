use crate::config::Config;
use crate::rate_limit::RateLimiter;

// app's shared state
pub struct AppState {
    pub client: reqwest::Client,
    pub config: Config,
    pub rate_limiter: RateLimiter,
}
