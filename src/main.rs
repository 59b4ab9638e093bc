use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lead_gateway::config::{Args, Config};
use lead_gateway::rate_limit::RateLimiter;
use lead_gateway::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // parse cli arguments, then the env-sourced secrets
    let args = Args::parse();
    let config = Config::from_env()?;

    // one client for every outbound call; timeout counts as a dispatch
    // failure downstream, never as a request failure
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.request_timeout))
        .build()
        .context("failed to build http client")?;

    let state = Arc::new(AppState {
        client,
        rate_limiter: RateLimiter::new(args.rate_limit, Duration::from_secs(args.rate_window)),
        config,
    });

    if state.config.sheet_url.is_none() {
        info!("GOOGLE_SHEET_URL not set, sheet sink disabled");
    }
    if state.config.recaptcha_secret.is_none() {
        info!("RECAPTCHA_SECRET_KEY not set, trust scoring disabled");
    }

    let app = lead_gateway::app(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("gateway running on http://localhost:{}", args.port);
    info!(
        "rate limit: {} requests per {} seconds",
        args.rate_limit, args.rate_window
    );
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
