use anyhow::Context;
use clap::Parser;
use std::env;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "lead-gateway")]
#[command(about = "Registration form and Telegram webhook gateway")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 5)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    // Timeout for outbound calls, in seconds
    #[arg(long, default_value_t = 5)]
    pub request_timeout: u64,
}

// Secrets and endpoint URLs, read from the environment once at startup.
// Bot credentials are mandatory; everything else disables its feature
// when absent. The api_base fields exist so tests can point outbound
// traffic at a mock server.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub admin_chat_id: String,
    pub sheet_url: Option<String>,
    pub recaptcha_secret: Option<String>,
    pub bot_username: Option<String>,
    pub telegram_api_base: String,
    pub recaptcha_api_base: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN is not set")?;
        let admin_chat_id =
            env::var("TELEGRAM_CHAT_ID").context("TELEGRAM_CHAT_ID is not set")?;

        Ok(Self {
            bot_token,
            admin_chat_id,
            sheet_url: env::var("GOOGLE_SHEET_URL").ok(),
            recaptcha_secret: env::var("RECAPTCHA_SECRET_KEY").ok(),
            bot_username: env::var("TELEGRAM_BOT_USERNAME").ok(),
            telegram_api_base: env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            recaptcha_api_base: env::var("RECAPTCHA_API_BASE")
                .unwrap_or_else(|_| "https://www.google.com".to_string()),
        })
    }
}
