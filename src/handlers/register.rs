use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::metrics::{
    HONEYPOT_HITS, RATE_LIMITED_TOTAL, REGISTRATIONS_TOTAL, REQUEST_TOTAL,
};
use crate::models::{RegistrationRequest, RegistrationResponse};
use crate::recaptcha::{self, TrustVerdict};
use crate::state::AppState;
use crate::{sanitize, sheets, telegram, templates};

// POST /api/register
//
// rate limit -> honeypot -> trust score -> validation -> sanitization ->
// concurrent dispatch to the bot notification and the sheet. Dispatch
// failures stay server-side: once validation passed, the registrant
// always gets a success.
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<RegistrationRequest>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    REQUEST_TOTAL.inc();

    let client_key = client_key(&headers);
    if !state.rate_limiter.admit(&client_key) {
        RATE_LIMITED_TOTAL.inc();
        return Err(ApiError::RateLimited);
    }

    // Honeypot: the field is hidden on the page, so a value means a bot.
    // Answer exactly like a genuine success so the submitter can't tell
    // it was caught; the token below is never dispatched anywhere.
    if form.website.as_deref().is_some_and(|w| !w.is_empty()) {
        HONEYPOT_HITS.inc();
        info!(key = %client_key, "honeypot field filled, dropping submission");
        return Ok(Json(success_response(&state, &new_token())));
    }

    match recaptcha::verify(
        &state.client,
        &state.config.recaptcha_api_base,
        state.config.recaptcha_secret.as_deref(),
        form.recaptcha_token.as_deref(),
    )
    .await
    {
        TrustVerdict::Rejected(score) => {
            info!(key = %client_key, score, "trust score below threshold, rejecting");
            return Err(ApiError::LowTrustScore);
        }
        TrustVerdict::Trusted | TrustVerdict::Unscored => {}
    }

    let record = sanitize::validate(&form).map_err(ApiError::Validation)?;

    let token = new_token();

    // both sinks fire together; the relative order of completion is
    // irrelevant and neither failure reaches the registrant
    let notify = async {
        telegram::send_message(
            &state.client,
            &state.config.telegram_api_base,
            &state.config.bot_token,
            &state.config.admin_chat_id,
            &templates::registration_notification(&record),
        )
        .await
        .log("telegram");
    };
    let sheet = async {
        match state.config.sheet_url.as_deref() {
            Some(url) => {
                sheets::append_registration(&state.client, url, &token, &record)
                    .await
                    .log("sheet");
            }
            None => warn!("GOOGLE_SHEET_URL not configured, skipping sheet append"),
        }
    };
    tokio::join!(notify, sheet);

    REGISTRATIONS_TOTAL.inc();
    info!(key = %client_key, "registration dispatched");
    Ok(Json(success_response(&state, &token)))
}

// Deep-link token embedded in the t.me start URL and used by the sheet
// to correlate the web form with the later bot conversation.
fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn success_response(state: &AppState, token: &str) -> RegistrationResponse {
    RegistrationResponse {
        success: true,
        redirect_url: state
            .config
            .bot_username
            .as_deref()
            .map(|bot| format!("https://t.me/{bot}?start={token}")),
    }
}

// First x-forwarded-for hop; requests without the header share one bucket.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
