use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::metrics::{REQUEST_TOTAL, WEBHOOK_UPDATES_TOTAL};
use crate::models::{TelegramMessage, TelegramUpdate};
use crate::state::AppState;
use crate::{sanitize, sheets, telegram, templates};

const START_COMMAND: &str = "/start";
const PAYMENT_KEYWORD: &str = "оплат";

// What one inbound message asks us to do. Checks run in declaration
// order, first match wins; classification is memoryless per update.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    StartWithToken(String),
    Start,
    PaymentIntent,
    FreeText(String),
}

impl MessageKind {
    pub fn classify(text: &str) -> Self {
        if text.starts_with(START_COMMAND) {
            // second whitespace-delimited token is the deep-link payload
            return match text.split_whitespace().nth(1) {
                Some(token) => MessageKind::StartWithToken(token.to_string()),
                None => MessageKind::Start,
            };
        }
        if text.to_lowercase().contains(PAYMENT_KEYWORD) {
            return MessageKind::PaymentIntent;
        }
        MessageKind::FreeText(text.to_string())
    }
}

// POST /api/telegram-webhook
//
// Telegram retries any non-2xx delivery, so every path acks with
// 200 {"ok":true} - including unparseable bodies and dispatch failures.
pub async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<serde_json::Value> {
    REQUEST_TOTAL.inc();

    let update = match serde_json::from_slice::<TelegramUpdate>(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("unparseable webhook body ({e}), acking anyway");
            return ack();
        }
    };

    let Some(message) = update.message else {
        debug!("update without a message, ack only");
        return ack();
    };

    WEBHOOK_UPDATES_TOTAL.inc();
    handle_message(&state, &message).await;
    ack()
}

fn ack() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

async fn handle_message(state: &AppState, message: &TelegramMessage) {
    let chat_id = message.chat.id;
    let text = message.text.as_deref().unwrap_or("");
    let user = message.from.clone().unwrap_or_default();
    let display = templates::display_name(&user);

    match MessageKind::classify(text) {
        MessageKind::StartWithToken(token) => {
            // link the sheet row first so the welcome can greet by name
            let user_name = match state.config.sheet_url.as_deref() {
                Some(url) => {
                    let (outcome, name) =
                        sheets::link_telegram(&state.client, url, &token, &display, chat_id)
                            .await;
                    outcome.log("sheet");
                    name
                }
                None => {
                    warn!("GOOGLE_SHEET_URL not configured, skipping telegram link");
                    None
                }
            };
            send_to(state, chat_id, &templates::welcome(user_name.as_deref())).await;
            send_to_admin(
                state,
                &templates::registration_confirmed(&token, &display, chat_id),
            )
            .await;
        }
        MessageKind::Start => {
            send_to(state, chat_id, templates::onboarding()).await;
        }
        MessageKind::PaymentIntent => {
            send_to(state, chat_id, templates::payment_instructions()).await;
            send_to_admin(state, &templates::payment_alert(&display, chat_id)).await;
        }
        MessageKind::FreeText(text) => {
            let escaped = sanitize::escape_html(&text);
            send_to_admin(
                state,
                &templates::forwarded_message(&display, chat_id, &escaped),
            )
            .await;
            send_to(state, chat_id, templates::auto_reply()).await;
        }
    }
}

async fn send_to(state: &AppState, chat_id: i64, text: &str) {
    telegram::send_message(
        &state.client,
        &state.config.telegram_api_base,
        &state.config.bot_token,
        &chat_id.to_string(),
        text,
    )
    .await
    .log("telegram");
}

async fn send_to_admin(state: &AppState, text: &str) {
    telegram::send_message(
        &state.client,
        &state.config.telegram_api_base,
        &state.config.bot_token,
        &state.config.admin_chat_id,
        text,
    )
    .await
    .log("telegram");
}
