//! Integration tests driving the real axum handlers against a wiremock
//! stand-in for the Telegram Bot API, the sheet endpoint and the
//! reCAPTCHA verifier.
//!
//! Run with: cargo test --test handlers_test

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lead_gateway::config::Config;
use lead_gateway::handlers::{register_handler, webhook_handler};
use lead_gateway::models::RegistrationRequest;
use lead_gateway::rate_limit::RateLimiter;
use lead_gateway::state::AppState;

const BOT_TOKEN: &str = "test-token";
const ADMIN_CHAT: &str = "42";
const SEND_MESSAGE_PATH: &str = "/bottest-token/sendMessage";

fn make_state(server: &MockServer) -> Arc<AppState> {
    Arc::new(AppState {
        client: reqwest::Client::new(),
        rate_limiter: RateLimiter::new(5, Duration::from_secs(60)),
        config: Config {
            bot_token: BOT_TOKEN.to_string(),
            admin_chat_id: ADMIN_CHAT.to_string(),
            sheet_url: Some(format!("{}/sheet", server.uri())),
            recaptcha_secret: None,
            bot_username: Some("crash_test_bot".to_string()),
            telegram_api_base: server.uri(),
            recaptcha_api_base: server.uri(),
        },
    })
}

fn form() -> RegistrationRequest {
    RegistrationRequest {
        name: Some("Иван".to_string()),
        surname: Some("Петров".to_string()),
        email: Some("ivan@example.com".to_string()),
        phone: Some("+7 912 345-67-89".to_string()),
        telegram: Some("@ivan".to_string()),
        ..Default::default()
    }
}

fn telegram_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true }))
}

async fn call_webhook(state: Arc<AppState>, body: serde_json::Value) -> serde_json::Value {
    let Json(response) =
        webhook_handler(State(state), Bytes::from(body.to_string())).await;
    response
}

// ---- registration ----

#[tokio::test]
async fn registration_dispatches_to_both_sinks() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_partial_json(json!({ "chat_id": ADMIN_CHAT })))
        .and(body_string_contains("НОВАЯ РЕГИСТРАЦИЯ"))
        .and(body_string_contains("Иван Петров"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sheet"))
        .and(body_partial_json(
            json!({ "action": "register", "name": "Иван", "email": "ivan@example.com" }),
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let Json(response) = register_handler(State(state), HeaderMap::new(), Json(form()))
        .await
        .unwrap();

    assert!(response.success);
    let url = response.redirect_url.unwrap();
    assert!(
        url.starts_with("https://t.me/crash_test_bot?start="),
        "unexpected redirect: {url}"
    );
}

#[tokio::test]
async fn registration_escapes_markup_before_dispatch() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_string_contains("&lt;b&gt;Иван&lt;/b&gt;"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sheet"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut f = form();
    f.name = Some("<b>Иван</b>".to_string());
    let result = register_handler(State(state), HeaderMap::new(), Json(f)).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn honeypot_answers_like_a_success_without_dispatching() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    let mut f = form();
    f.website = Some("http://spam.example".to_string());

    let Json(response) = register_handler(State(state), HeaderMap::new(), Json(f))
        .await
        .unwrap();

    // same shape as a genuine success, nothing sent anywhere
    assert!(response.success);
    assert!(response.redirect_url.is_some());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_required_field_rejected_before_any_outbound_call() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    let mut f = form();
    f.email = None;

    let err = register_handler(State(state), HeaderMap::new(), Json(f))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn sixth_request_in_window_is_rate_limited() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    // no x-forwarded-for header, so the handler buckets under "unknown"
    for _ in 0..5 {
        assert!(state.rate_limiter.admit("unknown"));
    }

    let err = register_handler(State(state), HeaderMap::new(), Json(form()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn confirmed_low_trust_score_is_rejected() {
    let server = MockServer::start().await;
    let mut state = make_state(&server);
    {
        let state = Arc::get_mut(&mut state).unwrap();
        state.config.recaptcha_secret = Some("secret".to_string());
    }

    Mock::given(method("POST"))
        .and(path("/recaptcha/api/siteverify"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "score": 0.1 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut f = form();
    f.recaptcha_token = Some("tok".to_string());

    let err = register_handler(State(state), HeaderMap::new(), Json(f))
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    // only the verifier was called, no dispatch happened
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_verifier_fails_open() {
    let server = MockServer::start().await;
    let mut state = make_state(&server);
    {
        let state = Arc::get_mut(&mut state).unwrap();
        state.config.recaptcha_secret = Some("secret".to_string());
        // nothing listens here - the verify call errors out
        state.config.recaptcha_api_base = "http://127.0.0.1:9".to_string();
    }

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sheet"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut f = form();
    f.recaptcha_token = Some("tok".to_string());

    let Json(response) = register_handler(State(state), HeaderMap::new(), Json(f))
        .await
        .unwrap();
    assert!(response.success);
}

#[tokio::test]
async fn dispatch_failure_does_not_reach_the_registrant() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sheet"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let Json(response) = register_handler(State(state), HeaderMap::new(), Json(form()))
        .await
        .unwrap();
    assert!(response.success);
}

// ---- webhook ----

#[tokio::test]
async fn start_with_token_links_sheet_and_notifies_both_parties() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    Mock::given(method("POST"))
        .and(path("/sheet"))
        .and(body_partial_json(json!({
            "action": "update_telegram",
            "id": "abc123",
            "telegram_username": "@u",
            "chat_id": "1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user_name": "Иван" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_partial_json(json!({ "chat_id": "1" })))
        .and(body_string_contains("Привет, Иван!"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_partial_json(json!({ "chat_id": ADMIN_CHAT })))
        .and(body_string_contains("abc123"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;

    let response = call_webhook(
        state,
        json!({ "message": {
            "text": "/start abc123",
            "chat": { "id": 1 },
            "from": { "username": "u", "first_name": "U" }
        }}),
    )
    .await;

    assert_eq!(response, json!({ "ok": true }));
}

#[tokio::test]
async fn bare_start_sends_only_the_onboarding_reply() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_partial_json(json!({ "chat_id": "1" })))
        .and(body_string_contains("Чтобы зарегистрироваться"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;

    let response = call_webhook(
        state,
        json!({ "message": {
            "text": "/start",
            "chat": { "id": 1 },
            "from": { "first_name": "U" }
        }}),
    )
    .await;

    assert_eq!(response, json!({ "ok": true }));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn payment_intent_notifies_sender_and_admin() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_partial_json(json!({ "chat_id": "1" })))
        .and(body_string_contains("Способы оплаты"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_partial_json(json!({ "chat_id": ADMIN_CHAT })))
        .and(body_string_contains("хочет оплатить"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;

    let response = call_webhook(
        state,
        json!({ "message": {
            "text": "Хочу оплатить",
            "chat": { "id": 1 },
            "from": { "username": "u" }
        }}),
    )
    .await;

    assert_eq!(response, json!({ "ok": true }));
}

#[tokio::test]
async fn free_text_is_forwarded_and_acknowledged() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_partial_json(json!({ "chat_id": ADMIN_CHAT })))
        .and(body_string_contains("hello"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .and(body_partial_json(json!({ "chat_id": "1" })))
        .and(body_string_contains("сообщение получено"))
        .respond_with(telegram_ok())
        .expect(1)
        .mount(&server)
        .await;

    let response = call_webhook(
        state,
        json!({ "message": {
            "text": "hello",
            "chat": { "id": 1 },
            "from": { "username": "u" }
        }}),
    )
    .await;

    assert_eq!(response, json!({ "ok": true }));
}

#[tokio::test]
async fn update_without_message_acks_with_no_side_effects() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    let response = call_webhook(state, json!({ "update_id": 7 })).await;

    assert_eq!(response, json!({ "ok": true }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unparseable_body_still_acks() {
    let server = MockServer::start().await;
    let state = make_state(&server);

    let Json(response) =
        webhook_handler(State(state), Bytes::from_static(b"not json")).await;

    assert_eq!(response, json!({ "ok": true }));
    assert!(server.received_requests().await.unwrap().is_empty());
}
