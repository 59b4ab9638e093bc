use tracing::error;

use crate::metrics::DISPATCH_FAILURES;
use crate::models::SendMessageRequest;

// Outcome of one outbound call. Delivery is best-effort: the registrant
// (and the webhook transport) never see a Failed here, it only feeds
// logs and metrics.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Delivered,
    Failed(String),
}

impl DispatchOutcome {
    pub fn log(&self, sink: &str) {
        if let DispatchOutcome::Failed(reason) = self {
            error!(sink, "dispatch failed: {reason}");
            DISPATCH_FAILURES.with_label_values(&[sink]).inc();
        }
    }
}

// Send one HTML-formatted message through the Bot API. Link previews are
// off because admin templates carry tg://user links.
pub async fn send_message(
    client: &reqwest::Client,
    api_base: &str,
    token: &str,
    chat_id: &str,
    text: &str,
) -> DispatchOutcome {
    let body = SendMessageRequest {
        chat_id: chat_id.to_string(),
        text: text.to_string(),
        parse_mode: "HTML",
        disable_web_page_preview: true,
    };

    let result = client
        .post(format!("{api_base}/bot{token}/sendMessage"))
        .json(&body)
        .send()
        .await;

    match result {
        Ok(res) if res.status().is_success() => DispatchOutcome::Delivered,
        Ok(res) => DispatchOutcome::Failed(format!("telegram api returned {}", res.status())),
        Err(e) => DispatchOutcome::Failed(format!("request failed: {e}")),
    }
}
