use serde::Serialize;

use crate::models::{CleanSubmission, SheetLinkResponse, SheetRegistration, SheetTelegramLink};
use crate::telegram::DispatchOutcome;

// Append one registration row keyed by the deep-link token.
pub async fn append_registration(
    client: &reqwest::Client,
    sheet_url: &str,
    token: &str,
    record: &CleanSubmission,
) -> DispatchOutcome {
    let body = SheetRegistration {
        action: "register",
        id: token.to_string(),
        name: record.name.clone(),
        surname: record.surname.clone().unwrap_or_default(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        telegram: record.telegram.clone().unwrap_or_default(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    post_json(client, sheet_url, &body).await
}

// Attach a Telegram identity to the row created at registration time.
// The sheet resolves the token itself and answers with the registrant's
// name when it finds the row, which personalizes the welcome message.
pub async fn link_telegram(
    client: &reqwest::Client,
    sheet_url: &str,
    token: &str,
    telegram_username: &str,
    chat_id: i64,
) -> (DispatchOutcome, Option<String>) {
    let body = SheetTelegramLink {
        action: "update_telegram",
        id: token.to_string(),
        telegram_username: telegram_username.to_string(),
        chat_id: chat_id.to_string(),
    };

    match client.post(sheet_url).json(&body).send().await {
        Ok(res) if res.status().is_success() => {
            let user_name = res
                .json::<SheetLinkResponse>()
                .await
                .ok()
                .and_then(|r| r.user_name);
            (DispatchOutcome::Delivered, user_name)
        }
        Ok(res) => (
            DispatchOutcome::Failed(format!("sheet endpoint returned {}", res.status())),
            None,
        ),
        Err(e) => (DispatchOutcome::Failed(format!("request failed: {e}")), None),
    }
}

async fn post_json<T: Serialize>(
    client: &reqwest::Client,
    url: &str,
    body: &T,
) -> DispatchOutcome {
    match client.post(url).json(body).send().await {
        Ok(res) if res.status().is_success() => DispatchOutcome::Delivered,
        Ok(res) => DispatchOutcome::Failed(format!("sheet endpoint returned {}", res.status())),
        Err(e) => DispatchOutcome::Failed(format!("request failed: {e}")),
    }
}
