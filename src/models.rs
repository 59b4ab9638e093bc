use serde::{Deserialize, Serialize};

// Registration form body as the landing page posts it. Every field is
// optional at the serde level so a missing required field surfaces as a
// validation error, not a deserialization failure.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub telegram: Option<String>,
    // honeypot - hidden on the page, only bots fill it
    pub website: Option<String>,
    #[serde(rename = "recaptchaToken")]
    pub recaptcha_token: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct RegistrationResponse {
    pub success: bool,
    #[serde(rename = "redirectUrl", skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

// Validated and sanitized form record, safe to embed in HTML templates.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanSubmission {
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub phone: String,
    pub telegram: Option<String>,
}

// Telegram webhook update. Only the fields the classifier reads.
#[derive(Deserialize, Debug, Clone)]
pub struct TelegramUpdate {
    pub message: Option<TelegramMessage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    pub text: Option<String>,
    pub from: Option<TelegramUser>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TelegramUser {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// Bot API sendMessage body
#[derive(Serialize, Debug, Clone)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: &'static str,
    pub disable_web_page_preview: bool,
}

// One appended row in the external sheet.
#[derive(Serialize, Debug, Clone)]
pub struct SheetRegistration {
    pub action: &'static str,
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub telegram: String,
    pub timestamp: String,
}

// Update-by-token action: attaches a Telegram identity to an earlier row.
#[derive(Serialize, Debug, Clone)]
pub struct SheetTelegramLink {
    pub action: &'static str,
    pub id: String,
    pub telegram_username: String,
    pub chat_id: String,
}

// The sheet answers the link action with the registrant's name when it
// can resolve the token.
#[derive(Deserialize, Debug, Default)]
pub struct SheetLinkResponse {
    pub user_name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RecaptchaVerifyResponse {
    pub success: bool,
    pub score: Option<f64>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}
