//! HTML message bodies sent through the Bot API. Every dynamic value
//! interpolated here has already been through `sanitize::clean_field`
//! or `sanitize::escape_html`.

use crate::models::{CleanSubmission, TelegramUser};

// "@username", falling back to "first last" when the account has no handle.
pub fn display_name(user: &TelegramUser) -> String {
    match user.username.as_deref() {
        Some(u) if !u.is_empty() => format!("@{u}"),
        _ => {
            let first = user.first_name.as_deref().unwrap_or("");
            let last = user.last_name.as_deref().unwrap_or("");
            format!("{first} {last}").trim().to_string()
        }
    }
}

// Admin notification for a fresh form submission.
pub fn registration_notification(record: &CleanSubmission) -> String {
    let full_name = match record.surname.as_deref() {
        Some(surname) => format!("{} {}", record.name, surname),
        None => record.name.clone(),
    };
    format!(
        "🎯 <b>НОВАЯ РЕГИСТРАЦИЯ</b>\n\n\
         👤 <b>Имя:</b> {full_name}\n\
         📧 <b>Email:</b> {}\n\
         📱 <b>Телефон:</b> {}\n\
         💬 <b>Telegram:</b> {}\n\n\
         ⏰ <b>Время:</b> {}",
        record.email,
        record.phone,
        record.telegram.as_deref().unwrap_or("не указан"),
        chrono::Utc::now().to_rfc3339(),
    )
}

// Welcome after /start with a deep-link token, optionally greeting by the
// name the sheet resolved.
pub fn welcome(user_name: Option<&str>) -> String {
    let greeting = match user_name {
        Some(name) => format!("Привет, {name}! "),
        None => String::new(),
    };
    format!(
        "🎉 <b>Добро пожаловать на Финансовый Краш-тест!</b>\n\n\
         {greeting}Ты успешно зарегистрировался!\n\n\
         📋 <b>Что дальше:</b>\n\
         1. Оплати участие $5\n\
         2. Получи доступ к материалам\n\
         3. Начни свой путь к финансовой свободе!\n\n\
         💳 <b>Для оплаты напиши:</b> \"Хочу оплатить\"\n\n\
         ❓ Есть вопросы? Просто напиши сюда!"
    )
}

// Bare /start without a token - the visitor hasn't registered yet.
pub fn onboarding() -> &'static str {
    "👋 <b>Привет!</b>\n\n\
     Это бот Финансового Краш-теста.\n\n\
     🌐 Чтобы зарегистрироваться, перейди на сайт:\n\
     https://fin-crash.vercel.app\n\n\
     После регистрации ты автоматически получишь доступ к боту!"
}

// Admin notification that a deep-link token was claimed in the bot.
pub fn registration_confirmed(token: &str, display: &str, chat_id: i64) -> String {
    format!(
        "✅ <b>Пользователь подтвердил регистрацию!</b>\n\n\
         🔑 <b>ID:</b> {token}\n\
         👤 <b>Telegram:</b> {display}\n\
         💬 <b>Chat ID:</b> {chat_id}\n\n\
         Можно связаться: <a href=\"tg://user?id={chat_id}\">Написать</a>"
    )
}

pub fn payment_instructions() -> &'static str {
    "💳 <b>Оплата участия в Краш-тесте</b>\n\n\
     Стоимость: <b>$5</b>\n\n\
     📲 <b>Способы оплаты:</b>\n\
     1. Перевод на карту: [номер карты]\n\
     2. PayPal: [email]\n\
     3. Крипто (USDT): [адрес]\n\n\
     После оплаты отправь скриншот сюда, и мы активируем твой доступ!"
}

pub fn payment_alert(display: &str, chat_id: i64) -> String {
    format!(
        "💰 <b>Пользователь хочет оплатить!</b>\n\n\
         👤 <b>Telegram:</b> {display}\n\
         💬 <b>Chat ID:</b> {chat_id}\n\n\
         <a href=\"tg://user?id={chat_id}\">Написать пользователю</a>"
    )
}

// Free text relayed to the admin; `text` arrives pre-escaped.
pub fn forwarded_message(display: &str, chat_id: i64, text: &str) -> String {
    format!(
        "📩 <b>Новое сообщение от пользователя:</b>\n\n\
         👤 {display}\n\
         💬 Chat ID: {chat_id}\n\n\
         📝 <b>Сообщение:</b>\n\
         {text}\n\n\
         <a href=\"tg://user?id={chat_id}\">Ответить</a>"
    )
}

pub fn auto_reply() -> &'static str {
    "✉️ Твоё сообщение получено! Мы скоро ответим."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_username() {
        let user = TelegramUser {
            username: Some("ivan".to_string()),
            first_name: Some("Иван".to_string()),
            last_name: Some("Петров".to_string()),
        };
        assert_eq!(display_name(&user), "@ivan");
    }

    #[test]
    fn display_name_falls_back_to_full_name() {
        let user = TelegramUser {
            username: None,
            first_name: Some("Иван".to_string()),
            last_name: None,
        };
        assert_eq!(display_name(&user), "Иван");
    }

    #[test]
    fn welcome_personalizes_when_name_is_known() {
        assert!(welcome(Some("Иван")).contains("Привет, Иван!"));
        assert!(!welcome(None).contains("Привет,"));
    }

    #[test]
    fn notification_marks_missing_telegram_handle() {
        let record = CleanSubmission {
            name: "Иван".to_string(),
            surname: None,
            email: "ivan@example.com".to_string(),
            phone: "+79123456789".to_string(),
            telegram: None,
        };
        assert!(registration_notification(&record).contains("не указан"));
    }
}
