use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{CleanSubmission, RegistrationRequest};

// Hard cap applied to every free-text field after escaping.
const MAX_FIELD_LEN: usize = 500;

// Minimum digit count for a phone to be considered real.
const MIN_PHONE_DIGITS: usize = 6;

lazy_static! {
    // local@domain.tld shape - intentionally simple, the sheet is the
    // source of truth for contact data anyway
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#x27;"];

// Escape the five HTML-reserved characters. Idempotent: an '&' that
// already starts one of the entities we produce is copied verbatim, so
// running an escaped string through again doesn't grow it.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(ch) = rest.chars().next() {
        match ch {
            '&' => {
                if ENTITIES.iter().any(|e| rest.starts_with(e)) {
                    out.push('&');
                } else {
                    out.push_str("&amp;");
                }
            }
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
        rest = &rest[ch.len_utf8()..];
    }
    out
}

// trim, escape, cap - every free-text field goes through this before it
// can reach an HTML-formatted template
pub fn clean_field(raw: &str) -> String {
    escape_html(raw.trim()).chars().take(MAX_FIELD_LEN).collect()
}

// Returns the cleaned record, or the message for the first failing
// required field (checked in order: name, email, phone).
pub fn validate(form: &RegistrationRequest) -> Result<CleanSubmission, String> {
    let name = form.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        return Err("Укажите имя".to_string());
    }

    let email = form.email.as_deref().map(str::trim).unwrap_or("");
    if email.is_empty() || !EMAIL_RE.is_match(email) {
        return Err("Укажите корректный email".to_string());
    }

    let phone = form.phone.as_deref().map(str::trim).unwrap_or("");
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_PHONE_DIGITS {
        return Err("Укажите корректный телефон".to_string());
    }

    let optional = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(clean_field)
    };

    Ok(CleanSubmission {
        name: clean_field(name),
        surname: optional(&form.surname),
        email: clean_field(email),
        phone: clean_field(phone),
        telegram: optional(&form.telegram),
    })
}
