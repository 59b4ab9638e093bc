use tracing::{info, warn};

use crate::models::RecaptchaVerifyResponse;

// Scores below this are treated as a confirmed bot.
const MIN_SCORE: f64 = 0.3;

// Outcome of the anti-abuse check. Only Rejected blocks the submission;
// the verifier is unreliable behind content blockers, so every failure
// mode of the call itself degrades to Unscored and processing continues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrustVerdict {
    Trusted,
    Unscored,
    Rejected(f64),
}

pub async fn verify(
    client: &reqwest::Client,
    api_base: &str,
    secret: Option<&str>,
    token: Option<&str>,
) -> TrustVerdict {
    let Some(secret) = secret else {
        // verification not configured - everyone is trusted
        return TrustVerdict::Trusted;
    };
    let Some(token) = token else {
        info!("no recaptcha token in submission, continuing unscored");
        return TrustVerdict::Unscored;
    };

    let params = [("secret", secret), ("response", token)];
    let result = client
        .post(format!("{api_base}/recaptcha/api/siteverify"))
        .form(&params)
        .send()
        .await;

    let body = match result {
        Ok(res) => res.json::<RecaptchaVerifyResponse>().await,
        Err(e) => {
            warn!("recaptcha verification call failed ({e}), failing open");
            return TrustVerdict::Unscored;
        }
    };

    match body {
        Ok(v) if v.success => {
            let score = v.score.unwrap_or(1.0);
            if score < MIN_SCORE {
                TrustVerdict::Rejected(score)
            } else {
                TrustVerdict::Trusted
            }
        }
        Ok(v) => {
            warn!(
                "recaptcha verification unsuccessful ({:?}), failing open",
                v.error_codes
            );
            TrustVerdict::Unscored
        }
        Err(e) => {
            warn!("recaptcha response parse failed ({e}), failing open");
            TrustVerdict::Unscored
        }
    }
}
