//! SMS delivery via the Twilio REST API.

use crate::notifier::{DeliveryError, Notifier};
use async_trait::async_trait;
use tracing::debug;

/// Twilio credentials and phone numbers.
#[derive(Clone)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub to_number: String,
}

impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("account_sid", &self.account_sid)
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .finish_non_exhaustive()
    }
}

impl SmsConfig {
    /// Read credentials from the environment.
    ///
    /// Uses TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, TWILIO_PHONE_NUMBER and
    /// ALERT_PHONE_NUMBER; returns None unless all four are set and
    /// non-empty.
    pub fn from_env() -> Option<Self> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN").ok()?;
        let from_number = std::env::var("TWILIO_PHONE_NUMBER").ok()?;
        let to_number = std::env::var("ALERT_PHONE_NUMBER").ok()?;

        if account_sid.is_empty()
            || auth_token.is_empty()
            || from_number.is_empty()
            || to_number.is_empty()
        {
            return None;
        }

        Some(Self {
            account_sid,
            auth_token,
            from_number,
            to_number,
        })
    }
}

/// Notifier that delivers alerts as text messages.
pub struct SmsNotifier {
    config: SmsConfig,
    http: reqwest::Client,
}

impl SmsNotifier {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.config.account_sid
        )
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("From", self.config.from_number.as_str()),
                ("To", self.config.to_number.as_str()),
                ("Body", message),
            ])
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to = %self.config.to_number, "sms accepted by provider");
        Ok(())
    }
}
