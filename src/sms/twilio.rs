//! Twilio Messages API implementation

use super::{MessagingService, SentMessage};
use crate::config::{ConfigKey, Credentials};
use crate::error::DispatchError;
use crate::phone::normalize_recipient;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

#[derive(Clone)]
struct TwilioAuth {
    account_sid: String,
    auth_token: String,
    from_number: String,
}

/// Twilio REST client for message creation
pub struct TwilioService {
    client: Client,
    auth: Option<TwilioAuth>,
    base_url: String,
}

impl TwilioService {
    /// `base_url` is the versioned API root, e.g. `https://api.twilio.com/2010-04-01`.
    pub fn new(credentials: &Credentials, base_url: &str) -> Self {
        let auth = match (
            credentials.get(ConfigKey::MessagingAccountId),
            credentials.get(ConfigKey::MessagingAuthToken),
            credentials.get(ConfigKey::MessagingFromNumber),
        ) {
            (Some(sid), Some(token), Some(from)) => Some(TwilioAuth {
                account_sid: sid.to_string(),
                auth_token: token.to_string(),
                from_number: from.to_string(),
            }),
            _ => None,
        };

        Self {
            client: Client::new(),
            auth,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!("{}/Accounts/{account_sid}/Messages.json", self.base_url)
    }

    fn classify_failure(status: StatusCode, body: &str) -> DispatchError {
        let carrier_message = serde_json::from_str::<TwilioErrorResponse>(body)
            .ok()
            .and_then(|resp| resp.message)
            .filter(|m| !m.is_empty());
        tracing::debug!(
            status = %status,
            carrier_message = carrier_message.as_deref().unwrap_or(""),
            "Carrier rejected request"
        );

        match status.as_u16() {
            401 => DispatchError::auth(
                "Invalid Twilio credentials. Please check your Account SID and Auth Token.",
            ),
            400 => DispatchError::bad_request(format!(
                "Twilio Error: {}",
                carrier_message.as_deref().unwrap_or("Invalid request parameters")
            )),
            403 => DispatchError::forbidden("Twilio account suspended or insufficient permissions."),
            _ => DispatchError::provider(format!(
                "Twilio API Error: {}",
                carrier_message.unwrap_or_else(|| format!("HTTP {status}"))
            )),
        }
    }
}

#[async_trait]
impl MessagingService for TwilioService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SentMessage, DispatchError> {
        let auth = self.auth.as_ref().ok_or_else(|| {
            DispatchError::config(
                "Twilio credentials not configured. Please check your environment variables.",
            )
        })?;

        let recipient = normalize_recipient(to)?;

        let response = self
            .client
            .post(self.messages_url(&auth.account_sid))
            .basic_auth(&auth.account_sid, Some(&auth.auth_token))
            .form(&[
                ("From", auth.from_number.as_str()),
                ("To", recipient.as_str()),
                ("Body", body),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() || e.is_request() {
                    tracing::debug!(error = %e, "Carrier transport failure");
                    DispatchError::send_failed("Failed to send SMS. Please try again.")
                } else {
                    DispatchError::provider(format!("Twilio API Error: {e}"))
                }
            })?;

        let status = response.status();
        // A body we cannot read only costs us the sid
        let response_body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Self::classify_failure(status, &response_body));
        }

        let sid = serde_json::from_str::<TwilioMessageResponse>(&response_body)
            .ok()
            .and_then(|resp| resp.sid);

        Ok(SentMessage { sid })
    }

    fn is_configured(&self) -> bool {
        self.auth.is_some()
    }
}

// Twilio API types

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    #[serde(default)]
    sid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorResponse {
    #[serde(default)]
    message: Option<String>,
}
