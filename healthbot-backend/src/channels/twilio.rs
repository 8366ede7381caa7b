//! Twilio provider integration
//!
//! The dispatch loop depends only on the `AlertSender` seam; the concrete
//! client posts to the Twilio Messages REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Per-send timeout so one unresponsive send cannot stall the cycle.
const SEND_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider rejected message with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound message transport.
#[async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, body: &str, from: &str, to: &str) -> Result<(), ProviderError>;
}

pub struct TwilioSender {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioSender {
    pub fn new(account_sid: String, auth_token: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            account_sid,
            auth_token,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }
}

#[async_trait]
impl AlertSender for TwilioSender {
    async fn send(&self, body: &str, from: &str, to: &str) -> Result<(), ProviderError> {
        let params = [("Body", body), ("From", from), ("To", to)];

        let resp = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
