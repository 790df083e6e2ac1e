//! Notifier: best-effort push notifications through Pushover.
//!
//! Notifications are a side channel: `notify` never fails. Missing credentials
//! turn every call into a no-op, and transport errors are logged and dropped.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PushoverCredentials;

const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";
const REQUEST_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pushover returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Outbound one-way notification sender.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, message: &str);
}

#[derive(Clone)]
pub struct PushoverNotifier {
    client: Client,
    credentials: Option<PushoverCredentials>,
    endpoint: String,
}

impl PushoverNotifier {
    pub fn new(credentials: Option<PushoverCredentials>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            credentials,
            endpoint: PUSHOVER_API_URL.to_string(),
        }
    }

    /// Points the notifier at a different messages endpoint.
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// Posts one message. Returns `Ok(())` without a request when disabled.
    pub async fn send(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let Some(credentials) = &self.credentials else {
            debug!("Pushover credentials absent, dropping notification '{title}'");
            return Ok(());
        };

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("token", credentials.token.as_str()),
                ("user", credentials.user.as_str()),
                ("title", title),
                ("message", message),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Pushover notification '{title}' delivered");
        Ok(())
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, title: &str, message: &str) {
        if let Err(e) = self.send(title, message).await {
            warn!("Pushover notification failed: {e}");
        }
    }
}
