//! Outbound email delivery over an HTTP provider API.

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::domain::email_job::EmailJob;

/// Errors returned by the email provider.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Email send error: {0}")]
    SendError(String),
    #[error("Email service unavailable")]
    ServiceUnavailable,
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Sender posting messages to a Resend-style HTTP API.
pub struct EmailSender {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl EmailSender {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            from,
        }
    }

    /// Delivers one message. A non-2xx provider response is an error; the
    /// worker decides whether to retry.
    pub async fn send(&self, job: &EmailJob) -> Result<(), EmailError> {
        let payload = EmailPayload {
            from: &self.from,
            to: [job.to.as_str()],
            subject: &job.subject,
            text: &job.body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::SendError(format!("Network error: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            debug!(to = %job.to, "email accepted by provider");
            return Ok(());
        }

        if status.is_server_error() {
            return Err(EmailError::ServiceUnavailable);
        }

        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(EmailError::SendError(format!(
            "provider returned {}: {}",
            status, detail
        )))
    }
}
