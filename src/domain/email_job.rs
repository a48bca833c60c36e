//! Email delivery job queued from request handlers.

/// A single outbound email, handed to the background worker over a bounded
/// channel so delivery never blocks the HTTP response.
#[derive(Debug, Clone)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailJob {
    /// Builds the registration verification email for `code`.
    pub fn verification(to: impl Into<String>, code: &str) -> Self {
        Self {
            to: to.into(),
            subject: "Verification email".to_string(),
            body: format!(
                "Your verification code is {code}. It expires in 2 minutes."
            ),
        }
    }
}
