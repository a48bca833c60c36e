//! Short URL entity and its redirect-time state.

use chrono::{DateTime, Utc};

/// State of a link at redirect time.
///
/// Expired and exhausted links are terminal: redirects are denied until an
/// explicit owner update replenishes the click budget or moves the expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlState {
    Active,
    ExpiredByTime,
    ExhaustedByClicks,
}

/// A shortened URL owned by a user.
///
/// `short_token` is the public identifier embedded in the redirect path and
/// is globally unique. `original_url` and `user_id` are immutable after
/// creation.
#[derive(Debug, Clone)]
pub struct ShortUrl {
    pub id: i64,
    pub user_id: i64,
    pub original_url: String,
    pub short_token: String,
    /// Remaining click budget. `None` means unlimited.
    pub max_clicks: Option<i64>,
    /// Expiry timestamp. `None` means the link never expires by time.
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ShortUrl {
    /// Classifies the link's redirect-time state at `now`.
    ///
    /// Expiry is checked before click exhaustion; both produce the same
    /// client-visible outcome (404).
    pub fn state_at(&self, now: DateTime<Utc>) -> UrlState {
        if self.expires_at.is_some_and(|e| now >= e) {
            return UrlState::ExpiredByTime;
        }
        if self.max_clicks.is_some_and(|c| c <= 0) {
            return UrlState::ExhaustedByClicks;
        }
        UrlState::Active
    }

    /// Seconds remaining until expiry, if an expiry is set and in the
    /// future. Rounded up, so a sub-second remainder reports one second
    /// rather than zero.
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> Option<u64> {
        self.expires_at.and_then(|e| {
            let remaining_ms = (e - now).num_milliseconds();
            if remaining_ms > 0 {
                Some((remaining_ms as u64).div_ceil(1000))
            } else {
                None
            }
        })
    }
}

/// Input data for creating a new short URL.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub user_id: i64,
    pub original_url: String,
    pub short_token: String,
    pub max_clicks: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing short URL.
///
/// Only `short_token`, `max_clicks`, and `expires_at` are mutable.
/// `None` fields are left unchanged; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ShortUrlPatch {
    pub short_token: Option<String>,
    pub max_clicks: Option<Option<i64>>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}
