use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated login, addressed by its token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub session_id: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: String, issued_at: DateTime<Utc>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().simple().to_string(),
            username,
            issued_at,
        }
    }

    pub fn expires_at(&self, timeout: Duration) -> DateTime<Utc> {
        self.issued_at + timeout
    }

    /// Strictly greater than: a session is still valid at exactly `issued_at + timeout`.
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.issued_at > timeout
    }
}

/// Authentication failures. Login never says whether the username or the password was wrong.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("Session expired. Please log in again.")]
    SessionExpired,
    #[error("Please log in to continue.")]
    NotAuthenticated,
}
