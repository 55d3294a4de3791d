//! Login sessions.
//!
//! Each successful login creates its own session, addressed by an opaque
//! token, so any number of users can be signed in at once. A session lasts a
//! fixed time from login; activity does not extend it. Expired sessions are
//! removed when they are next checked and by a periodic sweep.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::commands::auth::{LoginCommand, LoginResult};
use crate::domain::credential_service::CredentialService;
use crate::domain::models::session::{AuthError, Session};

pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 120;

type SessionTable = HashMap<String, Session>;

#[derive(Clone)]
pub struct SessionService {
    credential_service: CredentialService,
    sessions: Arc<Mutex<SessionTable>>,
    timeout: Duration,
}

impl SessionService {
    pub fn new(credential_service: CredentialService, timeout: std::time::Duration) -> Self {
        let timeout = Duration::from_std(timeout)
            .unwrap_or_else(|_| Duration::seconds(DEFAULT_SESSION_TIMEOUT_SECS as i64));
        Self {
            credential_service,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    pub fn with_default_timeout(credential_service: CredentialService) -> Self {
        Self::new(
            credential_service,
            std::time::Duration::from_secs(DEFAULT_SESSION_TIMEOUT_SECS),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, SessionTable>> {
        self.sessions
            .lock()
            .map_err(|_| anyhow::anyhow!("Session table lock poisoned"))
    }

    /// Start a session. Unknown users and wrong passwords fail identically.
    pub async fn login(&self, command: LoginCommand, now: DateTime<Utc>) -> Result<LoginResult> {
        let username = command.username.trim().to_string();
        info!("Login attempt for '{}'", username);

        if !self.credential_service.verify(&username, &command.password).await? {
            warn!("Login failed for '{}'", username);
            return Err(AuthError::InvalidCredentials.into());
        }

        let session = Session::new(username.clone(), now);
        let expires_at = session.expires_at(self.timeout);
        self.lock_sessions()?
            .insert(session.session_id.clone(), session.clone());

        info!("Session started for '{}', expires at {}", username, expires_at.to_rfc3339());
        Ok(LoginResult {
            session,
            expires_at,
            success_message: format!("Hi {}, Successfully login", username),
        })
    }

    /// End a session. Returns whether the token was known.
    pub fn logout(&self, token: &str) -> Result<bool> {
        let removed = self.lock_sessions()?.remove(token);
        match &removed {
            Some(session) => info!("Session ended for '{}'", session.username),
            None => debug!("Logout for unknown session token"),
        }
        Ok(removed.is_some())
    }

    /// Resolve a token to its live session.
    ///
    /// An expired session is dropped on the spot, so the next check with the
    /// same token reports `NotAuthenticated`.
    pub fn check(&self, token: &str, now: DateTime<Utc>) -> Result<Session> {
        let mut sessions = self.lock_sessions()?;
        let session = match sessions.get(token) {
            Some(session) => session.clone(),
            None => return Err(AuthError::NotAuthenticated.into()),
        };

        if session.is_expired(now, self.timeout) {
            sessions.remove(token);
            info!("Session for '{}' expired", session.username);
            return Err(AuthError::SessionExpired.into());
        }
        Ok(session)
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let timeout = self.timeout;
        let mut sessions = self.lock_sessions()?;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, timeout));
        let removed = before - sessions.len();

        if removed > 0 {
            info!("Expired {} session(s)", removed);
        }
        Ok(removed)
    }

    pub fn active_session_count(&self) -> Result<usize> {
        Ok(self.lock_sessions()?.len())
    }
}
