//! Signed-in sessions.

use crate::{AuthError, User};
use serde::{Deserialize, Serialize};

/// Tokens returned by an [`AuthBackend`](crate::AuthBackend) on sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: clothify_commerce::UserId,
    pub email: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
}

/// A signed-in user together with their tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp when the session expires.
    pub expires_at: i64,
}

impl AuthSession {
    /// Default session duration: 7 days.
    pub const DEFAULT_DURATION_SECS: i64 = 7 * 24 * 60 * 60;

    pub fn new(user: User, credentials: Credentials) -> Self {
        let now = current_timestamp();
        let lifetime = if credentials.expires_in > 0 {
            credentials.expires_in
        } else {
            Self::DEFAULT_DURATION_SECS
        };
        Self {
            user,
            access_token: credentials.access_token,
            refresh_token: credentials.refresh_token,
            created_at: now,
            expires_at: now + lifetime,
        }
    }

    pub fn is_expired(&self) -> bool {
        current_timestamp() >= self.expires_at
    }

    /// Validate the session, returning error if expired.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.is_expired() {
            Err(AuthError::SessionExpired)
        } else {
            Ok(())
        }
    }

    /// Seconds until expiration, never negative.
    pub fn time_to_expiry(&self) -> i64 {
        (self.expires_at - current_timestamp()).max(0)
    }
}

/// What the local session slot holds between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredAuth {
    pub session: Option<AuthSession>,
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
