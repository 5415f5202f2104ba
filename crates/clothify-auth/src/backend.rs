//! Credential backends: the hosted auth service and an in-process store.

use crate::password::{normalize_email, PasswordHasher};
use crate::session::{current_timestamp, Credentials};
use crate::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use clothify_commerce::UserId;
use clothify_data::{DbError, Request, Response, Transport};
use dashmap::DashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Failed sign-ins before an account is locked.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;
/// How long a locked account stays locked.
pub const LOCKOUT_SECS: i64 = 15 * 60;
/// Access token lifetime issued by [`MemoryAuth`].
pub const MEMORY_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Verifies credentials and issues tokens.
pub trait AuthBackend: Send + Sync {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Credentials, AuthError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<Credentials, AuthError>;

    fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}

impl<B: AuthBackend + ?Sized> AuthBackend for Box<B> {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Credentials, AuthError> {
        (**self).sign_up(email, password, full_name)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Credentials, AuthError> {
        (**self).sign_in(email, password)
    }

    fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        (**self).sign_out(access_token)
    }
}

/// Stored credentials for [`MemoryAuth`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredentials {
    pub user_id: UserId,
    pub email: String,
    pub password_hash: String,
    /// Number of failed sign-in attempts since the last success.
    pub failed_attempts: i32,
    /// Unix timestamp until which the account is locked.
    pub locked_until: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserCredentials {
    pub fn new(user_id: UserId, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = current_timestamp();
        Self {
            user_id,
            email: email.into(),
            password_hash: password_hash.into(),
            failed_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Seconds left on a lock, if locked.
    pub fn lock_remaining(&self) -> Option<i64> {
        let remaining = self.locked_until? - current_timestamp();
        (remaining > 0).then_some(remaining)
    }

    /// Record a failed sign-in; returns whether the account is now locked.
    pub fn record_failed_attempt(&mut self, max_attempts: i32, lock_duration_secs: i64) -> bool {
        self.failed_attempts += 1;
        self.updated_at = current_timestamp();
        if self.failed_attempts >= max_attempts {
            self.locked_until = Some(self.updated_at + lock_duration_secs);
            return true;
        }
        false
    }

    pub fn reset_failed_attempts(&mut self) {
        self.failed_attempts = 0;
        self.locked_until = None;
        self.updated_at = current_timestamp();
    }
}

/// In-process credential store with argon2 hashes and account lockout.
#[derive(Default)]
pub struct MemoryAuth {
    hasher: PasswordHasher,
    users: DashMap<String, UserCredentials>,
    tokens: DashMap<String, UserId>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hasher(hasher: PasswordHasher) -> Self {
        Self {
            hasher,
            ..Self::default()
        }
    }

    /// Number of live access tokens.
    pub fn active_tokens(&self) -> usize {
        self.tokens.len()
    }

    fn issue(&self, user: &UserCredentials) -> Credentials {
        let bytes: [u8; 32] = rand::thread_rng().gen();
        let token = URL_SAFE_NO_PAD.encode(bytes);
        self.tokens.insert(token.clone(), user.user_id.clone());
        Credentials {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            access_token: token,
            refresh_token: None,
            expires_in: MEMORY_TOKEN_TTL_SECS,
        }
    }
}

impl AuthBackend for MemoryAuth {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        _full_name: Option<&str>,
    ) -> Result<Credentials, AuthError> {
        let email = normalize_email(email)?;
        PasswordHasher::validate_password(password)?;
        if self.users.contains_key(&email) {
            return Err(AuthError::UserAlreadyExists(email));
        }

        let hash = self.hasher.hash(password)?;
        let record = UserCredentials::new(UserId::generate(), email.clone(), hash);
        let credentials = self.issue(&record);
        self.users.insert(email, record);
        Ok(credentials)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Credentials, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let mut record = self
            .users
            .get_mut(&email)
            .ok_or(AuthError::InvalidCredentials)?;

        if let Some(remaining_secs) = record.lock_remaining() {
            return Err(AuthError::AccountLocked { remaining_secs });
        }

        if !self.hasher.verify(password, &record.password_hash)? {
            if record.record_failed_attempt(MAX_FAILED_ATTEMPTS, LOCKOUT_SECS) {
                tracing::warn!(email = %email, "account locked after repeated failed sign-ins");
            }
            return Err(AuthError::InvalidCredentials);
        }

        record.reset_failed_attempts();
        Ok(self.issue(&record))
    }

    fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.tokens.remove(access_token);
        Ok(())
    }
}

/// Client for the hosted service's `/auth/v1` endpoints.
pub struct RestAuth<T: Transport> {
    base_url: String,
    api_key: String,
    transport: T,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: i64,
    user: Option<AuthUser>,
    // Sign-up without an active session returns the user at the top level.
    id: Option<UserId>,
}

#[derive(Deserialize)]
struct AuthUser {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

impl<T: Transport> RestAuth<T> {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            transport,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn post(&self, path: &str, body: &serde_json::Value) -> Result<Response, AuthError> {
        let request = Request::post(self.endpoint(path))
            .header("apikey", self.api_key.clone())
            .json(body)?;
        Ok(self.transport.send(&request)?)
    }

    fn credentials(response: Response, email: &str) -> Result<Credentials, AuthError> {
        let body: TokenResponse = response.json()?;
        let Some(access_token) = body.access_token else {
            if body.id.is_some() || body.user.is_some() {
                return Err(AuthError::EmailNotConfirmed);
            }
            return Err(AuthError::Database(DbError::Parse(
                "auth response without access token".to_string(),
            )));
        };
        let user = body
            .user
            .ok_or_else(|| DbError::Parse("auth response without user".to_string()))?;
        Ok(Credentials {
            user_id: user.id,
            email: user.email.unwrap_or_else(|| email.to_string()),
            access_token,
            refresh_token: body.refresh_token,
            expires_in: body.expires_in,
        })
    }
}

impl<T: Transport> AuthBackend for RestAuth<T> {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Credentials, AuthError> {
        let email = normalize_email(email)?;
        PasswordHasher::validate_password(password)?;

        let body = json!({
            "email": email,
            "password": password,
            "data": { "full_name": full_name },
        });
        let response = self.post("signup", &body)?;
        if response.status == 422 || response.status == 400 {
            let message = response.text().unwrap_or_default();
            if message.contains("already registered") || message.contains("already exists") {
                return Err(AuthError::UserAlreadyExists(email));
            }
        }
        Self::credentials(response.error_for_status()?, &email)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Credentials, AuthError> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let body = json!({ "email": email, "password": password });
        let response = self.post("token?grant_type=password", &body)?;
        match response.status {
            400 | 401 => {
                let message = response.text().unwrap_or_default();
                if message.contains("not confirmed") {
                    return Err(AuthError::EmailNotConfirmed);
                }
                Err(AuthError::InvalidCredentials)
            }
            _ => Self::credentials(response.error_for_status()?, &email),
        }
    }

    fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let request = Request::post(self.endpoint("logout"))
            .header("apikey", self.api_key.clone())
            .bearer_auth(access_token);
        self.transport.send(&request)?.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn memory() -> MemoryAuth {
        MemoryAuth::with_hasher(PasswordHasher::with_cost(1024, 1).unwrap())
    }

    #[test]
    fn test_memory_sign_up_and_in() {
        let auth = memory();
        let created = auth.sign_up("Ana@Example.com", "SecurePass1", None).unwrap();
        assert_eq!(created.email, "ana@example.com");

        let signed_in = auth.sign_in("ana@example.com", "SecurePass1").unwrap();
        assert_eq!(signed_in.user_id, created.user_id);
        assert_ne!(signed_in.access_token, created.access_token);
        assert_eq!(auth.active_tokens(), 2);

        auth.sign_out(&signed_in.access_token).unwrap();
        assert_eq!(auth.active_tokens(), 1);
    }

    #[test]
    fn test_memory_rejects_duplicates_and_weak_passwords() {
        let auth = memory();
        auth.sign_up("ana@example.com", "SecurePass1", None).unwrap();
        assert!(matches!(
            auth.sign_up("ANA@example.com", "SecurePass1", None),
            Err(AuthError::UserAlreadyExists(_))
        ));
        assert!(matches!(
            auth.sign_up("bo@example.com", "weak", None),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_unknown_user_is_invalid_credentials() {
        let auth = memory();
        assert!(matches!(
            auth.sign_in("ghost@example.com", "SecurePass1"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_lockout_after_repeated_failures() {
        let auth = memory();
        auth.sign_up("ana@example.com", "SecurePass1", None).unwrap();
        for _ in 0..MAX_FAILED_ATTEMPTS {
            assert!(matches!(
                auth.sign_in("ana@example.com", "WrongPass1"),
                Err(AuthError::InvalidCredentials)
            ));
        }
        match auth.sign_in("ana@example.com", "SecurePass1") {
            Err(AuthError::AccountLocked { remaining_secs }) => {
                assert!(remaining_secs > 0 && remaining_secs <= LOCKOUT_SECS)
            }
            other => panic!("expected lockout, got {:?}", other.map(|c| c.email)),
        }
    }

    #[test]
    fn test_success_resets_failures() {
        let auth = memory();
        auth.sign_up("ana@example.com", "SecurePass1", None).unwrap();
        for _ in 0..MAX_FAILED_ATTEMPTS - 1 {
            let _ = auth.sign_in("ana@example.com", "WrongPass1");
        }
        auth.sign_in("ana@example.com", "SecurePass1").unwrap();
        let _ = auth.sign_in("ana@example.com", "WrongPass1");
        assert!(auth.sign_in("ana@example.com", "SecurePass1").is_ok());
    }

    struct Canned {
        sent: Mutex<Vec<Request>>,
        reply: Response,
    }

    impl Transport for Canned {
        fn send(&self, request: &Request) -> Result<Response, DbError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    fn rest(reply: Response) -> RestAuth<Canned> {
        RestAuth::new(
            "https://db.example.com/",
            "anon",
            Canned {
                sent: Mutex::new(Vec::new()),
                reply,
            },
        )
    }

    #[test]
    fn test_rest_sign_in() {
        let auth = rest(Response::json_body(
            200,
            &json!({
                "access_token": "jwt",
                "refresh_token": "r",
                "expires_in": 3600,
                "user": {"id": "u-1", "email": "ana@example.com"}
            }),
        ));
        let creds = auth.sign_in("Ana@example.com", "SecurePass1").unwrap();
        assert_eq!(creds.user_id, UserId::new("u-1"));
        assert_eq!(creds.access_token, "jwt");
        assert_eq!(creds.expires_in, 3600);

        let sent = auth.transport.sent.lock().unwrap();
        assert_eq!(
            sent[0].url,
            "https://db.example.com/auth/v1/token?grant_type=password"
        );
        assert_eq!(sent[0].header_value("apikey"), Some("anon"));
    }

    #[test]
    fn test_rest_bad_password() {
        let auth = rest(Response::json_body(
            400,
            &json!({"error": "invalid_grant", "error_description": "Invalid login credentials"}),
        ));
        assert!(matches!(
            auth.sign_in("ana@example.com", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_rest_sign_up_needing_confirmation() {
        let auth = rest(Response::json_body(200, &json!({"id": "u-2", "email": "bo@example.com"})));
        assert!(matches!(
            auth.sign_up("bo@example.com", "SecurePass1", Some("Bo")),
            Err(AuthError::EmailNotConfirmed)
        ));
    }

    #[test]
    fn test_rest_duplicate_sign_up() {
        let auth = rest(Response::json_body(422, &json!({"msg": "User already registered"})));
        assert!(matches!(
            auth.sign_up("bo@example.com", "SecurePass1", None),
            Err(AuthError::UserAlreadyExists(_))
        ));
    }
}
