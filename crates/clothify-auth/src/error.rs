//! Authentication errors.

use crate::{Permission, Portal, Role};
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    /// No user is signed in.
    #[error("not signed in")]
    NotSignedIn,

    /// Session expired.
    #[error("session expired")]
    SessionExpired,

    /// The hosted service requires email confirmation before sign-in.
    #[error("email not confirmed")]
    EmailNotConfirmed,

    /// Password too weak.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Email address rejected.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Account locked after repeated failures.
    #[error("account locked for {remaining_secs} more seconds")]
    AccountLocked { remaining_secs: i64 },

    /// The signed-in role lacks a permission.
    #[error("insufficient permissions: {role} may not {permission}")]
    InsufficientPermissions { role: Role, permission: Permission },

    /// The signed-in role may not use a portal.
    #[error("{role} accounts cannot sign in to the {portal}")]
    PortalDenied { portal: Portal, role: Role },

    /// Self sign-up is not offered for the role.
    #[error("cannot sign up as {0}")]
    RoleNotAllowed(Role),

    /// Local storage error.
    #[error("cache error: {0}")]
    Cache(#[from] clothify_cache::CacheError),

    /// Remote database or auth endpoint error.
    #[error("database error: {0}")]
    Database(#[from] clothify_data::DbError),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::NotSignedIn
                | AuthError::SessionExpired
                | AuthError::AccountLocked { .. }
        )
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            AuthError::InsufficientPermissions { .. } | AuthError::PortalDenied { .. }
        )
    }
}
