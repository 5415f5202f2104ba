//! Authentication for Clothify.
//!
//! [`AuthService`] signs users in against an [`AuthBackend`] (the hosted
//! service through [`RestAuth`], or [`MemoryAuth`] offline), keeps their
//! profile in the `profiles` table and remembers the session locally.
//! What each [`Role`] may do is looked up in a [`PermissionTable`].

mod backend;
mod error;
mod password;
mod permissions;
mod service;
mod session;
mod user;

pub use backend::{
    AuthBackend, MemoryAuth, RestAuth, UserCredentials, LOCKOUT_SECS, MAX_FAILED_ATTEMPTS,
};
pub use error::AuthError;
pub use password::{normalize_email, PasswordHasher};
pub use permissions::{Permission, PermissionTable, Portal, RolePermissionRow, ROLE_PERMISSIONS_TABLE};
pub use service::{AuthService, PROFILES_TABLE};
pub use session::{AuthSession, Credentials, StoredAuth};
pub use user::{Role, User};
