//! The auth service: backend, profiles, permissions and the local session.

use crate::session::{AuthSession, StoredAuth};
use crate::{AuthBackend, AuthError, Permission, PermissionTable, Portal, Role, User};
use clothify_cache::{Cache, Session, SessionId};
use clothify_data::{Database, DatabaseExt, Query};
use std::sync::Arc;

/// Database table holding user profiles (`id`, `email`, `full_name`, `role`).
pub const PROFILES_TABLE: &str = "profiles";

/// Slot in the local session store holding the signed-in user.
const LOCAL_SESSION: &str = "current";

/// Owns sign-in state for one device.
pub struct AuthService<B: AuthBackend> {
    backend: B,
    db: Arc<dyn Database>,
    permissions: PermissionTable,
    sessions: Session<StoredAuth>,
    current: Option<AuthSession>,
}

impl<B: AuthBackend> AuthService<B> {
    /// Sessions are kept in `cache` under the `auth` namespace.
    pub fn new(backend: B, db: Arc<dyn Database>, cache: &Cache) -> Self {
        Self {
            backend,
            db,
            permissions: PermissionTable::default(),
            sessions: Session::new(cache.namespaced("auth")),
            current: None,
        }
    }

    pub fn with_permissions(mut self, permissions: PermissionTable) -> Self {
        self.permissions = permissions;
        self
    }

    /// Reload the permission table from the database. On failure the
    /// current table is kept.
    pub fn load_permissions(&mut self) {
        match PermissionTable::load(self.db.as_ref()) {
            Ok(table) => self.permissions = table,
            Err(e) => tracing::warn!(error = %e, "keeping default role permissions"),
        }
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    fn slot() -> SessionId {
        SessionId::new(LOCAL_SESSION)
    }

    /// Pick up the session saved by a previous run. Expired sessions are
    /// dropped.
    pub fn restore(&mut self) -> Result<Option<&User>, AuthError> {
        let stored = self.sessions.get(&Self::slot())?.unwrap_or_default();
        match stored.session {
            Some(session) if session.is_expired() => {
                tracing::info!(user = %session.user.id, "stored session expired");
                self.clear_local()?;
            }
            Some(session) => {
                self.db.set_access_token(Some(session.access_token.clone()));
                self.current = Some(session);
            }
            None => self.current = None,
        }
        Ok(self.current_user())
    }

    /// Create an account and sign it in. Only customer and vendor accounts
    /// can sign themselves up.
    pub fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        role: Role,
    ) -> Result<&User, AuthError> {
        if role == Role::Admin {
            return Err(AuthError::RoleNotAllowed(role));
        }
        let credentials = self.backend.sign_up(email, password, full_name)?;
        self.db.set_access_token(Some(credentials.access_token.clone()));

        let mut user = User::new(credentials.user_id.clone(), credentials.email.clone(), role);
        user.full_name = full_name.map(str::to_string);
        let user: User = self.db.insert_as(PROFILES_TABLE, &user)?;

        tracing::info!(user = %user.id, role = %user.role, "signed up");
        self.establish(AuthSession::new(user, credentials))
    }

    /// Sign in through the storefront.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<&User, AuthError> {
        let credentials = self.backend.sign_in(email, password)?;
        self.db.set_access_token(Some(credentials.access_token.clone()));

        let query = Query::table(PROFILES_TABLE).eq("id", credentials.user_id.as_str());
        let user = match self.db.find_one::<User>(&query)? {
            Some(user) => user,
            None => {
                tracing::warn!(user = %credentials.user_id, "no profile row, creating customer profile");
                let user = User::new(
                    credentials.user_id.clone(),
                    credentials.email.clone(),
                    Role::Customer,
                );
                self.db.insert_as(PROFILES_TABLE, &user)?
            }
        };

        tracing::info!(user = %user.id, role = %user.role, "signed in");
        self.establish(AuthSession::new(user, credentials))
    }

    /// Sign in through a specific portal. A role that may not use the
    /// portal is signed straight back out.
    pub fn sign_in_to(
        &mut self,
        portal: Portal,
        email: &str,
        password: &str,
    ) -> Result<&User, AuthError> {
        let role = self.sign_in(email, password)?.role;
        if !portal.allows(role) {
            tracing::info!(%portal, %role, "portal sign-in denied");
            self.sign_out()?;
            return Err(AuthError::PortalDenied { portal, role });
        }
        self.current_user().ok_or(AuthError::NotSignedIn)
    }

    /// Sign out locally, telling the backend on a best-effort basis.
    pub fn sign_out(&mut self) -> Result<(), AuthError> {
        if let Some(session) = self.current.take() {
            if let Err(e) = self.backend.sign_out(&session.access_token) {
                tracing::warn!(error = %e, "backend sign-out failed");
            }
            tracing::info!(user = %session.user.id, "signed out");
        }
        self.clear_local()
    }

    /// The signed-in user, unless the session has expired.
    pub fn current_user(&self) -> Option<&User> {
        self.current
            .as_ref()
            .filter(|s| !s.is_expired())
            .map(|s| &s.user)
    }

    pub fn current_session(&self) -> Option<&AuthSession> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }

    /// The signed-in user if their role grants `permission`.
    pub fn require(&self, permission: Permission) -> Result<&User, AuthError> {
        let session = self.current.as_ref().ok_or(AuthError::NotSignedIn)?;
        session.validate()?;
        let user = &session.user;
        if !self.permissions.allows(user.role, permission) {
            return Err(AuthError::InsufficientPermissions {
                role: user.role,
                permission,
            });
        }
        Ok(user)
    }

    fn establish(&mut self, session: AuthSession) -> Result<&User, AuthError> {
        self.sessions.set(
            &Self::slot(),
            &StoredAuth {
                session: Some(session.clone()),
            },
        )?;
        Ok(&self.current.insert(session).user)
    }

    fn clear_local(&mut self) -> Result<(), AuthError> {
        self.current = None;
        self.db.set_access_token(None);
        self.sessions.delete(&Self::slot())?;
        Ok(())
    }
}
