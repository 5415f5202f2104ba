//! Users and roles.

use clothify_commerce::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Vendor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Vendor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "vendor" => Ok(Role::Vendor),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// A signed-in user, as stored in the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: None,
            role,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Full name when set, otherwise the email address.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("Vendor".parse::<Role>(), Ok(Role::Vendor));
        assert_eq!(" admin ".parse::<Role>(), Ok(Role::Admin));
        assert!("super_admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User::new(UserId::new("u1"), "ana@example.com", Role::Customer);
        assert_eq!(user.display_name(), "ana@example.com");
        assert_eq!(user.with_name("Ana").display_name(), "Ana");
    }

    #[test]
    fn test_profile_row_deserializes_with_defaults() {
        let user: User =
            serde_json::from_str(r#"{"id": "u1", "email": "a@b.co", "role": "vendor"}"#).unwrap();
        assert_eq!(user.role, Role::Vendor);
        assert!(user.full_name.is_none());

        let bare: User = serde_json::from_str(r#"{"id": "u2", "email": "c@d.co"}"#).unwrap();
        assert_eq!(bare.role, Role::Customer);
    }
}
