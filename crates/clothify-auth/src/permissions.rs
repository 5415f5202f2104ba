//! Role-based permissions and portals.
//!
//! Which role may do what is data, not code: the table starts from
//! [`PermissionTable::default`] and can be replaced by the rows of the
//! `role_permissions` table.

use crate::{AuthError, Role};
use clothify_data::{Database, DatabaseExt, Query};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Name of the database table holding role grants.
pub const ROLE_PERMISSIONS_TABLE: &str = "role_permissions";

/// Something a signed-in user may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    BrowseCatalog,
    PlaceOrder,
    ViewOwnOrders,
    ManageOwnProducts,
    ModerateProducts,
    ManageOrders,
    ManageUsers,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::BrowseCatalog,
        Permission::PlaceOrder,
        Permission::ViewOwnOrders,
        Permission::ManageOwnProducts,
        Permission::ModerateProducts,
        Permission::ManageOrders,
        Permission::ManageUsers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::BrowseCatalog => "browse_catalog",
            Permission::PlaceOrder => "place_order",
            Permission::ViewOwnOrders => "view_own_orders",
            Permission::ManageOwnProducts => "manage_own_products",
            Permission::ModerateProducts => "moderate_products",
            Permission::ManageOrders => "manage_orders",
            Permission::ManageUsers => "manage_users",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s.trim())
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry point a user signs in through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Storefront,
    Vendor,
    Admin,
}

impl Portal {
    /// Whether `role` may sign in through this portal.
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Portal::Storefront => true,
            Portal::Vendor => matches!(role, Role::Vendor | Role::Admin),
            Portal::Admin => role == Role::Admin,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Portal::Storefront => "storefront",
            Portal::Vendor => "vendor dashboard",
            Portal::Admin => "admin dashboard",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A row of the `role_permissions` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RolePermissionRow {
    pub role: String,
    pub permission: String,
}

/// Mapping from role to granted permissions.
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionTable {
    grants: HashMap<Role, BTreeSet<Permission>>,
}

impl Default for PermissionTable {
    fn default() -> Self {
        use Permission::*;

        let customer = [BrowseCatalog, PlaceOrder, ViewOwnOrders];
        let vendor = [BrowseCatalog, PlaceOrder, ViewOwnOrders, ManageOwnProducts];

        let mut grants = HashMap::new();
        grants.insert(Role::Customer, customer.into_iter().collect());
        grants.insert(Role::Vendor, vendor.into_iter().collect());
        grants.insert(Role::Admin, Permission::ALL.into_iter().collect());
        Self { grants }
    }
}

impl PermissionTable {
    /// A table granting nothing.
    pub fn empty() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    /// Build from database rows. Rows naming an unknown role or permission
    /// are skipped.
    pub fn from_rows(rows: &[RolePermissionRow]) -> Self {
        let mut table = Self::empty();
        for row in rows {
            match (row.role.parse::<Role>(), Permission::from_str(&row.permission)) {
                (Ok(role), Some(permission)) => table.grant(role, permission),
                _ => tracing::warn!(
                    role = %row.role,
                    permission = %row.permission,
                    "skipping unknown role permission row"
                ),
            }
        }
        table
    }

    /// Load from the `role_permissions` table, keeping the defaults when
    /// the table is empty.
    pub fn load<D: Database + ?Sized>(db: &D) -> Result<Self, AuthError> {
        let rows: Vec<RolePermissionRow> = db.select_as(&Query::table(ROLE_PERMISSIONS_TABLE))?;
        if rows.is_empty() {
            tracing::debug!("no role permission rows, using defaults");
            return Ok(Self::default());
        }
        Ok(Self::from_rows(&rows))
    }

    pub fn grant(&mut self, role: Role, permission: Permission) {
        self.grants.entry(role).or_default().insert(permission);
    }

    pub fn revoke(&mut self, role: Role, permission: Permission) {
        if let Some(set) = self.grants.get_mut(&role) {
            set.remove(&permission);
        }
    }

    pub fn allows(&self, role: Role, permission: Permission) -> bool {
        self.grants
            .get(&role)
            .map(|set| set.contains(&permission))
            .unwrap_or(false)
    }

    /// Permissions granted to `role`, in declaration order.
    pub fn permissions_for(&self, role: Role) -> Vec<Permission> {
        self.grants
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The table as rows, for seeding `role_permissions`.
    pub fn to_rows(&self) -> Vec<RolePermissionRow> {
        Role::ALL
            .into_iter()
            .flat_map(|role| {
                self.permissions_for(role)
                    .into_iter()
                    .map(move |p| RolePermissionRow {
                        role: role.as_str().to_string(),
                        permission: p.as_str().to_string(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clothify_data::MemoryDb;
    use serde_json::json;

    #[test]
    fn test_default_grants() {
        let table = PermissionTable::default();
        assert!(table.allows(Role::Customer, Permission::PlaceOrder));
        assert!(!table.allows(Role::Customer, Permission::ManageOwnProducts));
        assert!(table.allows(Role::Vendor, Permission::ManageOwnProducts));
        assert!(!table.allows(Role::Vendor, Permission::ModerateProducts));
        for permission in Permission::ALL {
            assert!(table.allows(Role::Admin, permission));
        }
    }

    #[test]
    fn test_portals() {
        assert!(Portal::Storefront.allows(Role::Customer));
        assert!(!Portal::Vendor.allows(Role::Customer));
        assert!(Portal::Vendor.allows(Role::Admin));
        assert!(!Portal::Admin.allows(Role::Vendor));
    }

    #[test]
    fn test_from_rows_skips_unknown() {
        let rows = vec![
            RolePermissionRow {
                role: "vendor".into(),
                permission: "moderate_products".into(),
            },
            RolePermissionRow {
                role: "wizard".into(),
                permission: "place_order".into(),
            },
            RolePermissionRow {
                role: "customer".into(),
                permission: "fly".into(),
            },
        ];
        let table = PermissionTable::from_rows(&rows);
        assert!(table.allows(Role::Vendor, Permission::ModerateProducts));
        assert!(table.permissions_for(Role::Customer).is_empty());
    }

    #[test]
    fn test_load_from_database() {
        let empty = MemoryDb::new();
        assert_eq!(PermissionTable::load(&empty).unwrap(), PermissionTable::default());

        let db = MemoryDb::new().with_table(
            ROLE_PERMISSIONS_TABLE,
            vec![json!({"role": "customer", "permission": "browse_catalog"})],
        );
        let table = PermissionTable::load(&db).unwrap();
        assert!(table.allows(Role::Customer, Permission::BrowseCatalog));
        assert!(!table.allows(Role::Customer, Permission::PlaceOrder));
    }

    #[test]
    fn test_rows_round_trip() {
        let table = PermissionTable::default();
        assert_eq!(PermissionTable::from_rows(&table.to_rows()), table);
    }

    #[test]
    fn test_revoke() {
        let mut table = PermissionTable::default();
        table.revoke(Role::Vendor, Permission::ManageOwnProducts);
        assert!(!table.allows(Role::Vendor, Permission::ManageOwnProducts));
    }
}
