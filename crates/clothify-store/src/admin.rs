//! Admin dashboard: product moderation and order fulfilment.

use crate::forms::rejection_form;
use crate::rows::{self, ORDERS_TABLE, PRODUCTS_TABLE};
use crate::StoreError;
use clothify_auth::{AuthError, Permission, PermissionTable, User};
use clothify_commerce::catalog::{ModerationStatus, Product};
use clothify_commerce::checkout::{Order, OrderStatus};
use clothify_commerce::ids::{OrderId, ProductId};
use clothify_data::{Database, DatabaseExt, Query};

/// Obtained from [`AppState::admin`](crate::AppState::admin), which checks
/// `ModerateProducts`. Order methods additionally check `ManageOrders`.
pub struct AdminPortal<'a> {
    db: &'a dyn Database,
    admin: &'a User,
    permissions: &'a PermissionTable,
}

impl<'a> AdminPortal<'a> {
    pub(crate) fn new(db: &'a dyn Database, admin: &'a User, permissions: &'a PermissionTable) -> Self {
        Self {
            db,
            admin,
            permissions,
        }
    }

    /// Products waiting for a decision, oldest first.
    pub fn pending_products(&self) -> Result<Vec<Product>, StoreError> {
        let query = Query::table(PRODUCTS_TABLE)
            .eq("status", ModerationStatus::Pending.as_str())
            .order_by("id", true);
        Ok(self.db.select_as(&query)?)
    }

    pub fn approve(&self, id: &ProductId) -> Result<Product, StoreError> {
        let mut product = self.product(id)?;
        product.approve()?;
        let stored = rows::save_product(self.db, &product)?;
        tracing::info!(product = %id, admin = %self.admin.id, "product approved");
        Ok(stored)
    }

    /// Reject with a note the vendor will see.
    pub fn reject(&self, id: &ProductId, note: &str) -> Result<Product, StoreError> {
        let errors = rejection_form().validate_pairs(&[("note", note.to_string())]);
        if !errors.is_empty() {
            return Err(StoreError::Invalid(errors));
        }
        let mut product = self.product(id)?;
        product.reject(note.trim())?;
        let stored = rows::save_product(self.db, &product)?;
        tracing::info!(product = %id, admin = %self.admin.id, "product rejected");
        Ok(stored)
    }

    /// Every order, newest first.
    pub fn all_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.check(Permission::ManageOrders)?;
        let query = Query::table(ORDERS_TABLE).order_by("created_at", false);
        Ok(self.db.select_as(&query)?)
    }

    /// Move an order along the fulfilment sequence, or cancel it.
    pub fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, StoreError> {
        self.check(Permission::ManageOrders)?;
        let mut order: Order = self
            .db
            .find_one(&rows::order_query(id))?
            .ok_or_else(|| StoreError::OrderNotFound(id.to_string()))?;
        let from = order.status;
        order.transition(status)?;
        let stored = rows::save_order(self.db, &order)?;
        tracing::info!(
            order = %stored.order_number,
            from = from.as_str(),
            to = status.as_str(),
            "order status updated"
        );
        Ok(stored)
    }

    fn product(&self, id: &ProductId) -> Result<Product, StoreError> {
        rows::find_product(self.db, rows::product_query(id))?
            .ok_or_else(|| StoreError::ProductNotFound(id.to_string()))
    }

    fn check(&self, permission: Permission) -> Result<(), StoreError> {
        if self.permissions.allows(self.admin.role, permission) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions {
                role: self.admin.role,
                permission,
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clothify_auth::Role;
    use clothify_commerce::catalog::seed_products;
    use clothify_commerce::ids::UserId;
    use clothify_data::MemoryDb;
    use clothify_commerce::CommerceError;

    fn admin() -> User {
        User::new(UserId::new("root"), "root@example.com", Role::Admin)
    }

    fn db_with_pending() -> MemoryDb {
        let mut pending = seed_products().remove(0);
        pending.status = ModerationStatus::Pending;
        MemoryDb::new().with_table(PRODUCTS_TABLE, vec![serde_json::to_value(&pending).unwrap()])
    }

    #[test]
    fn test_approve_pending() {
        let db = db_with_pending();
        let (user, table) = (admin(), PermissionTable::default());
        let portal = AdminPortal::new(&db, &user, &table);

        assert_eq!(portal.pending_products().unwrap().len(), 1);
        let approved = portal.approve(&ProductId::new("1")).unwrap();
        assert_eq!(approved.status, ModerationStatus::Approved);
        assert!(portal.pending_products().unwrap().is_empty());

        assert!(matches!(
            portal.approve(&ProductId::new("1")),
            Err(StoreError::Commerce(CommerceError::InvalidModerationTransition { .. }))
        ));
        assert!(matches!(
            portal.approve(&ProductId::new("404")),
            Err(StoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_reject_needs_note() {
        let db = db_with_pending();
        let (user, table) = (admin(), PermissionTable::default());
        let portal = AdminPortal::new(&db, &user, &table);

        assert!(matches!(
            portal.reject(&ProductId::new("1"), ""),
            Err(StoreError::Invalid(_))
        ));
        let rejected = portal.reject(&ProductId::new("1"), "  Photos are blurry ").unwrap();
        assert_eq!(rejected.status, ModerationStatus::Rejected);
        assert_eq!(rejected.moderation_note.as_deref(), Some("Photos are blurry"));
    }

    #[test]
    fn test_order_methods_need_manage_orders() {
        let db = MemoryDb::new();
        let user = admin();
        let mut table = PermissionTable::default();
        table.revoke(Role::Admin, Permission::ManageOrders);
        let portal = AdminPortal::new(&db, &user, &table);

        assert!(matches!(
            portal.all_orders(),
            Err(StoreError::Auth(AuthError::InsufficientPermissions { .. }))
        ));
        assert!(portal.pending_products().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_order() {
        let db = MemoryDb::new();
        let (user, table) = (admin(), PermissionTable::default());
        let portal = AdminPortal::new(&db, &user, &table);
        assert!(matches!(
            portal.update_order_status(&OrderId::new("ord_missing"), OrderStatus::Confirmed),
            Err(StoreError::OrderNotFound(_))
        ));
    }
}
