//! Vendor dashboard: submitting and maintaining products.

use crate::forms::vendor_product_form;
use crate::rows::{self, PRODUCTS_TABLE};
use crate::StoreError;
use clothify_auth::User;
use clothify_commerce::catalog::Product;
use clothify_commerce::ids::ProductId;
use clothify_commerce::vendor::VendorDraft;
use clothify_data::{Database, DatabaseExt, Query};

/// Product management scoped to one vendor. Obtained from
/// [`AppState::vendor`](crate::AppState::vendor).
pub struct VendorPortal<'a> {
    db: &'a dyn Database,
    vendor: &'a User,
}

impl<'a> VendorPortal<'a> {
    pub(crate) fn new(db: &'a dyn Database, vendor: &'a User) -> Self {
        Self { db, vendor }
    }

    pub fn vendor(&self) -> &User {
        self.vendor
    }

    /// Validate `draft` and store it as a pending product.
    pub fn submit_product(&self, draft: VendorDraft) -> Result<Product, StoreError> {
        validate(&draft)?;
        let product = draft.into_product(ProductId::new(""), self.vendor.id.clone());
        let stored = rows::insert_product(self.db, &product)?;
        tracing::info!(product = %stored.id, vendor = %self.vendor.id, "product submitted for review");
        Ok(stored)
    }

    /// Every product this vendor submitted, whatever its status.
    pub fn my_products(&self) -> Result<Vec<Product>, StoreError> {
        let query = Query::table(PRODUCTS_TABLE)
            .eq("vendor_id", self.vendor.id.as_str())
            .order_by("id", true);
        Ok(self.db.select_as(&query)?)
    }

    pub fn set_stock(&self, id: &ProductId, in_stock: bool) -> Result<Product, StoreError> {
        let mut product = self.owned(id)?;
        product.in_stock = in_stock;
        let stored = rows::save_product(self.db, &product)?;
        tracing::info!(product = %id, in_stock, "stock updated");
        Ok(stored)
    }

    /// Apply `draft` to a rejected product and send it back for review.
    pub fn resubmit(&self, id: &ProductId, draft: &VendorDraft) -> Result<Product, StoreError> {
        validate(draft)?;
        let mut product = self.owned(id)?;
        product.resubmit()?;
        draft.apply_to(&mut product);
        product.moderation_note = None;
        let stored = rows::save_product(self.db, &product)?;
        tracing::info!(product = %id, "product resubmitted");
        Ok(stored)
    }

    /// A product owned by this vendor. Other vendors' products are reported
    /// as missing.
    fn owned(&self, id: &ProductId) -> Result<Product, StoreError> {
        let query = rows::product_query(id).eq("vendor_id", self.vendor.id.as_str());
        rows::find_product(self.db, query)?.ok_or_else(|| StoreError::ProductNotFound(id.to_string()))
    }
}

fn validate(draft: &VendorDraft) -> Result<(), StoreError> {
    let errors = vendor_product_form().validate_pairs(&draft.form_values());
    if errors.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Invalid(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clothify_auth::Role;
    use clothify_commerce::catalog::ModerationStatus;
    use clothify_commerce::ids::UserId;
    use clothify_commerce::money::Money;
    use clothify_data::MemoryDb;

    fn draft() -> VendorDraft {
        let mut draft = VendorDraft::new("Wool Scarf", Money::usd(2500), "Accessories");
        draft.description = "Chunky knit".into();
        draft
    }

    fn vendor(id: &str) -> User {
        User::new(UserId::new(id), format!("{}@example.com", id), Role::Vendor)
    }

    #[test]
    fn test_submit_assigns_id_and_pending() {
        let db = MemoryDb::new();
        let v = vendor("v1");
        let portal = VendorPortal::new(&db, &v);

        let product = portal.submit_product(draft()).unwrap();
        assert_eq!(product.id.as_str(), "1");
        assert_eq!(product.status, ModerationStatus::Pending);
        assert_eq!(product.vendor_id.as_ref().map(|id| id.as_str()), Some("v1"));
        assert_eq!(portal.my_products().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_draft_not_stored() {
        let db = MemoryDb::new();
        let v = vendor("v1");
        let portal = VendorPortal::new(&db, &v);

        let err = portal
            .submit_product(VendorDraft::new("", Money::usd(2500), "Accessories"))
            .unwrap_err();
        assert!(err.field_errors().is_some_and(|e| e.contains_key("name")));
        assert_eq!(db.count(PRODUCTS_TABLE), 0);
    }

    #[test]
    fn test_products_scoped_to_vendor() {
        let db = MemoryDb::new();
        let (a, b) = (vendor("a"), vendor("b"));
        let product = VendorPortal::new(&db, &a).submit_product(draft()).unwrap();

        let other = VendorPortal::new(&db, &b);
        assert!(other.my_products().unwrap().is_empty());
        assert!(matches!(
            other.set_stock(&product.id, false),
            Err(StoreError::ProductNotFound(_))
        ));

        let updated = VendorPortal::new(&db, &a).set_stock(&product.id, false).unwrap();
        assert!(!updated.in_stock);
    }

    #[test]
    fn test_resubmit_only_after_rejection() {
        let db = MemoryDb::new();
        let v = vendor("v1");
        let portal = VendorPortal::new(&db, &v);
        let mut product = portal.submit_product(draft()).unwrap();

        assert!(matches!(
            portal.resubmit(&product.id, &draft()),
            Err(StoreError::Commerce(_))
        ));

        product.reject("Needs a photo").unwrap();
        rows::save_product(&db, &product).unwrap();

        let mut fixed = draft();
        fixed.image_url = Some("https://cdn.example.com/scarf.jpg".into());
        let resubmitted = portal.resubmit(&product.id, &fixed).unwrap();
        assert_eq!(resubmitted.status, ModerationStatus::Pending);
        assert_eq!(resubmitted.primary_image(), Some("https://cdn.example.com/scarf.jpg"));
        assert!(resubmitted.moderation_note.is_none());
    }
}
