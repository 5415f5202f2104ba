//! End-to-end storefront flow: a vendor submits a product, an admin approves
//! it, a shopper buys it and the admin ships the order.

use clothify_auth::{AuthError, MemoryAuth, PasswordHasher, Portal, Role, PROFILES_TABLE};
use clothify_cache::Cache;
use clothify_commerce::prelude::*;
use clothify_data::{Database, MemoryDb, Query};
use clothify_store::{AppState, CatalogSource, StoreConfig, StoreError, PRODUCTS_TABLE};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

const PASSWORD: &str = "Sup3rSecret";

fn seeded_db() -> Arc<dyn Database> {
    let rows = seed_products()
        .iter()
        .map(|p| serde_json::to_value(p).unwrap())
        .collect();
    Arc::new(MemoryDb::new().with_table(PRODUCTS_TABLE, rows))
}

fn open(db: &Arc<dyn Database>, storage: &Path) -> AppState {
    let backend = MemoryAuth::with_hasher(PasswordHasher::with_cost(1024, 1).unwrap());
    AppState::new(
        StoreConfig::default(),
        Arc::clone(db),
        Box::new(backend),
        Cache::open_file(storage).unwrap(),
    )
    .unwrap()
}

fn address() -> ShippingAddress {
    let mut address = ShippingAddress::new(
        "Sam Rivera",
        "sam@example.com",
        "400 Market Street",
        "Portland",
        "97201",
        "US",
    );
    address.phone = Some("5035550100".into());
    address
}

#[test]
fn test_vendor_to_delivery() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db();
    let mut state = open(&db, &dir.path().join("state.json"));
    assert_eq!(state.catalog_source(), CatalogSource::Database);

    // Vendor submits a product; it stays hidden until approved.
    state
        .sign_up("vera@example.com", PASSWORD, Some("Vera"), Role::Vendor)
        .unwrap();
    let mut draft = VendorDraft::new("Wool Scarf", Money::usd(2500), "Accessories");
    draft.description = "Chunky merino knit".into();
    let submitted = state.vendor().unwrap().submit_product(draft).unwrap();
    assert_eq!(submitted.id.as_str(), "13");
    assert_eq!(submitted.status, ModerationStatus::Pending);

    state.refresh_catalog().unwrap();
    assert!(state.catalog().get(&submitted.id).is_none());
    state.sign_out().unwrap();

    // An account promoted to admin approves it.
    let admin = state
        .sign_up("ops@example.com", PASSWORD, None, Role::Customer)
        .unwrap();
    db.update(
        &Query::table(PROFILES_TABLE).eq("id", admin.id.as_str()),
        json!({"role": "admin"}),
    )
    .unwrap();
    state.sign_out().unwrap();
    state
        .sign_in_to(Portal::Admin, "ops@example.com", PASSWORD)
        .unwrap();
    {
        let portal = state.admin().unwrap();
        assert_eq!(portal.pending_products().unwrap().len(), 1);
        portal.approve(&submitted.id).unwrap();
    }
    state.refresh_catalog().unwrap();
    assert_eq!(state.catalog().len(), 13);
    state.sign_out().unwrap();

    // A guest finds it, adds it to the cart, then signs up and checks out.
    let results = state.search(&FilterCriteria::new().with_query("scarf"));
    assert!(results.products.iter().any(|p| p.id == submitted.id));
    state.add_to_cart(&submitted.id, None, 2).unwrap();

    let shopper = state
        .sign_up("sam@example.com", PASSWORD, Some("Sam"), Role::Customer)
        .unwrap();
    assert_eq!(state.cart().item_count(), 2);

    state.begin_checkout().unwrap();
    state.submit_shipping(address(), "standard").unwrap();
    state
        .submit_payment(PaymentMethod::Card {
            brand: "visa".into(),
            last4: "4242".into(),
        })
        .unwrap();
    let order = state.place_order().unwrap();

    assert_eq!(order.user_id.as_ref(), Some(&shopper.id));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.subtotal, Money::usd(5000));
    assert_eq!(
        order.grand_total.amount_cents,
        order.subtotal.amount_cents + order.shipping_total.amount_cents + order.tax_total.amount_cents
    );
    assert!(state.cart().is_empty());
    assert_eq!(state.my_orders().unwrap().len(), 1);
    state.sign_out().unwrap();

    // The admin moves the order along; skipping steps is refused.
    state.sign_in("ops@example.com", PASSWORD).unwrap();
    let portal = state.admin().unwrap();
    assert_eq!(portal.all_orders().unwrap().len(), 1);
    assert!(matches!(
        portal.update_order_status(&order.id, OrderStatus::Shipped),
        Err(StoreError::Commerce(CommerceError::InvalidOrderTransition { .. }))
    ));
    let confirmed = portal
        .update_order_status(&order.id, OrderStatus::Confirmed)
        .unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
}

#[test]
fn test_customer_denied_vendor_portal() {
    let dir = tempfile::tempdir().unwrap();
    let db = seeded_db();
    let mut state = open(&db, &dir.path().join("state.json"));

    state
        .sign_up("cy@example.com", PASSWORD, None, Role::Customer)
        .unwrap();
    state.sign_out().unwrap();

    let err = state
        .sign_in_to(Portal::Vendor, "cy@example.com", PASSWORD)
        .unwrap_err();
    assert!(matches!(err, StoreError::Auth(AuthError::PortalDenied { .. })));
    assert!(state.current_user().is_none());
}

#[test]
fn test_session_and_cart_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("state.json");
    let db = seeded_db();

    let user_id = {
        let mut state = open(&db, &storage);
        let user = state
            .sign_up("lee@example.com", PASSWORD, None, Role::Customer)
            .unwrap();
        state.add_to_cart(&ProductId::new("7"), Some("M"), 1).unwrap();
        state.toggle_wishlist(&ProductId::new("9")).unwrap();
        user.id
    };

    let state = open(&db, &storage);
    assert_eq!(state.current_user().map(|u| &u.id), Some(&user_id));
    assert_eq!(state.cart().item_count(), 1);
    assert!(state.wishlist().contains(&ProductId::new("9")));
}
