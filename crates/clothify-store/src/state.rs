//! Application state and the commands that mutate it.
//!
//! [`AppState`] owns everything a storefront session touches: the catalog,
//! the cart and wishlist, the checkout in progress, the signed-in user and
//! handles to the remote database and local storage. Every change goes
//! through a method so persistence and logging happen in one place.

use crate::admin::AdminPortal;
use crate::config::{StorageConfig, StoreConfig};
use crate::forms::{address_values, checkout_form};
use crate::rows::{self, ORDERS_TABLE, PRODUCTS_TABLE};
use crate::vendor::VendorPortal;
use crate::StoreError;
use clothify_auth::{AuthBackend, AuthService, MemoryAuth, Permission, Portal, Role, User};
use clothify_cache::{cache_key, Cache};
use clothify_commerce::cart::{Cart, CartPricing};
use clothify_commerce::catalog::{seed_products, Catalog, ModerationStatus, Product};
use clothify_commerce::checkout::{
    CheckoutFlow, CheckoutStep, Order, PaymentMethod, ShippingAddress, ShippingMethod,
    ShippingSelection,
};
use clothify_commerce::ids::{LineItemId, ProductId};
use clothify_commerce::search::{search, FilterCriteria, LiveSearch, SearchResults};
use clothify_commerce::wishlist::Wishlist;
use clothify_commerce::CommerceError;
use clothify_data::{Database, DatabaseExt, MemoryDb, Query};
use std::sync::Arc;

/// Local storage owner used while nobody is signed in.
const GUEST: &str = "guest";

/// Where the current catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Approved rows from the products table.
    Database,
    /// The bundled seed catalog.
    Seed,
}

pub struct AppState {
    config: StoreConfig,
    db: Arc<dyn Database>,
    local: Cache,
    auth: AuthService<Box<dyn AuthBackend>>,
    catalog: Catalog,
    catalog_source: CatalogSource,
    cart: Cart,
    wishlist: Wishlist,
    checkout: Option<CheckoutFlow>,
}

impl AppState {
    /// Restore the saved session, load the catalog and the owner's cart.
    pub fn new(
        config: StoreConfig,
        db: Arc<dyn Database>,
        backend: Box<dyn AuthBackend>,
        cache: Cache,
    ) -> Result<Self, StoreError> {
        let mut auth = AuthService::new(backend, Arc::clone(&db), &cache);
        auth.load_permissions();
        if let Some(user) = auth.restore()? {
            tracing::info!(user = %user.id, "restored session");
        }

        let mut state = Self {
            config,
            db,
            local: cache.namespaced("store"),
            auth,
            catalog: Catalog::new(Vec::new()),
            catalog_source: CatalogSource::Seed,
            cart: Cart::new(),
            wishlist: Wishlist::new(),
            checkout: None,
        };
        let owner = state.owner();
        state.cart = state.load_cart(&owner)?;
        state.wishlist = state.load_wishlist(&owner)?;
        state.refresh_catalog()?;
        Ok(state)
    }

    /// Run without a hosted database: an in-memory products table seeded
    /// with the bundled catalog and in-process accounts.
    pub fn offline(config: StoreConfig) -> Result<Self, StoreError> {
        let seed = seed_products()
            .iter()
            .map(|p| rows::encode(PRODUCTS_TABLE, p))
            .collect::<Result<Vec<_>, _>>()?;
        let db = MemoryDb::new().with_table(PRODUCTS_TABLE, seed);
        let cache = open_local(&config.storage)?;
        Self::new(config, Arc::new(db), Box::new(MemoryAuth::new()), cache)
    }

    /// Connect to the configured database, or run offline when no URL and
    /// key are set.
    pub fn from_config(config: StoreConfig) -> Result<Self, StoreError> {
        match remote::connect(&config)? {
            Some((db, backend)) => {
                let cache = open_local(&config.storage)?;
                Self::new(config, db, backend, cache)
            }
            None => {
                tracing::warn!("no database configured, running offline");
                Self::offline(config)
            }
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn db(&self) -> &Arc<dyn Database> {
        &self.db
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_source(&self) -> CatalogSource {
        self.catalog_source
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub fn checkout(&self) -> Option<&CheckoutFlow> {
        self.checkout.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.auth.current_user()
    }

    pub fn auth(&self) -> &AuthService<Box<dyn AuthBackend>> {
        &self.auth
    }

    // Catalog

    /// Reload approved products from the database. The bundled catalog is
    /// used when the table is empty or unreachable. Cart lines for products
    /// that disappeared or sold out are dropped.
    pub fn refresh_catalog(&mut self) -> Result<CatalogSource, StoreError> {
        let query = Query::table(PRODUCTS_TABLE)
            .eq("status", ModerationStatus::Approved.as_str())
            .order_by("id", true);

        let (products, source) = match self.db.select_as::<Product>(&query) {
            Ok(products) if !products.is_empty() => (products, CatalogSource::Database),
            Ok(_) => {
                tracing::warn!("products table is empty, using bundled catalog");
                (seed_products(), CatalogSource::Seed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog unavailable, using bundled catalog");
                (seed_products(), CatalogSource::Seed)
            }
        };
        tracing::debug!(products = products.len(), ?source, "catalog loaded");

        self.catalog = Catalog::new(products);
        self.catalog_source = source;

        if !self.cart.is_empty() {
            let removed = self.cart.reconcile(self.catalog.products())?;
            if removed > 0 {
                tracing::info!(removed, "dropped unavailable cart lines");
            }
            self.save_cart()?;
        }
        Ok(source)
    }

    pub fn search(&self, criteria: &FilterCriteria) -> SearchResults {
        search(self.catalog.products(), criteria)
    }

    /// A debounced search session over the current catalog.
    pub fn live_search(&self) -> LiveSearch {
        LiveSearch::new(self.catalog.products().to_vec(), self.config.search.debounce())
    }

    // Cart

    pub fn add_to_cart(
        &mut self,
        product_id: &ProductId,
        size: Option<&str>,
        quantity: i64,
    ) -> Result<LineItemId, StoreError> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))?;
        let line = self.cart.add_item(product, size, quantity)?;
        tracing::debug!(product = %product_id, quantity, "added to cart");
        self.save_cart()?;
        Ok(line)
    }

    /// Set a line's quantity; zero or less removes it. Returns whether the
    /// line existed.
    pub fn update_cart_quantity(
        &mut self,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Result<bool, StoreError> {
        let found = self.cart.update_quantity(line_item_id, quantity)?;
        if found {
            self.save_cart()?;
        }
        Ok(found)
    }

    pub fn remove_from_cart(&mut self, line_item_id: &LineItemId) -> Result<bool, StoreError> {
        let removed = self.cart.remove_item(line_item_id);
        if removed {
            self.save_cart()?;
        }
        Ok(removed)
    }

    pub fn cart_pricing(&self) -> Result<CartPricing, StoreError> {
        Ok(self.cart.calculate_pricing(&self.config.pricing)?)
    }

    // Wishlist

    /// Add or remove a product. Returns whether it is now saved.
    pub fn toggle_wishlist(&mut self, product_id: &ProductId) -> Result<bool, StoreError> {
        if self.catalog.get(product_id).is_none() && !self.wishlist.contains(product_id) {
            return Err(StoreError::ProductNotFound(product_id.to_string()));
        }
        let saved = self.wishlist.toggle(product_id.clone());
        self.save_wishlist()?;
        Ok(saved)
    }

    // Account

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<User, StoreError> {
        let user = self.auth.sign_in(email, password)?.clone();
        self.adopt_guest_state()?;
        Ok(user)
    }

    /// Sign in through the vendor or admin dashboard.
    pub fn sign_in_to(
        &mut self,
        portal: Portal,
        email: &str,
        password: &str,
    ) -> Result<User, StoreError> {
        let user = self.auth.sign_in_to(portal, email, password)?.clone();
        self.adopt_guest_state()?;
        Ok(user)
    }

    pub fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        role: Role,
    ) -> Result<User, StoreError> {
        let user = self.auth.sign_up(email, password, full_name, role)?.clone();
        self.adopt_guest_state()?;
        Ok(user)
    }

    /// Sign out. The user's cart stays saved under their key; the guest
    /// cart becomes current again.
    pub fn sign_out(&mut self) -> Result<(), StoreError> {
        self.auth.sign_out()?;
        self.cart = self.load_cart(GUEST)?;
        self.wishlist = self.load_wishlist(GUEST)?;
        self.checkout = None;
        Ok(())
    }

    // Checkout

    /// Start a checkout for the current cart, landing on the shipping step.
    pub fn begin_checkout(&mut self) -> Result<&CheckoutFlow, StoreError> {
        if self.cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }
        let mut flow = CheckoutFlow::new();
        flow.advance(&self.cart)?;
        tracing::info!(checkout = %flow.id, items = self.cart.item_count(), "checkout started");
        Ok(&*self.checkout.insert(flow))
    }

    /// Validate the shipping details and move on to payment.
    pub fn submit_shipping(
        &mut self,
        address: ShippingAddress,
        method_id: &str,
    ) -> Result<CheckoutStep, StoreError> {
        let errors = checkout_form().validate_pairs(&address_values(&address));
        if !errors.is_empty() {
            return Err(StoreError::Invalid(errors));
        }
        let method = ShippingMethod::standard_options()
            .into_iter()
            .find(|m| m.id.as_str() == method_id)
            .ok_or_else(|| StoreError::UnknownShippingMethod(method_id.to_string()))?;

        let flow = active(&mut self.checkout)?;
        flow.set_shipping_address(address);
        flow.set_shipping_method(ShippingSelection::from_method(&method));
        Ok(flow.advance(&self.cart)?)
    }

    /// Record the payment method and move on to review.
    pub fn submit_payment(&mut self, method: PaymentMethod) -> Result<CheckoutStep, StoreError> {
        let flow = active(&mut self.checkout)?;
        flow.set_payment_method(method);
        Ok(flow.advance(&self.cart)?)
    }

    pub fn set_order_note(&mut self, note: Option<String>) -> Result<(), StoreError> {
        active(&mut self.checkout)?.note = note.filter(|n| !n.trim().is_empty());
        Ok(())
    }

    pub fn checkout_back(&mut self) -> Result<CheckoutStep, StoreError> {
        Ok(active(&mut self.checkout)?.go_back()?)
    }

    pub fn cancel_checkout(&mut self) {
        if let Some(flow) = self.checkout.take() {
            tracing::debug!(checkout = %flow.id, "checkout cancelled");
        }
    }

    /// Place the order under review, store it and empty the cart. Guests
    /// may check out; signed-in users need the `PlaceOrder` permission.
    pub fn place_order(&mut self) -> Result<Order, StoreError> {
        let user_id = match self.auth.current_user() {
            Some(_) => Some(self.auth.require(Permission::PlaceOrder)?.id.clone()),
            None => None,
        };

        let mut flow = active(&mut self.checkout)?.clone();
        let order = Order::place(&self.cart, &mut flow, &self.config.pricing, user_id)?;
        let stored: Order = self.db.insert_as(ORDERS_TABLE, &order)?;
        tracing::info!(
            order = %stored.order_number,
            total = %stored.grand_total.display(),
            "order placed"
        );

        self.checkout = None;
        self.cart.clear();
        self.save_cart()?;
        Ok(stored)
    }

    /// The signed-in user's orders, newest first.
    pub fn my_orders(&self) -> Result<Vec<Order>, StoreError> {
        let user = self.auth.require(Permission::ViewOwnOrders)?;
        let query = Query::table(ORDERS_TABLE)
            .eq("user_id", user.id.as_str())
            .order_by("created_at", false);
        Ok(self.db.select_as(&query)?)
    }

    // Portals

    /// Product management for the signed-in vendor.
    pub fn vendor(&self) -> Result<VendorPortal<'_>, StoreError> {
        let vendor = self.auth.require(Permission::ManageOwnProducts)?;
        Ok(VendorPortal::new(self.db.as_ref(), vendor))
    }

    /// Moderation and order management for the signed-in admin.
    pub fn admin(&self) -> Result<AdminPortal<'_>, StoreError> {
        let admin = self.auth.require(Permission::ModerateProducts)?;
        Ok(AdminPortal::new(self.db.as_ref(), admin, self.auth.permissions()))
    }

    // Local persistence

    fn owner(&self) -> String {
        self.auth
            .current_user()
            .map(|u| u.id.to_string())
            .unwrap_or_else(|| GUEST.to_string())
    }

    fn load_cart(&self, owner: &str) -> Result<Cart, StoreError> {
        Ok(self
            .local
            .get_or_discard(&cache_key!("cart", owner))?
            .unwrap_or_default())
    }

    fn load_wishlist(&self, owner: &str) -> Result<Wishlist, StoreError> {
        Ok(self
            .local
            .get_or_discard(&cache_key!("wishlist", owner))?
            .unwrap_or_default())
    }

    fn save_cart(&self) -> Result<(), StoreError> {
        Ok(self.local.set(&cache_key!("cart", self.owner()), &self.cart)?)
    }

    fn save_wishlist(&self) -> Result<(), StoreError> {
        Ok(self
            .local
            .set(&cache_key!("wishlist", self.owner()), &self.wishlist)?)
    }

    /// After signing in, fold whatever the guest collected into the user's
    /// saved cart and wishlist, then forget the guest copies.
    fn adopt_guest_state(&mut self) -> Result<(), StoreError> {
        let owner = self.owner();

        // Build the merged copies first; the guest state stays in place on error.
        let mut cart = self.load_cart(&owner)?;
        if !self.cart.is_empty() {
            tracing::info!(lines = self.cart.unique_item_count(), "merging guest cart");
            cart.merge(self.cart.clone())?;
        }
        let mut wishlist = self.load_wishlist(&owner)?;
        wishlist.merge(self.wishlist.clone());

        self.cart = cart;
        self.wishlist = wishlist;
        self.checkout = None;
        self.local.delete(&cache_key!("cart", GUEST))?;
        self.local.delete(&cache_key!("wishlist", GUEST))?;
        self.save_cart()?;
        self.save_wishlist()
    }
}

/// The checkout in progress, unless it has expired.
fn active(checkout: &mut Option<CheckoutFlow>) -> Result<&mut CheckoutFlow, StoreError> {
    if let Some(flow) = checkout.as_ref().filter(|f| f.is_expired()) {
        tracing::info!(checkout = %flow.id, "checkout expired");
        *checkout = None;
        return Err(StoreError::CheckoutExpired);
    }
    checkout.as_mut().ok_or(StoreError::CheckoutNotStarted)
}

fn open_local(storage: &StorageConfig) -> Result<Cache, StoreError> {
    match &storage.path {
        Some(path) => Ok(Cache::open_file(path)?),
        None => Ok(Cache::in_memory()),
    }
}

#[cfg(feature = "http")]
mod remote {
    use crate::config::StoreConfig;
    use crate::StoreError;
    use clothify_auth::{AuthBackend, RestAuth};
    use clothify_data::{Database, HttpTransport, RequestCache, RestDb};
    use std::sync::Arc;

    pub(super) fn connect(
        config: &StoreConfig,
    ) -> Result<Option<(Arc<dyn Database>, Box<dyn AuthBackend>)>, StoreError> {
        let Some((url, key)) = config.database.remote() else {
            return Ok(None);
        };
        let transport = Arc::new(HttpTransport::new(config.database.timeout())?);
        let db = RestDb::new(url, key, Arc::clone(&transport))?
            .with_cache(RequestCache::new(config.database.request_cache_ttl()));
        tracing::info!(url, "using hosted database");
        let db: Arc<dyn Database> = Arc::new(db);
        let backend: Box<dyn AuthBackend> = Box::new(RestAuth::new(url, key, transport));
        Ok(Some((db, backend)))
    }
}

#[cfg(not(feature = "http"))]
mod remote {
    use crate::config::StoreConfig;
    use crate::StoreError;
    use clothify_auth::AuthBackend;
    use clothify_data::Database;
    use std::sync::Arc;

    pub(super) fn connect(
        config: &StoreConfig,
    ) -> Result<Option<(Arc<dyn Database>, Box<dyn AuthBackend>)>, StoreError> {
        if config.database.remote().is_some() {
            tracing::warn!("built without the http feature, ignoring database settings");
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clothify_auth::{AuthError, PasswordHasher};

    const PASSWORD: &str = "Sup3rSecret";

    fn state() -> AppState {
        let seed = seed_products()
            .iter()
            .map(|p| serde_json::to_value(p).unwrap())
            .collect();
        let db = MemoryDb::new().with_table(PRODUCTS_TABLE, seed);
        let backend = MemoryAuth::with_hasher(PasswordHasher::with_cost(1024, 1).unwrap());
        AppState::new(
            StoreConfig::default(),
            Arc::new(db),
            Box::new(backend),
            Cache::in_memory(),
        )
        .unwrap()
    }

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    #[test]
    fn test_catalog_from_database() {
        let state = state();
        assert_eq!(state.catalog_source(), CatalogSource::Database);
        assert_eq!(state.catalog().len(), 12);
    }

    #[test]
    fn test_catalog_falls_back_to_seed() {
        let state = AppState::new(
            StoreConfig::default(),
            Arc::new(MemoryDb::new()),
            Box::new(MemoryAuth::new()),
            Cache::in_memory(),
        )
        .unwrap();
        assert_eq!(state.catalog_source(), CatalogSource::Seed);
        assert_eq!(state.catalog().len(), 12);
    }

    #[test]
    fn test_catalog_hides_unapproved() {
        let mut pending = seed_products().remove(0);
        pending.status = ModerationStatus::Pending;
        let approved = seed_products().remove(1);
        let db = MemoryDb::new().with_table(
            PRODUCTS_TABLE,
            vec![
                serde_json::to_value(&pending).unwrap(),
                serde_json::to_value(&approved).unwrap(),
            ],
        );
        let state = AppState::new(
            StoreConfig::default(),
            Arc::new(db),
            Box::new(MemoryAuth::new()),
            Cache::in_memory(),
        )
        .unwrap();
        assert_eq!(state.catalog().len(), 1);
        assert!(state.catalog().get(&id("2")).is_some());
    }

    #[test]
    fn test_cart_commands() {
        let mut state = state();
        let line = state.add_to_cart(&id("1"), Some("M"), 2).unwrap();
        assert_eq!(state.cart().item_count(), 2);

        assert!(state.update_cart_quantity(&line, 3).unwrap());
        assert_eq!(state.cart().item_count(), 3);

        assert!(matches!(
            state.add_to_cart(&id("8"), Some("M"), 1),
            Err(StoreError::Commerce(CommerceError::OutOfStock(_)))
        ));
        assert!(matches!(
            state.add_to_cart(&id("999"), None, 1),
            Err(StoreError::ProductNotFound(_))
        ));

        assert!(state.remove_from_cart(&line).unwrap());
        assert!(state.cart().is_empty());
        assert!(!state.remove_from_cart(&line).unwrap());
    }

    #[test]
    fn test_guest_cart_persists_across_restart() {
        let cache = Cache::in_memory();
        let db: Arc<dyn Database> = Arc::new(MemoryDb::new());
        {
            let mut state = AppState::new(
                StoreConfig::default(),
                Arc::clone(&db),
                Box::new(MemoryAuth::new()),
                cache.clone(),
            )
            .unwrap();
            state.add_to_cart(&id("3"), Some("S"), 1).unwrap();
            state.toggle_wishlist(&id("4")).unwrap();
        }
        let state = AppState::new(
            StoreConfig::default(),
            db,
            Box::new(MemoryAuth::new()),
            cache,
        )
        .unwrap();
        assert_eq!(state.cart().item_count(), 1);
        assert!(state.wishlist().contains(&id("4")));
    }

    #[test]
    fn test_wishlist_toggle() {
        let mut state = state();
        assert!(state.toggle_wishlist(&id("5")).unwrap());
        assert!(!state.toggle_wishlist(&id("5")).unwrap());
        assert!(matches!(
            state.toggle_wishlist(&id("nope")),
            Err(StoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_sign_in_merges_guest_cart() {
        let mut state = state();
        state.sign_up("ana@example.com", PASSWORD, Some("Ana"), Role::Customer).unwrap();
        state.add_to_cart(&id("1"), Some("S"), 1).unwrap();
        state.sign_out().unwrap();
        assert!(state.cart().is_empty());

        state.add_to_cart(&id("1"), Some("S"), 2).unwrap();
        state.add_to_cart(&id("2"), Some("32"), 1).unwrap();
        state.toggle_wishlist(&id("6")).unwrap();

        state.sign_in("ana@example.com", PASSWORD).unwrap();
        assert_eq!(state.cart().item_count(), 4);
        assert_eq!(state.cart().unique_item_count(), 2);
        assert!(state.wishlist().contains(&id("6")));

        state.sign_out().unwrap();
        assert!(state.cart().is_empty());
        assert!(state.wishlist().is_empty());
    }

    #[test]
    fn test_failed_merge_keeps_guest_cart() {
        let mut state = state();
        let user = state
            .sign_up("ivo@example.com", PASSWORD, None, Role::Customer)
            .unwrap();
        state.add_to_cart(&id("1"), Some("S"), 1).unwrap();
        state.sign_out().unwrap();

        // A saved line priced so that any more quantity overflows.
        let key = cache_key!("cart", user.id.as_str());
        let mut saved: serde_json::Value = state.local.get(&key).unwrap().unwrap();
        saved["items"][0]["unit_price"]["amount_cents"] = serde_json::json!(i64::MAX / 2);
        state.local.set(&key, &saved).unwrap();

        state.add_to_cart(&id("1"), Some("S"), 2).unwrap();
        state.toggle_wishlist(&id("6")).unwrap();
        assert!(matches!(
            state.sign_in("ivo@example.com", PASSWORD),
            Err(StoreError::Commerce(CommerceError::Overflow))
        ));
        assert_eq!(state.cart().item_count(), 2);
        assert!(state.wishlist().contains(&id("6")));
    }

    #[test]
    fn test_checkout_requires_items() {
        let mut state = state();
        assert!(matches!(
            state.begin_checkout(),
            Err(StoreError::Commerce(CommerceError::EmptyCart))
        ));
        assert!(matches!(
            state.submit_payment(PaymentMethod::CashOnDelivery),
            Err(StoreError::CheckoutNotStarted)
        ));
    }

    #[test]
    fn test_shipping_details_validated() {
        let mut state = state();
        state.add_to_cart(&id("10"), None, 1).unwrap();
        assert_eq!(state.begin_checkout().unwrap().step, CheckoutStep::Shipping);

        let mut address = ShippingAddress::new("Bo", "bo@", "1 Main Street", "Springfield", "12345", "US");
        let err = state.submit_shipping(address.clone(), "standard").unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|e| e.get("email")).map(String::as_str),
            Some("Please enter a valid email address")
        );

        address.email = "bo@example.com".into();
        assert!(matches!(
            state.submit_shipping(address.clone(), "teleport"),
            Err(StoreError::UnknownShippingMethod(_))
        ));
        assert_eq!(
            state.submit_shipping(address, "express").unwrap(),
            CheckoutStep::Payment
        );
        assert_eq!(state.checkout_back().unwrap(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_guest_order() {
        let mut state = state();
        state.add_to_cart(&id("4"), Some("M"), 1).unwrap();
        state.begin_checkout().unwrap();
        let address = ShippingAddress::new("Bo Li", "bo@example.com", "1 Main Street", "Springfield", "12345", "US");
        state.submit_shipping(address, "standard").unwrap();
        assert_eq!(
            state.submit_payment(PaymentMethod::CashOnDelivery).unwrap(),
            CheckoutStep::Review
        );

        let order = state.place_order().unwrap();
        assert!(order.user_id.is_none());
        assert_eq!(order.subtotal.amount_cents, 21999);
        assert!(state.cart().is_empty());
        assert!(state.checkout().is_none());
        assert!(matches!(
            state.my_orders(),
            Err(StoreError::Auth(AuthError::NotSignedIn))
        ));
    }

    #[test]
    fn test_portals_need_roles() {
        let mut state = state();
        state.sign_up("cy@example.com", PASSWORD, None, Role::Customer).unwrap();
        assert!(matches!(
            state.vendor(),
            Err(StoreError::Auth(AuthError::InsufficientPermissions { .. }))
        ));
        assert!(state.admin().is_err());
    }
}
