//! Product and order rows shared by the storefront and the portals.

use crate::StoreError;
use clothify_commerce::catalog::Product;
use clothify_commerce::checkout::Order;
use clothify_commerce::ids::{OrderId, ProductId};
use clothify_data::{Database, DatabaseExt, DbError, Query};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Database table holding catalog products.
pub const PRODUCTS_TABLE: &str = "products";

/// Database table holding placed orders.
pub const ORDERS_TABLE: &str = "orders";

pub(crate) fn encode<T: Serialize>(table: &'static str, value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|source| StoreError::Row { table, source })
}

pub(crate) fn decode<T: DeserializeOwned>(table: &'static str, row: Value) -> Result<T, StoreError> {
    serde_json::from_value(row).map_err(|source| StoreError::Row { table, source })
}

fn first<T: DeserializeOwned>(table: &'static str, rows: Vec<Value>) -> Result<T, StoreError> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| DbError::NoRowReturned(table.to_string()))?;
    decode(table, row)
}

/// Insert a new product, letting the database assign its id.
pub(crate) fn insert_product(db: &dyn Database, product: &Product) -> Result<Product, StoreError> {
    let mut row = encode(PRODUCTS_TABLE, product)?;
    if let Some(fields) = row.as_object_mut() {
        fields.remove("id");
    }
    first(PRODUCTS_TABLE, db.insert(PRODUCTS_TABLE, vec![row])?)
}

pub(crate) fn find_product(db: &dyn Database, query: Query) -> Result<Option<Product>, StoreError> {
    Ok(db.find_one(&query)?)
}

pub(crate) fn product_query(id: &ProductId) -> Query {
    Query::table(PRODUCTS_TABLE).eq("id", id.as_str())
}

/// Overwrite a stored product with `product`.
pub(crate) fn save_product(db: &dyn Database, product: &Product) -> Result<Product, StoreError> {
    let row = encode(PRODUCTS_TABLE, product)?;
    first(PRODUCTS_TABLE, db.update(&product_query(&product.id), row)?)
}

pub(crate) fn order_query(id: &OrderId) -> Query {
    Query::table(ORDERS_TABLE).eq("id", id.as_str())
}

pub(crate) fn save_order(db: &dyn Database, order: &Order) -> Result<Order, StoreError> {
    let row = encode(ORDERS_TABLE, order)?;
    first(ORDERS_TABLE, db.update(&order_query(&order.id), row)?)
}
