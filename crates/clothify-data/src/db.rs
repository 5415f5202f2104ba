//! The database abstraction shared by the REST client and in-memory tables.

use crate::{DbError, Query};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Row-level access to named tables of JSON objects.
pub trait Database: Send + Sync {
    /// Rows matching `query`, ordered and limited as requested.
    fn select(&self, query: &Query) -> Result<Vec<Value>, DbError>;

    /// Insert rows into `table`, returning them as stored.
    fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, DbError>;

    /// Merge `patch` into every row matching the query's conditions,
    /// returning the updated rows.
    fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, DbError>;

    /// Delete rows matching the query's conditions, returning them.
    fn delete(&self, query: &Query) -> Result<Vec<Value>, DbError>;

    /// Act as the signed-in user from now on, or anonymously with `None`.
    /// Backends without per-user credentials ignore this.
    fn set_access_token(&self, _token: Option<String>) {}
}

impl<D: Database + ?Sized> Database for Arc<D> {
    fn select(&self, query: &Query) -> Result<Vec<Value>, DbError> {
        (**self).select(query)
    }

    fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, DbError> {
        (**self).insert(table, rows)
    }

    fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, DbError> {
        (**self).update(query, patch)
    }

    fn delete(&self, query: &Query) -> Result<Vec<Value>, DbError> {
        (**self).delete(query)
    }

    fn set_access_token(&self, token: Option<String>) {
        (**self).set_access_token(token)
    }
}

/// Typed helpers over [`Database`].
pub trait DatabaseExt: Database {
    /// Select and deserialize every matching row.
    fn select_as<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, DbError> {
        self.select(query)?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(DbError::from))
            .collect()
    }

    /// First matching row, if any.
    fn find_one<T: DeserializeOwned>(&self, query: &Query) -> Result<Option<T>, DbError> {
        let query = query.clone().limit(1);
        Ok(self.select_as::<T>(&query)?.into_iter().next())
    }

    /// Insert one value and return the stored row.
    fn insert_as<T, R>(&self, table: &str, value: &T) -> Result<R, DbError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let row = serde_json::to_value(value)?;
        let stored = self
            .insert(table, vec![row])?
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NoRowReturned(table.to_string()))?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Update matching rows from a serializable patch.
    fn update_as<P, R>(&self, query: &Query, patch: &P) -> Result<Vec<R>, DbError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.update(query, serde_json::to_value(patch)?)?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(DbError::from))
            .collect()
    }
}

impl<D: Database + ?Sized> DatabaseExt for D {}
