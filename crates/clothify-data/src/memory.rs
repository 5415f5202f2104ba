//! Process-local tables.

use crate::{Database, DbError, Query};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// A [`Database`] holding tables in memory.
///
/// Used for offline mode and tests. Rows inserted without an `id` get the
/// next integer id for their table, as a string.
#[derive(Debug, Default)]
pub struct MemoryDb {
    tables: RwLock<BTreeMap<String, Vec<Value>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of `table`.
    pub fn with_table(self, table: &str, rows: Vec<Value>) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(table.to_string(), rows);
        }
        self
    }

    /// Number of rows in `table`.
    pub fn count(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|t| t.get(table).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }

    fn poisoned() -> DbError {
        DbError::Transport("memory database lock poisoned".to_string())
    }
}

fn next_id(rows: &[Value]) -> u64 {
    rows.iter()
        .filter_map(|row| match row.get("id")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
        .max()
        .unwrap_or(0)
        + 1
}

impl Database for MemoryDb {
    fn select(&self, query: &Query) -> Result<Vec<Value>, DbError> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables
            .get(&query.table)
            .map(|rows| query.apply(rows))
            .unwrap_or_default())
    }

    fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, DbError> {
        if rows.iter().any(|row| !row.is_object()) {
            return Err(DbError::InvalidRow {
                table: table.to_string(),
                message: "expected a JSON object".to_string(),
            });
        }
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let existing = tables.entry(table.to_string()).or_default();
        let mut stored = Vec::with_capacity(rows.len());
        for mut row in rows {
            if let Some(object) = row.as_object_mut() {
                if object.get("id").map_or(true, Value::is_null) {
                    object.insert("id".to_string(), Value::String(next_id(existing).to_string()));
                }
            }
            existing.push(row.clone());
            stored.push(row);
        }
        tracing::debug!(table, rows = stored.len(), "memory insert");
        Ok(stored)
    }

    fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, DbError> {
        let Value::Object(patch) = patch else {
            return Err(DbError::InvalidRow {
                table: query.table.clone(),
                message: "patch must be a JSON object".to_string(),
            });
        };
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(&query.table) {
            for row in rows.iter_mut().filter(|row| query.matches(row)) {
                if let Some(object) = row.as_object_mut() {
                    for (key, value) in &patch {
                        object.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    fn delete(&self, query: &Query) -> Result<Vec<Value>, DbError> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let Some(rows) = tables.get_mut(&query.table) else {
            return Ok(Vec::new());
        };
        let (removed, kept): (Vec<Value>, Vec<Value>) =
            rows.drain(..).partition(|row| query.matches(row));
        *rows = kept;
        Ok(removed)
    }
}
