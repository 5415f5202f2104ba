//! Table queries: filter conditions, ordering and limits.
//!
//! A [`Query`] renders to PostgREST-style parameters
//! (`select=*&status=eq.approved&order=id.asc&limit=10`) for the REST client
//! and can be evaluated directly against JSON rows for the in-memory database.

use serde_json::Value;
use std::cmp::Ordering;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive pattern match; `%` and `*` match any run of characters.
    Ilike,
    In,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Neq => "neq",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Ilike => "ilike",
            Op::In => "in",
        }
    }
}

/// A single `column op value` filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: Op,
    /// For [`Op::In`] this is an array.
    pub value: Value,
}

impl Condition {
    /// Render the right-hand side of the query parameter, e.g. `eq.approved`.
    pub fn render(&self) -> String {
        match (&self.op, &self.value) {
            (Op::In, Value::Array(items)) => {
                let items: Vec<String> = items.iter().map(render_scalar).collect();
                format!("in.({})", items.join(","))
            }
            (op, value) => format!("{}.{}", op.as_str(), render_scalar(value)),
        }
    }

    /// Evaluate against a row. A missing column matches nothing except `neq`.
    pub fn matches(&self, row: &Value) -> bool {
        let field = row.get(&self.column).unwrap_or(&Value::Null);
        match self.op {
            Op::Eq => loosely_equal(field, &self.value),
            Op::Neq => !loosely_equal(field, &self.value),
            Op::Gt => compare(field, &self.value) == Some(Ordering::Greater),
            Op::Gte => matches!(
                compare(field, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Op::Lt => compare(field, &self.value) == Some(Ordering::Less),
            Op::Lte => matches!(
                compare(field, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Op::Ilike => match (field.as_str(), self.value.as_str()) {
                (Some(text), Some(pattern)) => ilike(text, pattern),
                _ => false,
            },
            Op::In => match &self.value {
                Value::Array(items) => items.iter().any(|v| loosely_equal(field, v)),
                other => loosely_equal(field, other),
            },
        }
    }
}

/// Sort order of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A query against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub conditions: Vec<Condition>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    /// Start a query selecting every row of `table`.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn filter(mut self, column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Op::Eq, value)
    }

    pub fn neq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Op::Neq, value)
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Op::Gt, value)
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Op::Gte, value)
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Op::Lt, value)
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, Op::Lte, value)
    }

    pub fn ilike(self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filter(column, Op::Ilike, Value::String(pattern.into()))
    }

    pub fn in_list<I, V>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.filter(column, Op::In, Value::Array(values))
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query parameters in PostgREST form, `select=*` first.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(self.filter_params());
        if let Some(order) = &self.order {
            let dir = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, dir)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    /// Only the filter conditions, as used by update and delete.
    pub fn filter_params(&self) -> Vec<(String, String)> {
        self.conditions
            .iter()
            .map(|c| (c.column.clone(), c.render()))
            .collect()
    }

    /// Whether a row satisfies every condition.
    pub fn matches(&self, row: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(row))
    }

    /// Filter, order and limit `rows` in memory.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<Value>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut selected: Vec<Value> = rows
            .into_iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect();
        if let Some(order) = &self.order {
            selected.sort_by(|a, b| {
                let a = a.get(&order.column).unwrap_or(&Value::Null);
                let b = b.get(&order.column).unwrap_or(&Value::Null);
                let ord = compare(a, b).unwrap_or(Ordering::Equal);
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Equality that treats `"5"` and `5` as the same value, since ids arrive
/// as either depending on the table.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            s == &n.to_string()
        }
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Order two values: numerically when both read as numbers, else as strings.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        _ => None,
    }
}

fn ilike(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    wildcard_match(&text, &pattern)
}

fn wildcard_match(text: &[char], pattern: &[char]) -> bool {
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '%' || pattern[p] == '*') {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star_p, star_t)) = backtrack {
            p = star_p + 1;
            t = star_t + 1;
            backtrack = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '%' || c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({"id": "1", "name": "Classic White Tee", "price": 1999, "status": "approved"}),
            json!({"id": "2", "name": "Slim Fit Jeans", "price": 4999, "status": "approved"}),
            json!({"id": "10", "name": "Canvas Tote", "price": 2499, "status": "pending"}),
        ]
    }

    #[test]
    fn test_params_render() {
        let q = Query::table("products")
            .eq("status", "approved")
            .gte("price", 1000)
            .in_list("id", ["1", "2"])
            .order_by("id", true)
            .limit(5);
        let params = q.to_params();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("status".to_string(), "eq.approved".to_string()),
                ("price".to_string(), "gte.1000".to_string()),
                ("id".to_string(), "in.(1,2)".to_string()),
                ("order".to_string(), "id.asc".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_apply_filters_and_orders_numerically() {
        let rows = rows();
        let q = Query::table("products").order_by("id", false);
        let ids: Vec<_> = q.apply(&rows).into_iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!("10"), json!("2"), json!("1")]);

        let approved = Query::table("products").eq("status", "approved").lt("price", 3000);
        let hits = approved.apply(&rows);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["name"], "Classic White Tee");
    }

    #[test]
    fn test_ilike() {
        let rows = rows();
        let q = Query::table("products").ilike("name", "%TEE%");
        assert_eq!(q.apply(&rows).len(), 1);
        let q = Query::table("products").ilike("name", "c*");
        assert_eq!(q.apply(&rows).len(), 2);
        assert!(!ilike("jeans", "j%x"));
    }

    #[test]
    fn test_loose_id_equality() {
        let row = json!({"id": 7});
        assert!(Query::table("t").eq("id", "7").matches(&row));
        assert!(Query::table("t").neq("missing", "x").matches(&row));
        assert!(!Query::table("t").eq("missing", "x").matches(&row));
    }

    #[test]
    fn test_limit() {
        let rows = rows();
        assert_eq!(Query::table("products").limit(2).apply(&rows).len(), 2);
    }
}
