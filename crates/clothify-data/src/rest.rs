//! REST client for the hosted database.
//!
//! Tables live under `{base}/rest/v1/{table}`. Every request carries the
//! project's anon key as `apikey` and a bearer token: the signed-in user's
//! access token when one is set, otherwise the anon key.

use crate::{Database, DbError, Query, Request, RequestCache, Response, Transport};
use http::Method;
use serde_json::Value;
use std::sync::RwLock;
use url::Url;

/// [`Database`] implementation over HTTP.
pub struct RestDb<T: Transport> {
    base_url: Url,
    api_key: String,
    access_token: RwLock<Option<String>>,
    transport: T,
    cache: Option<RequestCache>,
}

impl<T: Transport> RestDb<T> {
    pub fn new(base_url: &str, api_key: impl Into<String>, transport: T) -> Result<Self, DbError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(DbError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            access_token: RwLock::new(None),
            transport,
            cache: None,
        })
    }

    /// Cache GET responses in `cache`.
    pub fn with_cache(mut self, cache: RequestCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&RequestCache> {
        self.cache.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }

    fn bearer(&self) -> String {
        self.access_token
            .read()
            .ok()
            .and_then(|t| t.clone())
            .unwrap_or_else(|| self.api_key.clone())
    }

    fn table_url(&self, table: &str, params: &[(String, String)]) -> Result<String, DbError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/rest/v1/{}", base, table))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url.to_string())
    }

    fn request(&self, method: Method, url: String) -> Request {
        Request::new(method, url)
            .header("apikey", self.api_key.clone())
            .bearer_auth(self.bearer())
            .header("Accept", "application/json")
    }

    fn execute(&self, request: Request) -> Result<Vec<Value>, DbError> {
        let response = self.transport.send(&request)?.error_for_status()?;
        decode_rows(&response)
    }
}

fn decode_rows(response: &Response) -> Result<Vec<Value>, DbError> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    match response.json::<Value>()? {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        row => Ok(vec![row]),
    }
}

impl<T: Transport> Database for RestDb<T> {
    fn select(&self, query: &Query) -> Result<Vec<Value>, DbError> {
        let url = self.table_url(&query.table, &query.to_params())?;
        let request = self.request(Method::GET, url);
        let key = request.cache_key();

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            return decode_rows(&cached);
        }

        let response = self.transport.send(&request)?.error_for_status()?;
        let rows = decode_rows(&response)?;
        if let Some(cache) = &self.cache {
            cache.insert(key, response);
        }
        Ok(rows)
    }

    fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, DbError> {
        let url = self.table_url(table, &[("select".to_string(), "*".to_string())])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&rows)?;
        let stored = self.execute(request)?;
        self.invalidate_table(table);
        tracing::debug!(table, rows = stored.len(), "inserted rows");
        Ok(stored)
    }

    fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, DbError> {
        let url = self.table_url(&query.table, &query.filter_params())?;
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&patch)?;
        let updated = self.execute(request)?;
        self.invalidate_table(&query.table);
        Ok(updated)
    }

    fn delete(&self, query: &Query) -> Result<Vec<Value>, DbError> {
        let url = self.table_url(&query.table, &query.filter_params())?;
        let request = self
            .request(Method::DELETE, url)
            .header("Prefer", "return=representation");
        let removed = self.execute(request)?;
        self.invalidate_table(&query.table);
        Ok(removed)
    }

    /// Bearer for subsequent requests; the anon key when `None`. Cached
    /// responses are dropped since they were fetched under other credentials.
    fn set_access_token(&self, token: Option<String>) {
        if let Ok(mut current) = self.access_token.write() {
            *current = token;
        }
        self.invalidate_all();
    }
}

impl<T: Transport> RestDb<T> {
    fn invalidate_table(&self, table: &str) {
        if let Some(cache) = &self.cache {
            let dropped = cache.invalidate_table(table);
            if dropped > 0 {
                tracing::debug!(table, dropped, "invalidated cached responses");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Records requests and replays canned responses in order.
    #[derive(Default)]
    struct Scripted {
        sent: Mutex<Vec<Request>>,
        replies: Mutex<Vec<Response>>,
    }

    impl Scripted {
        fn replying(replies: Vec<Response>) -> Arc<Self> {
            let s = Self::default();
            *s.replies.lock().unwrap() = replies.into_iter().rev().collect();
            Arc::new(s)
        }

        fn sent(&self) -> Vec<Request> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for Scripted {
        fn send(&self, request: &Request) -> Result<Response, DbError> {
            self.sent.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| DbError::Transport("no scripted reply".into()))
        }
    }

    fn db(transport: Arc<Scripted>) -> RestDb<Arc<Scripted>> {
        RestDb::new("https://db.example.com", "anon-key", transport).unwrap()
    }

    #[test]
    fn test_select_renders_url_and_headers() {
        let transport = Scripted::replying(vec![Response::json_body(200, &json!([{"id": "1"}]))]);
        let db = db(transport.clone());

        let rows = db
            .select(&Query::table("products").eq("status", "approved").order_by("id", true))
            .unwrap();
        assert_eq!(rows, vec![json!({"id": "1"})]);

        let sent = transport.sent();
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(
            sent[0].url,
            "https://db.example.com/rest/v1/products?select=*&status=eq.approved&order=id.asc"
        );
        assert_eq!(sent[0].header_value("apikey"), Some("anon-key"));
        assert_eq!(sent[0].header_value("authorization"), Some("Bearer anon-key"));
    }

    #[test]
    fn test_access_token_replaces_anon_bearer() {
        let transport = Scripted::replying(vec![Response::json_body(200, &json!([]))]);
        let db = db(transport.clone());
        db.set_access_token(Some("user-jwt".into()));
        db.select(&Query::table("orders")).unwrap();
        assert_eq!(transport.sent()[0].header_value("Authorization"), Some("Bearer user-jwt"));
    }

    #[test]
    fn test_error_statuses() {
        let transport = Scripted::replying(vec![
            Response::json_body(401, &json!({"message": "JWT expired"})),
            Response::json_body(404, &json!({"message": "relation does not exist"})),
        ]);
        let db = db(transport);
        assert!(db.select(&Query::table("orders")).unwrap_err().is_unauthorized());
        assert!(matches!(
            db.select(&Query::table("nope")).unwrap_err(),
            DbError::Http { status: 404, .. }
        ));
    }

    #[test]
    fn test_cached_select_and_invalidation_on_insert() {
        let transport = Scripted::replying(vec![
            Response::json_body(200, &json!([{"id": "1"}])),
            Response::json_body(201, &json!([{"id": "2"}])),
            Response::json_body(200, &json!([{"id": "1"}, {"id": "2"}])),
        ]);
        let db = db(transport.clone()).with_cache(RequestCache::default());
        let query = Query::table("products");

        assert_eq!(db.select(&query).unwrap().len(), 1);
        assert_eq!(db.select(&query).unwrap().len(), 1);
        assert_eq!(transport.sent().len(), 1);

        let stored = db.insert("products", vec![json!({"name": "Scarf"})]).unwrap();
        assert_eq!(stored[0]["id"], "2");
        assert_eq!(transport.sent()[1].header_value("Prefer"), Some("return=representation"));

        assert_eq!(db.select(&query).unwrap().len(), 2);
        assert_eq!(transport.sent().len(), 3);
    }

    #[test]
    fn test_update_and_delete_use_filters_only() {
        let transport = Scripted::replying(vec![
            Response::json_body(200, &json!([{"id": "3", "status": "approved"}])),
            Response::status(204),
        ]);
        let db = db(transport.clone());
        let query = Query::table("products").eq("id", "3").limit(1);

        db.update(&query, json!({"status": "approved"})).unwrap();
        assert!(db.delete(&query).unwrap().is_empty());

        let sent = transport.sent();
        assert_eq!(sent[0].method, Method::PATCH);
        assert_eq!(sent[0].url, "https://db.example.com/rest/v1/products?id=eq.3");
        assert_eq!(sent[1].method, Method::DELETE);
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(RestDb::new("not a url", "k", Scripted::replying(vec![])).is_err());
    }
}
