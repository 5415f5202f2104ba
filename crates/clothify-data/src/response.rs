//! HTTP response handling.

use crate::DbError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// An HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A bodyless response with no headers.
    pub fn status(status: u16) -> Self {
        Self::new(status, HashMap::new(), Vec::new())
    }

    /// A response carrying `value` as its JSON body.
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self::new(status, headers, value.to_string().into_bytes())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, DbError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| DbError::Parse(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DbError> {
        serde_json::from_slice(&self.body).map_err(|e| DbError::Parse(e.to_string()))
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Convert to a Result, returning an error for statuses of 400 and up.
    pub fn error_for_status(self) -> Result<Self, DbError> {
        if self.status < 400 {
            return Ok(self);
        }
        let message = self.error_message();
        Err(DbError::from_status(self.status, message))
    }

    /// Best human-readable message from an error body: the `message`,
    /// `error_description` or `msg` field if the body is JSON, else the text.
    fn error_message(&self) -> String {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            for field in ["message", "error_description", "msg", "error"] {
                if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                    return text.to_string();
                }
            }
        }
        self.text().unwrap_or_else(|_| "Unknown error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec())
    }

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(204, b"").is_success());
        assert!(!make_response(300, b"").is_success());
    }

    #[test]
    fn test_response_json() {
        let resp = Response::json_body(200, &json!([{"id": "1"}]));
        let rows: Vec<serde_json::Value> = resp.json().unwrap();
        assert_eq!(rows[0]["id"], "1");
        assert!(make_response(200, b"not json").json::<Vec<i32>>().is_err());
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let resp = Response::json_body(200, &json!(null));
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_error_for_status_maps_auth_failures() {
        let err = Response::json_body(401, &json!({"message": "JWT expired"}))
            .error_for_status()
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Unauthorized (401): JWT expired");

        let err = make_response(500, b"boom").error_for_status().unwrap_err();
        assert!(matches!(err, DbError::Http { status: 500, ref message } if message == "boom"));

        assert!(make_response(201, b"").error_for_status().is_ok());
    }
}
