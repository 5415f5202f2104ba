//! Pluggable request transport.

use crate::{DbError, Request, Response};
use std::sync::Arc;

/// Sends a [`Request`] and returns the raw [`Response`].
///
/// Error statuses are returned as responses; only failures to get a
/// response at all are errors.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Response, DbError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &Request) -> Result<Response, DbError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &Request) -> Result<Response, DbError> {
        (**self).send(request)
    }
}

#[cfg(feature = "http")]
pub use self::http_transport::HttpTransport;

#[cfg(feature = "http")]
mod http_transport {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Blocking HTTP transport built on `reqwest`.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::blocking::Client,
    }

    impl HttpTransport {
        pub fn new(timeout: Duration) -> Result<Self, DbError> {
            let client = reqwest::blocking::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(timeout)
                .build()
                .map_err(|e| DbError::Transport(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl Transport for HttpTransport {
        fn send(&self, request: &Request) -> Result<Response, DbError> {
            let mut builder = self.client.request(request.method.clone(), &request.url);
            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let response = builder
                .send()
                .map_err(|e| DbError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
                .collect();
            let body = response
                .bytes()
                .map_err(|e| DbError::Transport(e.to_string()))?
                .to_vec();

            tracing::debug!(method = %request.method, url = %request.url, status, "http request");
            Ok(Response::new(status, headers, body))
        }
    }
}
