use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

use super::auth::AuthStrategy;
use super::{Gateway, Method};
use crate::errors::GatewayError;

/// Gateway over HTTP. Stateless apart from its connection pool.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    auth: AuthStrategy,
}

impl HttpGateway {
    pub fn new(base_url: &str, auth: AuthStrategy, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthStrategy {
        &self.auth
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        self.auth.attach(&mut headers);
        headers
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        tracing::debug!(%method, path, "backend request");

        let mut request = self
            .client
            .request(to_reqwest(method), self.url(path))
            .headers(self.headers());
        if let Some(body) = body {
            let bytes = serde_json::to_vec(&body)
                .map_err(|e| GatewayError::decode(format!("Failed to encode request body: {}", e)))?;
            request = request.body(bytes);
        }

        let response = request.send().await.map_err(|e| {
            GatewayError::transport(format!("{} {} failed: {}", method, path, e))
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            GatewayError::transport(format!("Failed to read response from {}: {}", path, e))
        })?;

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                tracing::warn!(
                    path,
                    auth = %self.auth.kind(),
                    "Unauthorized: credentials are missing or expired, log in again"
                );
            }
            return Err(GatewayError::from_error_body(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            GatewayError::decode(format!("Invalid JSON from {}: {}", path, e))
        })
    }
}
