//! Remote data gateway: the only component that talks to the backend.
//!
//! ## Module Map
//!
//! | Module    | Responsibility                                             |
//! |-----------|------------------------------------------------------------|
//! | `auth`    | `AuthStrategy`: how credentials are attached to requests   |
//! | `http`    | `HttpGateway`: reqwest implementation of `Gateway`         |
//! | `session` | `AuthClient`: admin/customer login and logout calls        |
//!
//! Page controllers only ever see `dyn Gateway`, so tests can swap in a
//! scripted double without touching the network.

pub mod auth;
pub mod http;
pub mod session;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::GatewayError;
use crate::models::Resource;

pub use auth::{AuthKind, AuthStrategy};
pub use http::HttpGateway;
pub use session::AuthClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstraction over backend I/O for testability.
/// Real implementation: `HttpGateway`.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send a JSON request to `path` (relative to the backend root).
    ///
    /// Resolves to the decoded JSON body, or `Value::Null` for an empty
    /// 2xx body.
    async fn send(&self, method: Method, path: &str, body: Option<Value>)
    -> Result<Value, GatewayError>;
}

pub fn encode<B: Serialize>(body: &B) -> Result<Value, GatewayError> {
    serde_json::to_value(body)
        .map_err(|e| GatewayError::decode(format!("Failed to encode request body: {}", e)))
}

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value)
        .map_err(|e| GatewayError::decode(format!("Unexpected response shape: {}", e)))
}

/// GET the resource's list path.
pub async fn fetch_list<T: Resource>(gateway: &dyn Gateway) -> Result<Vec<T>, GatewayError> {
    let value = gateway.send(Method::Get, T::LIST_PATH, None).await?;
    decode(value)
}

/// POST `body` to `path`, returning the backend's echo.
pub async fn create<B: Serialize + Sync>(
    gateway: &dyn Gateway,
    path: &str,
    body: &B,
) -> Result<Value, GatewayError> {
    gateway.send(Method::Post, path, Some(encode(body)?)).await
}

/// PUT `body` to the member path of `id`, returning the backend's echo.
pub async fn update<T: Resource, B: Serialize + Sync>(
    gateway: &dyn Gateway,
    id: &T::Id,
    body: &B,
) -> Result<Value, GatewayError> {
    gateway
        .send(Method::Put, &T::member_path(id), Some(encode(body)?))
        .await
}

pub async fn delete<T: Resource>(gateway: &dyn Gateway, id: &T::Id) -> Result<(), GatewayError> {
    gateway.send(Method::Delete, &T::member_path(id), None).await?;
    Ok(())
}
