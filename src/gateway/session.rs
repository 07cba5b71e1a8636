use std::time::Duration;

use reqwest::header::SET_COOKIE;
use serde::{Deserialize, Serialize};

use super::{Gateway, Method};
use crate::errors::GatewayError;
use crate::models::Customer;

const ADMIN_LOGIN_PATH: &str = "/admin/login";
const ADMIN_LOGOUT_PATH: &str = "/admin/logout";
const CUSTOMER_LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Serialize)]
struct AdminLoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CustomerLoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response from the customer login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerLogin {
    pub token: String,
    pub customer: Customer,
}

/// Obtains credentials for the gateway. Lives outside `HttpGateway` so the
/// data layer never mints or refreshes credentials itself.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Log in as the back-office admin. Returns the session cookie to store.
    pub async fn admin_login(&self, username: &str, password: &str) -> Result<String, GatewayError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, ADMIN_LOGIN_PATH))
            .json(&AdminLoginRequest { username, password })
            .send()
            .await
            .map_err(|e| GatewayError::transport(format!("Admin login request failed: {}", e)))?;

        let status = resp.status();
        let cookies: Vec<String> = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(cookie_pair)
            .collect();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(GatewayError::from_error_body(status.as_u16(), &text));
        }
        if cookies.is_empty() {
            return Err(GatewayError::decode(
                "Admin login succeeded but the backend set no session cookie",
            ));
        }
        tracing::info!("admin session established");
        Ok(cookies.join("; "))
    }

    /// Log in as a customer. Returns the bearer token and profile.
    pub async fn customer_login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CustomerLogin, GatewayError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, CUSTOMER_LOGIN_PATH))
            .json(&CustomerLoginRequest { email, password })
            .send()
            .await
            .map_err(|e| GatewayError::transport(format!("Customer login request failed: {}", e)))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(GatewayError::from_error_body(status.as_u16(), &text));
        }
        serde_json::from_str(&text)
            .map_err(|e| GatewayError::decode(format!("Unexpected login response: {}", e)))
    }
}

/// End the admin session on the backend. The caller clears local storage.
pub async fn admin_logout(gateway: &dyn Gateway) -> Result<(), GatewayError> {
    gateway.send(Method::Post, ADMIN_LOGOUT_PATH, None).await?;
    Ok(())
}

/// `name=value` part of a `Set-Cookie` header, without attributes.
fn cookie_pair(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    if pair.contains('=') && !pair.starts_with('=') {
        Some(pair.to_string())
    } else {
        None
    }
}
