use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::credentials::{CredentialStore, SESSION_KEY, TOKEN_KEY};

/// Which authentication scheme the deployment uses.
///
/// | Kind      | Attached header                     | Credential key |
/// |-----------|-------------------------------------|----------------|
/// | `Bearer`  | `Authorization: Bearer <token>`     | `token`        |
/// | `Session` | `Cookie: <session cookie>`          | `session`      |
/// | `None`    | nothing                             | –              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    Bearer,
    #[default]
    Session,
    None,
}

impl std::fmt::Display for AuthKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthKind::Bearer => write!(f, "bearer"),
            AuthKind::Session => write!(f, "session"),
            AuthKind::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for AuthKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bearer" | "token" | "jwt" => Ok(AuthKind::Bearer),
            "session" | "cookie" => Ok(AuthKind::Session),
            "none" | "anonymous" => Ok(AuthKind::None),
            _ => anyhow::bail!(
                "Invalid auth strategy '{}'. Valid values: bearer, session, none",
                s
            ),
        }
    }
}

/// Credentials resolved once at gateway construction.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    Bearer(Option<String>),
    Session(Option<String>),
    Anonymous,
}

impl AuthStrategy {
    pub fn from_store(kind: AuthKind, store: &CredentialStore) -> Self {
        match kind {
            AuthKind::Bearer => Self::Bearer(store.get(TOKEN_KEY).map(str::to_string)),
            AuthKind::Session => Self::Session(store.get(SESSION_KEY).map(str::to_string)),
            AuthKind::None => Self::Anonymous,
        }
    }

    pub fn kind(&self) -> AuthKind {
        match self {
            Self::Bearer(_) => AuthKind::Bearer,
            Self::Session(_) => AuthKind::Session,
            Self::Anonymous => AuthKind::None,
        }
    }

    pub fn has_credentials(&self) -> bool {
        matches!(self, Self::Bearer(Some(_)) | Self::Session(Some(_)))
    }

    /// Add this strategy's headers. Absent credentials attach nothing.
    pub fn attach(&self, headers: &mut HeaderMap) {
        let (name, value) = match self {
            Self::Bearer(Some(token)) => (AUTHORIZATION, format!("Bearer {}", token)),
            Self::Session(Some(cookie)) => (COOKIE, cookie.clone()),
            _ => return,
        };
        match HeaderValue::from_str(&value) {
            Ok(mut v) => {
                v.set_sensitive(true);
                headers.insert(name, v);
            }
            Err(_) => tracing::warn!(kind = %self.kind(), "stored credential is not a valid header value, sending request without it"),
        }
    }
}

impl std::fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.has_credentials() { "<redacted>" } else { "<none>" };
        write!(f, "AuthStrategy({}, {})", self.kind(), state)
    }
}
