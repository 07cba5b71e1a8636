//! Persisted client-side credential storage.
//!
//! A small JSON key/value file. Two keys are well known: `token` holds the
//! customer bearer token and `session` holds the admin session cookie.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const TOKEN_KEY: &str = "token";
pub const SESSION_KEY: &str = "session";

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl CredentialStore {
    /// An unbacked store; `save` is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store from `path`. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).with_context(|| {
                    format!("Failed to parse credentials file: {}", path.display())
                })?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// Default location under the user's config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fabclean-admin")
            .join("credentials.json")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create credentials directory: {}", parent.display())
            })?;
        }
        let content =
            serde_json::to_string_pretty(&self.values).context("Failed to serialize credentials")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write credentials file: {}", path.display()))?;
        Ok(())
    }
}
