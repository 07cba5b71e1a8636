//! Console configuration read from `.fabclean/admin.toml`.
//!
//! Values are layered: file → environment → CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:5000"
//! timeout_secs = 30
//!
//! [auth]
//! strategy = "session"          # bearer | session | none
//! credentials_file = "/home/me/.config/fabclean-admin/credentials.json"
//!
//! [reconcile]
//! customers = "refetch"         # refetch | echo_patch
//! orders = "echo_patch"
//! services = "refetch"
//!
//! [logging]
//! level = "warn"
//! json = false
//! ```
//!
//! # Environment
//!
//! | Variable                | Overrides               |
//! |-------------------------|-------------------------|
//! | `FABCLEAN_BASE_URL`     | `backend.base_url`      |
//! | `FABCLEAN_TIMEOUT_SECS` | `backend.timeout_secs`  |
//! | `FABCLEAN_AUTH`         | `auth.strategy`         |
//! | `FABCLEAN_CREDENTIALS`  | `auth.credentials_file` |
//! | `FABCLEAN_LOG_JSON`     | `logging.json`          |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::credentials::CredentialStore;
use crate::gateway::AuthKind;

pub const CONFIG_DIR: &str = ".fabclean";
pub const CONFIG_FILE: &str = "admin.toml";

/// How a page reconciles its list after an update or delete succeeds.
///
/// Creates always re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Re-fetch the whole list from the backend.
    Refetch,
    /// Patch or remove the local entity using what the backend echoed.
    EchoPatch,
}

impl std::fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcilePolicy::Refetch => write!(f, "refetch"),
            ReconcilePolicy::EchoPatch => write!(f, "echo_patch"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Authentication scheme, selected once per deployment.
    #[serde(default)]
    pub strategy: AuthKind,
    /// Where persisted credentials live (defaults under the user config dir).
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    #[serde(default = "refetch")]
    pub customers: ReconcilePolicy,
    #[serde(default = "echo_patch")]
    pub orders: ReconcilePolicy,
    #[serde(default = "refetch")]
    pub services: ReconcilePolicy,
}

fn refetch() -> ReconcilePolicy {
    ReconcilePolicy::Refetch
}

fn echo_patch() -> ReconcilePolicy {
    ReconcilePolicy::EchoPatch
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            customers: refetch(),
            orders: echo_patch(),
            services: refetch(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// The complete admin.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminToml {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AdminToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse admin.toml")
    }

    /// Load from `<config_dir>/admin.toml`, or defaults if it doesn't exist.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize admin.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("FABCLEAN_BASE_URL") {
            self.backend.base_url = url;
        }
        if let Some(secs) = lookup("FABCLEAN_TIMEOUT_SECS") {
            self.backend.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("FABCLEAN_TIMEOUT_SECS is not a number: {}", secs))?;
        }
        if let Some(kind) = lookup("FABCLEAN_AUTH") {
            self.auth.strategy = kind.parse()?;
        }
        if let Some(path) = lookup("FABCLEAN_CREDENTIALS") {
            self.auth.credentials_file = Some(PathBuf::from(path));
        }
        if let Some(json) = lookup("FABCLEAN_LOG_JSON") {
            self.logging.json = json != "false" && json != "0";
        }
        Ok(())
    }

    /// Validate configuration and return warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let url = &self.backend.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(format!("backend.base_url '{}' is not an http(s) URL", url));
        }
        if self.backend.timeout_secs == 0 {
            warnings.push("backend.timeout_secs is 0; every request will time out".to_string());
        }
        if self.auth.strategy == AuthKind::None {
            warnings.push(
                "auth.strategy is 'none'; admin endpoints will answer 401".to_string(),
            );
        }
        if self.reconcile.customers == ReconcilePolicy::EchoPatch {
            warnings.push(
                "reconcile.customers = echo_patch: local list may drift from the backend"
                    .to_string(),
            );
        }
        warnings
    }
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub auth: Option<AuthKind>,
    pub credentials_file: Option<PathBuf>,
}

/// Effective runtime configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub config_dir: PathBuf,
    pub toml: AdminToml,
}

pub fn get_config_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_DIR)
}

impl AdminConfig {
    /// Resolve file → process environment → CLI.
    pub fn load(project_dir: &Path, overrides: &CliOverrides) -> Result<Self> {
        Self::load_with_env(project_dir, overrides, |key| std::env::var(key).ok())
    }

    pub fn load_with_env(
        project_dir: &Path,
        overrides: &CliOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config_dir = get_config_dir(project_dir);
        let mut toml = AdminToml::load_or_default(&config_dir)?;
        toml.apply_env(lookup)?;

        if let Some(url) = &overrides.base_url {
            toml.backend.base_url = url.clone();
        }
        if let Some(kind) = overrides.auth {
            toml.auth.strategy = kind;
        }
        if let Some(path) = &overrides.credentials_file {
            toml.auth.credentials_file = Some(path.clone());
        }

        Ok(Self { config_dir, toml })
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn base_url(&self) -> &str {
        &self.toml.backend.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.backend.timeout_secs)
    }

    pub fn auth_kind(&self) -> AuthKind {
        self.toml.auth.strategy
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.toml
            .auth
            .credentials_file
            .clone()
            .unwrap_or_else(CredentialStore::default_path)
    }

    pub fn reconcile(&self) -> &ReconcileConfig {
        &self.toml.reconcile
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.toml.logging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config =
            AdminConfig::load_with_env(dir.path(), &CliOverrides::default(), env(&[])).unwrap();
        assert_eq!(config.base_url(), "http://localhost:5000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.auth_kind(), AuthKind::Session);
        assert_eq!(config.reconcile().customers, ReconcilePolicy::Refetch);
        assert_eq!(config.reconcile().orders, ReconcilePolicy::EchoPatch);
    }

    #[test]
    fn parse_partial_file_fills_defaults() {
        let toml = AdminToml::parse(
            r#"
            [backend]
            base_url = "https://admin.example.com"

            [reconcile]
            orders = "refetch"
            "#,
        )
        .unwrap();
        assert_eq!(toml.backend.base_url, "https://admin.example.com");
        assert_eq!(toml.backend.timeout_secs, 30);
        assert_eq!(toml.reconcile.orders, ReconcilePolicy::Refetch);
        assert_eq!(toml.reconcile.services, ReconcilePolicy::Refetch);
        assert_eq!(toml.logging.level, "warn");
    }

    #[test]
    fn invalid_strategy_is_rejected() {
        assert!(AdminToml::parse("[auth]\nstrategy = \"magic\"").is_err());
    }

    #[test]
    fn layering_file_then_env_then_cli() {
        let dir = TempDir::new().unwrap();
        let config_dir = get_config_dir(dir.path());
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join(CONFIG_FILE),
            "[backend]\nbase_url = \"http://file:1\"\ntimeout_secs = 5\n[auth]\nstrategy = \"none\"\n",
        )
        .unwrap();

        let from_env = AdminConfig::load_with_env(
            dir.path(),
            &CliOverrides::default(),
            env(&[("FABCLEAN_BASE_URL", "http://env:2"), ("FABCLEAN_AUTH", "bearer")]),
        )
        .unwrap();
        assert_eq!(from_env.base_url(), "http://env:2");
        assert_eq!(from_env.auth_kind(), AuthKind::Bearer);
        assert_eq!(from_env.timeout(), Duration::from_secs(5));

        let overrides = CliOverrides {
            base_url: Some("http://cli:3".into()),
            auth: Some(AuthKind::Session),
            credentials_file: None,
        };
        let from_cli = AdminConfig::load_with_env(
            dir.path(),
            &overrides,
            env(&[("FABCLEAN_BASE_URL", "http://env:2"), ("FABCLEAN_AUTH", "bearer")]),
        )
        .unwrap();
        assert_eq!(from_cli.base_url(), "http://cli:3");
        assert_eq!(from_cli.auth_kind(), AuthKind::Session);
    }

    #[test]
    fn bad_timeout_env_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = AdminConfig::load_with_env(
            dir.path(),
            &CliOverrides::default(),
            env(&[("FABCLEAN_TIMEOUT_SECS", "soon")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut toml = AdminToml::default();
        toml.auth.strategy = AuthKind::Bearer;
        toml.logging.json = true;
        toml.save(&path).unwrap();

        let loaded = AdminToml::load(&path).unwrap();
        assert_eq!(loaded.auth.strategy, AuthKind::Bearer);
        assert!(loaded.logging.json);
    }

    #[test]
    fn validate_flags_suspicious_settings() {
        let mut toml = AdminToml::default();
        assert!(toml.validate().is_empty());
        toml.backend.base_url = "localhost:5000".into();
        toml.backend.timeout_secs = 0;
        toml.auth.strategy = AuthKind::None;
        assert_eq!(toml.validate().len(), 3);
    }
}
