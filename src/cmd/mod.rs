//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module      | Commands handled        |
//! |-------------|-------------------------|
//! | `customers` | `Customers`             |
//! | `orders`    | `Orders`                |
//! | `services`  | `Services`              |
//! | `auth`      | `Login`, `Logout`       |
//! | `config`    | `Config`                |

pub mod auth;
pub mod config;
pub mod customers;
pub mod orders;
pub mod services;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::broadcast;

use fabclean_admin::config::AdminConfig;
use fabclean_admin::credentials::CredentialStore;
use fabclean_admin::errors::ConsoleError;
use fabclean_admin::gateway::{AuthStrategy, Gateway, HttpGateway};
use fabclean_admin::notify::{Notification, Notifier, drain};
use fabclean_admin::ui;
use fabclean_admin::view::{SortDirection, SortState};

pub use auth::{cmd_login, cmd_logout};
pub use config::cmd_config;
pub use customers::cmd_customers;
pub use orders::cmd_orders;
pub use services::cmd_services;

use super::ListArgs;

/// A failure the user has already seen as a notification.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Reported(#[from] pub ConsoleError);

/// Build the gateway from the effective config and stored credentials.
pub fn connect(config: &AdminConfig) -> Result<Arc<dyn Gateway>> {
    let store = CredentialStore::load(&config.credentials_path())?;
    let auth = AuthStrategy::from_store(config.auth_kind(), &store);
    if !auth.has_credentials() && auth.kind() != fabclean_admin::gateway::AuthKind::None {
        tracing::warn!(
            strategy = %auth.kind(),
            "no stored credential; run `fabclean-admin login` first"
        );
    }
    let gateway = HttpGateway::new(config.base_url(), auth, config.timeout())
        .context("Failed to create HTTP client")?;
    Ok(Arc::new(gateway))
}

/// Notifier plus a receiver subscribed before any action runs.
pub fn notifier() -> (Notifier, broadcast::Receiver<Notification>) {
    let notifier = Notifier::default();
    let rx = notifier.subscribe();
    (notifier, rx)
}

/// Print everything published so far, then map the action result.
pub fn settle<T>(
    rx: &mut broadcast::Receiver<Notification>,
    result: Result<T, ConsoleError>,
) -> Result<T> {
    ui::print_all(&drain(rx));
    result.map_err(|e| Reported(e).into())
}

/// Apply `--sort`/`--desc` to a page's sort state.
pub fn apply_sort<F>(sort: &mut SortState<F>, args: &ListArgs) -> Result<()>
where
    F: Copy + PartialEq + std::str::FromStr<Err = String>,
{
    if let Some(field) = &args.sort {
        let field: F = field.parse().map_err(anyhow::Error::msg)?;
        let direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        *sort = SortState::by(field, direction);
    }
    Ok(())
}

/// The two-step delete gesture on the terminal. `--yes` skips the prompt.
pub fn confirm(prompt: String, yes: bool) -> bool {
    if yes {
        return true;
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Print rows as pretty JSON.
pub fn print_json<T: serde::Serialize>(rows: &[T]) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(rows).context("Failed to serialize rows")?
    );
    Ok(())
}
