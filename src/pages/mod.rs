//! Page controllers: one per admin screen.
//!
//! Each page owns a `ListViewModel`, the dialog state around it, and the
//! mutation logic that talks to the gateway and reconciles the list.
//!
//! | Page            | Create        | Update reconcile (default) | Delete reconcile (default) | Search |
//! |-----------------|---------------|----------------------------|----------------------------|--------|
//! | `CustomersPage` | re-fetch      | re-fetch                   | re-fetch                   | inert  |
//! | `OrdersPage`    | re-fetch      | echo patch                 | local remove               | wired  |
//! | `ServicesPage`  | re-fetch      | re-fetch                   | re-fetch                   | none   |
//!
//! Every action publishes exactly one notification describing how it
//! settled, and returns the same outcome to the caller.

pub mod customers;
pub mod dialog;
pub mod orders;
pub mod services;

use serde_json::Value;

use crate::config::ReconcilePolicy;
use crate::errors::ConsoleError;
use crate::models::Resource;
use crate::notify::{Notification, Notifier};
use crate::view::ListViewModel;

pub use customers::CustomersPage;
pub use dialog::{CreateDialog, DeleteConfirmation, EditDialog};
pub use orders::OrdersPage;
pub use services::ServicesPage;

/// How a resource folds a backend echo into its local copy.
pub trait EchoPatch: Resource {
    /// Apply `echo` to `self`. Returns false when the echo is unusable.
    fn apply_echo(&mut self, echo: &Value) -> bool {
        match serde_json::from_value::<Self>(echo.clone()) {
            Ok(fresh) if fresh.id() == self.id() => {
                *self = fresh;
                true
            }
            _ => false,
        }
    }
}

/// Bring the list in line after a successful update of `id`.
///
/// Under `EchoPatch` the echo is applied locally; an unusable echo or a
/// missing entity falls back to a re-fetch. A failing re-fetch has already
/// notified on its own and does not turn the update into a failure.
pub(crate) async fn reconcile_update<T: EchoPatch>(
    list: &ListViewModel<T>,
    policy: ReconcilePolicy,
    id: &T::Id,
    echo: &Value,
) {
    if policy == ReconcilePolicy::EchoPatch {
        let mut usable = false;
        let present = list.patch_by_id(id, |item| usable = item.apply_echo(echo));
        if present && usable {
            return;
        }
        tracing::debug!(resource = T::NOUN, %id, "echo unusable, re-fetching");
    }
    let _ = list.refresh().await;
}

/// Bring the list in line after a successful delete of `id`.
pub(crate) async fn reconcile_delete<T: Resource>(
    list: &ListViewModel<T>,
    policy: ReconcilePolicy,
    id: &T::Id,
) {
    match policy {
        ReconcilePolicy::EchoPatch => {
            list.remove_by_id(id);
        }
        ReconcilePolicy::Refetch => {
            let _ = list.refresh().await;
        }
    }
}

/// Publish the failure and hand the error back.
pub(crate) fn report_failure(notifier: &Notifier, err: ConsoleError, fallback: &str) -> ConsoleError {
    tracing::warn!(error = %err, "{}", fallback);
    notifier.publish(Notification::from_error(&err, fallback));
    err
}

/// Trimmed-empty check used by create forms.
pub(crate) fn require_all(fields: &[&str]) -> Result<(), ConsoleError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        Err(ConsoleError::Validation("All fields are required".to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_all_rejects_blank_fields() {
        assert!(require_all(&["a", "b"]).is_ok());
        assert!(require_all(&["a", "  "]).is_err());
        assert!(require_all(&["", "b"]).is_err());
    }
}
