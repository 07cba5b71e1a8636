use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::config::ReconcilePolicy;
use crate::errors::ConsoleError;
use crate::gateway::{self, Gateway};
use crate::models::{NewOrder, ORDER_INTAKE_PATH, Order, OrderEcho, OrderField, OrderUpdate};
use crate::notify::{Notification, Notifier};
use crate::view::{ListViewModel, RefreshOutcome, SortState, project};

use super::{
    CreateDialog, DeleteConfirmation, EchoPatch, EditDialog, reconcile_delete, reconcile_update,
    report_failure, require_all,
};

impl EchoPatch for Order {
    /// Only the admin-mutable fields the echo carries are applied.
    fn apply_echo(&mut self, echo: &Value) -> bool {
        match OrderEcho::parse(echo) {
            Some(patch) => {
                patch.apply_to(self);
                true
            }
            None => false,
        }
    }
}

/// Orders screen: searchable table, details view, edit and delete.
pub struct OrdersPage {
    list: ListViewModel<Order>,
    policy: ReconcilePolicy,
    pub search: String,
    pub sort: SortState<OrderField>,
    pub create: CreateDialog<NewOrder>,
    pub edit: EditDialog<Order>,
    pub delete: DeleteConfirmation<String>,
}

impl OrdersPage {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Notifier, policy: ReconcilePolicy) -> Self {
        Self {
            list: ListViewModel::new(gateway, notifier),
            policy,
            search: String::new(),
            sort: SortState::default(),
            create: CreateDialog::default(),
            edit: EditDialog::default(),
            delete: DeleteConfirmation::default(),
        }
    }

    pub fn list(&self) -> &ListViewModel<Order> {
        &self.list
    }

    fn notifier(&self) -> &Notifier {
        self.list.notifier()
    }

    pub async fn mount(&self) -> Result<Option<RefreshOutcome>, ConsoleError> {
        self.list.mount().await
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, ConsoleError> {
        self.list.refresh().await
    }

    /// The explicit "Refresh" button: same as `refresh` plus a success notice.
    pub async fn refresh_with_notice(&self) -> Result<RefreshOutcome, ConsoleError> {
        let outcome = self.list.refresh().await?;
        self.notifier()
            .publish(Notification::success("Refreshed").with_description("Orders updated."));
        Ok(outcome)
    }

    pub fn displayed(&self) -> Vec<Order> {
        self.list
            .with_items(|items| project(items, &self.search, &self.sort))
    }

    pub fn toggle_sort(&mut self, field: OrderField) {
        self.sort.toggle(field);
    }

    /// Read-only details for one order.
    pub fn view(&self, id: &str) -> Option<Order> {
        self.list.get(&id.to_string())
    }

    /// Submit the new-order form to the public intake endpoint.
    pub async fn create_order(&mut self) -> Result<(), ConsoleError> {
        let form = self.create.form.clone();
        let checked = require_all(&[&form.customer_name, &form.customer_phone, &form.service_id])
            .and_then(|()| {
                if form.total.is_finite() && form.total > 0.0 {
                    Ok(())
                } else {
                    Err(ConsoleError::Validation(
                        "Total must be greater than zero".to_string(),
                    ))
                }
            })
            .and_then(|()| validate_pickup_date(&form.pickup_date));
        if let Err(e) = checked {
            return Err(report_failure(self.notifier(), e, "Failed to create order"));
        }

        match gateway::create(self.list.gateway(), ORDER_INTAKE_PATH, &form).await {
            Ok(echo) => {
                let _ = self.list.refresh().await;
                let id = echo
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                tracing::info!(%id, customer = %form.customer_name, "order created");
                let mut note = Notification::success("Order Created");
                if !id.is_empty() {
                    note = note.with_description(format!("Order {} created.", id));
                }
                self.notifier().publish(note);
                self.create.clear();
                Ok(())
            }
            Err(e) => Err(report_failure(
                self.notifier(),
                e.into(),
                "Failed to create order",
            )),
        }
    }

    pub fn open_edit(&mut self, id: &str) -> bool {
        match self.view(id) {
            Some(order) => {
                self.edit.open(order);
                true
            }
            None => false,
        }
    }

    /// Send pickup date, total and special instructions for the order in
    /// the edit dialog. The dialog closes however the call settles.
    pub async fn save_edit(&mut self) -> Result<(), ConsoleError> {
        let Some(draft) = self.edit.take() else {
            return Err(ConsoleError::NoSelection("order"));
        };
        let body = OrderUpdate::from(&draft);
        if let Err(e) = validate_update(&body) {
            return Err(report_failure(self.notifier(), e, "Failed to update order"));
        }

        match gateway::update::<Order, _>(self.list.gateway(), &draft.id, &body).await {
            Ok(echo) => {
                reconcile_update(&self.list, self.policy, &draft.id, &echo).await;
                tracing::info!(id = %draft.id, total = body.total, "order updated");
                self.notifier().publish(
                    Notification::success("Updated")
                        .with_description(format!("Order {} updated.", draft.id)),
                );
                Ok(())
            }
            Err(e) => Err(report_failure(
                self.notifier(),
                e.into(),
                "Failed to update order",
            )),
        }
    }

    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.delete.request(id.into());
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }

    pub async fn confirm_delete(&mut self) -> Result<(), ConsoleError> {
        let Some(id) = self.delete.take() else {
            return Err(ConsoleError::NoSelection("order"));
        };

        match gateway::delete::<Order>(self.list.gateway(), &id).await {
            Ok(()) => {
                reconcile_delete(&self.list, self.policy, &id).await;
                tracing::info!(%id, "order deleted");
                self.notifier().publish(
                    Notification::success("Deleted").with_description(format!("Order {} deleted.", id)),
                );
                Ok(())
            }
            Err(e) => Err(report_failure(
                self.notifier(),
                e.into(),
                "Failed to delete order",
            )),
        }
    }
}

fn validate_update(update: &OrderUpdate) -> Result<(), ConsoleError> {
    if !update.total.is_finite() || update.total < 0.0 {
        return Err(ConsoleError::Validation(
            "Total must be a non-negative amount".to_string(),
        ));
    }
    validate_pickup_date(update.pickup_date.as_deref().unwrap_or(""))
}

/// Empty is allowed. Otherwise accepts `YYYY-MM-DD`, a local
/// `YYYY-MM-DDTHH:MM[:SS]`, or RFC 3339.
fn validate_pickup_date(raw: &str) -> Result<(), ConsoleError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(());
    }
    let parses = NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").is_ok()
        || DateTime::parse_from_rfc3339(raw).is_ok();
    if parses {
        Ok(())
    } else {
        Err(ConsoleError::Validation(format!(
            "Invalid pickup date: {}",
            raw
        )))
    }
}
