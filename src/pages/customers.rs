use std::sync::Arc;

use crate::config::ReconcilePolicy;
use crate::errors::ConsoleError;
use crate::gateway::{self, Gateway};
use crate::models::{Customer, CustomerField, NewCustomer, Resource};
use crate::notify::{Notification, Notifier};
use crate::view::{ListViewModel, RefreshOutcome, SortState, project};

use super::{
    CreateDialog, DeleteConfirmation, EchoPatch, EditDialog, reconcile_delete, reconcile_update,
    report_failure, require_all,
};

impl EchoPatch for Customer {}

/// Customers screen: KPI count, table, add/edit/delete dialogs.
pub struct CustomersPage {
    list: ListViewModel<Customer>,
    policy: ReconcilePolicy,
    /// Bound to the search box. Customer search is not wired to the
    /// projection, so this never narrows the table.
    pub search: String,
    pub sort: SortState<CustomerField>,
    pub create: CreateDialog<NewCustomer>,
    pub edit: EditDialog<Customer>,
    pub delete: DeleteConfirmation<i64>,
}

impl CustomersPage {
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

    pub fn list(&self) -> &ListViewModel<Customer> {
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

    /// "Total Customers" figure.
    pub fn total(&self) -> usize {
        self.list.len()
    }

    pub fn displayed(&self) -> Vec<Customer> {
        self.list
            .with_items(|items| project(items, &self.search, &self.sort))
    }

    pub fn toggle_sort(&mut self, field: CustomerField) {
        self.sort.toggle(field);
    }

    fn validate_new(form: &NewCustomer) -> Result<(), ConsoleError> {
        require_all(&[&form.name, &form.email, &form.phone])?;
        validate_email(&form.email)
    }

    /// Phone may be blank on an edit; the stored column is nullable.
    fn validate_edit(draft: &Customer) -> Result<(), ConsoleError> {
        require_all(&[&draft.name, &draft.email])?;
        validate_email(&draft.email)
    }

    /// Submit the add-customer form.
    ///
    /// Nothing is sent when a field is blank. On success the list is
    /// re-fetched and the form cleared; the dialog stays open either way.
    pub async fn create_customer(&mut self) -> Result<(), ConsoleError> {
        let form = self.create.form.clone();
        if let Err(e) = Self::validate_new(&form) {
            return Err(report_failure(self.notifier(), e, "Failed to create customer"));
        }
        let body = NewCustomer {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
        };

        match gateway::create(self.list.gateway(), Customer::COLLECTION_PATH, &body).await {
            Ok(_) => {
                let _ = self.list.refresh().await;
                tracing::info!(email = %body.email, "customer created");
                self.notifier().publish(
                    Notification::success("Customer Created")
                        .with_description(format!("Welcome email sent to {}", body.email)),
                );
                self.create.clear();
                Ok(())
            }
            Err(e) => Err(report_failure(
                self.notifier(),
                e.into(),
                "Failed to create customer",
            )),
        }
    }

    /// Open the edit dialog on a copy of customer `id`.
    pub fn open_edit(&mut self, id: i64) -> bool {
        match self.list.get(&id) {
            Some(customer) => {
                self.edit.open(customer);
                true
            }
            None => false,
        }
    }

    /// Send the edited customer in full. The dialog closes however the
    /// call settles.
    pub async fn save_edit(&mut self) -> Result<(), ConsoleError> {
        let Some(mut draft) = self.edit.take() else {
            return Err(ConsoleError::NoSelection("customer"));
        };
        if let Err(e) = Self::validate_edit(&draft) {
            return Err(report_failure(self.notifier(), e, "Failed to update customer"));
        }
        draft.name = draft.name.trim().to_string();
        draft.email = draft.email.trim().to_string();
        draft.phone = draft.phone.trim().to_string();

        match gateway::update::<Customer, _>(self.list.gateway(), &draft.id, &draft).await {
            Ok(echo) => {
                reconcile_update(&self.list, self.policy, &draft.id, &echo).await;
                tracing::info!(id = draft.id, "customer updated");
                self.notifier()
                    .publish(Notification::success("Customer updated successfully"));
                Ok(())
            }
            Err(e) => Err(report_failure(
                self.notifier(),
                e.into(),
                "Failed to update customer",
            )),
        }
    }

    /// First step of the delete gesture.
    pub fn request_delete(&mut self, id: i64) {
        self.delete.request(id);
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }

    /// Second step: perform the pending delete. The confirmation closes
    /// however the call settles.
    pub async fn confirm_delete(&mut self) -> Result<(), ConsoleError> {
        let Some(id) = self.delete.take() else {
            return Err(ConsoleError::NoSelection("customer"));
        };

        match gateway::delete::<Customer>(self.list.gateway(), &id).await {
            Ok(()) => {
                reconcile_delete(&self.list, self.policy, &id).await;
                tracing::info!(id, "customer deleted");
                self.notifier().publish(Notification::success("Customer deleted"));
                Ok(())
            }
            Err(e) => Err(report_failure(
                self.notifier(),
                e.into(),
                "Failed to delete customer",
            )),
        }
    }
}

fn validate_email(email: &str) -> Result<(), ConsoleError> {
    if looks_like_email(email.trim()) {
        Ok(())
    } else {
        Err(ConsoleError::Validation(
            "Enter a valid email address".to_string(),
        ))
    }
}

/// `local@domain.tld` with no whitespace.
fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && domain.contains('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}
