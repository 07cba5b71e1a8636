use std::sync::Arc;

use crate::config::ReconcilePolicy;
use crate::errors::ConsoleError;
use crate::gateway::{self, Gateway};
use crate::models::{NewService, Resource, Service, ServiceField, ServiceUpdate};
use crate::notify::{Notification, Notifier};
use crate::view::{ListViewModel, RefreshOutcome, SortState, project};

use super::{
    CreateDialog, DeleteConfirmation, EchoPatch, EditDialog, reconcile_delete, reconcile_update,
    report_failure, require_all,
};

impl EchoPatch for Service {}

/// Service catalog screen.
pub struct ServicesPage {
    list: ListViewModel<Service>,
    policy: ReconcilePolicy,
    pub sort: SortState<ServiceField>,
    pub create: CreateDialog<NewService>,
    pub edit: EditDialog<Service>,
    pub delete: DeleteConfirmation<String>,
}

impl ServicesPage {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Notifier, policy: ReconcilePolicy) -> Self {
        Self {
            list: ListViewModel::new(gateway, notifier),
            policy,
            sort: SortState::default(),
            create: CreateDialog::default(),
            edit: EditDialog::default(),
            delete: DeleteConfirmation::default(),
        }
    }

    pub fn list(&self) -> &ListViewModel<Service> {
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

    pub fn displayed(&self) -> Vec<Service> {
        self.list.with_items(|items| project(items, "", &self.sort))
    }

    pub fn toggle_sort(&mut self, field: ServiceField) {
        self.sort.toggle(field);
    }

    pub async fn create_service(&mut self) -> Result<(), ConsoleError> {
        let form = self.create.form.clone();
        let checked = require_all(&[&form.name]).and_then(|()| match form.price {
            Some(p) if p.is_finite() && p >= 0.0 => Ok(()),
            _ => Err(ConsoleError::Validation(
                "Name and price are required".to_string(),
            )),
        });
        if let Err(e) = checked {
            return Err(report_failure(self.notifier(), e, "Failed to create service"));
        }
        let body = NewService {
            name: form.name.trim().to_string(),
            price: form.price,
            duration: form.duration.filter(|d| !d.trim().is_empty()),
        };

        match gateway::create(self.list.gateway(), Service::COLLECTION_PATH, &body).await {
            Ok(_) => {
                let _ = self.list.refresh().await;
                tracing::info!(name = %body.name, "service created");
                self.notifier().publish(
                    Notification::success("Service Created")
                        .with_description(format!("{} added to the catalog", body.name)),
                );
                self.create.clear();
                Ok(())
            }
            Err(e) => Err(report_failure(
                self.notifier(),
                e.into(),
                "Failed to create service",
            )),
        }
    }

    pub fn open_edit(&mut self, id: &str) -> bool {
        match self.list.get(&id.to_string()) {
            Some(service) => {
                self.edit.open(service);
                true
            }
            None => false,
        }
    }

    pub async fn save_edit(&mut self) -> Result<(), ConsoleError> {
        let Some(draft) = self.edit.take() else {
            return Err(ConsoleError::NoSelection("service"));
        };
        let body = ServiceUpdate::from(&draft);
        let checked = require_all(&[&body.name]).and_then(|()| {
            if body.price.is_finite() && body.price >= 0.0 {
                Ok(())
            } else {
                Err(ConsoleError::Validation(
                    "Price must be a non-negative amount".to_string(),
                ))
            }
        });
        if let Err(e) = checked {
            return Err(report_failure(self.notifier(), e, "Failed to update service"));
        }

        match gateway::update::<Service, _>(self.list.gateway(), &draft.id, &body).await {
            Ok(echo) => {
                reconcile_update(&self.list, self.policy, &draft.id, &echo).await;
                tracing::info!(id = %draft.id, "service updated");
                self.notifier()
                    .publish(Notification::success("Service updated successfully"));
                Ok(())
            }
            Err(e) => Err(report_failure(
                self.notifier(),
                e.into(),
                "Failed to update service",
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
            return Err(ConsoleError::NoSelection("service"));
        };

        match gateway::delete::<Service>(self.list.gateway(), &id).await {
            Ok(()) => {
                reconcile_delete(&self.list, self.policy, &id).await;
                tracing::info!(%id, "service deleted");
                self.notifier().publish(Notification::success("Service deleted"));
                Ok(())
            }
            Err(e) => Err(report_failure(
                self.notifier(),
                e.into(),
                "Failed to delete service",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Method;
    use crate::notify::drain;
    use crate::testing::ScriptedGateway;
    use serde_json::{Value, json};

    fn catalog() -> Value {
        json!([
            {"id": "S1", "name": "Wash & Fold", "price": 80.0, "duration": "24h", "status": "Active", "usage_count": 12},
            {"id": "S2", "name": "Dry Clean", "price": 250.0, "duration": null, "usage_count": 3}
        ])
    }

    fn page(gw: &Arc<ScriptedGateway>) -> ServicesPage {
        ServicesPage::new(
            gw.clone() as Arc<dyn Gateway>,
            Notifier::default(),
            ReconcilePolicy::Refetch,
        )
    }

    #[tokio::test]
    async fn list_is_fetched_from_public_path() {
        let gw = Arc::new(ScriptedGateway::new());
        gw.push_ok(catalog());
        let page = page(&gw);
        page.mount().await.unwrap();

        assert_eq!(gw.calls()[0].path, "/api/services");
        assert_eq!(page.list().get(&"S2".to_string()).unwrap().status, "Active");
    }

    #[tokio::test]
    async fn create_requires_price() {
        let gw = Arc::new(ScriptedGateway::new());
        let mut page = page(&gw);
        let mut rx = page.list().notifier().subscribe();
        page.create.form = NewService {
            name: "Steam Press".into(),
            price: None,
            duration: None,
        };

        assert!(page.create_service().await.is_err());
        assert_eq!(gw.call_count(), 0);
        assert_eq!(drain(&mut rx)[0].title, "Validation Error");
    }

    #[tokio::test]
    async fn create_posts_to_admin_collection() {
        let gw = Arc::new(ScriptedGateway::new());
        gw.push_ok(json!({"id": "S3", "name": "Steam Press", "price": 40.0}));
        gw.push_ok(catalog());
        let mut page = page(&gw);
        page.create.form = NewService {
            name: "Steam Press".into(),
            price: Some(40.0),
            duration: Some(" ".into()),
        };

        page.create_service().await.unwrap();
        let calls = gw.calls();
        assert_eq!(calls[0].path, "/admin/api/services");
        assert_eq!(calls[0].body, Some(json!({"name": "Steam Press", "price": 40.0})));
        assert_eq!(calls[1].path, "/api/services");
    }

    #[tokio::test]
    async fn update_and_delete_refetch() {
        let gw = Arc::new(ScriptedGateway::new());
        gw.push_ok(catalog());
        gw.push_ok(json!({"message": "Service updated"}));
        gw.push_ok(catalog());
        gw.push_ok(json!({"message": "Service deleted"}));
        gw.push_ok(json!([]));
        let mut page = page(&gw);
        let mut rx = page.list().notifier().subscribe();
        page.mount().await.unwrap();

        assert!(page.open_edit("S1"));
        page.edit.draft_mut().unwrap().price = 90.0;
        page.save_edit().await.unwrap();

        page.request_delete("S1");
        page.confirm_delete().await.unwrap();
        assert!(page.list().is_empty());

        let calls = gw.calls();
        assert_eq!(calls[1].method, Method::Put);
        assert_eq!(calls[1].body.as_ref().unwrap()["price"], 90.0);
        assert_eq!(calls[3].method, Method::Delete);
        assert_eq!(calls[3].path, "/admin/api/services/S1");

        let titles: Vec<_> = drain(&mut rx).into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Service updated successfully", "Service deleted"]);
    }

    #[tokio::test]
    async fn sort_by_usage() {
        let gw = Arc::new(ScriptedGateway::new());
        gw.push_ok(catalog());
        let mut page = page(&gw);
        page.mount().await.unwrap();

        page.toggle_sort(ServiceField::UsageCount);
        assert_eq!(page.displayed()[0].id, "S2");
    }
}
