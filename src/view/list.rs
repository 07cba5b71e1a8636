use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::errors::ConsoleError;
use crate::gateway::{self, Gateway};
use crate::models::Resource;
use crate::notify::{Notification, Notifier};

/// Result of a refresh that reached the backend successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response replaced the authoritative list (holds the new length).
    Applied(usize),
    /// A newer refresh or local mutation already landed; response dropped.
    Stale,
}

struct ListState<T> {
    items: Vec<T>,
    /// Highest ticket whose write is reflected in `items`.
    applied: u64,
    loaded: bool,
}

/// The authoritative client-side copy of one backend collection.
///
/// Every write (refresh result or local patch) carries a ticket from a
/// monotonic counter. A refresh response is applied only if no write with a
/// newer ticket has landed, so a slow response can never clobber fresher
/// state.
pub struct ListViewModel<T: Resource> {
    gateway: Arc<dyn Gateway>,
    notifier: Notifier,
    state: Mutex<ListState<T>>,
    issued: AtomicU64,
    mounted: AtomicBool,
}

impl<T: Resource> ListViewModel<T> {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            state: Mutex::new(ListState {
                items: Vec::new(),
                applied: 0,
                loaded: false,
            }),
            issued: AtomicU64::new(0),
            mounted: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Initial load. Only the first call reaches the backend; later calls
    /// return `Ok(None)`.
    pub async fn mount(&self) -> Result<Option<RefreshOutcome>, ConsoleError> {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.refresh().await.map(Some)
    }

    /// Re-fetch the whole collection and replace the list on success.
    ///
    /// On failure the current list is kept and an error notification is
    /// published.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ConsoleError> {
        let ticket = self.next_ticket();
        match gateway::fetch_list::<T>(self.gateway.as_ref()).await {
            Ok(items) => {
                let mut state = self.lock();
                if ticket < state.applied {
                    tracing::debug!(
                        resource = T::NOUN,
                        ticket,
                        applied = state.applied,
                        "discarding stale list response"
                    );
                    return Ok(RefreshOutcome::Stale);
                }
                let count = items.len();
                state.items = items;
                state.applied = ticket;
                state.loaded = true;
                tracing::debug!(resource = T::NOUN, ticket, count, "list refreshed");
                Ok(RefreshOutcome::Applied(count))
            }
            Err(e) => {
                tracing::warn!(resource = T::NOUN, error = %e, "list refresh failed");
                let err = ConsoleError::from(e);
                self.notifier.publish(Notification::from_error(
                    &err,
                    &format!("Failed to fetch {}s", T::NOUN),
                ));
                Err(err)
            }
        }
    }

    /// Apply a local write. Only a write that changed the list takes a
    /// ticket, so a no-op never marks an in-flight refresh as stale.
    fn write(&self, f: impl FnOnce(&mut Vec<T>) -> bool) -> bool {
        let mut state = self.lock();
        let changed = f(&mut state.items);
        if changed {
            let ticket = self.next_ticket();
            state.applied = state.applied.max(ticket);
        }
        changed
    }

    /// Patch the entity with `id` in place. Returns false if it is absent.
    pub fn patch_by_id(&self, id: &T::Id, f: impl FnOnce(&mut T)) -> bool {
        self.write(|items| match items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        })
    }

    /// Drop the entity with `id`. Returns false if it was absent.
    pub fn remove_by_id(&self, id: &T::Id) -> bool {
        self.write(|items| {
            let before = items.len();
            items.retain(|item| item.id() != id);
            items.len() != before
        })
    }

    /// Snapshot of the authoritative list.
    pub fn items(&self) -> Vec<T> {
        self.lock().items.clone()
    }

    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.lock().items.iter().find(|item| item.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any refresh has succeeded yet.
    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    /// Run `f` against the list without cloning it.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.lock().items)
    }
}
