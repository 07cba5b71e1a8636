//! Transient user-facing notifications (the console's stand-in for toasts).
//!
//! Pages publish on a `tokio::sync::broadcast` channel; front ends subscribe
//! and render however they like. Publishing with no subscriber is fine.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::errors::ConsoleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub variant: Variant,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: Variant::Default,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: Some(description.into()),
            variant: Variant::Destructive,
        }
    }

    /// Notification for a failed action. Validation failures get their own
    /// title; everything else is reported as "Error" with the normalized
    /// message, or `fallback` when the message is empty.
    pub fn from_error(err: &ConsoleError, fallback: &str) -> Self {
        match err {
            ConsoleError::Validation(msg) => Self {
                title: "Validation Error".to_string(),
                description: Some(msg.clone()),
                variant: Variant::Destructive,
            },
            other => {
                let msg = other.to_string();
                if msg.is_empty() {
                    Self::error(fallback)
                } else {
                    Self::error(msg)
                }
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

/// Cloneable publishing handle.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn publish(&self, notification: Notification) {
        if notification.is_error() {
            tracing::debug!(title = %notification.title, description = ?notification.description, "error notification");
        }
        let _ = self.tx.send(notification); // Ignore error if no receivers
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Drain everything currently buffered on a receiver.
pub fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(n) => out.push(n),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    out
}
