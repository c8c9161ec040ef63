//! Notifier context: the app-wide operation status.
//!
//! Wraps one [`StatusStore`] and mirrors its status into a signal so the
//! overlay re-renders on every change, including timer-driven auto-close.

use dioxus::prelude::*;
use futures::StreamExt;
use std::time::Duration;

use crate::notifier::{timer, OperationStatus, OperationType, StatusKind, StatusStore, StatusTicket};

#[derive(Clone, Copy)]
pub struct Notifier {
    store: Signal<StatusStore>,
    status: Signal<OperationStatus>,
}

impl Notifier {
    /// Shared store, for code that drives the notifier outside components
    pub fn store(&self) -> StatusStore {
        self.store.peek().clone()
    }

    /// Current status (subscribes the caller)
    pub fn status(&self) -> OperationStatus {
        (self.status)()
    }

    pub fn loading(&self, message: impl Into<String>) -> StatusTicket {
        self.store()
            .show(StatusKind::Loading, Some(message.into()), None)
    }

    pub fn loading_operation(
        &self,
        operation: OperationType,
        message: impl Into<String>,
    ) -> StatusTicket {
        self.store()
            .show_operation(StatusKind::Loading, operation, Some(message.into()), None)
    }

    pub fn success(&self, message: impl Into<String>, timeout: Option<Duration>) -> StatusTicket {
        self.store()
            .show(StatusKind::Success, Some(message.into()), timeout)
    }

    pub fn error(&self, message: impl Into<String>, timeout: Option<Duration>) -> StatusTicket {
        self.store()
            .show(StatusKind::Error, Some(message.into()), timeout)
    }

    pub fn hide(&self) {
        self.store().hide();
    }

    /// Hide after `delay`, unless something newer was shown meanwhile
    pub fn hide_after(&self, delay: Duration) {
        let store = self.store();
        let ticket = store.ticket();
        spawn(async move {
            timer::sleep(store.scheduler().as_ref(), delay).await;
            store.hide_if(ticket);
        });
    }
}

/// Initialize notifier context provider - call once at app root
pub fn use_notifier_provider() -> Notifier {
    let store = use_signal(|| StatusStore::new(timer::default_scheduler()));
    let mut status = use_signal(OperationStatus::idle);

    // Forward store changes into the signal for the lifetime of the app
    use_hook(move || {
        let mut changes = store.peek().subscribe();
        spawn(async move {
            while let Some(next) = changes.next().await {
                status.set(next);
            }
        });
    });

    let notifier = Notifier { store, status };
    use_context_provider(|| notifier)
}

/// Get notifier context - use in any component
pub fn use_notifier() -> Notifier {
    use_context::<Notifier>()
}
