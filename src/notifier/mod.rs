//! Operation-status notifier.
//!
//! One shared slot holding the operation currently announced to the user
//! (loading / success / error). Any view can announce through a cloned
//! [`StatusStore`]; the overlay renders whatever the slot holds.
//!
//! Semantics:
//! - last write wins, there is no queue
//! - every `show` cancels the previous auto-close timer before arming its own
//! - success and error auto-close after [`DEFAULT_DISMISS`] unless a timeout is given
//! - loading stays until replaced or hidden, unless a timeout is given

pub mod timer;

use futures::channel::mpsc;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use timer::{SharedScheduler, TimerHandle};

/// Auto-close delay for success/error when the caller gives none
pub const DEFAULT_DISMISS: Duration = Duration::from_millis(2000);

/// What the overlay is currently showing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Nothing shown
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Idle => "none",
            StatusKind::Loading => "loading",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }

    /// Success and error close themselves by default
    pub fn auto_closes(&self) -> bool {
        matches!(self, StatusKind::Success | StatusKind::Error)
    }
}

/// Which operation a loading status belongs to (picks the animation and default text)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OperationType {
    #[default]
    Default,
    Upload,
    Delete,
}

/// The announced operation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationStatus {
    pub kind: StatusKind,
    pub operation: OperationType,
    pub message: Option<String>,
    pub auto_close_after: Option<Duration>,
}

impl OperationStatus {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.kind != StatusKind::Idle
    }

    /// Text to render: the caller's message, or a default for the kind/operation
    pub fn display_message(&self) -> &str {
        if let Some(message) = self.message.as_deref() {
            return message;
        }
        match (self.kind, self.operation) {
            (StatusKind::Loading, OperationType::Upload) => "Uploading...",
            (StatusKind::Loading, OperationType::Delete) => "Deleting...",
            (StatusKind::Loading, OperationType::Default) => "Loading...",
            (StatusKind::Success, _) => "Operation successful!",
            (StatusKind::Error, _) => "Operation failed!",
            (StatusKind::Idle, _) => "",
        }
    }
}

/// Identifies one `show`. Two announcements with the same text get different tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTicket(u64);

struct State {
    status: OperationStatus,
    /// Bumped on every change; a timer only expires the status it was armed for
    generation: u64,
    timer: Option<TimerHandle>,
    default_dismiss: Duration,
    subscribers: Vec<mpsc::UnboundedSender<OperationStatus>>,
}

impl State {
    fn publish(&mut self) {
        let status = self.status.clone();
        self.subscribers
            .retain(|tx| tx.unbounded_send(status.clone()).is_ok());
    }
}

struct Inner {
    state: Mutex<State>,
    scheduler: SharedScheduler,
}

/// Shared handle to the status slot. Cheap to clone.
#[derive(Clone)]
pub struct StatusStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for StatusStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusStore")
            .field("status", &self.current())
            .finish()
    }
}

impl StatusStore {
    pub fn new(scheduler: SharedScheduler) -> Self {
        Self::with_default_dismiss(scheduler, DEFAULT_DISMISS)
    }

    pub fn with_default_dismiss(scheduler: SharedScheduler, default_dismiss: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    status: OperationStatus::idle(),
                    generation: 0,
                    timer: None,
                    default_dismiss,
                    subscribers: Vec::new(),
                }),
                scheduler,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave State half-written
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Scheduler used for auto-close timers
    pub fn scheduler(&self) -> &SharedScheduler {
        &self.inner.scheduler
    }

    /// Change the auto-close delay used when a success/error gives none.
    /// Applies to later calls only.
    pub fn set_default_dismiss(&self, delay: Duration) {
        self.lock().default_dismiss = delay;
    }

    /// Announce a status for a default operation
    pub fn show(
        &self,
        kind: StatusKind,
        message: Option<String>,
        timeout: Option<Duration>,
    ) -> StatusTicket {
        self.show_operation(kind, OperationType::Default, message, timeout)
    }

    /// Announce a status, replacing whatever is shown and its pending timer
    pub fn show_operation(
        &self,
        kind: StatusKind,
        operation: OperationType,
        message: Option<String>,
        timeout: Option<Duration>,
    ) -> StatusTicket {
        if kind == StatusKind::Idle {
            self.hide();
            return self.ticket();
        }

        let mut state = self.lock();
        let auto_close = match timeout {
            Some(t) if !t.is_zero() => Some(t),
            Some(_) => None,
            None if kind.auto_closes() => Some(state.default_dismiss),
            None => None,
        };

        state.timer = None;
        state.generation = state.generation.wrapping_add(1);
        state.status = OperationStatus {
            kind,
            operation,
            message,
            auto_close_after: auto_close,
        };

        if let Some(delay) = auto_close {
            let generation = state.generation;
            let weak: Weak<Inner> = Arc::downgrade(&self.inner);
            state.timer = Some(self.inner.scheduler.schedule(
                delay,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        StatusStore { inner }.expire(generation);
                    }
                }),
            ));
        }

        tracing::debug!(
            "status -> {} ({:?}) {:?}, auto-close {:?}",
            kind.as_str(),
            operation,
            state.status.message,
            auto_close
        );
        state.publish();
        StatusTicket(state.generation)
    }

    /// Ticket for whatever is shown right now
    pub fn ticket(&self) -> StatusTicket {
        StatusTicket(self.lock().generation)
    }

    /// Hide the status `ticket` was issued for. Returns false, leaving the
    /// slot alone, when anything was shown or hidden since.
    pub fn hide_if(&self, ticket: StatusTicket) -> bool {
        let mut state = self.lock();
        if state.generation != ticket.0 || !state.status.is_visible() {
            return false;
        }
        state.timer = None;
        state.generation = state.generation.wrapping_add(1);
        state.status = OperationStatus::idle();
        tracing::debug!("status -> none");
        state.publish();
        true
    }

    /// Run `task` behind a loading notice, then take the notice down if it
    /// is still the one shown. With no message the task runs silently and
    /// whatever is on screen stays there.
    pub async fn while_loading<F: Future>(&self, message: Option<String>, task: F) -> F::Output {
        let ticket = message.map(|m| self.show(StatusKind::Loading, Some(m), None));
        let output = task.await;
        if let Some(ticket) = ticket {
            self.hide_if(ticket);
        }
        output
    }

    /// Clear the slot and cancel any pending timer. Idempotent.
    pub fn hide(&self) {
        let mut state = self.lock();
        state.timer = None;
        if !state.status.is_visible() {
            return;
        }
        state.generation = state.generation.wrapping_add(1);
        state.status = OperationStatus::idle();
        tracing::debug!("status -> none");
        state.publish();
    }

    /// Timer callback: clear only if nothing newer was shown since arming
    fn expire(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation != generation {
            return;
        }
        state.timer = None;
        state.generation = state.generation.wrapping_add(1);
        state.status = OperationStatus::idle();
        tracing::debug!("status auto-closed");
        state.publish();
    }

    /// Snapshot of the current status
    pub fn current(&self) -> OperationStatus {
        self.lock().status.clone()
    }

    /// Whether an auto-close timer is armed
    pub fn has_pending_timer(&self) -> bool {
        self.lock().timer.is_some()
    }

    /// Stream of status changes, starting with the current status
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<OperationStatus> {
        let (tx, rx) = mpsc::unbounded();
        let mut state = self.lock();
        if tx.unbounded_send(state.status.clone()).is_ok() {
            state.subscribers.push(tx);
        }
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}
