//! Cancellable one-shot timers.
//!
//! The notifier and the scheduling form only need "run this closure after a
//! delay unless cancelled". [`Scheduler`] is that seam: tokio drives it on the
//! server (and in tests), `gloo-timers` drives it in the browser.

use futures::channel::oneshot;
use futures::future::{AbortHandle, Abortable};
use std::sync::Arc;
use std::time::Duration;

/// Work to run when a timer fires
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a pending timer. Dropping the handle cancels the timer.
#[derive(Debug)]
pub struct TimerHandle {
    abort: AbortHandle,
}

impl TimerHandle {
    fn new(abort: AbortHandle) -> Self {
        Self { abort }
    }

    /// A handle whose timer will never fire
    pub fn inert() -> Self {
        let (abort, _registration) = AbortHandle::new_pair();
        abort.abort();
        Self { abort }
    }

    /// Cancel the timer. Safe to call after it has fired.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// Schedules delayed work
pub trait Scheduler: Send + Sync + 'static {
    /// Run `task` once after `delay`, unless the returned handle is cancelled or dropped first
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;
}

pub type SharedScheduler = Arc<dyn Scheduler>;

/// Wait for `delay` using the given scheduler
pub async fn sleep(scheduler: &dyn Scheduler, delay: Duration) {
    let (tx, rx) = oneshot::channel::<()>();
    let _timer = scheduler.schedule(
        delay,
        Box::new(move || {
            let _ = tx.send(());
        }),
    );
    let _ = rx.await;
}

/// Tokio-backed scheduler used by the server and native tests
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

#[cfg(not(target_arch = "wasm32"))]
impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No tokio runtime available, dropping timer ({:?})", delay);
            return TimerHandle::inert();
        };

        let (abort, registration) = AbortHandle::new_pair();
        let delayed = Abortable::new(tokio::time::sleep(delay), registration);
        runtime.spawn(async move {
            if delayed.await.is_ok() {
                task();
            }
        });
        TimerHandle::new(abort)
    }
}

/// Browser scheduler backed by `setTimeout`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let (abort, registration) = AbortHandle::new_pair();
        let delayed = Abortable::new(gloo_timers::future::sleep(delay), registration);
        wasm_bindgen_futures::spawn_local(async move {
            if delayed.await.is_ok() {
                task();
            }
        });
        TimerHandle::new(abort)
    }
}

/// Scheduler for the current target
pub fn default_scheduler() -> SharedScheduler {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(BrowserScheduler)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(TokioScheduler)
    }
}
