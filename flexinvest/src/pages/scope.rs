//! Request scopes tied to a page's lifetime.
//!
//! A request future borrows its page, so it can never outlive it: tearing a
//! page down drops whatever it still had running. Cancelling while the page
//! stays up goes through [`PageScope::cancel`] or, from another task, a
//! [`ScopeHandle`].

use futures_util::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A request was aborted through its page's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "request cancelled")
    }
}

impl std::error::Error for Cancelled {}

#[derive(Debug, Default)]
struct Registry {
    next_id: AtomicU64,
    in_flight: Mutex<HashMap<u64, AbortHandle>>,
}

impl Registry {
    fn in_flight(&self) -> MutexGuard<'_, HashMap<u64, AbortHandle>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_all(&self) -> usize {
        let handles: Vec<AbortHandle> = self.in_flight().drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.abort();
        }
        handles.len()
    }
}

/// Tracks every request a page has in flight so they can be aborted together.
#[derive(Debug, Default)]
pub struct PageScope {
    registry: Arc<Registry>,
}

impl PageScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut` until it completes or the scope is cancelled.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.in_flight().insert(id, handle);

        let _entry = Entry {
            registry: &self.registry,
            id,
        };
        Abortable::new(fut, registration).await.map_err(|_| Cancelled)
    }

    /// Number of requests currently in flight
    pub fn in_flight(&self) -> usize {
        self.registry.in_flight().len()
    }

    /// Abort everything in flight. The scope stays usable.
    pub fn cancel(&self) {
        let aborted = self.registry.cancel_all();
        if aborted > 0 {
            log::debug!("Cancelled {} in-flight requests", aborted);
        }
    }

    /// Handle that can cancel this scope from another task
    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            registry: Arc::clone(&self.registry),
        }
    }
}

/// Cloneable remote control for a [`PageScope`].
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    registry: Arc<Registry>,
}

impl ScopeHandle {
    pub fn cancel(&self) {
        self.registry.cancel_all();
    }
}

/// Unregisters a request once it settles or its future is dropped.
struct Entry<'a> {
    registry: &'a Registry,
    id: u64,
}

impl Drop for Entry<'_> {
    fn drop(&mut self) {
        self.registry.in_flight().remove(&self.id);
    }
}
