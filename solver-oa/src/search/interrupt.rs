//! Interrupt handle for running local searches.
//!
//! An external handler (e.g. a signal handler) holds a clone of the handle
//! and calls [`InterruptHandle::interrupt`]. The request only takes effect
//! while a local search is attached; attaching is scoped to one run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct InterruptState {
    attached: AtomicBool,
    requested: AtomicBool,
}

/// Shared handle through which a running sub-search can be stopped.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    state: Arc<InterruptState>,
}

impl InterruptHandle {
    /// Create a detached handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop of the attached search.
    ///
    /// Returns false if no search is attached.
    pub fn interrupt(&self) -> bool {
        if self.is_attached() {
            self.state.requested.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Whether a search is currently attached.
    pub fn is_attached(&self) -> bool {
        self.state.attached.load(Ordering::SeqCst)
    }

    /// Whether a stop was requested for the attached search.
    pub fn is_requested(&self) -> bool {
        self.state.requested.load(Ordering::SeqCst)
    }

    /// Attach a search until the returned guard is dropped.
    pub(crate) fn attach(&self) -> AttachGuard<'_> {
        self.state.requested.store(false, Ordering::SeqCst);
        self.state.attached.store(true, Ordering::SeqCst);
        AttachGuard { handle: self }
    }
}

/// Detaches the search and clears pending requests on drop.
pub(crate) struct AttachGuard<'a> {
    handle: &'a InterruptHandle,
}

impl Drop for AttachGuard<'_> {
    fn drop(&mut self) {
        self.handle.state.attached.store(false, Ordering::SeqCst);
        self.handle.state.requested.store(false, Ordering::SeqCst);
    }
}
