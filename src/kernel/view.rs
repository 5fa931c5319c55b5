//! View handles.
//!
//! A view is one rendering surface showing a document. The host owns its
//! lifetime; this side holds a `ViewHandle` (outbound channel + disposal
//! signal) and the view side drains a `ViewPort`.

use super::protocol::Outbound;
use crate::core::lifecycle::{DisposeSignal, Subscription};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

#[derive(Clone)]
pub struct ViewHandle {
    id: ViewId,
    tx: mpsc::UnboundedSender<Outbound>,
    disposed: DisposeSignal,
}

pub struct ViewPort {
    id: ViewId,
    rx: mpsc::UnboundedReceiver<Outbound>,
}

impl ViewHandle {
    pub fn channel() -> (ViewHandle, ViewPort) {
        let id = ViewId::next();
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ViewHandle {
                id,
                tx,
                disposed: DisposeSignal::new(),
            },
            ViewPort { id, rx },
        )
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Best-effort send. Returns `false` if the view is gone.
    pub fn post(&self, message: Outbound) -> bool {
        if self.disposed.is_fired() {
            tracing::debug!(view = %self.id, kind = %message.kind, "post to disposed view dropped");
            return false;
        }
        if self.tx.send(message).is_err() {
            tracing::warn!(view = %self.id, "view channel closed");
            return false;
        }
        true
    }

    pub fn on_did_dispose(&self, listener: impl FnOnce() + Send + 'static) -> Subscription {
        self.disposed.subscribe(listener)
    }

    /// Host-driven. Only the first call notifies listeners.
    pub fn dispose(&self) {
        if self.disposed.fire() {
            tracing::info!(view = %self.id, "view disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_fired()
    }
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHandle")
            .field("id", &self.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl ViewPort {
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// `None` once every handle for this view has been dropped.
    pub async fn recv(&mut self) -> Option<Outbound> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Outbound> {
        self.rx.try_recv().ok()
    }

    pub fn drain(&mut self) -> Vec<Outbound> {
        let mut out = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            out.push(message);
        }
        out
    }
}
