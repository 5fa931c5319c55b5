//! Request/response correlation over view channels.
//!
//! Flow:
//! 1. `request` allocates the next id, records a pending resolver and posts
//!    `{type, requestId, body}` to the view, then returns a future.
//! 2. `on_incoming` resolves the pending entry whose id matches a response.
//! 3. The caller awaits the future.
//!
//! Responses may arrive in any order; correlation is by id alone. When a view
//! disposes, every request still pending for it is rejected.

use super::protocol::{Inbound, Outbound, RequestId, ViewEvent, ViewNotification, ViewRequest};
use super::view::{ViewHandle, ViewId};
use crate::core::lifecycle::Subscription;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::oneshot;

type Resolver = oneshot::Sender<Result<Value, RequestError>>;
type PendingMap = Mutex<FxHashMap<RequestId, PendingRequest>>;
type WatchMap = Mutex<FxHashMap<ViewId, Subscription>>;

struct PendingRequest {
    view: ViewId,
    kind: &'static str,
    resolver: Resolver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The target view went away before answering.
    ViewDisposed(ViewId),
    /// The request could not be delivered, or the broker was dropped.
    ChannelClosed,
    Timeout {
        request_id: RequestId,
        after: Duration,
    },
    Decode(String),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::ViewDisposed(view) => write!(f, "{} was disposed", view),
            RequestError::ChannelClosed => write!(f, "view channel closed"),
            RequestError::Timeout { request_id, after } => {
                write!(f, "request {} timed out after {:?}", request_id, after)
            }
            RequestError::Decode(msg) => write!(f, "invalid response payload: {}", msg),
        }
    }
}

impl std::error::Error for RequestError {}

/// One per controller. Ids start at 1 and are never reused.
pub struct MessageBroker {
    next_id: AtomicU64,
    pending: Arc<PendingMap>,
    watched: Arc<WatchMap>,
    timeout: Option<Duration>,
}

impl MessageBroker {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            pending: Arc::new(Mutex::new(FxHashMap::default())),
            watched: Arc::new(Mutex::new(FxHashMap::default())),
            timeout,
        }
    }

    fn next_id(&self) -> RequestId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// One-way message. Returns whether it was handed to the channel.
    pub fn notify(&self, view: &ViewHandle, notification: ViewNotification) -> bool {
        let kind = notification.kind();
        match notification.into_outbound() {
            Ok(message) => {
                tracing::debug!(view = %view.id(), kind, "notify view");
                view.post(message)
            }
            Err(e) => {
                tracing::error!(view = %view.id(), kind, error = %e, "encode notification failed");
                false
            }
        }
    }

    /// Posts the request immediately; only awaiting the returned future suspends.
    pub fn request(
        &self,
        view: &ViewHandle,
        request: ViewRequest,
    ) -> impl Future<Output = Result<Value, RequestError>> + Send + 'static {
        let id = self.next_id();
        let kind = request.kind();
        let (resolver, rx) = oneshot::channel();

        self.watch(view);
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(
                id,
                PendingRequest {
                    view: view.id(),
                    kind,
                    resolver,
                },
            );
        }
        tracing::debug!(view = %view.id(), request_id = id, kind, "request view");

        let message = Outbound {
            kind: kind.to_string(),
            request_id: Some(id),
            body: request.body(),
        };
        if !view.post(message) {
            let reason = if view.is_disposed() {
                RequestError::ViewDisposed(view.id())
            } else {
                RequestError::ChannelClosed
            };
            self.reject(id, reason);
        }

        let timeout = self.timeout;
        let pending = Arc::downgrade(&self.pending);
        async move {
            let outcome = match timeout {
                None => rx.await,
                Some(after) => match tokio::time::timeout(after, rx).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        if let Some(pending) = pending.upgrade() {
                            if let Ok(mut pending) = pending.lock() {
                                pending.remove(&id);
                            }
                        }
                        tracing::warn!(request_id = id, ?after, "view request timed out");
                        return Err(RequestError::Timeout {
                            request_id: id,
                            after,
                        });
                    }
                },
            };
            outcome.unwrap_or(Err(RequestError::ChannelClosed))
        }
    }

    /// Entry point for every inbound view message. Responses are consumed
    /// here; events are handed back for the controller.
    pub fn on_incoming(&self, inbound: Inbound) -> Option<ViewEvent> {
        match inbound {
            Inbound::Response { request_id, body } => {
                self.resolve(request_id, body);
                None
            }
            Inbound::Event(event) => Some(event),
        }
    }

    /// Returns `false` for ids that are unknown or already settled.
    pub fn resolve(&self, request_id: RequestId, body: Value) -> bool {
        let entry = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&request_id));

        let Some(entry) = entry else {
            tracing::warn!(request_id, "response for unknown or stale request id");
            return false;
        };

        tracing::debug!(view = %entry.view, request_id, kind = entry.kind, "request resolved");
        if entry.resolver.send(Ok(body)).is_err() {
            tracing::debug!(request_id, "request caller went away before the response");
        }
        true
    }

    /// Rejects everything still pending for `view`. Returns how many were rejected.
    pub fn reject_view(&self, view: ViewId) -> usize {
        reject_view_in(&self.pending, view)
    }

    fn reject(&self, request_id: RequestId, reason: RequestError) {
        let entry = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&request_id));
        if let Some(entry) = entry {
            tracing::warn!(view = %entry.view, request_id, error = %reason, "request rejected");
            let _ = entry.resolver.send(Err(reason));
        }
    }

    fn watch(&self, view: &ViewHandle) {
        let Ok(mut watched) = self.watched.lock() else {
            return;
        };
        if watched.contains_key(&view.id()) || view.is_disposed() {
            return;
        }

        let id = view.id();
        let pending = Arc::downgrade(&self.pending);
        let watched_ref: Weak<WatchMap> = Arc::downgrade(&self.watched);
        let subscription = view.on_did_dispose(move || {
            if let Some(pending) = pending.upgrade() {
                reject_view_in(&pending, id);
            }
            if let Some(watched) = watched_ref.upgrade() {
                let stale = watched.lock().ok().and_then(|mut w| w.remove(&id));
                drop(stale);
            }
        });
        watched.insert(id, subscription);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn pending_for(&self, view: ViewId) -> usize {
        self.pending
            .lock()
            .map(|p| p.values().filter(|entry| entry.view == view).count())
            .unwrap_or(0)
    }
}

impl Default for MessageBroker {
    fn default() -> Self {
        Self::new()
    }
}

fn reject_view_in(pending: &PendingMap, view: ViewId) -> usize {
    let rejected: Vec<(RequestId, PendingRequest)> = {
        let Ok(mut pending) = pending.lock() else {
            return 0;
        };
        let ids: Vec<RequestId> = pending
            .iter()
            .filter(|(_, entry)| entry.view == view)
            .map(|(id, _)| *id)
            .collect();
        ids.into_iter()
            .filter_map(|id| pending.remove(&id).map(|entry| (id, entry)))
            .collect()
    };

    for (request_id, entry) in &rejected {
        tracing::warn!(view = %view, request_id, kind = entry.kind, "pending request rejected: view disposed");
    }
    let count = rejected.len();
    for (_, entry) in rejected {
        let _ = entry.resolver.send(Err(RequestError::ViewDisposed(view)));
    }
    count
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/broker.rs"]
mod tests;
