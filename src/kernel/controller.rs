//! Editor controller.
//!
//! Owns the open documents, the view registry and the broker, and drives the
//! handshake of every attached view:
//!
//! ```text
//! Attached --ready--> Ready --(view disposed)--> Disposed
//!     \--open-anyways--^
//! ```
//!
//! `edit` is rejected in every state with a read-only notice. Disposed slots
//! are pruned on the next attach, and closing a document releases the slots
//! of all its views.

use super::broker::{MessageBroker, RequestError};
use super::document::{BinaryDocument, DocumentDelegate, DocumentError};
use super::protocol::{FileDataResponse, Inbound, InitBody, ViewEvent, ViewNotification, ViewRequest};
use super::registry::ViewRegistry;
use super::services::bus::{HostBusSender, NoticeLevel};
use super::services::ports::{BoxFuture, ByteSource, EditorConfig, MarkupProvider};
use super::uri::DocumentUri;
use super::view::{ViewHandle, ViewId};
use crate::core::lifecycle::Subscription;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const READ_ONLY_NOTICE: &str = "This binary document is read-only; edits are not applied.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Attached,
    Ready,
    Disposed,
}

pub type SharedDocument = Arc<Mutex<BinaryDocument>>;

struct ViewSlot {
    uri: DocumentUri,
    phase: ViewPhase,
    /// Released when the view disposes so its channel can close.
    view: Option<ViewHandle>,
    _subscription: Subscription,
}

type DocumentTable = Mutex<FxHashMap<DocumentUri, SharedDocument>>;
type ViewTable = Mutex<FxHashMap<ViewId, ViewSlot>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes matching slots. The caller drops them after the table lock is
/// released, since dropping a slot touches its view's dispose signal.
fn take_slots(views: &ViewTable, matches: impl Fn(&ViewSlot) -> bool) -> Vec<ViewSlot> {
    let mut views = lock(views);
    let ids: Vec<ViewId> = views
        .iter()
        .filter(|(_, slot)| matches(slot))
        .map(|(id, _)| *id)
        .collect();
    ids.into_iter().filter_map(|id| views.remove(&id)).collect()
}

/// Answers a document's current-bytes query from its first live view.
struct LiveViewData {
    registry: ViewRegistry,
    broker: Arc<MessageBroker>,
}

impl DocumentDelegate for LiveViewData {
    fn file_data(&self, uri: &DocumentUri) -> BoxFuture<Result<Vec<u8>, DocumentError>> {
        let Some(view) = self.registry.first(uri) else {
            tracing::warn!(uri = %uri, "no live view to read current bytes from");
            let uri = uri.clone();
            return Box::pin(async move { Err(DocumentError::NoLiveView(uri)) });
        };

        let response = self.broker.request(&view, ViewRequest::GetFileData);
        Box::pin(async move {
            let body = response.await?;
            let decoded: FileDataResponse =
                serde_json::from_value(body).map_err(|e| RequestError::Decode(e.to_string()))?;
            Ok(decoded.data)
        })
    }
}

pub struct EditorController {
    config: EditorConfig,
    source: Arc<dyn ByteSource>,
    markup: Arc<dyn MarkupProvider>,
    bus: HostBusSender,
    broker: Arc<MessageBroker>,
    registry: ViewRegistry,
    documents: Arc<DocumentTable>,
    views: Arc<ViewTable>,
}

impl EditorController {
    pub fn new(
        config: EditorConfig,
        source: Arc<dyn ByteSource>,
        markup: Arc<dyn MarkupProvider>,
        bus: HostBusSender,
    ) -> Self {
        let broker = Arc::new(MessageBroker::with_timeout(config.request_timeout));
        Self {
            config,
            source,
            markup,
            bus,
            broker,
            registry: ViewRegistry::new(),
            documents: Arc::new(Mutex::new(FxHashMap::default())),
            views: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn broker(&self) -> &MessageBroker {
        &self.broker
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Opening an already open document returns the existing one.
    pub fn open_document(
        &self,
        uri: DocumentUri,
        backup_id: Option<DocumentUri>,
    ) -> Result<SharedDocument, DocumentError> {
        if let Some(existing) = self.document(&uri) {
            tracing::debug!(uri = %uri, "document already open");
            return Ok(existing);
        }

        let delegate = Arc::new(LiveViewData {
            registry: self.registry.clone(),
            broker: Arc::clone(&self.broker),
        });
        let document = BinaryDocument::create(
            uri.clone(),
            backup_id,
            Arc::clone(&self.source),
            delegate,
            self.config.safe_load_threshold,
        )
        .map_err(|e| {
            tracing::error!(uri = %uri, error = %e, "open document failed");
            e
        })?;

        let table = Arc::downgrade(&self.documents);
        let views = Arc::downgrade(&self.views);
        let key = uri.clone();
        document
            .register_disposal_listener(move || {
                if let Some(table) = table.upgrade() {
                    let removed = lock(&table).remove(&key);
                    drop(removed);
                }
                if let Some(views) = views.upgrade() {
                    let released = take_slots(&views, |slot| slot.uri == key);
                    tracing::debug!(uri = %key, released = released.len(), "view slots released");
                }
            })
            .detach();

        let shared = Arc::new(Mutex::new(document));
        lock(&self.documents).insert(uri, Arc::clone(&shared));
        Ok(shared)
    }

    pub fn document(&self, uri: &DocumentUri) -> Option<SharedDocument> {
        lock(&self.documents).get(uri).cloned()
    }

    pub fn document_count(&self) -> usize {
        lock(&self.documents).len()
    }

    /// Host-driven disposal. Returns `false` if the document is not open.
    pub fn close_document(&self, uri: &DocumentUri) -> bool {
        let Some(document) = self.document(uri) else {
            return false;
        };
        lock(&document).dispose();
        true
    }

    /// Attaches `view` to an open document. Nothing is sent until the view
    /// reports `ready`.
    pub fn resolve_view(&self, uri: &DocumentUri, view: ViewHandle) -> Result<(), DocumentError> {
        if self.document(uri).is_none() {
            return Err(DocumentError::NotOpen(uri.clone()));
        }

        let pruned = take_slots(&self.views, |slot| slot.phase == ViewPhase::Disposed);
        drop(pruned);

        self.registry.add(uri, view.clone());

        let id = view.id();
        let table = Arc::downgrade(&self.views);
        let subscription = view.on_did_dispose(move || {
            if let Some(table) = table.upgrade() {
                let released = lock(&table).get_mut(&id).and_then(|slot| {
                    slot.phase = ViewPhase::Disposed;
                    slot.view.take()
                });
                drop(released);
            }
            tracing::info!(view = %id, "view detached");
        });

        let (phase, handle) = if view.is_disposed() {
            (ViewPhase::Disposed, None)
        } else {
            (ViewPhase::Attached, Some(view))
        };
        let replaced = lock(&self.views).insert(
            id,
            ViewSlot {
                uri: uri.clone(),
                phase,
                view: handle,
                _subscription: subscription,
            },
        );
        drop(replaced);

        tracing::info!(uri = %uri, view = %id, "view attached");
        Ok(())
    }

    /// A disposed view keeps reporting `Disposed` until the next attach or
    /// until its document closes.
    pub fn view_state(&self, view: ViewId) -> Option<ViewPhase> {
        lock(&self.views).get(&view).map(|slot| slot.phase)
    }

    pub fn view_slot_count(&self) -> usize {
        lock(&self.views).len()
    }

    /// Raw message from a view. Malformed or unknown messages are logged and dropped.
    pub fn handle_view_message(&self, view: ViewId, message: Value) {
        let inbound = match Inbound::parse(message) {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::warn!(view = %view, error = %e, "dropping view message");
                return;
            }
        };

        if let Some(event) = self.broker.on_incoming(inbound) {
            self.handle_view_event(view, event);
        }
    }

    pub fn handle_view_event(&self, view: ViewId, event: ViewEvent) {
        let slot = lock(&self.views)
            .get(&view)
            .map(|slot| (slot.uri.clone(), slot.phase, slot.view.clone()));
        let Some((uri, phase, handle)) = slot else {
            tracing::warn!(view = %view, "message from unknown view");
            return;
        };
        let Some(handle) = handle.filter(|_| phase != ViewPhase::Disposed) else {
            tracing::debug!(view = %view, "message from disposed view ignored");
            return;
        };

        match event {
            ViewEvent::Ready => {
                if phase == ViewPhase::Ready {
                    tracing::debug!(view = %view, "view reloaded, sending init again");
                }
                if self.push_init(&uri, &handle, false) {
                    self.set_phase(view, ViewPhase::Ready);
                }
            }
            ViewEvent::OpenAnyways => self.open_anyways(&uri, &handle),
            ViewEvent::Edit(_) => self.reject_edit(&uri, view),
        }
    }

    /// Current bytes as held by a live view of `uri`.
    pub fn request_current_bytes(
        &self,
        uri: &DocumentUri,
    ) -> BoxFuture<Result<Vec<u8>, DocumentError>> {
        let Some(document) = self.document(uri) else {
            let uri = uri.clone();
            return Box::pin(async move { Err(DocumentError::NotOpen(uri)) });
        };
        let future = lock(&document).request_current_bytes();
        future
    }

    fn open_anyways(&self, uri: &DocumentUri, view: &ViewHandle) {
        let Some(document) = self.document(uri) else {
            tracing::warn!(uri = %uri, "open-anyways for a document that is not open");
            return;
        };

        let result = lock(&document).open_anyways();
        match result {
            Ok(()) => {
                if self.push_init(uri, view, true) {
                    self.set_phase(view.id(), ViewPhase::Ready);
                }
            }
            Err(e) => {
                tracing::error!(uri = %uri, error = %e, "full load failed");
                let _ = self.bus.notice(NoticeLevel::Error, e.to_string());
            }
        }
    }

    fn reject_edit(&self, uri: &DocumentUri, view: ViewId) {
        let Some(document) = self.document(uri) else {
            tracing::warn!(uri = %uri, view = %view, "edit for a document that is not open");
            return;
        };
        let read_only = lock(&document).is_read_only();
        if !read_only {
            tracing::debug!(uri = %uri, view = %view, "edit ignored: no write path");
            return;
        }

        tracing::info!(uri = %uri, view = %view, "edit rejected: document is read-only");
        let _ = self.bus.notice(NoticeLevel::Info, READ_ONLY_NOTICE);
    }

    /// `html` goes out once the document is fully open, or when `force_html`
    /// is set after an explicit full load.
    fn push_init(&self, uri: &DocumentUri, view: &ViewHandle, force_html: bool) -> bool {
        let Some(document) = self.document(uri) else {
            tracing::warn!(uri = %uri, view = %view.id(), "init for a document that is not open");
            return false;
        };

        let body = {
            let document = lock(&document);
            let html =
                (force_html || document.opened_fully()).then(|| self.markup.render(&document));
            InitBody {
                file_size: document.file_size(),
                value: document.content().to_vec(),
                html,
            }
        };
        self.broker.notify(view, ViewNotification::Init(body))
    }

    fn set_phase(&self, view: ViewId, phase: ViewPhase) {
        if let Some(slot) = lock(&self.views).get_mut(&view) {
            if slot.phase != ViewPhase::Disposed {
                slot.phase = phase;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/controller.rs"]
mod tests;
