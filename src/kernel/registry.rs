//! Live views per document.
//!
//! Each association subscribes to its view's disposal signal and removes
//! itself when the view goes away; callers never unregister explicitly.

use super::uri::DocumentUri;
use super::view::{ViewHandle, ViewId};
use crate::core::lifecycle::Subscription;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};

struct Entry {
    view: ViewHandle,
    _subscription: Subscription,
}

#[derive(Default)]
struct RegistryState {
    by_uri: FxHashMap<DocumentUri, Vec<Entry>>,
    owner: FxHashMap<ViewId, DocumentUri>,
}

impl RegistryState {
    fn detach(&mut self, view: ViewId) -> Option<Entry> {
        let uri = self.owner.remove(&view)?;
        let entries = self.by_uri.get_mut(&uri)?;
        let idx = entries.iter().position(|entry| entry.view.id() == view)?;
        let entry = entries.remove(idx);
        if entries.is_empty() {
            self.by_uri.remove(&uri);
        }
        Some(entry)
    }
}

#[derive(Clone, Default)]
pub struct ViewRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view already associated elsewhere is moved to `uri`. Disposed views
    /// are ignored.
    pub fn add(&self, uri: &DocumentUri, view: ViewHandle) {
        if view.is_disposed() {
            tracing::warn!(uri = %uri, view = %view.id(), "not registering disposed view");
            return;
        }

        let id = view.id();
        let state = Arc::downgrade(&self.state);
        let subscription = view.on_did_dispose(move || {
            if let Some(state) = state.upgrade() {
                prune(&state, id);
            }
        });

        let displaced = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            let displaced = state.detach(id);
            state.owner.insert(id, uri.clone());
            state.by_uri.entry(uri.clone()).or_default().push(Entry {
                view: view.clone(),
                _subscription: subscription,
            });
            displaced
        };
        if displaced.is_some() {
            tracing::debug!(uri = %uri, view = %id, "view association replaced");
        }
        drop(displaced);

        // Disposal may have raced the insert; the listener could not see the entry yet.
        if view.is_disposed() {
            prune(&self.state, id);
        }
        tracing::debug!(uri = %uri, view = %id, "view registered");
    }

    /// Live views for `uri`, in registration order.
    pub fn get(&self, uri: &DocumentUri) -> Vec<ViewHandle> {
        let Ok(state) = self.state.lock() else {
            return Vec::new();
        };
        state
            .by_uri
            .get(uri)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| !entry.view.is_disposed())
                    .map(|entry| entry.view.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn first(&self, uri: &DocumentUri) -> Option<ViewHandle> {
        self.get(uri).into_iter().next()
    }

    pub fn document_of(&self, view: ViewId) -> Option<DocumentUri> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.owner.get(&view).cloned())
    }

    pub fn view_count(&self) -> usize {
        self.state.lock().map(|state| state.owner.len()).unwrap_or(0)
    }
}

fn prune(state: &Mutex<RegistryState>, view: ViewId) {
    let removed = state.lock().ok().and_then(|mut state| state.detach(view));
    if removed.is_some() {
        tracing::debug!(view = %view, "view unregistered");
    }
    drop(removed);
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/registry.rs"]
mod tests;
