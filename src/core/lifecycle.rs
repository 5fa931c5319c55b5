//! Fire-once disposal signals and drop-scoped subscriptions.
//!
//! A `DisposeSignal` runs every registered listener exactly once, the first
//! time it fires. Listeners are called with the internal lock released, so a
//! listener may subscribe, unsubscribe or fire other signals freely.

use std::sync::{Arc, Mutex, Weak};

type Listener = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct SignalState {
    fired: bool,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
pub struct DisposeSignal {
    state: Arc<Mutex<SignalState>>,
}

impl DisposeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fired(&self) -> bool {
        self.state.lock().map(|state| state.fired).unwrap_or(false)
    }

    /// Registers `listener` until the returned subscription is dropped.
    ///
    /// Listeners added after the signal fired are dropped without being called;
    /// callers that care check `is_fired` first.
    pub fn subscribe(&self, listener: impl FnOnce() + Send + 'static) -> Subscription {
        let Ok(mut state) = self.state.lock() else {
            return Subscription::inert();
        };
        if state.fired {
            return Subscription::inert();
        }

        let id = state.next_id;
        state.next_id = state.next_id.wrapping_add(1);
        state.listeners.push((id, Box::new(listener)));

        Subscription {
            state: Arc::downgrade(&self.state),
            id: Some(id),
        }
    }

    /// Returns `false` if the signal had already fired.
    pub fn fire(&self) -> bool {
        let listeners = {
            let Ok(mut state) = self.state.lock() else {
                return false;
            };
            if state.fired {
                return false;
            }
            state.fired = true;
            std::mem::take(&mut state.listeners)
        };

        for (_, listener) in listeners {
            listener();
        }
        true
    }

    pub fn listener_count(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.listeners.len())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for DisposeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposeSignal")
            .field("fired", &self.is_fired())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle for one listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    state: Weak<Mutex<SignalState>>,
    id: Option<u64>,
}

impl Subscription {
    fn inert() -> Self {
        Self {
            state: Weak::new(),
            id: None,
        }
    }

    /// Keeps the listener registered for the lifetime of the signal.
    pub fn detach(mut self) {
        self.id = None;
    }

    /// True while the listener is still waiting for the signal.
    pub fn is_active(&self) -> bool {
        let Some(id) = self.id else {
            return false;
        };
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        state
            .lock()
            .map(|state| state.listeners.iter().any(|(lid, _)| *lid == id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        let Some(state) = self.state.upgrade() else {
            return;
        };

        // The listener may own handles that touch this signal when dropped.
        let removed = match state.lock() {
            Ok(mut state) => state
                .listeners
                .iter()
                .position(|(lid, _)| *lid == id)
                .map(|idx| state.listeners.remove(idx)),
            Err(_) => None,
        };
        drop(removed);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/lifecycle.rs"]
mod tests;
