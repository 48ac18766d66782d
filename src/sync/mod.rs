//! Cross-context change propagation: the event shape, the per-key observer
//! registry, and a filesystem watcher that turns durable-store writes made
//! by sibling contexts into events.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

mod watcher;

pub use watcher::StoreWatcher;

/// A change made to a storage slot, as seen from outside the writing
/// context. `new_raw` is the still-serialized text, or `None` when the
/// slot was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub key: String,
    pub new_raw: Option<String>,
}

impl ChangeEvent {
    pub fn set(key: impl Into<String>, raw: impl Into<String>) -> Self {
        ChangeEvent {
            key: key.into(),
            new_raw: Some(raw.into()),
        }
    }

    pub fn removed(key: impl Into<String>) -> Self {
        ChangeEvent {
            key: key.into(),
            new_raw: None,
        }
    }
}

/// A subscriber that can accept a new raw serialized value for its key.
pub(crate) trait RawSink {
    fn apply_raw(&self, raw: &str) -> Result<(), serde_json::Error>;
}

struct HubInner {
    sinks: HashMap<String, Vec<(u64, Weak<dyn RawSink>)>>,
    next_id: u64,
}

/// Per-key registry of cells interested in external changes.
///
/// Cells register on creation and hold a `Subscription` guard; dropping
/// the guard (or the cell) removes the entry, so the registry never fires
/// into dead observers. Dispatch rules:
///
/// - events with an empty key are non-events and are dropped;
/// - events whose key has no subscribers are dropped;
/// - removal events (`new_raw: None`) are dropped — a cell keeps its
///   current value when its slot disappears;
/// - a raw value that does not deserialize leaves the target cell on its
///   last known good value and logs a warning.
#[derive(Clone, Default)]
pub struct Hub {
    inner: Rc<RefCell<HubInner>>,
}

impl Default for HubInner {
    fn default() -> Self {
        HubInner {
            sinks: HashMap::new(),
            next_id: 0,
        }
    }
}

impl Hub {
    pub fn new() -> Self {
        Hub::default()
    }

    pub(crate) fn subscribe(&self, key: &str, sink: Weak<dyn RawSink>) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .sinks
            .entry(key.to_string())
            .or_default()
            .push((id, sink));
        Subscription {
            hub: Rc::downgrade(&self.inner),
            key: key.to_string(),
            id,
        }
    }

    /// Deliver an external change to every live subscriber of its key.
    /// Returns the number of cells the event was applied to.
    pub fn dispatch(&self, event: &ChangeEvent) -> usize {
        if event.key.is_empty() {
            return 0;
        }
        let Some(raw) = event.new_raw.as_deref() else {
            // Slot removal: keep the in-memory value.
            log::debug!("ignoring removal event for {:?}", event.key);
            return 0;
        };

        // Collect upgraded sinks first so the registry borrow is released
        // before any cell code runs.
        let targets: Vec<Rc<dyn RawSink>> = {
            let mut inner = self.inner.borrow_mut();
            let Some(entries) = inner.sinks.get_mut(&event.key) else {
                return 0;
            };
            entries.retain(|(_, weak)| weak.strong_count() > 0);
            entries.iter().filter_map(|(_, weak)| weak.upgrade()).collect()
        };

        let mut applied = 0;
        for sink in targets {
            match sink.apply_raw(raw) {
                Ok(()) => applied += 1,
                Err(e) => {
                    log::warn!("ignoring malformed external value for {:?}: {e}", event.key);
                }
            }
        }
        applied
    }

    /// Number of live subscriptions, across all keys.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().sinks.values().map(Vec::len).sum()
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Guard for one hub registration. Dropping it removes the entry.
pub(crate) struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    key: String,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        let mut inner = hub.borrow_mut();
        if let Some(entries) = inner.sinks.get_mut(&self.key) {
            entries.retain(|(id, _)| *id != self.id);
            if entries.is_empty() {
                inner.sinks.remove(&self.key);
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}
