//! The persisted reactive cell: a value bound to a storage slot, kept in
//! sync with writes made by sibling contexts.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::{Scope, Store, StoreError};
use crate::sync::{Hub, RawSink, Subscription};

/// Stored text treated the same as an absent slot. Producers that serialize
/// an undefined value end up writing this literal, and naive deserialization
/// of it would fail, so it has to be special-cased on load.
const ABSENT_MARKER: &str = "undefined";

/// Error type for cell operations
#[derive(Debug, thiserror::Error)]
pub enum CellError {
    #[error("cell key must be non-empty")]
    EmptyKey,
    #[error("could not serialize value for {key:?}: {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

struct CellInner<T> {
    value: T,
    generation: u64,
}

impl<T: DeserializeOwned> RawSink for RefCell<CellInner<T>> {
    fn apply_raw(&self, raw: &str) -> Result<(), serde_json::Error> {
        let value: T = serde_json::from_str(raw)?;
        let mut inner = self.borrow_mut();
        inner.value = value;
        inner.generation += 1;
        Ok(())
    }
}

/// A unit of state bound to a named slot in a [`Store`].
///
/// Reads are in-memory and never fail. Writes update memory first and then
/// persist immediately — no debouncing — so a write failure leaves the
/// in-memory value updated and is reported to the caller. External changes
/// delivered through the [`Hub`] replace the in-memory value; local writes
/// never travel through the hub, so a context never re-observes its own
/// writes.
pub struct Cell<T> {
    key: String,
    store: Rc<dyn Store>,
    inner: Rc<RefCell<CellInner<T>>>,
    _sub: Subscription,
}

impl<T> Cell<T>
where
    T: Serialize + DeserializeOwned + Clone + 'static,
{
    /// Bind a cell to `key` in `store`, subscribed to external changes via
    /// `hub`.
    ///
    /// An absent slot, the literal stored text `"undefined"`, or stored text
    /// that fails to deserialize all yield `default`; the malformed case
    /// logs a warning instead of failing construction, since there is no
    /// migration story for a slot written by an older, incompatible shape.
    pub fn new(
        default: T,
        key: &str,
        store: Rc<dyn Store>,
        hub: &Hub,
    ) -> Result<Cell<T>, CellError> {
        if key.is_empty() {
            return Err(CellError::EmptyKey);
        }

        let value = match store.get(key) {
            None => default,
            Some(raw) if raw == ABSENT_MARKER => default,
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("stored value for {key:?} is malformed, using default: {e}");
                    default
                }
            },
        };

        let inner = Rc::new(RefCell::new(CellInner {
            value,
            generation: 0,
        }));
        let sink: Rc<dyn RawSink> = inner.clone();
        let sub = hub.subscribe(key, Rc::downgrade(&sink));

        Ok(Cell {
            key: key.to_string(),
            store,
            inner,
            _sub: sub,
        })
    }

    /// Current in-memory value. Never blocks, never fails.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value and persist it.
    ///
    /// The in-memory update always takes effect; the returned error only
    /// reports that persistence failed.
    pub fn set(&self, value: T) -> Result<(), CellError> {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.generation += 1;
        }
        self.persist()
    }

    /// Compute the next value from the current one and persist it.
    ///
    /// `f` sees the latest in-memory value, not a snapshot from creation
    /// time, so toggles and list edits compose with external updates.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<(), CellError> {
        {
            let mut inner = self.inner.borrow_mut();
            let next = f(&inner.value);
            inner.value = next;
            inner.generation += 1;
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), CellError> {
        let raw = {
            let inner = self.inner.borrow();
            serde_json::to_string(&inner.value).map_err(|e| CellError::Serialize {
                key: self.key.clone(),
                source: e,
            })?
        };
        self.store.set(&self.key, &raw)?;
        Ok(())
    }

    /// Bumped on every change, local or external. Poll it each tick to
    /// notice changes without cloning the value.
    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn scope(&self) -> Scope {
        self.store.scope()
    }
}
