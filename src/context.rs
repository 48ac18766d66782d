use std::path::Path;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cell::{Cell, CellError};
use crate::store::{DurableStore, SessionStore, StoreError};
use crate::sync::{ChangeEvent, Hub, StoreWatcher};

/// Error type for opening a context
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not watch store directory: {0}")]
    Watch(#[from] notify::Error),
}

/// One execution context over a store directory — the analog of a single
/// tab: a durable store shared with sibling contexts, a private session
/// store, and the hub its cells subscribe to.
///
/// Single-threaded by design. External changes arrive only through
/// [`Context::pump`] (or [`Context::dispatch`]), on the caller's own event
/// loop, so cells need no locking.
pub struct Context {
    durable: Rc<DurableStore>,
    session: Rc<SessionStore>,
    hub: Hub,
    watcher: Option<StoreWatcher>,
}

impl Context {
    /// Open a context over `dir`, watching it for writes made by sibling
    /// contexts.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, ContextError> {
        let durable = Rc::new(DurableStore::open(dir)?);
        let watcher = StoreWatcher::start(durable.dir())?;
        Ok(Context {
            durable,
            session: Rc::new(SessionStore::new()),
            hub: Hub::new(),
            watcher: Some(watcher),
        })
    }

    /// Open a context without a filesystem watcher. External changes can
    /// still be injected with [`Context::dispatch`].
    pub fn open_unwatched(dir: impl AsRef<Path>) -> Result<Self, ContextError> {
        Ok(Context {
            durable: Rc::new(DurableStore::open(dir)?),
            session: Rc::new(SessionStore::new()),
            hub: Hub::new(),
            watcher: None,
        })
    }

    /// A cell over the durable scope.
    pub fn durable_cell<T>(&self, default: T, key: &str) -> Result<Cell<T>, CellError>
    where
        T: Serialize + DeserializeOwned + Clone + 'static,
    {
        Cell::new(default, key, self.durable.clone(), &self.hub)
    }

    /// A cell over the session scope.
    pub fn session_cell<T>(&self, default: T, key: &str) -> Result<Cell<T>, CellError>
    where
        T: Serialize + DeserializeOwned + Clone + 'static,
    {
        Cell::new(default, key, self.session.clone(), &self.hub)
    }

    pub fn durable(&self) -> &DurableStore {
        &self.durable
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Deliver one external change event to this context's cells. Public
    /// for hosts with their own notification transport and for tests.
    pub fn dispatch(&self, event: &ChangeEvent) -> usize {
        self.hub.dispatch(event)
    }

    /// Drain pending filesystem events and dispatch the external ones.
    ///
    /// An event whose raw text matches the durable store's own last write
    /// for that key is the echo of a local write and is dropped — the
    /// writer never re-observes itself. Each key's marker is consumed by
    /// the first event seen for it, so a later external write that reuses
    /// the same text still comes through. Returns the number of cells that
    /// applied a new value. Call once per event-loop tick.
    pub fn pump(&self) -> usize {
        let Some(watcher) = &self.watcher else {
            return 0;
        };
        let mut applied = 0;
        for event in watcher.poll() {
            if self
                .durable
                .consume_self_write(&event.key, event.new_raw.as_deref())
            {
                continue;
            }
            applied += self.hub.dispatch(&event);
        }
        applied
    }
}
