use std::fmt;
use std::path::PathBuf;

mod durable;
mod session;

pub use durable::DurableStore;
pub use session::SessionStore;

/// Lifetime of a storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Survives restarts, shared across every context over the same directory.
    Durable,
    /// Lives as long as the owning process, never shared.
    Session,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Durable => write!(f, "durable"),
            Scope::Session => write!(f, "session"),
        }
    }
}

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid storage key {0:?}: keys must be non-empty, with no path separators or control characters")]
    InvalidKey(String),
    #[error("could not open store at {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not persist {key:?}: {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },
    #[error("could not remove {key:?}: {source}")]
    Remove {
        key: String,
        source: std::io::Error,
    },
}

/// A key-value slab of raw serialized text.
///
/// Implementations use interior mutability and are meant to be shared
/// through `Rc<dyn Store>` on a single thread. Reads never fail: an absent
/// or unreadable slot is simply `None` (unreadable slots log a warning).
/// Writes surface their failure to the caller.
pub trait Store {
    fn scope(&self) -> Scope;

    /// Raw stored text under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store raw text under `key`, replacing any previous value.
    fn set(&self, key: &str, raw: &str) -> Result<(), StoreError>;

    /// Drop the slot for `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys with a stored value, in no particular order.
    fn keys(&self) -> Vec<String>;
}

/// Keys double as file stems in the durable store, so they must not smuggle
/// in path components.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || key.contains(['/', '\\']) || key.chars().any(char::is_control) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
