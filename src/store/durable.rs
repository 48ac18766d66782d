use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::store::{Scope, Store, StoreError, validate_key};

/// Directory-backed store: one `<key>.json` file per slot.
///
/// Every context of the same user that opens the same directory sees the
/// same slots, so this is the durable scope — the analog of a browser's
/// per-origin local storage. Writes are atomic (temp file + rename) so a
/// sibling context never observes a half-written slot.
pub struct DurableStore {
    dir: PathBuf,
    /// Raw text of the most recent local write per key, used to tell our
    /// own filesystem events apart from external ones.
    last_written: RefCell<HashMap<String, String>>,
}

impl DurableStore {
    /// Open or create a durable store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Open {
            path: dir.clone(),
            source: e,
        })?;
        // Canonicalize so paths reported by the file watcher compare equal.
        let dir = dir.canonicalize().map_err(|e| StoreError::Open {
            path: dir.clone(),
            source: e,
        })?;
        log::debug!("opened durable store at {}", dir.display());
        Ok(DurableStore {
            dir,
            last_written: RefCell::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Consume the self-write marker for `key`, reporting whether `raw` is
    /// exactly what this store last wrote there.
    ///
    /// The first change event observed for a key settles the marker's fate
    /// either way: a match is the echo of the local write and is the one
    /// event suppression exists for; a mismatch means the store has already
    /// moved past the local write and the marker is stale. Consuming it in
    /// both cases keeps a later external write that happens to reuse the
    /// same text from being mistaken for an echo.
    pub(crate) fn consume_self_write(&self, key: &str, raw: Option<&str>) -> bool {
        match self.last_written.borrow_mut().remove(key) {
            Some(written) => raw == Some(written.as_str()),
            None => false,
        }
    }
}

impl Store for DurableStore {
    fn scope(&self) -> Scope {
        Scope::Durable
    }

    fn get(&self, key: &str) -> Option<String> {
        if validate_key(key).is_err() {
            return None;
        }
        match fs::read_to_string(self.slot_path(key)) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("could not read slot {key:?}: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, raw: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        atomic_write(&self.slot_path(key), raw.as_bytes()).map_err(|e| StoreError::Write {
            key: key.to_string(),
            source: e,
        })?;
        self.last_written
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.last_written.borrow_mut().remove(key);
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Remove {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut keys = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys
    }
}

/// Write via a temp file in the same directory, then rename into place.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_and_get_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = DurableStore::open(tmp.path()).unwrap();

        store.set("user", r#"{"name":"ada"}"#).unwrap();
        assert_eq!(store.get("user").as_deref(), Some(r#"{"name":"ada"}"#));

        // Overwrite
        store.set("user", "42").unwrap();
        assert_eq!(store.get("user").as_deref(), Some("42"));
    }

    #[test]
    fn get_missing_returns_none() {
        let tmp = TempDir::new().unwrap();
        let store = DurableStore::open(tmp.path()).unwrap();
        assert_eq!(store.get("nope"), None);
    }

    #[test]
    fn remove_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = DurableStore::open(tmp.path()).unwrap();

        store.set("search", "\"foo\"").unwrap();
        store.remove("search").unwrap();
        assert_eq!(store.get("search"), None);
        store.remove("search").unwrap();
    }

    #[test]
    fn keys_lists_only_slots() {
        let tmp = TempDir::new().unwrap();
        let store = DurableStore::open(tmp.path()).unwrap();

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        fs::write(store.dir().join("stray.txt"), "not a slot").unwrap();

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn invalid_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = DurableStore::open(tmp.path()).unwrap();
        assert!(matches!(
            store.set("a/b", "1"),
            Err(StoreError::InvalidKey(_))
        ));
        assert_eq!(store.get(""), None);
    }

    #[test]
    fn slots_visible_across_stores() {
        let tmp = TempDir::new().unwrap();
        let one = DurableStore::open(tmp.path()).unwrap();
        let two = DurableStore::open(tmp.path()).unwrap();

        one.set("counter", "5").unwrap();
        assert_eq!(two.get("counter").as_deref(), Some("5"));
    }

    #[test]
    fn self_write_marker_is_consumed_once() {
        let tmp = TempDir::new().unwrap();
        let store = DurableStore::open(tmp.path()).unwrap();

        store.set("counter", "5").unwrap();
        assert!(!store.consume_self_write("other", Some("5")));
        assert!(store.consume_self_write("counter", Some("5")));

        // The marker is gone. The same text arriving again is an external
        // write, not an echo.
        assert!(!store.consume_self_write("counter", Some("5")));
    }

    #[test]
    fn stale_self_write_marker_is_discarded_on_mismatch() {
        let tmp = TempDir::new().unwrap();
        let store = DurableStore::open(tmp.path()).unwrap();

        store.set("counter", "5").unwrap();
        // An external write lands before our echo is observed. The mismatch
        // retires the marker so "5" cannot be suppressed later.
        assert!(!store.consume_self_write("counter", Some("9")));
        assert!(!store.consume_self_write("counter", Some("5")));

        // Only the latest write counts.
        store.set("counter", "5").unwrap();
        store.set("counter", "6").unwrap();
        assert!(!store.consume_self_write("counter", Some("5")));

        store.set("counter", "7").unwrap();
        store.remove("counter").unwrap();
        assert!(!store.consume_self_write("counter", Some("7")));
    }

    #[test]
    fn atomic_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("slot.json");

        atomic_write(&path, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");

        atomic_write(&path, b"goodbye").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "goodbye");
    }
}
