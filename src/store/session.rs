use std::cell::RefCell;
use std::collections::HashMap;

use crate::store::{Scope, Store, StoreError, validate_key};

/// In-memory store that lives as long as the owning process.
///
/// The analog of session storage: nothing survives a restart and nothing is
/// shared with other contexts, so external change events never target it.
#[derive(Default)]
pub struct SessionStore {
    slots: RefCell<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }
}

impl Store for SessionStore {
    fn scope(&self) -> Scope {
        Scope::Session
    }

    fn get(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, raw: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.slots
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.slots.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.slots.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = SessionStore::new();
        assert_eq!(store.get("search"), None);

        store.set("search", "\"groceries\"").unwrap();
        assert_eq!(store.get("search").as_deref(), Some("\"groceries\""));

        store.remove("search").unwrap();
        assert_eq!(store.get("search"), None);
    }

    #[test]
    fn independent_instances_share_nothing() {
        let one = SessionStore::new();
        let two = SessionStore::new();
        one.set("moveMode", "true").unwrap();
        assert_eq!(two.get("moveMode"), None);
    }

    #[test]
    fn empty_key_rejected() {
        let store = SessionStore::new();
        assert!(matches!(store.set("", "1"), Err(StoreError::InvalidKey(_))));
    }
}
