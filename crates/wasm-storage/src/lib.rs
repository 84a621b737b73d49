//! Browser key-value storage behind a small synchronous trait
//!
//! Components only see [`KeyValueStore`]; the browser build plugs in
//! [`simple::SimpleStorage`] and tests use [`MemoryStorage`].

use std::cell::RefCell;
use std::collections::BTreeMap;

use shared_types::{PredictorError, PredictorResult};

pub mod simple;

pub use simple::SimpleStorage;

/// Origin-scoped, string-only, synchronous storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PredictorResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> PredictorResult<()>;

    fn remove(&self, key: &str) -> PredictorResult<()>;
}

/// In-memory store with the same semantics as LocalStorage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes, like a browser in private mode with a
    /// zero quota
    pub fn read_only() -> Self {
        Self {
            entries: RefCell::default(),
            read_only: true,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> PredictorResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PredictorResult<()> {
        if self.read_only {
            return Err(PredictorError::Storage {
                message: format!("quota exceeded writing {key}"),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PredictorResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
