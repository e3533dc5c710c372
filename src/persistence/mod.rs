//! Persistence gateway
//!
//! A string key-value store (LocalStorage on web, in-memory elsewhere) plus
//! the typed profile helpers built on it. Reads are validated and fall back
//! to defaults; writes are best effort.

#[cfg(target_arch = "wasm32")]
mod browser;
mod profile;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StorageError;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;
pub use profile::{Profile, save_achievements, save_total_coins};

/// Storage keys
pub mod keys {
    pub const HIGH_SCORE: &str = "bikeRacerHighScore";
    pub const SOUND: &str = "bikeRacerSound";
    pub const MUSIC: &str = "bikeRacerMusic";
    pub const COINS: &str = "bikeRacerCoins";
    pub const ACHIEVEMENTS: &str = "bikeRacerAchievements";
}

/// String key to string value storage
pub trait KeyValueStore {
    /// Stored value, or `None` when missing or unreadable
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<RefCell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `QuotaExceeded`
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.borrow_mut() = read_only;
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.read_only.borrow() {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Write a value, logging instead of failing
pub fn set_best_effort<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, value: &str) -> bool {
    match store.set(key, value) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("could not persist {key}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip_and_sharing() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(keys::HIGH_SCORE), None);
        store.set(keys::HIGH_SCORE, "12").unwrap();

        let view = store.clone();
        assert_eq!(view.get(keys::HIGH_SCORE).as_deref(), Some("12"));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_read_only_store_rejects_writes() {
        let mut store = MemoryStore::new();
        store.set(keys::COINS, "5").unwrap();
        store.set_read_only(true);

        let err = store.set(keys::COINS, "6").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { ref key } if key == keys::COINS));
        assert!(!set_best_effort(&mut store, keys::COINS, "6"));
        assert_eq!(store.get(keys::COINS).as_deref(), Some("5"));
    }

    #[test]
    fn test_boxed_store() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        assert!(set_best_effort(&mut store, keys::SOUND, "false"));
        assert_eq!(store.get(keys::SOUND).as_deref(), Some("false"));
    }
}
