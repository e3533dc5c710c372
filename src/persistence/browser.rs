//! LocalStorage backend

use wasm_bindgen::JsValue;

use super::KeyValueStore;
use crate::error::StorageError;

/// `window.localStorage`
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// Open local storage. Fails in private modes or sandboxed frames.
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(|e| StorageError::Backend(describe(&e)))?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::debug!("localStorage read of {key} failed: {}", describe(&e));
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| {
            let message = describe(&e);
            if message.contains("Quota") {
                StorageError::QuotaExceeded {
                    key: key.to_string(),
                }
            } else {
                StorageError::Backend(message)
            }
        })
    }
}
