//! Key/value persistence backed by `localStorage`.
//!
//! On wasm32 this talks to the page's `localStorage`. Everywhere else it
//! keeps values in memory so the caching code above it can be tested
//! natively.
//!
//! ```
//! use folio::browser::Storage;
//!
//! let storage = Storage::local();
//! storage.set_json("socialMediaStats", &vec![1, 2]).unwrap();
//! let back: Option<Vec<u32>> = storage.get_json("socialMediaStats").unwrap();
//! assert_eq!(back, Some(vec![1, 2]));
//! ```

use serde::{de::DeserializeOwned, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::collections::BTreeMap;
use thiserror::Error;

/// The page's `localStorage`.
#[derive(Debug, Default)]
pub struct Storage {
    /// In-memory store for non-wasm targets
    #[cfg(not(target_arch = "wasm32"))]
    memory: std::sync::Mutex<BTreeMap<String, String>>,
}

impl Storage {
    /// `localStorage`.
    #[must_use]
    pub fn local() -> Self {
        Self::default()
    }

    /// Read a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            web_storage()?.get_item(key).ok()?
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.memory.lock().ok()?.get(key).cloned()
        }
    }

    /// Write a value.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            web_storage()
                .ok_or(StorageError::NotAvailable)?
                .set_item(key, value)
                .map_err(|_| StorageError::QuotaExceeded)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.memory
                .lock()
                .map_err(|_| StorageError::AccessDenied)?
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    /// Delete a value.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(target_arch = "wasm32")]
        {
            web_storage()
                .ok_or(StorageError::NotAvailable)?
                .remove_item(key)
                .map_err(|_| StorageError::AccessDenied)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.memory
                .lock()
                .map_err(|_| StorageError::AccessDenied)?
                .remove(key);
            Ok(())
        }
    }

    /// Read a JSON value. `Ok(None)` if the key is absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.get(key)
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(StorageError::from)
    }

    /// Write a value as JSON.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}

#[cfg(target_arch = "wasm32")]
fn web_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Storage failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Storage is disabled, e.g. in private browsing
    #[error("storage not available")]
    NotAvailable,
    /// Write rejected for size
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// Access denied
    #[error("storage access denied")]
    AccessDenied,
    /// Value could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
