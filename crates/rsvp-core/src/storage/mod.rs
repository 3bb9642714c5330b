//! Client-side key-value storage
//!
//! Mirrors the browser's local storage: string keys, string values, survives
//! restarts when backed by [`SqliteStorage`]. The session token is the only
//! entry the core writes (key [`AUTH_TOKEN_KEY`]).

mod sqlite;

pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;

/// Storage key holding the opaque session token
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Durable key-value store used by the session manager
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Read a value, `None` when the key is absent
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; removing an absent key is not an error
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-process storage, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value, e.g. a token left over from an earlier run
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.lock().insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds consistent string pairs
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ClientStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}
