//! Durable storage for the cart.
//!
//! The cart lives in a single named slot holding a JSON array of line items.
//! It is read once at startup and overwritten wholesale after every
//! mutation. Reading never fails outward: a missing or malformed slot is an
//! empty cart.

use crate::error::Result;
use crate::types::LineItem;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// A single key-value slot that survives restarts.
pub trait CartStorage: Send + Sync {
    /// Raw slot contents, `None` if the slot was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read_slot(&self) -> Result<Option<String>>;

    /// Overwrites the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn write_slot(&self, contents: &str) -> Result<()>;

    /// Loads the persisted cart, falling back to empty.
    fn load(&self) -> Vec<LineItem> {
        match self.read_slot() {
            Ok(Some(raw)) => match decode_items(&raw) {
                Ok(items) => items,
                Err(error) => {
                    tracing::warn!(%error, "Discarding malformed cart data");
                    Vec::new()
                },
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(%error, "Cart storage unreadable, starting empty");
                Vec::new()
            },
        }
    }

    /// Persists the whole cart.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the slot write fails.
    fn save(&self, items: &[LineItem]) -> Result<()> {
        self.write_slot(&serde_json::to_string(items)?)
    }
}

/// Parses a slot's contents.
///
/// Items with a zero quantity (possible in hand-edited data) are dropped.
///
/// # Errors
///
/// Returns [`crate::CartError::Malformed`] if `raw` is not a JSON array of
/// line items.
pub fn decode_items(raw: &str) -> Result<Vec<LineItem>> {
    let mut items: Vec<LineItem> = serde_json::from_str(raw)?;
    let before = items.len();
    items.retain(|item| item.quantity > 0);
    if items.len() != before {
        tracing::warn!(dropped = before - items.len(), "Dropped zero-quantity items");
    }
    Ok(items)
}

/// Process-local slot, used in tests and as a fallback.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    slot: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl InMemoryStorage {
    /// Creates an empty slot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot pre-filled with `contents`
    #[must_use]
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(contents.into())),
            writes: Mutex::new(0),
        }
    }

    /// Current raw contents
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of writes so far
    #[must_use]
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartStorage for InMemoryStorage {
    fn read_slot(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write_slot(&self, contents: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(contents.to_string());
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Slot backed by `{dir}/{key}.json`.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Slot named `key` inside `dir`
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileStorage {
    fn read_slot(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write_slot(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)?;
        tracing::trace!(path = %self.path.display(), "Cart written");
        Ok(())
    }
}

/// Browser `window.localStorage` slot.
#[cfg(feature = "web")]
#[derive(Clone, Debug)]
pub struct LocalStorage {
    key: String,
}

#[cfg(feature = "web")]
impl LocalStorage {
    /// Slot named `key`
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or_else(|| {
                crate::CartError::StorageUnavailable("window.localStorage".to_string())
            })
    }
}

#[cfg(feature = "web")]
impl CartStorage for LocalStorage {
    fn read_slot(&self) -> Result<Option<String>> {
        Self::storage()?
            .get_item(&self.key)
            .map_err(|error| crate::CartError::StorageUnavailable(format!("{error:?}")))
    }

    fn write_slot(&self, contents: &str) -> Result<()> {
        Self::storage()?
            .set_item(&self.key, contents)
            .map_err(|error| crate::CartError::StorageUnavailable(format!("{error:?}")))
    }
}
