//! Persistence port
//!
//! The engine never touches the filesystem directly; managers go
//! through [`StatePort`], keyed by logical collection. Saves are
//! whole-collection replace-on-write.

use parking_lot::Mutex;
use shared::error::AppError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Logical collection key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Customers,
    MailItems,
    Templates,
}

impl CollectionKey {
    /// File name used by the JSON file store
    pub const fn file_name(&self) -> &'static str {
        match self {
            CollectionKey::Customers => "customers.json",
            CollectionKey::MailItems => "mail_items.json",
            CollectionKey::Templates => "templates.json",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            CollectionKey::Customers => "customers",
            CollectionKey::MailItems => "mail_items",
            CollectionKey::Templates => "templates",
        }
    }
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage path is not a directory: {0}")]
    NotADirectory(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::persistence(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Load/save contract keyed by logical collection
///
/// Implementations must treat `save` as replace-on-write; `load`
/// returns `None` when the collection has never been saved.
pub trait StatePort: Send + Sync {
    fn load(&self, key: CollectionKey) -> StoreResult<Option<String>>;
    fn save(&self, key: CollectionKey, raw: &str) -> StoreResult<()>;
}

/// JSON file store rooted in a working directory
///
/// Writes go to a temp file first and are moved into place with a
/// rename, so a crash mid-write never leaves a truncated collection.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        if dir.exists() && !dir.is_dir() {
            return Err(StoreError::NotADirectory(dir.display().to_string()));
        }
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: CollectionKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl StatePort for JsonFileStore {
    fn load(&self, key: CollectionKey) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&self, key: CollectionKey, raw: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, raw)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            tracing::warn!(
                collection = key.name(),
                error = %e,
                "Failed to move collection file into place"
            );
            return Err(e.into());
        }
        Ok(())
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<CollectionKey, String>>,
    /// When set, every save fails (persistence failure tests)
    fail_saves: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

impl StatePort for MemoryStore {
    fn load(&self, key: CollectionKey) -> StoreResult<Option<String>> {
        Ok(self.data.lock().get(&key).cloned())
    }

    fn save(&self, key: CollectionKey, raw: &str) -> StoreResult<()> {
        if self.fail_saves.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                "simulated quota exceeded",
            )));
        }
        self.data.lock().insert(key, raw.to_string());
        Ok(())
    }
}
