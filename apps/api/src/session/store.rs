//! Per-identity persistence behind `UserStateStore`.
//!
//! Values are JSON documents keyed by (identity, category). Two backends:
//! `MemoryStateStore` (default, lost on restart) and `FileStateStore`
//! (one JSON file per key under `STATE_DIR`).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::identity::Identity;
use crate::models::profile::UserProfile;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Profile,
    Liked,
    Passed,
    Applied,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Profile => "profile",
            Category::Liked => "likes",
            Category::Passed => "passes",
            Category::Applied => "applied",
        }
    }
}

#[async_trait]
pub trait UserStateStore: Send + Sync {
    async fn get(&self, identity: &Identity, category: Category)
        -> Result<Option<Value>, StoreError>;

    async fn set(
        &self,
        identity: &Identity,
        category: Category,
        value: Value,
    ) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    async fn clear(&self, identity: &Identity, category: Category) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStateStore {
    entries: RwLock<HashMap<(Identity, Category), Value>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStateStore for MemoryStateStore {
    async fn get(
        &self,
        identity: &Identity,
        category: Category,
    ) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&(identity.clone(), category)).cloned())
    }

    async fn set(
        &self,
        identity: &Identity,
        category: Category,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert((identity.clone(), category), value);
        Ok(())
    }

    async fn clear(&self, identity: &Identity, category: Category) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.remove(&(identity.clone(), category));
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File backend
// ────────────────────────────────────────────────────────────────────────────

pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `jobting_{category}_{identity}.json`, identity reduced to filename-safe characters.
    fn path_for(&self, identity: &Identity, category: Category) -> PathBuf {
        let safe: String = identity
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '-' | '_' | '+') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir
            .join(format!("jobting_{}_{safe}.json", category.as_str()))
    }
}

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

async fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    // unique per write; concurrent writers to one key must not share a temp file
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = path.with_extension(format!("json.{}.{seq}.tmp", std::process::id()));
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await
}

#[async_trait]
impl UserStateStore for FileStateStore {
    async fn get(
        &self,
        identity: &Identity,
        category: Category,
    ) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(identity, category);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(
        &self,
        identity: &Identity,
        category: Category,
        value: Value,
    ) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(identity, category);
        let bytes = serde_json::to_vec(&value)?;
        write_atomically(&path, &bytes).await?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    async fn clear(&self, identity: &Identity, category: Category) -> Result<(), StoreError> {
        let path = self.path_for(identity, category);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profile helpers
// ────────────────────────────────────────────────────────────────────────────

pub async fn load_profile(
    store: &dyn UserStateStore,
    identity: &Identity,
) -> Result<Option<UserProfile>, StoreError> {
    match store.get(identity, Category::Profile).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub async fn save_profile(
    store: &dyn UserStateStore,
    identity: &Identity,
    profile: &UserProfile,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(profile)?;
    store.set(identity, Category::Profile, value).await
}
