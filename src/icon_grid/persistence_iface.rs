//! Persisted-setting seam for the icon grid layout.
//!
//! The layout occupies a single key in the system settings backend. The
//! trait mirrors that backend's contract: whole-value get/set, reset to the
//! unset state, and a change-notification stream that fires for every
//! successful write — including the service's own writes, which is what
//! makes the service's reload path self-synchronizing.

use std::io;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use log::debug;
use tokio::sync::broadcast;

use super::errors::IconGridError;
use super::types::IconTree;

/// Capacity of the change-notification channel. Notifications collapse to a
/// full reload, so a lagging receiver loses nothing.
const NOTIFY_CAPACITY: usize = 16;

// --- LayoutSettingsStore Trait ---

#[async_trait]
pub trait LayoutSettingsStore: Send + Sync {
    /// Decodes the current persisted value. An unset key decodes as the
    /// empty tree.
    async fn load(&self) -> Result<IconTree, IconGridError>;

    /// Replaces the persisted value with the whole re-encoded tree. No
    /// partial or delta writes.
    async fn store(&self, tree: &IconTree) -> Result<(), IconGridError>;

    /// Returns the key to its unset state.
    async fn reset(&self) -> Result<(), IconGridError>;

    /// Change notifications; one message per successful `store` or `reset`.
    fn subscribe(&self) -> broadcast::Receiver<()>;
}

// --- FilesystemLayoutStore Implementation ---

/// JSON-file-backed store. A missing file is the unset state.
pub struct FilesystemLayoutStore {
    path: PathBuf,
    notify_tx: broadcast::Sender<()>,
}

impl FilesystemLayoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (notify_tx, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self {
            path: path.into(),
            notify_tx,
        }
    }

    fn notify(&self) {
        // No receivers yet is fine; the service subscribes before loading.
        let _ = self.notify_tx.send(());
    }
}

#[async_trait]
impl LayoutSettingsStore for FilesystemLayoutStore {
    async fn load(&self) -> Result<IconTree, IconGridError> {
        debug!("Loading icon grid layout from {:?}", self.path);
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                serde_json::from_str(&content).map_err(IconGridError::Deserialization)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Layout file {:?} not set, decoding as empty tree", self.path);
                Ok(IconTree::new())
            }
            Err(e) => Err(IconGridError::persistence("load", &self.path, e)),
        }
    }

    async fn store(&self, tree: &IconTree) -> Result<(), IconGridError> {
        let content = serde_json::to_string(tree).map_err(IconGridError::Serialization)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| IconGridError::persistence("store", &self.path, e))?;
        }
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| IconGridError::persistence("store", &self.path, e))?;
        debug!("Stored icon grid layout to {:?}", self.path);
        self.notify();
        Ok(())
    }

    async fn reset(&self) -> Result<(), IconGridError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(IconGridError::persistence("reset", &self.path, e)),
        }
        debug!("Reset icon grid layout at {:?}", self.path);
        self.notify();
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify_tx.subscribe()
    }
}

// --- InMemoryLayoutStore Implementation ---

/// Store holding the value in process memory. Used for ephemeral sessions
/// and as the service tests' settings backend; `None` is the unset state.
pub struct InMemoryLayoutStore {
    value: RwLock<Option<IconTree>>,
    notify_tx: broadcast::Sender<()>,
}

impl InMemoryLayoutStore {
    pub fn new() -> Self {
        Self::with_value(None)
    }

    pub fn with_value(value: Option<IconTree>) -> Self {
        let (notify_tx, _) = broadcast::channel(NOTIFY_CAPACITY);
        Self {
            value: RwLock::new(value),
            notify_tx,
        }
    }

    /// Overwrites the value from outside the store contract, as an external
    /// settings writer would, and notifies subscribers.
    pub fn inject(&self, value: Option<IconTree>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value;
        let _ = self.notify_tx.send(());
    }
}

impl Default for InMemoryLayoutStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LayoutSettingsStore for InMemoryLayoutStore {
    async fn load(&self) -> Result<IconTree, IconGridError> {
        let value = self.value.read().unwrap_or_else(PoisonError::into_inner);
        Ok(value.clone().unwrap_or_default())
    }

    async fn store(&self, tree: &IconTree) -> Result<(), IconGridError> {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(tree.clone());
        let _ = self.notify_tx.send(());
        Ok(())
    }

    async fn reset(&self) -> Result<(), IconGridError> {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
        let _ = self.notify_tx.send(());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify_tx.subscribe()
    }
}
