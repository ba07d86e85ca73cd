//! The icon grid layout service.
//!
//! Owns the authoritative in-memory tree and keeps it synchronized with the
//! persisted setting. All writes go through the store and come back through
//! its change-notification stream, so external edits, own writes, and
//! corruption recovery all converge on the same reload path.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use log::{debug, error, warn};
use tokio::sync::broadcast;

use super::cleanup;
use super::defaults::DefaultLayoutSource;
use super::errors::IconGridError;
use super::events::LayoutChangedEvent;
use super::persistence_iface::LayoutSettingsStore;
use super::substitutions::SubstitutionTable;
use super::types::{icon_is_folder, IconTree};

const CHANGED_CAPACITY: usize = 16;

// --- IconGridService Trait ---

#[async_trait]
pub trait IconGridService: Send + Sync {
    /// True iff `id` appears in any folder's sequence.
    fn has_icon(&self, id: &str) -> bool;

    /// The folder's children in display order; unknown folders yield an
    /// empty sequence.
    fn icons(&self, folder: &str) -> Vec<String>;

    /// True iff `id` carries the reserved folder suffix.
    fn icon_is_folder(&self, id: &str) -> bool {
        icon_is_folder(id)
    }

    /// All non-folder ids across all folders.
    fn list_applications(&self) -> Vec<String>;

    /// First folder containing `id` and the index within its sequence.
    fn position_of(&self, id: &str) -> Option<(String, usize)>;

    /// Moves `id` into `folder`, before `insert_before` when that anchor is
    /// present in the target, appending otherwise. A `None` folder removes
    /// the icon. An unknown target folder is a silent no-op.
    async fn reposition(
        &self,
        id: &str,
        insert_before: Option<&str>,
        folder: Option<&str>,
    ) -> Result<(), IconGridError>;

    /// `reposition(id, None, Some(folder))`.
    async fn append_icon(&self, id: &str, folder: &str) -> Result<(), IconGridError>;

    /// `reposition(id, None, None)`.
    async fn remove_icon(&self, id: &str) -> Result<(), IconGridError>;

    /// Resets the persisted key, bringing the defaults back through the
    /// standard reload path, and detaches a best-effort purge of
    /// user-authored desktop entries. Returns once the reset is durable;
    /// the purge is not awaited.
    async fn reset_to_defaults(&self) -> Result<(), IconGridError>;

    /// One message per successful reload of the in-memory tree.
    fn subscribe(&self) -> broadcast::Receiver<LayoutChangedEvent>;
}

// --- DefaultIconGridService Implementation ---

pub struct DefaultIconGridService {
    tree: RwLock<IconTree>,
    store: Arc<dyn LayoutSettingsStore>,
    substitutions: SubstitutionTable,
    defaults: DefaultLayoutSource,
    cleanup_dir: Option<PathBuf>,
    changed_tx: broadcast::Sender<LayoutChangedEvent>,
}

impl DefaultIconGridService {
    /// Builds the service and performs the initial load. The change
    /// listener is attached before that load so a reset issued during
    /// corruption recovery is never missed. The listener holds only a weak
    /// handle and exits once the service is dropped.
    pub async fn new(
        store: Arc<dyn LayoutSettingsStore>,
        substitutions: SubstitutionTable,
        defaults: DefaultLayoutSource,
        cleanup_dir: Option<PathBuf>,
    ) -> Arc<Self> {
        let (changed_tx, _) = broadcast::channel(CHANGED_CAPACITY);
        let service = Arc::new(Self {
            tree: RwLock::new(IconTree::minimal()),
            store,
            substitutions,
            defaults,
            cleanup_dir,
            changed_tx,
        });

        let mut notifications = service.store.subscribe();
        let weak = Arc::downgrade(&service);
        tokio::spawn(async move {
            loop {
                match notifications.recv().await {
                    Ok(()) => {}
                    // A full reload subsumes any notifications we missed.
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                let Some(service) = weak.upgrade() else { break };
                service.reload().await;
            }
        });

        service.reload().await;
        service
    }

    fn read_tree(&self) -> RwLockReadGuard<'_, IconTree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tree(&self) -> RwLockWriteGuard<'_, IconTree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rebuilds the tree from the persisted value. A non-empty value with
    /// no desktop root, or one that fails to decode, is corrupted: the key
    /// is reset and recovery completes when the reset's own notification
    /// re-runs this path. An empty value adopts the defaults without
    /// writing them back.
    async fn reload(&self) {
        let mut tree = match self.store.load().await {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Unreadable icon grid layout, resetting to defaults: {}", e);
                self.reset_persisted_key().await;
                return;
            }
        };
        tree.apply_substitutions(&self.substitutions);

        if !tree.is_empty() && !tree.has_desktop_root() {
            warn!("Corrupted icon grid layout detected, resetting to defaults");
            self.reset_persisted_key().await;
            return;
        }

        if tree.is_empty() {
            debug!("Icon grid layout unset, adopting defaults");
            tree = self.defaults.load();
            tree.apply_substitutions(&self.substitutions);
        }

        *self.write_tree() = tree.clone();
        // No receivers is fine, e.g. before anyone subscribed.
        let _ = self.changed_tx.send(LayoutChangedEvent::new(tree));
    }

    async fn reset_persisted_key(&self) {
        if let Err(e) = self.store.reset().await {
            error!("Failed to reset icon grid layout key: {}", e);
        }
    }

    /// Re-encodes the whole tree into the persisted store as one value.
    /// The write's own notification triggers an idempotent reload.
    async fn persist_snapshot(&self, snapshot: IconTree) -> Result<(), IconGridError> {
        self.store.store(&snapshot).await
    }
}

#[async_trait]
impl IconGridService for DefaultIconGridService {
    fn has_icon(&self, id: &str) -> bool {
        self.read_tree().has_icon(id)
    }

    fn icons(&self, folder: &str) -> Vec<String> {
        self.read_tree().icons(folder).to_vec()
    }

    fn list_applications(&self) -> Vec<String> {
        self.read_tree().list_applications()
    }

    fn position_of(&self, id: &str) -> Option<(String, usize)> {
        self.read_tree().position_of(id)
    }

    async fn reposition(
        &self,
        id: &str,
        insert_before: Option<&str>,
        folder: Option<&str>,
    ) -> Result<(), IconGridError> {
        let is_folder = icon_is_folder(id);
        let snapshot = {
            let mut tree = self.write_tree();
            match folder {
                Some(target) => {
                    if !tree.has_folder(target) {
                        debug!("Ignoring reposition of '{}' to unknown folder '{}'", id, target);
                        return Ok(());
                    }
                    let existed = tree.detach(id);
                    tree.insert_before(target, id, insert_before);
                    if is_folder && !existed {
                        // A folder entering the grid needs a children
                        // sequence of its own.
                        tree.ensure_folder(id);
                    }
                }
                None => {
                    let existed = tree.detach(id);
                    if is_folder && existed {
                        // The folder dissolves; its former children stay
                        // wherever else they are referenced.
                        tree.remove_folder_key(id);
                    }
                }
            }
            tree.clone()
        };
        self.persist_snapshot(snapshot).await
    }

    async fn append_icon(&self, id: &str, folder: &str) -> Result<(), IconGridError> {
        self.reposition(id, None, Some(folder)).await
    }

    async fn remove_icon(&self, id: &str) -> Result<(), IconGridError> {
        self.reposition(id, None, None).await
    }

    async fn reset_to_defaults(&self) -> Result<(), IconGridError> {
        self.store.reset().await?;

        if let Some(data_dir) = self.cleanup_dir.clone() {
            tokio::spawn(async move {
                cleanup::purge_user_entries(&data_dir).await;
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<LayoutChangedEvent> {
        self.changed_tx.subscribe()
    }
}
