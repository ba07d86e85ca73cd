//! Best-effort removal of user-authored desktop entries.
//!
//! Resetting the grid to defaults also discards the user's customized
//! `.desktop` and `.directory` files so renamed entries and leftover folder
//! definitions revert with the layout. The purge runs detached from the
//! reset call; per-file failures are logged and swallowed, never retried.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::types::{DESKTOP_EXT, DIRECTORY_EXT};

const APP_DIR_NAME: &str = "applications";
const FOLDER_DIR_NAME: &str = "desktop-directories";

/// The default location of user-authored entries.
pub fn user_data_dir() -> Option<PathBuf> {
    dirs::data_dir()
}

/// Deletes user `.desktop` files under `<data_dir>/applications` and
/// `.directory` files under `<data_dir>/desktop-directories`. Missing
/// directories are fine; nothing is surfaced to the caller.
pub async fn purge_user_entries(data_dir: &Path) {
    purge_matching(&data_dir.join(APP_DIR_NAME), DESKTOP_EXT).await;
    purge_matching(&data_dir.join(FOLDER_DIR_NAME), DIRECTORY_EXT).await;
}

async fn purge_matching(dir: &Path, extension: &str) {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Skipping cleanup of {:?}: {}", dir, e);
            return;
        }
    };

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to enumerate {:?} during cleanup: {}", dir, e);
                break;
            }
        };

        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(extension) {
            continue;
        }
        if let Err(e) = tokio::fs::remove_file(entry.path()).await {
            warn!("Failed to remove {:?} during cleanup: {}", entry.path(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_purge_removes_matching_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let apps = dir.path().join(APP_DIR_NAME);
        let folders = dir.path().join(FOLDER_DIR_NAME);
        fs::create_dir_all(&apps).unwrap();
        fs::create_dir_all(&folders).unwrap();

        fs::write(apps.join("custom.desktop"), "").unwrap();
        fs::write(apps.join("notes.txt"), "").unwrap();
        fs::write(folders.join("games.directory"), "").unwrap();
        fs::write(folders.join("readme.md"), "").unwrap();

        purge_user_entries(dir.path()).await;

        assert!(!apps.join("custom.desktop").exists());
        assert!(apps.join("notes.txt").exists());
        assert!(!folders.join("games.directory").exists());
        assert!(folders.join("readme.md").exists());
    }

    #[tokio::test]
    async fn test_purge_tolerates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        // Neither applications/ nor desktop-directories/ exists.
        purge_user_entries(dir.path()).await;
    }
}
