//! Personality-specific default layouts.
//!
//! When the persisted layout key is unset, the grid comes up with a default
//! tree shipped on the OS image. Images are built per "personality"; each
//! ships a `icon-grid-<personality>.json` next to a generic
//! `icon-grid-default.json` fallback.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, warn};

use super::types::IconTree;

pub const DEFAULT_PERSONALITY: &str = "default";
const CONFIG_NAME_BASE: &str = "icon-grid";

/// Loads the default layout for a personality from a defaults directory.
#[derive(Debug, Clone)]
pub struct DefaultLayoutSource {
    dir: PathBuf,
    personality: String,
}

impl DefaultLayoutSource {
    pub fn new(dir: impl Into<PathBuf>, personality: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            personality: personality.into(),
        }
    }

    fn candidate_paths(&self) -> Vec<PathBuf> {
        let mut candidates = vec![self
            .dir
            .join(format!("{}-{}.json", CONFIG_NAME_BASE, self.personality))];
        if self.personality != DEFAULT_PERSONALITY {
            candidates.push(
                self.dir
                    .join(format!("{}-{}.json", CONFIG_NAME_BASE, DEFAULT_PERSONALITY)),
            );
        }
        candidates
    }

    /// Loads the first decodable candidate file. Every candidate failure is
    /// logged on its own, since a personality-specific file should always
    /// exist even when the fallback saves the day. Exhausting all candidates,
    /// or decoding an empty tree, yields the minimal valid tree so callers
    /// never observe an undefined desktop root.
    pub fn load(&self) -> IconTree {
        for path in self.candidate_paths() {
            match Self::load_file(&path) {
                Ok(tree) => {
                    if tree.is_empty() {
                        warn!("Icon grid defaults file {:?} decodes to an empty tree", path);
                        continue;
                    }
                    return tree;
                }
                Err(message) => {
                    error!("Failed to read icon grid defaults file {:?}: {}", path, message);
                }
            }
        }

        warn!("No icon grid defaults found, synthesizing minimal layout");
        IconTree::minimal()
    }

    fn load_file(path: &Path) -> Result<IconTree, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon_grid::types::DESKTOP_GRID_ID;

    fn write_defaults(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_personality_specific_file() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path(), "icon-grid-atlas.json", r#"{"desktop": ["a.desktop"]}"#);
        write_defaults(dir.path(), "icon-grid-default.json", r#"{"desktop": ["b.desktop"]}"#);

        let tree = DefaultLayoutSource::new(dir.path(), "atlas").load();
        assert_eq!(tree.icons(DESKTOP_GRID_ID), ["a.desktop"]);
    }

    #[test]
    fn test_load_falls_back_to_default_file() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path(), "icon-grid-default.json", r#"{"desktop": ["b.desktop"]}"#);

        let tree = DefaultLayoutSource::new(dir.path(), "atlas").load();
        assert_eq!(tree.icons(DESKTOP_GRID_ID), ["b.desktop"]);
    }

    #[test]
    fn test_load_skips_malformed_personality_file() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path(), "icon-grid-atlas.json", "not json at all");
        write_defaults(dir.path(), "icon-grid-default.json", r#"{"desktop": ["b.desktop"]}"#);

        let tree = DefaultLayoutSource::new(dir.path(), "atlas").load();
        assert_eq!(tree.icons(DESKTOP_GRID_ID), ["b.desktop"]);
    }

    #[test]
    fn test_load_synthesizes_minimal_tree_when_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let tree = DefaultLayoutSource::new(dir.path(), "atlas").load();
        assert!(tree.has_desktop_root());
        assert!(tree.icons(DESKTOP_GRID_ID).is_empty());
    }

    #[test]
    fn test_default_personality_has_single_candidate() {
        let source = DefaultLayoutSource::new("/usr/share/defaults", DEFAULT_PERSONALITY);
        assert_eq!(source.candidate_paths().len(), 1);
    }

    #[test]
    fn test_empty_defaults_fall_through_to_minimal() {
        let dir = tempfile::tempdir().unwrap();
        write_defaults(dir.path(), "icon-grid-default.json", "{}");

        let tree = DefaultLayoutSource::new(dir.path(), DEFAULT_PERSONALITY).load();
        assert!(tree.has_desktop_root());
    }
}
