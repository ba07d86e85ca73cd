//! Core data model for the icon grid layout.
//!
//! The persisted shape is a string-keyed map of string arrays,
//! `{ "<folder>": ["<icon>", ...], ... }`, matching the layouts already
//! stored by existing installations. `IconTree` wraps that map and carries
//! the structural invariants; all fallible lookups are fail-soft.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::substitutions::SubstitutionTable;

/// Key of the top-level (desktop) folder. Present in every non-empty tree.
pub const DESKTOP_GRID_ID: &str = "desktop";

/// Suffix marking an icon id as a folder.
pub const DIRECTORY_EXT: &str = ".directory";

/// Suffix of application entry files.
pub const DESKTOP_EXT: &str = ".desktop";

/// Returns true iff `id` denotes a folder.
pub fn icon_is_folder(id: &str) -> bool {
    id.ends_with(DIRECTORY_EXT)
}

/// Hierarchical mapping from folder ids to ordered icon id sequences.
///
/// Folder icons are simultaneously members of a parent sequence and keys of
/// their own children sequence. An icon id occurs at most once across all
/// sequences; `insert_before` callers uphold this by detaching first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconTree {
    folders: BTreeMap<String, Vec<String>>,
}

impl IconTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// The smallest valid tree: an empty desktop root and nothing else.
    pub fn minimal() -> Self {
        let mut folders = BTreeMap::new();
        folders.insert(DESKTOP_GRID_ID.to_string(), Vec::new());
        Self { folders }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// True iff the desktop root key is present.
    pub fn has_desktop_root(&self) -> bool {
        self.folders.contains_key(DESKTOP_GRID_ID)
    }

    /// True iff `folder` is a known folder key.
    pub fn has_folder(&self, folder: &str) -> bool {
        self.folders.contains_key(folder)
    }

    /// True iff `id` appears in any folder's sequence.
    pub fn has_icon(&self, id: &str) -> bool {
        self.folders.values().any(|icons| icons.iter().any(|i| i == id))
    }

    /// The folder's children in display order; unknown folders yield an
    /// empty sequence.
    pub fn icons(&self, folder: &str) -> &[String] {
        self.folders.get(folder).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All non-folder ids across all folders, in folder-key order.
    pub fn list_applications(&self) -> Vec<String> {
        self.folders
            .values()
            .flatten()
            .filter(|id| !icon_is_folder(id))
            .cloned()
            .collect()
    }

    /// First folder containing `id` and the index within its sequence.
    pub fn position_of(&self, id: &str) -> Option<(String, usize)> {
        for (folder, icons) in &self.folders {
            if let Some(pos) = icons.iter().position(|i| i == id) {
                return Some((folder.clone(), pos));
            }
        }
        None
    }

    /// Removes `id` from whatever folder holds it. Returns true if it was
    /// present anywhere. The id's own children key, if any, is untouched.
    pub fn detach(&mut self, id: &str) -> bool {
        for icons in self.folders.values_mut() {
            if let Some(pos) = icons.iter().position(|i| i == id) {
                icons.remove(pos);
                return true;
            }
        }
        false
    }

    /// Inserts `id` into `folder`, immediately before `anchor` when the
    /// anchor resolves inside that folder, appending otherwise. The anchor
    /// is an id rather than an index because stored layouts may list icons
    /// not installed on this system, so positions are not stable.
    ///
    /// Returns false (no state change) if `folder` is unknown.
    pub fn insert_before(&mut self, folder: &str, id: &str, anchor: Option<&str>) -> bool {
        let Some(icons) = self.folders.get_mut(folder) else {
            return false;
        };
        let idx = anchor
            .and_then(|a| icons.iter().position(|i| i == a))
            .unwrap_or(icons.len());
        icons.insert(idx, id.to_string());
        true
    }

    /// Ensures a (possibly empty) children sequence exists for `folder`.
    pub fn ensure_folder(&mut self, folder: &str) {
        self.folders.entry(folder.to_string()).or_default();
    }

    /// Drops `folder`'s own children key. Former children stay wherever
    /// else they are referenced; they are orphaned, not deleted.
    pub fn remove_folder_key(&mut self, folder: &str) {
        self.folders.remove(folder);
    }

    /// Rewrites obsolete ids in every sequence through the substitution
    /// table. Folder keys are never rewritten, matching stored layouts
    /// produced before the ids were renamed.
    pub fn apply_substitutions(&mut self, table: &SubstitutionTable) {
        if table.is_empty() {
            return;
        }
        for icons in self.folders.values_mut() {
            for icon in icons.iter_mut() {
                if let Some(new_id) = table.get(icon) {
                    *icon = new_id.to_string();
                }
            }
        }
    }
}

impl FromIterator<(String, Vec<String>)> for IconTree {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            folders: iter.into_iter().collect(),
        }
    }
}
