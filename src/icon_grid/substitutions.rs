//! Legacy icon id substitution.
//!
//! Application ids occasionally get renamed upstream; layouts persisted
//! before a rename still reference the old ids. A static key-file shipped
//! with the OS image maps `old-id = new-id`, and every id ingested into the
//! tree is normalized through it.

use std::collections::HashMap;
use std::path::Path;

use ini::Ini;
use log::warn;

/// Key-file group holding the `old = new` pairs.
pub const SUBSTITUTIONS_GROUP: &str = "Desktop Substitutions";

/// Immutable mapping from obsolete icon ids to their replacements.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    entries: HashMap<String, String>,
}

impl SubstitutionTable {
    /// Loads the table from an INI key-file, best effort: a missing or
    /// unparsable file logs a warning and yields an empty table. The store
    /// must come up even when the image ships no substitutions.
    pub fn load(path: &Path) -> Self {
        let ini = match Ini::load_from_file(path) {
            Ok(ini) => ini,
            Err(e) => {
                warn!("Can't load desktop substitutions file {:?}: {}", path, e);
                return Self::default();
            }
        };

        let entries = ini
            .section(Some(SUBSTITUTIONS_GROUP))
            .map(|props| {
                props
                    .iter()
                    .map(|(old, new)| (old.to_string(), new.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// The mapped id, or `id` itself when no substitution applies.
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).unwrap_or(id)
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, old: &str, new: &str) {
        self.entries.insert(old.to_string(), new.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_parses_substitutions_group() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[Desktop Substitutions]").unwrap();
        writeln!(file, "old-app.desktop=new-app.desktop").unwrap();
        writeln!(file, "legacy.desktop=modern.desktop").unwrap();

        let table = SubstitutionTable::load(file.path());
        assert_eq!(table.resolve("old-app.desktop"), "new-app.desktop");
        assert_eq!(table.resolve("legacy.desktop"), "modern.desktop");
        assert_eq!(table.resolve("unmapped.desktop"), "unmapped.desktop");
    }

    #[test]
    fn test_load_missing_file_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = SubstitutionTable::load(&dir.path().join("does-not-exist.ini"));
        assert!(table.is_empty());
        assert_eq!(table.resolve("anything.desktop"), "anything.desktop");
    }

    #[test]
    fn test_load_ignores_other_groups() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[Some Other Group]").unwrap();
        writeln!(file, "old.desktop=new.desktop").unwrap();

        let table = SubstitutionTable::load(file.path());
        assert!(table.is_empty());
    }
}
