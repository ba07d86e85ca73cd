//! Domain layer for the desktop shell's application grid.
//!
//! The shell's overview grid is a hierarchy of folders holding ordered icon
//! ids, durably backed by a single persisted setting. This crate owns that
//! tree: decoding and validating the persisted value, bootstrapping
//! personality defaults when the key is unset, healing corrupted values,
//! normalizing legacy icon ids, and broadcasting a `changed` event after
//! every reload. Rendering, drag-and-drop, and the settings backend itself
//! live elsewhere and talk to this crate through `IconGridService` and
//! `LayoutSettingsStore`.

pub mod error;
pub mod icon_grid;

// Re-export common types and interfaces
pub use error::{DomainError, DomainResult};
pub use icon_grid::{
    icon_is_folder, DefaultIconGridService, DefaultLayoutSource, FilesystemLayoutStore,
    IconGridError, IconGridService, IconTree, InMemoryLayoutStore, LayoutChangedEvent,
    LayoutSettingsStore, SubstitutionTable, DESKTOP_GRID_ID,
};
