// Main module for the icon grid layout store.

pub mod cleanup;
pub mod defaults;
pub mod errors;
pub mod events;
pub mod persistence_iface; // For the trait defining how the layout is saved/loaded
pub mod service;           // For the IconGridService implementation
pub mod substitutions;
pub mod types;

// Re-exports for easier access by consumers of the crate.

pub use self::defaults::{DefaultLayoutSource, DEFAULT_PERSONALITY};
pub use self::errors::IconGridError;
pub use self::events::LayoutChangedEvent;
pub use self::persistence_iface::{FilesystemLayoutStore, InMemoryLayoutStore, LayoutSettingsStore};
pub use self::service::{DefaultIconGridService, IconGridService};
pub use self::substitutions::SubstitutionTable;
pub use self::types::{icon_is_folder, IconTree, DESKTOP_EXT, DESKTOP_GRID_ID, DIRECTORY_EXT};
