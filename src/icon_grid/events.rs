use serde::{Deserialize, Serialize};

use super::types::IconTree;

/// Emitted after every successful reload of the in-memory tree, whether
/// triggered by an external settings change, a self-triggered write, or
/// corruption recovery. Carries the adopted tree so subscribers need not
/// re-query the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutChangedEvent {
    pub tree: IconTree,
}

impl LayoutChangedEvent {
    pub fn new(tree: IconTree) -> Self {
        Self { tree }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon_grid::types::DESKTOP_GRID_ID;

    #[test]
    fn test_layout_changed_event_serialization() {
        let event = LayoutChangedEvent::new(IconTree::minimal());
        let serialized = serde_json::to_string(&event).unwrap();
        assert!(serialized.contains(r#""tree":{"desktop":[]}"#));

        let deserialized: LayoutChangedEvent = serde_json::from_str(&serialized).unwrap();
        assert!(deserialized.tree.has_desktop_root());
        assert!(deserialized.tree.icons(DESKTOP_GRID_ID).is_empty());
    }
}
