//! Selected feature slot
//!
//! Single-slot holder for whichever feature the user last clicked. The
//! rendering side reads it to highlight and to populate the properties
//! panel; nothing in the core depends on it.

use crate::feature::Feature;
use crate::layer::LayerId;

/// The feature currently selected on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFeature {
    /// Layer the feature belongs to
    pub layer_id: LayerId,
    /// A copy of the feature at selection time
    pub feature: Feature,
}

/// Holds at most one selected feature.
#[derive(Debug, Clone, Default)]
pub struct SelectionSlot {
    selected: Option<SelectedFeature>,
}

impl SelectionSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection.
    pub fn set_selected(&mut self, layer_id: LayerId, feature: Feature) {
        self.selected = Some(SelectedFeature { layer_id, feature });
    }

    /// Clears the selection.
    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    /// The current selection, if any.
    pub fn selected(&self) -> Option<&SelectedFeature> {
        self.selected.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_previous_selection() {
        let mut slot = SelectionSlot::new();
        assert!(slot.selected().is_none());

        slot.set_selected(LayerId::new("clinics"), Feature::default());
        slot.set_selected(LayerId::new("hospitals"), Feature::default());

        let selected = slot.selected().unwrap();
        assert_eq!(selected.layer_id, LayerId::new("hospitals"));
    }

    #[test]
    fn test_clear_empties_slot() {
        let mut slot = SelectionSlot::new();
        slot.set_selected(LayerId::new("clinics"), Feature::default());
        slot.clear_selected();
        assert!(slot.selected().is_none());

        // Clearing an empty slot is fine
        slot.clear_selected();
        assert!(slot.selected().is_none());
    }
}
