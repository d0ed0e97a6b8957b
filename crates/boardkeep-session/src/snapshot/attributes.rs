//! Which categories of session state a snapshot captures and restores.

use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

/// One restorable category of session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SnapshotAttribute {
    ObjectColors,
    ObjectVisibility,
    LayerVisibility,
    DisplayRegion,
    InteractiveState,
    SelectionLayers,
    SelectableItems,
    CurrentLayer,
    RuleSelection,
    ManualRuleSettings,
    PushAndShoveEnabled,
    DragComponentsEnabled,
    PullTightRegion,
    ComponentGrid,
    InfoListSelections,
}

impl SnapshotAttribute {
    /// All categories, in restore order.
    pub const ALL: [SnapshotAttribute; 15] = [
        Self::ObjectColors,
        Self::ObjectVisibility,
        Self::LayerVisibility,
        Self::DisplayRegion,
        Self::InteractiveState,
        Self::SelectionLayers,
        Self::SelectableItems,
        Self::CurrentLayer,
        Self::RuleSelection,
        Self::ManualRuleSettings,
        Self::PushAndShoveEnabled,
        Self::DragComponentsEnabled,
        Self::PullTightRegion,
        Self::ComponentGrid,
        Self::InfoListSelections,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ObjectColors => "object colors",
            Self::ObjectVisibility => "object visibility",
            Self::LayerVisibility => "layer visibility",
            Self::DisplayRegion => "display region",
            Self::InteractiveState => "interactive state",
            Self::SelectionLayers => "selection layers",
            Self::SelectableItems => "selectable items",
            Self::CurrentLayer => "current layer",
            Self::RuleSelection => "rule selection",
            Self::ManualRuleSettings => "manual rule settings",
            Self::PushAndShoveEnabled => "push & shove enabled",
            Self::DragComponentsEnabled => "drag components enabled",
            Self::PullTightRegion => "pull tight region",
            Self::ComponentGrid => "component grid",
            Self::InfoListSelections => "info list selections",
        }
    }
}

impl fmt::Display for SnapshotAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mask of categories to capture. All on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct SnapshotAttributes {
    pub object_colors: bool,
    pub object_visibility: bool,
    pub layer_visibility: bool,
    pub display_region: bool,
    pub interactive_state: bool,
    pub selection_layers: bool,
    pub selectable_items: bool,
    pub current_layer: bool,
    pub rule_selection: bool,
    pub manual_rule_settings: bool,
    pub push_and_shove_enabled: bool,
    pub drag_components_enabled: bool,
    pub pull_tight_region: bool,
    pub component_grid: bool,
    pub info_list_selections: bool,
}

impl Default for SnapshotAttributes {
    fn default() -> Self {
        Self::all()
    }
}

impl SnapshotAttributes {
    /// Every category enabled.
    pub fn all() -> Self {
        Self::uniform(true)
    }

    /// Every category disabled.
    pub fn none() -> Self {
        Self::uniform(false)
    }

    fn uniform(on: bool) -> Self {
        Self {
            object_colors: on,
            object_visibility: on,
            layer_visibility: on,
            display_region: on,
            interactive_state: on,
            selection_layers: on,
            selectable_items: on,
            current_layer: on,
            rule_selection: on,
            manual_rule_settings: on,
            push_and_shove_enabled: on,
            drag_components_enabled: on,
            pull_tight_region: on,
            component_grid: on,
            info_list_selections: on,
        }
    }

    fn flag_mut(&mut self, attribute: SnapshotAttribute) -> &mut bool {
        match attribute {
            SnapshotAttribute::ObjectColors => &mut self.object_colors,
            SnapshotAttribute::ObjectVisibility => &mut self.object_visibility,
            SnapshotAttribute::LayerVisibility => &mut self.layer_visibility,
            SnapshotAttribute::DisplayRegion => &mut self.display_region,
            SnapshotAttribute::InteractiveState => &mut self.interactive_state,
            SnapshotAttribute::SelectionLayers => &mut self.selection_layers,
            SnapshotAttribute::SelectableItems => &mut self.selectable_items,
            SnapshotAttribute::CurrentLayer => &mut self.current_layer,
            SnapshotAttribute::RuleSelection => &mut self.rule_selection,
            SnapshotAttribute::ManualRuleSettings => &mut self.manual_rule_settings,
            SnapshotAttribute::PushAndShoveEnabled => &mut self.push_and_shove_enabled,
            SnapshotAttribute::DragComponentsEnabled => &mut self.drag_components_enabled,
            SnapshotAttribute::PullTightRegion => &mut self.pull_tight_region,
            SnapshotAttribute::ComponentGrid => &mut self.component_grid,
            SnapshotAttribute::InfoListSelections => &mut self.info_list_selections,
        }
    }

    pub fn is_enabled(&self, attribute: SnapshotAttribute) -> bool {
        match attribute {
            SnapshotAttribute::ObjectColors => self.object_colors,
            SnapshotAttribute::ObjectVisibility => self.object_visibility,
            SnapshotAttribute::LayerVisibility => self.layer_visibility,
            SnapshotAttribute::DisplayRegion => self.display_region,
            SnapshotAttribute::InteractiveState => self.interactive_state,
            SnapshotAttribute::SelectionLayers => self.selection_layers,
            SnapshotAttribute::SelectableItems => self.selectable_items,
            SnapshotAttribute::CurrentLayer => self.current_layer,
            SnapshotAttribute::RuleSelection => self.rule_selection,
            SnapshotAttribute::ManualRuleSettings => self.manual_rule_settings,
            SnapshotAttribute::PushAndShoveEnabled => self.push_and_shove_enabled,
            SnapshotAttribute::DragComponentsEnabled => self.drag_components_enabled,
            SnapshotAttribute::PullTightRegion => self.pull_tight_region,
            SnapshotAttribute::ComponentGrid => self.component_grid,
            SnapshotAttribute::InfoListSelections => self.info_list_selections,
        }
    }

    pub fn set(&mut self, attribute: SnapshotAttribute, enabled: bool) {
        *self.flag_mut(attribute) = enabled;
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, attribute: SnapshotAttribute, enabled: bool) -> Self {
        self.set(attribute, enabled);
        self
    }

    /// Enabled categories, in restore order.
    pub fn enabled(&self) -> impl Iterator<Item = SnapshotAttribute> + '_ {
        SnapshotAttribute::ALL
            .into_iter()
            .filter(|attribute| self.is_enabled(*attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_on_by_default() {
        let mask = SnapshotAttributes::default();
        assert_eq!(mask.enabled().count(), SnapshotAttribute::ALL.len());
    }

    #[test]
    fn test_toggles_are_independent() {
        for attribute in SnapshotAttribute::ALL {
            let mask = SnapshotAttributes::none().with(attribute, true);
            assert_eq!(mask.enabled().collect::<Vec<_>>(), vec![attribute]);

            let mask = SnapshotAttributes::all().with(attribute, false);
            assert!(!mask.is_enabled(attribute));
            assert_eq!(mask.enabled().count(), SnapshotAttribute::ALL.len() - 1);
        }
    }

    #[test]
    fn test_labels_unique() {
        let mut labels: Vec<_> = SnapshotAttribute::ALL.into_iter().map(SnapshotAttribute::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 15);
    }
}
