//! Snapshot records.

use std::fmt;

use boardkeep_persistence::Point;
use rkyv::{Archive, Deserialize, Serialize};

use super::attributes::SnapshotAttributes;
use crate::live::{
    ColorTables, CoordinateTransform, InfoListSelections, ItemSelectionFilter, LiveSessionState,
    MenuMode,
};

/// Identifier of a snapshot, unique for the lifetime of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize,
)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct SnapshotId(u64);

impl SnapshotId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Visible part of the board.
#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct DisplayRegion {
    pub viewport_offset: Point,
    pub transform: CoordinateTransform,
}

/// Manual routing rules.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct ManualRules {
    pub clearance_class: u32,
    pub via_rule_index: u32,

    /// One per layer.
    pub trace_half_widths: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub struct ComponentGrid {
    pub horizontal: i32,
    pub vertical: i32,
}

/// A named restore point of the interactive session.
///
/// Each optional field is present exactly when its category was enabled in
/// [`attributes`](Self::attributes) at capture time. The menu mode is always
/// captured. The current layer is also captured with the interactive state,
/// since it is the layer the user was working on.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub name: String,

    /// Mask in effect when the snapshot was taken.
    pub attributes: SnapshotAttributes,

    pub menu_mode: MenuMode,

    pub object_colors: Option<ColorTables>,
    pub object_visibility: Option<Vec<f32>>,
    pub layer_visibility: Option<Vec<f32>>,
    pub display_region: Option<DisplayRegion>,
    pub selection_layers: Option<bool>,
    pub selectable_items: Option<ItemSelectionFilter>,
    pub current_layer: Option<u32>,
    pub rule_selection: Option<bool>,
    pub manual_rules: Option<ManualRules>,
    pub push_enabled: Option<bool>,
    pub drag_components_enabled: Option<bool>,
    pub pull_tight_region: Option<i32>,
    pub component_grid: Option<ComponentGrid>,
    pub info_list_selections: Option<InfoListSelections>,
}

impl Snapshot {
    /// Copy the masked categories out of the live session.
    ///
    /// The caller checks that the session is in a menu state.
    pub(crate) fn capture(
        id: SnapshotId,
        name: String,
        live: &LiveSessionState,
        mask: &SnapshotAttributes,
    ) -> Self {
        let settings = &live.settings;
        let graphics = &live.graphics;

        Self {
            id,
            name,
            attributes: *mask,
            menu_mode: live.interactive.persisted_mode(),
            object_colors: mask.object_colors.then(|| graphics.colors.clone()),
            object_visibility: mask
                .object_visibility
                .then(|| graphics.object_intensities.clone()),
            layer_visibility: mask
                .layer_visibility
                .then(|| graphics.layer_visibility.clone()),
            display_region: mask.display_region.then(|| DisplayRegion {
                viewport_offset: live.view.viewport_offset,
                transform: graphics.transform,
            }),
            selection_layers: mask
                .selection_layers
                .then_some(settings.select_on_all_visible_layers),
            selectable_items: mask
                .selectable_items
                .then_some(settings.item_selection_filter),
            current_layer: (mask.current_layer || mask.interactive_state)
                .then_some(settings.layer),
            rule_selection: mask
                .rule_selection
                .then_some(settings.manual_rule_selection),
            manual_rules: mask.manual_rule_settings.then(|| ManualRules {
                clearance_class: settings.manual_trace_clearance_class,
                via_rule_index: settings.manual_via_rule_index,
                trace_half_widths: settings.manual_trace_half_widths.clone(),
            }),
            push_enabled: mask
                .push_and_shove_enabled
                .then_some(settings.push_enabled),
            drag_components_enabled: mask
                .drag_components_enabled
                .then_some(settings.drag_components_enabled),
            pull_tight_region: mask
                .pull_tight_region
                .then_some(settings.pull_tight_region_width),
            component_grid: mask.component_grid.then_some(ComponentGrid {
                horizontal: settings.horizontal_component_grid,
                vertical: settings.vertical_component_grid,
            }),
            info_list_selections: mask
                .info_list_selections
                .then(|| live.object_lists.selections()),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
