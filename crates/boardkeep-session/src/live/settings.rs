//! Interactive editing settings.

use rkyv::{Archive, Deserialize, Serialize};

/// Item kinds the selection filter can include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectableItem {
    Traces,
    Vias,
    Pins,
    Conductions,
    Keepouts,
    ViaKeepouts,
    ComponentKeepouts,
    BoardOutline,
    ComponentOutlines,
    Fixed,
    Unfixed,
}

impl SelectableItem {
    pub const ALL: [SelectableItem; 11] = [
        Self::Traces,
        Self::Vias,
        Self::Pins,
        Self::Conductions,
        Self::Keepouts,
        Self::ViaKeepouts,
        Self::ComponentKeepouts,
        Self::BoardOutline,
        Self::ComponentOutlines,
        Self::Fixed,
        Self::Unfixed,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Which item kinds a pick selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct ItemSelectionFilter {
    bits: u16,
}

impl Default for ItemSelectionFilter {
    fn default() -> Self {
        let mut filter = Self::none();
        for item in SelectableItem::ALL {
            if item != SelectableItem::Fixed {
                filter.set(item, true);
            }
        }
        filter
    }
}

impl ItemSelectionFilter {
    /// Filter that selects nothing.
    pub fn none() -> Self {
        Self { bits: 0 }
    }

    pub fn is_selected(&self, item: SelectableItem) -> bool {
        self.bits & item.bit() != 0
    }

    pub fn set(&mut self, item: SelectableItem, selected: bool) {
        if selected {
            self.bits |= item.bit();
        } else {
            self.bits &= !item.bit();
        }
    }
}

/// Settings of the interactive editor.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct InteractiveSettings {
    /// Pick items on all visible layers, not just the current one.
    pub select_on_all_visible_layers: bool,

    pub item_selection_filter: ItemSelectionFilter,

    /// Index of the current layer.
    pub layer: u32,

    /// Use the manual rules below instead of the net's rules.
    pub manual_rule_selection: bool,

    pub manual_trace_clearance_class: u32,

    pub manual_via_rule_index: u32,

    /// Manual trace half width, one per layer.
    pub manual_trace_half_widths: Vec<i32>,

    pub push_enabled: bool,

    pub drag_components_enabled: bool,

    pub pull_tight_region_width: i32,

    pub horizontal_component_grid: i32,

    pub vertical_component_grid: i32,
}

impl InteractiveSettings {
    /// Defaults for a board with `layer_count` layers.
    pub fn for_layers(layer_count: usize) -> Self {
        Self {
            select_on_all_visible_layers: true,
            item_selection_filter: ItemSelectionFilter::default(),
            layer: 0,
            manual_rule_selection: false,
            manual_trace_clearance_class: 1,
            manual_via_rule_index: 0,
            manual_trace_half_widths: vec![1000; layer_count],
            push_enabled: true,
            drag_components_enabled: true,
            pull_tight_region_width: i32::MAX,
            horizontal_component_grid: 0,
            vertical_component_grid: 0,
        }
    }
}
