//! Restoring a snapshot into the live session.

use boardkeep_persistence::ApplyError;

use super::attributes::SnapshotAttribute;
use super::model::Snapshot;
use crate::live::{InteractiveState, LiveSessionState};

/// A category that was enabled but could not be restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAttribute {
    pub attribute: SnapshotAttribute,
    pub error: ApplyError,
}

/// Outcome of restoring one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub restored: Vec<SnapshotAttribute>,
    pub skipped: Vec<SkippedAttribute>,
}

impl ApplyReport {
    /// Whether every enabled category was restored.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Copies the masked categories of a snapshot into the live session.
pub struct SnapshotApplier;

impl SnapshotApplier {
    /// Restore `snapshot` into `live`.
    ///
    /// Categories disabled in the snapshot's mask are left alone. A category
    /// whose captured value no longer fits the live board (layer or object
    /// type count changed) is skipped and reported. Dependent views are
    /// refreshed afterwards.
    pub fn apply(
        snapshot: &Snapshot,
        live: &mut LiveSessionState,
    ) -> Result<ApplyReport, ApplyError> {
        if live.interactive.is_busy() {
            return Err(ApplyError::SessionBusy);
        }

        let mut report = ApplyReport::default();
        for attribute in snapshot.attributes.enabled() {
            match Self::apply_attribute(snapshot, attribute, live) {
                Ok(true) => report.restored.push(attribute),
                Ok(false) => {
                    tracing::debug!("Snapshot '{}' has no {} captured", snapshot.name, attribute);
                }
                Err(error) => {
                    tracing::warn!(
                        "Skipping {} of snapshot '{}': {}",
                        attribute,
                        snapshot.name,
                        error
                    );
                    report.skipped.push(SkippedAttribute { attribute, error });
                }
            }
        }

        live.refresh_dependents();

        tracing::info!(
            "Restored snapshot '{}' ({} categories, {} skipped)",
            snapshot.name,
            report.restored.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Returns `Ok(false)` if the snapshot holds no value for the category.
    fn apply_attribute(
        snapshot: &Snapshot,
        attribute: SnapshotAttribute,
        live: &mut LiveSessionState,
    ) -> Result<bool, ApplyError> {
        let layer_count = live.layer_count();
        let settings = &mut live.settings;
        let graphics = &mut live.graphics;

        match attribute {
            SnapshotAttribute::ObjectColors => {
                let Some(colors) = &snapshot.object_colors else {
                    return Ok(false);
                };
                check_len(
                    attribute,
                    "item colors",
                    colors.items.len(),
                    graphics.colors.items.len(),
                )?;
                check_len(
                    attribute,
                    "other colors",
                    colors.other.len(),
                    graphics.colors.other.len(),
                )?;
                graphics.colors = colors.clone();
            }
            SnapshotAttribute::ObjectVisibility => {
                let Some(intensities) = &snapshot.object_visibility else {
                    return Ok(false);
                };
                check_len(
                    attribute,
                    "object types",
                    intensities.len(),
                    graphics.object_type_count(),
                )?;
                graphics.object_intensities = intensities.clone();
            }
            SnapshotAttribute::LayerVisibility => {
                let Some(visibility) = &snapshot.layer_visibility else {
                    return Ok(false);
                };
                check_len(attribute, "layers", visibility.len(), layer_count)?;
                graphics.layer_visibility = visibility.clone();
            }
            SnapshotAttribute::DisplayRegion => {
                let Some(region) = snapshot.display_region else {
                    return Ok(false);
                };
                graphics.transform = region.transform;
                live.view.viewport_offset = region.viewport_offset;
            }
            SnapshotAttribute::InteractiveState => {
                if let Some(layer) = snapshot.current_layer {
                    check_layer(attribute, layer, layer_count)?;
                    settings.layer = layer;
                }
                live.interactive = InteractiveState::Menu(snapshot.menu_mode);
            }
            SnapshotAttribute::SelectionLayers => {
                let Some(all_visible) = snapshot.selection_layers else {
                    return Ok(false);
                };
                settings.select_on_all_visible_layers = all_visible;
            }
            SnapshotAttribute::SelectableItems => {
                let Some(filter) = snapshot.selectable_items else {
                    return Ok(false);
                };
                settings.item_selection_filter = filter;
            }
            SnapshotAttribute::CurrentLayer => {
                let Some(layer) = snapshot.current_layer else {
                    return Ok(false);
                };
                check_layer(attribute, layer, layer_count)?;
                settings.layer = layer;
            }
            SnapshotAttribute::RuleSelection => {
                let Some(manual) = snapshot.rule_selection else {
                    return Ok(false);
                };
                settings.manual_rule_selection = manual;
            }
            SnapshotAttribute::ManualRuleSettings => {
                let Some(rules) = &snapshot.manual_rules else {
                    return Ok(false);
                };
                check_len(
                    attribute,
                    "trace widths",
                    rules.trace_half_widths.len(),
                    layer_count,
                )?;
                settings.manual_trace_clearance_class = rules.clearance_class;
                settings.manual_via_rule_index = rules.via_rule_index;
                settings.manual_trace_half_widths = rules.trace_half_widths.clone();
            }
            SnapshotAttribute::PushAndShoveEnabled => {
                let Some(enabled) = snapshot.push_enabled else {
                    return Ok(false);
                };
                settings.push_enabled = enabled;
            }
            SnapshotAttribute::DragComponentsEnabled => {
                let Some(enabled) = snapshot.drag_components_enabled else {
                    return Ok(false);
                };
                settings.drag_components_enabled = enabled;
            }
            SnapshotAttribute::PullTightRegion => {
                let Some(width) = snapshot.pull_tight_region else {
                    return Ok(false);
                };
                settings.pull_tight_region_width = width;
            }
            SnapshotAttribute::ComponentGrid => {
                let Some(grid) = snapshot.component_grid else {
                    return Ok(false);
                };
                settings.horizontal_component_grid = grid.horizontal;
                settings.vertical_component_grid = grid.vertical;
            }
            SnapshotAttribute::InfoListSelections => {
                let Some(selections) = &snapshot.info_list_selections else {
                    return Ok(false);
                };
                live.object_lists.set_selections(selections.clone());
            }
        }
        Ok(true)
    }
}

fn check_layer(
    attribute: SnapshotAttribute,
    layer: u32,
    layer_count: usize,
) -> Result<(), ApplyError> {
    if (layer as usize) < layer_count {
        return Ok(());
    }
    Err(ApplyError::incompatible(
        attribute.label(),
        format!("layer {layer} does not exist on a {layer_count}-layer board"),
    ))
}

fn check_len(
    attribute: SnapshotAttribute,
    what: &str,
    captured: usize,
    live: usize,
) -> Result<(), ApplyError> {
    if captured == live {
        return Ok(());
    }
    Err(ApplyError::incompatible(
        attribute.label(),
        format!("captured {captured} {what}, the board now has {live}"),
    ))
}
