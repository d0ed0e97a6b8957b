//! The snapshot panel and its persisted state.

use boardkeep_persistence::{ApplyError, SubwindowStateProvider, to_archive};
use rkyv::{Archive, Deserialize, Serialize};

use super::attributes::SnapshotAttributes;
use super::registry::{RegistryRecord, SnapshotRegistry};
use crate::live::{PANEL_SCHEMA_VERSION, PanelPlacement, decode_panel};

/// Stable id of the snapshot panel's section.
pub const SNAPSHOT_PANEL_ID: &str = "snapshots";

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
struct SnapshotPanelRecord {
    registry: RegistryRecord,
    mask: SnapshotAttributes,
    placement: PanelPlacement,
}

/// Panel listing the snapshots, with the capture mask the user edits.
///
/// The registry is active exactly while the panel is shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotPanel {
    pub registry: SnapshotRegistry,

    /// Categories captured by new snapshots.
    pub mask: SnapshotAttributes,

    placement: PanelPlacement,
}

impl SnapshotPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placement(&self) -> PanelPlacement {
        self.placement
    }

    pub fn is_visible(&self) -> bool {
        self.placement.visible
    }

    pub fn show(&mut self) {
        self.placement.visible = true;
        self.placement.hidden_by_parent = false;
        self.sync_active();
    }

    pub fn hide(&mut self) {
        self.placement.visible = false;
        self.placement.hidden_by_parent = false;
        self.sync_active();
    }

    fn sync_active(&mut self) {
        self.registry.set_active(self.placement.visible);
    }
}

impl SubwindowStateProvider for SnapshotPanel {
    fn stable_id(&self) -> &'static str {
        SNAPSHOT_PANEL_ID
    }

    fn capture_state(&self) -> boardkeep_persistence::Result<Vec<u8>> {
        to_archive(
            &SnapshotPanelRecord {
                registry: self.registry.to_record(),
                mask: self.mask,
                placement: self.placement,
            },
            SNAPSHOT_PANEL_ID,
        )
    }

    fn apply_state(&mut self, schema_version: u32, data: &[u8]) -> Result<(), ApplyError> {
        let record: SnapshotPanelRecord =
            decode_panel(SNAPSHOT_PANEL_ID, PANEL_SCHEMA_VERSION, schema_version, data)?;
        self.registry.restore_record(record.registry);
        self.mask = record.mask;
        self.placement = record.placement;
        self.sync_active();
        Ok(())
    }

    fn on_parent_minimized(&mut self) {
        self.placement.parent_minimized();
        self.sync_active();
    }

    fn on_parent_restored(&mut self) {
        self.placement.parent_restored();
        self.sync_active();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::{LiveSessionState, RoutingBoard};
    use crate::snapshot::SnapshotAttribute;

    fn live() -> LiveSessionState {
        LiveSessionState::new(RoutingBoard::new(Vec::new(), vec!["Top".to_string()]))
    }

    #[test]
    fn test_visibility_drives_navigation() {
        let mut panel = SnapshotPanel::new();
        panel
            .registry
            .create_default(&live(), &panel.mask)
            .unwrap();
        panel
            .registry
            .create_default(&live(), &panel.mask)
            .unwrap();
        let first = panel.registry.snapshots()[0].id;
        panel.registry.select(first).unwrap();

        assert!(panel.registry.select_next().is_none());
        panel.show();
        assert!(panel.registry.select_next().is_some());

        panel.on_parent_minimized();
        assert!(!panel.registry.is_active());
        panel.on_parent_restored();
        assert!(panel.registry.is_active());
        assert!(panel.is_visible());
    }

    #[test]
    fn test_state_round_trip() {
        let mut panel = SnapshotPanel::new();
        panel.mask = SnapshotAttributes::all().with(SnapshotAttribute::ObjectColors, false);
        let mask = panel.mask;
        panel.registry.create("before-reroute", &live(), &mask).unwrap();
        panel.show();

        let data = panel.capture_state().unwrap();
        let mut restored = SnapshotPanel::new();
        restored.apply_state(PANEL_SCHEMA_VERSION, &data).unwrap();

        assert_eq!(restored.mask, mask);
        assert!(restored.is_visible());
        assert!(restored.registry.is_active());
        assert!(restored.registry.find_by_name("before-reroute").is_some());
        assert_eq!(restored.registry.next_default_name(), "snapshot 2");
    }

    #[test]
    fn test_corrupt_state_leaves_panel_untouched() {
        let mut panel = SnapshotPanel::new();
        let mask = panel.mask;
        panel.registry.create("keep", &live(), &mask).unwrap();
        let before = panel.clone();

        assert!(panel.apply_state(PANEL_SCHEMA_VERSION, b"garbage").is_err());
        assert_eq!(panel, before);
    }
}
