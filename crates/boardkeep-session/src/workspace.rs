//! The live session paired with its snapshot panel.

use boardkeep_persistence::{ApplyError, SessionHost, SubwindowStateProvider, ViewState};

use crate::live::{BOARD_SCHEMA_VERSION, LiveSessionState, RoutingBoard, TransientState};
use crate::snapshot::{ApplyReport, SnapshotId, SnapshotPanel};

/// Everything persisted with a session.
///
/// The snapshot panel lives next to, not inside, the live state so a
/// snapshot can be read from one while the other is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub live: LiveSessionState,
    pub snapshots: SnapshotPanel,

    /// Set aside while a session restore is running.
    restore_guard: Option<TransientState>,
}

impl Workspace {
    pub fn new(board: RoutingBoard) -> Self {
        Self {
            live: LiveSessionState::new(board),
            snapshots: SnapshotPanel::new(),
            restore_guard: None,
        }
    }

    /// Restore a snapshot into the live session.
    pub fn goto_snapshot(&mut self, id: SnapshotId) -> Result<ApplyReport, ApplyError> {
        self.snapshots.registry.goto(id, &mut self.live)
    }

    /// Restore the selected snapshot, if any.
    pub fn goto_selected_snapshot(&mut self) -> Result<Option<ApplyReport>, ApplyError> {
        self.snapshots.registry.goto_selected(&mut self.live)
    }
}

impl SessionHost for Workspace {
    fn board_schema_version(&self) -> u32 {
        BOARD_SCHEMA_VERSION
    }

    fn capture_board(&self) -> boardkeep_persistence::Result<Vec<u8>> {
        self.live.capture_board()
    }

    fn restore_board(&mut self, schema_version: u32, data: &[u8]) -> Result<(), ApplyError> {
        self.live.restore_board(schema_version, data)
    }

    fn capture_view(&self) -> ViewState {
        self.live.view
    }

    fn restore_view(&mut self, view: &ViewState) {
        self.live.view = *view;
    }

    fn providers(&self) -> Vec<&dyn SubwindowStateProvider> {
        let mut providers = self.live.providers();
        providers.push(&self.snapshots);
        providers
    }

    fn providers_mut(&mut self) -> Vec<&mut dyn SubwindowStateProvider> {
        let mut providers = self.live.providers_mut();
        providers.push(&mut self.snapshots);
        providers
    }

    fn begin_restore(&mut self) {
        self.restore_guard = Some(self.live.transient());
    }

    fn finish_restore(&mut self, rolled_back: bool) {
        if let Some(state) = self.restore_guard.take()
            && rolled_back
        {
            self.live.restore_transient(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardkeep_persistence::{
        Point, SessionCodec, ensure_unique_ids, notify_minimized, notify_restored, provider_ids,
    };

    use crate::live::{InteractiveState, MenuMode, TOOL_PANEL_IDS};
    use crate::snapshot::{SNAPSHOT_PANEL_ID, SnapshotAttribute, SnapshotAttributes};

    fn workspace() -> Workspace {
        Workspace::new(RoutingBoard::new(
            b"board".to_vec(),
            vec!["Top".to_string(), "Bottom".to_string()],
        ))
    }

    #[test]
    fn test_provider_ids_unique() {
        let workspace = workspace();
        ensure_unique_ids(&workspace).unwrap();

        let ids = provider_ids(&workspace);
        assert_eq!(ids.len(), 5 + TOOL_PANEL_IDS.len() + 1);
        assert_eq!(ids.last(), Some(&SNAPSHOT_PANEL_ID));
    }

    #[test]
    fn test_codec_round_trip_restores_everything() {
        let mut original = workspace();
        original.live.settings.push_enabled = false;
        original.live.interactive = InteractiveState::Menu(MenuMode::Drag);
        original.live.view.viewport_offset = Point::new(120, -40);
        original.live.object_lists.nets.selection.filter = "VCC".to_string();
        let mask = original.snapshots.mask;
        original
            .snapshots
            .registry
            .create("first", &original.live, &mask)
            .unwrap();
        original.snapshots.show();

        let bytes = SessionCodec::encode(&SessionCodec::capture(&original).unwrap()).unwrap();

        let mut restored = workspace();
        let outcome = SessionCodec::apply(&SessionCodec::decode(&bytes).unwrap(), &mut restored)
            .unwrap();

        assert!(outcome.orphaned_sections.is_empty());
        assert!(outcome.untouched_providers.is_empty());
        assert!(!restored.live.settings.push_enabled);
        assert_eq!(restored.live.menu_mode(), Some(MenuMode::Drag));
        assert_eq!(restored.live.view.viewport_offset, Point::new(120, -40));
        assert_eq!(restored.live.object_lists.nets.selection.filter, "VCC");
        assert!(restored.snapshots.registry.find_by_name("first").is_some());
        assert!(restored.snapshots.registry.is_active());
    }

    #[test]
    fn test_failed_restore_leaves_workspace_exactly_as_it_was() {
        let source = workspace();
        let mut session = SessionCodec::capture(&source).unwrap();
        let snapshots = session
            .subwindow_states
            .iter_mut()
            .find(|blob| blob.provider_id == SNAPSHOT_PANEL_ID)
            .unwrap();
        snapshots.schema_version = 9;

        let mut target = workspace();
        target.live.interactive = InteractiveState::Routing;
        target.live.settings.push_enabled = false;
        target.live.object_lists.packages.selection.filter = "U1".to_string();
        target.live.view.viewport_offset = Point::new(-3, 8);
        let before = target.clone();

        let err = SessionCodec::apply(&session, &mut target).unwrap_err();
        assert!(matches!(err, ApplyError::Incompatible { .. }));
        assert_eq!(target, before);
        assert_eq!(target.live.refresh, before.live.refresh);
        assert_eq!(target.live.interactive, InteractiveState::Routing);
    }

    #[test]
    fn test_goto_snapshot_respects_mask() {
        let mut workspace = workspace();
        workspace.snapshots.mask =
            SnapshotAttributes::all().with(SnapshotAttribute::ObjectColors, false);
        let mask = workspace.snapshots.mask;
        let id = workspace
            .snapshots
            .registry
            .create("before-reroute", &workspace.live, &mask)
            .unwrap()
            .id;

        let original_colors = workspace.live.graphics.colors.clone();
        workspace.live.graphics.colors.items[0].r ^= 0xFF;
        workspace.live.settings.push_enabled = false;

        let report = workspace.goto_snapshot(id).unwrap();
        assert!(report.is_complete());
        assert!(workspace.live.settings.push_enabled);
        assert_ne!(workspace.live.graphics.colors, original_colors);
    }

    #[test]
    fn test_minimize_restore_reaches_snapshot_panel() {
        let mut workspace = workspace();
        workspace.snapshots.show();
        workspace.live.tool_panels[0].placement.visible = true;

        notify_minimized(&mut workspace);
        assert!(!workspace.snapshots.is_visible());
        assert!(!workspace.live.tool_panels[0].placement.visible);

        notify_restored(&mut workspace);
        assert!(workspace.snapshots.is_visible());
        assert!(workspace.live.tool_panels[0].placement.visible);
    }
}
