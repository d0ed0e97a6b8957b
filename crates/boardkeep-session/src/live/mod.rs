//! The live interactive session.
//!
//! [`LiveSessionState`] is everything the board editor holds while the user
//! works: the routing board, interactive settings, display state, the
//! current interactive state, frame placement and the object list panels.
//! It is owned by the UI thread.

mod graphics;
mod interactive;
mod panels;
mod settings;

pub use graphics::{ColorTables, CoordinateTransform, GraphicsContext, OBJECT_TYPE_COUNT, Rgb};
pub use interactive::{InteractiveState, MenuMode};
pub use panels::{
    InfoListSelections, ListSelection, ObjectListKind, ObjectListPanel, ObjectLists,
    PanelPlacement, ToolPanel,
};
pub use settings::{InteractiveSettings, ItemSelectionFilter, SelectableItem};

pub(crate) use panels::{PANEL_SCHEMA_VERSION, decode_panel};

use boardkeep_persistence::{
    ApplyError, SubwindowStateProvider, ViewState, from_archive, to_archive,
};
use rkyv::{Archive, Deserialize, Serialize};

/// Schema version of the board section.
pub const BOARD_SCHEMA_VERSION: u32 = 1;

/// Stable ids of the placement-only panels every session has.
pub const TOOL_PANEL_IDS: [&str; 4] = [
    "display_misc",
    "route_parameters",
    "select_parameters",
    "color_manager",
];

/// The routing board as produced by the routing engine.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct RoutingBoard {
    /// Engine-owned board data.
    pub design: Vec<u8>,

    pub layer_names: Vec<String>,
}

impl RoutingBoard {
    pub fn new(design: Vec<u8>, layer_names: Vec<String>) -> Self {
        Self {
            design,
            layer_names,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layer_names.len()
    }
}

/// Pending UI refresh work, consumed by the frame's paint loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshState {
    /// Number of times all panels were asked to reload from live state.
    pub panel_refreshes: u64,

    /// Mode button currently highlighted in the toolbar.
    pub highlighted_mode: Option<MenuMode>,

    pub repaint_pending: bool,
}

/// Live fields the board section does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransientState {
    interactive: InteractiveState,
    refresh: RefreshState,
}

/// Contents of the board section.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
struct BoardRecord {
    board: RoutingBoard,
    settings: InteractiveSettings,
    graphics: GraphicsContext,
    menu_mode: MenuMode,
}

/// State of the interactive board editor.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSessionState {
    pub board: RoutingBoard,
    pub settings: InteractiveSettings,
    pub graphics: GraphicsContext,
    pub interactive: InteractiveState,
    pub view: ViewState,
    pub object_lists: ObjectLists,
    pub tool_panels: Vec<ToolPanel>,
    pub refresh: RefreshState,
}

impl LiveSessionState {
    /// Fresh session for a board, with default settings.
    pub fn new(board: RoutingBoard) -> Self {
        let layer_count = board.layer_count();
        Self {
            board,
            settings: InteractiveSettings::for_layers(layer_count),
            graphics: GraphicsContext::for_layers(layer_count),
            interactive: InteractiveState::default(),
            view: ViewState::default(),
            object_lists: ObjectLists::default(),
            tool_panels: TOOL_PANEL_IDS.into_iter().map(ToolPanel::new).collect(),
            refresh: RefreshState::default(),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.board.layer_count()
    }

    /// The menu mode, if no operation is in progress.
    pub fn menu_mode(&self) -> Option<MenuMode> {
        self.interactive.menu_mode()
    }

    /// Ask every view of the live state to reload: panels refresh, the mode
    /// button is re-highlighted and the board is repainted.
    pub fn refresh_dependents(&mut self) {
        self.refresh.panel_refreshes += 1;
        self.refresh.highlighted_mode = self.menu_mode();
        self.refresh.repaint_pending = true;
    }

    pub(crate) fn transient(&self) -> TransientState {
        TransientState {
            interactive: self.interactive,
            refresh: self.refresh.clone(),
        }
    }

    pub(crate) fn restore_transient(&mut self, state: TransientState) {
        self.interactive = state.interactive;
        self.refresh = state.refresh;
    }

    /// Serialize the board section.
    pub(crate) fn capture_board(&self) -> boardkeep_persistence::Result<Vec<u8>> {
        to_archive(
            &BoardRecord {
                board: self.board.clone(),
                settings: self.settings.clone(),
                graphics: self.graphics.clone(),
                menu_mode: self.interactive.persisted_mode(),
            },
            "board",
        )
    }

    /// Replace board, settings and display state from a board section.
    pub(crate) fn restore_board(
        &mut self,
        schema_version: u32,
        data: &[u8],
    ) -> Result<(), ApplyError> {
        if schema_version > BOARD_SCHEMA_VERSION {
            return Err(ApplyError::incompatible(
                "board",
                format!("schema {schema_version} is newer than supported {BOARD_SCHEMA_VERSION}"),
            ));
        }
        let record: BoardRecord =
            from_archive(data, "board").map_err(|e| ApplyError::decode("board", e))?;

        self.board = record.board;
        self.settings = record.settings;
        self.graphics = record.graphics;
        self.interactive = InteractiveState::Menu(record.menu_mode);
        self.refresh_dependents();
        Ok(())
    }

    pub(crate) fn providers(&self) -> Vec<&dyn SubwindowStateProvider> {
        let mut providers: Vec<&dyn SubwindowStateProvider> = self.object_lists.providers().into();
        providers.extend(
            self.tool_panels
                .iter()
                .map(|panel| panel as &dyn SubwindowStateProvider),
        );
        providers
    }

    pub(crate) fn providers_mut(&mut self) -> Vec<&mut dyn SubwindowStateProvider> {
        let mut providers: Vec<&mut dyn SubwindowStateProvider> =
            self.object_lists.providers_mut().into();
        providers.extend(
            self.tool_panels
                .iter_mut()
                .map(|panel| panel as &mut dyn SubwindowStateProvider),
        );
        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layer_session() -> LiveSessionState {
        LiveSessionState::new(RoutingBoard::new(
            b"pcb".to_vec(),
            vec!["F.Cu".to_string(), "B.Cu".to_string()],
        ))
    }

    #[test]
    fn test_new_session_sized_to_board() {
        let live = two_layer_session();
        assert_eq!(live.layer_count(), 2);
        assert_eq!(live.graphics.layer_visibility.len(), 2);
        assert_eq!(live.settings.manual_trace_half_widths.len(), 2);
        assert_eq!(live.menu_mode(), Some(MenuMode::Select));
        assert_eq!(live.providers().len(), 5 + TOOL_PANEL_IDS.len());
    }

    #[test]
    fn test_board_section_round_trip() {
        let mut live = two_layer_session();
        live.settings.push_enabled = false;
        live.graphics.layer_visibility[1] = 0.25;
        live.interactive = InteractiveState::Menu(MenuMode::Route);
        let data = live.capture_board().unwrap();

        let mut other = two_layer_session();
        other.restore_board(BOARD_SCHEMA_VERSION, &data).unwrap();
        assert_eq!(other.settings, live.settings);
        assert_eq!(other.graphics, live.graphics);
        assert_eq!(other.interactive, InteractiveState::Menu(MenuMode::Route));
        assert!(other.refresh.repaint_pending);
    }

    #[test]
    fn test_busy_state_saved_as_select() {
        let mut live = two_layer_session();
        live.interactive = InteractiveState::Routing;
        let data = live.capture_board().unwrap();

        let mut other = two_layer_session();
        other.restore_board(BOARD_SCHEMA_VERSION, &data).unwrap();
        assert_eq!(other.menu_mode(), Some(MenuMode::Select));
    }

    #[test]
    fn test_newer_board_schema_rejected() {
        let live = two_layer_session();
        let data = live.capture_board().unwrap();

        let mut other = two_layer_session();
        let err = other.restore_board(BOARD_SCHEMA_VERSION + 1, &data).unwrap_err();
        assert!(matches!(err, ApplyError::Incompatible { .. }));
        assert_eq!(other, two_layer_session());
    }

    #[test]
    fn test_refresh_dependents() {
        let mut live = two_layer_session();
        live.interactive = InteractiveState::Menu(MenuMode::Drag);
        live.refresh_dependents();
        assert_eq!(live.refresh.panel_refreshes, 1);
        assert_eq!(live.refresh.highlighted_mode, Some(MenuMode::Drag));
        assert!(live.refresh.repaint_pending);
    }
}
