//! Interactive state machine of the board editor.

use rkyv::{Archive, Deserialize, Serialize};

/// Idle modes the user switches between from the toolbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum MenuMode {
    #[default]
    Select,
    Route,
    Drag,
}

impl MenuMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Route => "route",
            Self::Drag => "drag",
        }
    }
}

/// What the editor is doing right now.
///
/// Only the menu states are stable; everything else is an operation in
/// progress that snapshots and restores must not interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveState {
    Menu(MenuMode),
    Routing,
    DraggingItems,
    MovingComponents,
    Autorouting,
}

impl Default for InteractiveState {
    fn default() -> Self {
        Self::Menu(MenuMode::default())
    }
}

impl InteractiveState {
    /// The menu mode, if the editor is idle in one.
    pub fn menu_mode(self) -> Option<MenuMode> {
        match self {
            Self::Menu(mode) => Some(mode),
            _ => None,
        }
    }

    /// Whether an operation is in progress.
    pub fn is_busy(self) -> bool {
        self.menu_mode().is_none()
    }

    /// The mode to persist. Busy states fall back to select.
    pub fn persisted_mode(self) -> MenuMode {
        self.menu_mode().unwrap_or_default()
    }
}
