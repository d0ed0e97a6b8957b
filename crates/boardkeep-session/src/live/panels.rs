//! Auxiliary panels whose state travels with the session.

use boardkeep_persistence::{
    ApplyError, Point, SubwindowStateProvider, from_archive, to_archive,
};
use rkyv::{Archive, Deserialize, Serialize};

/// Schema version of the panel payloads in this module.
pub(crate) const PANEL_SCHEMA_VERSION: u32 = 1;

/// Where a panel sits and whether it is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct PanelPlacement {
    pub location: Point,
    pub visible: bool,

    /// Hidden because the main frame was minimized; shown again on restore.
    pub hidden_by_parent: bool,
}

impl PanelPlacement {
    pub(crate) fn parent_minimized(&mut self) {
        if self.visible {
            self.visible = false;
            self.hidden_by_parent = true;
        }
    }

    pub(crate) fn parent_restored(&mut self) {
        if self.hidden_by_parent {
            self.visible = true;
            self.hidden_by_parent = false;
        }
    }
}

/// Decode a panel payload, checking its schema version.
pub(crate) fn decode_panel<T>(
    id: &str,
    supported: u32,
    schema_version: u32,
    data: &[u8],
) -> Result<T, ApplyError>
where
    T: rkyv::Archive,
    T::Archived: for<'a> rkyv::bytecheck::CheckBytes<rkyv::api::high::HighValidator<'a, rkyv::rancor::Error>>
        + rkyv::Deserialize<T, rkyv::api::high::HighDeserializer<rkyv::rancor::Error>>,
{
    if schema_version > supported {
        return Err(ApplyError::incompatible(
            id,
            format!("schema {schema_version} is newer than supported {supported}"),
        ));
    }
    from_archive(data, id).map_err(|e| ApplyError::decode(id, e))
}

/// A panel with nothing to persist but its placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPanel {
    id: &'static str,
    pub placement: PanelPlacement,
}

impl ToolPanel {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            placement: PanelPlacement::default(),
        }
    }
}

impl SubwindowStateProvider for ToolPanel {
    fn stable_id(&self) -> &'static str {
        self.id
    }

    fn capture_state(&self) -> boardkeep_persistence::Result<Vec<u8>> {
        to_archive(&self.placement, self.id)
    }

    fn apply_state(&mut self, schema_version: u32, data: &[u8]) -> Result<(), ApplyError> {
        self.placement = decode_panel(self.id, PANEL_SCHEMA_VERSION, schema_version, data)?;
        Ok(())
    }

    fn on_parent_minimized(&mut self) {
        self.placement.parent_minimized();
    }

    fn on_parent_restored(&mut self) {
        self.placement.parent_restored();
    }
}

/// The filterable object lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectListKind {
    Incompletes,
    Packages,
    Nets,
    Components,
    Padstacks,
}

impl ObjectListKind {
    pub fn stable_id(self) -> &'static str {
        match self {
            Self::Incompletes => "incompletes",
            Self::Packages => "packages",
            Self::Nets => "nets",
            Self::Components => "components",
            Self::Padstacks => "padstacks",
        }
    }
}

/// Filter text and selected rows of an object list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct ListSelection {
    pub filter: String,
    pub selected_rows: Vec<u32>,
}

/// Selections of all object lists, as captured by snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct InfoListSelections {
    pub incompletes: ListSelection,
    pub packages: ListSelection,
    pub nets: ListSelection,
    pub components: ListSelection,
    pub padstacks: ListSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
struct ObjectListRecord {
    placement: PanelPlacement,
    selection: ListSelection,
}

/// A filterable list of board objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectListPanel {
    kind: ObjectListKind,
    pub placement: PanelPlacement,
    pub selection: ListSelection,
}

impl ObjectListPanel {
    pub fn new(kind: ObjectListKind) -> Self {
        Self {
            kind,
            placement: PanelPlacement::default(),
            selection: ListSelection::default(),
        }
    }
}

impl SubwindowStateProvider for ObjectListPanel {
    fn stable_id(&self) -> &'static str {
        self.kind.stable_id()
    }

    fn capture_state(&self) -> boardkeep_persistence::Result<Vec<u8>> {
        to_archive(
            &ObjectListRecord {
                placement: self.placement,
                selection: self.selection.clone(),
            },
            self.stable_id(),
        )
    }

    fn apply_state(&mut self, schema_version: u32, data: &[u8]) -> Result<(), ApplyError> {
        let record: ObjectListRecord =
            decode_panel(self.stable_id(), PANEL_SCHEMA_VERSION, schema_version, data)?;
        self.placement = record.placement;
        self.selection = record.selection;
        Ok(())
    }

    fn on_parent_minimized(&mut self) {
        self.placement.parent_minimized();
    }

    fn on_parent_restored(&mut self) {
        self.placement.parent_restored();
    }
}

/// The five object lists of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLists {
    pub incompletes: ObjectListPanel,
    pub packages: ObjectListPanel,
    pub nets: ObjectListPanel,
    pub components: ObjectListPanel,
    pub padstacks: ObjectListPanel,
}

impl Default for ObjectLists {
    fn default() -> Self {
        Self {
            incompletes: ObjectListPanel::new(ObjectListKind::Incompletes),
            packages: ObjectListPanel::new(ObjectListKind::Packages),
            nets: ObjectListPanel::new(ObjectListKind::Nets),
            components: ObjectListPanel::new(ObjectListKind::Components),
            padstacks: ObjectListPanel::new(ObjectListKind::Padstacks),
        }
    }
}

impl ObjectLists {
    /// Current selections of all lists.
    pub fn selections(&self) -> InfoListSelections {
        InfoListSelections {
            incompletes: self.incompletes.selection.clone(),
            packages: self.packages.selection.clone(),
            nets: self.nets.selection.clone(),
            components: self.components.selection.clone(),
            padstacks: self.padstacks.selection.clone(),
        }
    }

    /// Replace the selections of all lists.
    pub fn set_selections(&mut self, selections: InfoListSelections) {
        self.incompletes.selection = selections.incompletes;
        self.packages.selection = selections.packages;
        self.nets.selection = selections.nets;
        self.components.selection = selections.components;
        self.padstacks.selection = selections.padstacks;
    }

    pub fn providers(&self) -> [&dyn SubwindowStateProvider; 5] {
        [
            &self.incompletes,
            &self.packages,
            &self.nets,
            &self.components,
            &self.padstacks,
        ]
    }

    pub fn providers_mut(&mut self) -> [&mut dyn SubwindowStateProvider; 5] {
        [
            &mut self.incompletes,
            &mut self.packages,
            &mut self.nets,
            &mut self.components,
            &mut self.padstacks,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_list_state_round_trip() {
        let mut panel = ObjectListPanel::new(ObjectListKind::Nets);
        panel.placement = PanelPlacement {
            location: Point::new(40, 60),
            visible: true,
            hidden_by_parent: false,
        };
        panel.selection = ListSelection {
            filter: "GND".to_string(),
            selected_rows: vec![2, 5],
        };

        let data = panel.capture_state().unwrap();
        let mut restored = ObjectListPanel::new(ObjectListKind::Nets);
        restored.apply_state(1, &data).unwrap();
        assert_eq!(restored, panel);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let mut panel = ToolPanel::new("route_parameters");
        let data = panel.capture_state().unwrap();
        let err = panel.apply_state(2, &data).unwrap_err();
        assert!(matches!(err, ApplyError::Incompatible { .. }));
    }

    #[test]
    fn test_garbage_payload_is_decode_error() {
        let mut panel = ToolPanel::new("route_parameters");
        let err = panel.apply_state(1, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, ApplyError::Decode { .. }));
    }

    #[test]
    fn test_minimize_hides_only_visible_panels() {
        let mut shown = ToolPanel::new("a");
        shown.placement.visible = true;
        let mut hidden = ToolPanel::new("b");

        shown.on_parent_minimized();
        hidden.on_parent_minimized();
        assert!(!shown.placement.visible);
        assert!(!hidden.placement.visible);

        shown.on_parent_restored();
        hidden.on_parent_restored();
        assert!(shown.placement.visible);
        assert!(!hidden.placement.visible);
    }

    #[test]
    fn test_object_list_ids_unique() {
        let lists = ObjectLists::default();
        let mut ids: Vec<_> = lists.providers().iter().map(|p| p.stable_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
