//! Ordered collection of snapshots with a selection cursor.

use boardkeep_persistence::ApplyError;
use rkyv::{Archive, Deserialize, Serialize};

use super::applier::{ApplyReport, SnapshotApplier};
use super::attributes::SnapshotAttributes;
use super::model::{Snapshot, SnapshotId};
use crate::error::SnapshotError;
use crate::live::LiveSessionState;

/// Persisted form of a [`SnapshotRegistry`].
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub(crate) struct RegistryRecord {
    snapshots: Vec<Snapshot>,
    selected: Option<u32>,
    next_id: u64,
    created_count: u32,
}

/// The user's named snapshots, in creation order.
///
/// Ids are never reused, even after deletion. Cursor navigation only works
/// while the registry is active (its panel is shown).
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRegistry {
    snapshots: Vec<Snapshot>,
    selected: Option<usize>,
    active: bool,
    next_id: u64,
    created_count: u32,
}

impl Default for SnapshotRegistry {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
            selected: None,
            active: false,
            next_id: 1,
            created_count: 0,
        }
    }
}

impl SnapshotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn get(&self, id: SnapshotId) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id == id)
    }

    /// First snapshot with the given name. Names need not be unique.
    pub fn find_by_name(&self, name: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.name == name)
    }

    /// Name proposed for the next snapshot.
    pub fn next_default_name(&self) -> String {
        format!("snapshot {}", self.created_count + 1)
    }

    /// Capture the live session under `name` and append it.
    ///
    /// Fails with [`SnapshotError::SessionBusy`] while an interactive
    /// operation is in progress.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        live: &LiveSessionState,
        mask: &SnapshotAttributes,
    ) -> Result<&Snapshot, SnapshotError> {
        if live.menu_mode().is_none() {
            return Err(SnapshotError::SessionBusy);
        }

        let id = SnapshotId::new(self.next_id);
        self.next_id += 1;
        self.created_count += 1;

        let snapshot = Snapshot::capture(id, name.into(), live, mask);
        tracing::info!("Created snapshot {} '{}'", id, snapshot.name);

        self.snapshots.push(snapshot);
        let index = self.snapshots.len() - 1;
        Ok(&self.snapshots[index])
    }

    /// [`create`](Self::create) under [`next_default_name`](Self::next_default_name).
    pub fn create_default(
        &mut self,
        live: &LiveSessionState,
        mask: &SnapshotAttributes,
    ) -> Result<&Snapshot, SnapshotError> {
        let name = self.next_default_name();
        self.create(name, live, mask)
    }

    /// Remove a snapshot. The cursor stays on the same snapshot if it
    /// survives, else moves to the nearest remaining one.
    pub fn delete(&mut self, id: SnapshotId) -> Option<Snapshot> {
        let index = self.snapshots.iter().position(|s| s.id == id)?;
        let removed = self.snapshots.remove(index);

        self.selected = match self.selected {
            _ if self.snapshots.is_empty() => None,
            Some(selected) if index < selected => Some(selected - 1),
            Some(selected) => Some(selected.min(self.snapshots.len() - 1)),
            None => None,
        };

        tracing::info!("Deleted snapshot {} '{}'", removed.id, removed.name);
        Some(removed)
    }

    /// Remove every snapshot. Ids and default names keep counting.
    pub fn delete_all(&mut self) {
        self.snapshots.clear();
        self.selected = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn selected(&self) -> Option<&Snapshot> {
        self.selected.and_then(|index| self.snapshots.get(index))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Put the cursor on a snapshot.
    pub fn select(&mut self, id: SnapshotId) -> Result<(), SnapshotError> {
        let index = self
            .snapshots
            .iter()
            .position(|s| s.id == id)
            .ok_or(SnapshotError::UnknownSnapshot { id })?;
        self.selected = Some(index);
        Ok(())
    }

    /// Move the cursor down. Returns the new selection, if it moved.
    ///
    /// Without a selection there is nothing to move from, so this is a no-op
    /// like the boundaries.
    pub fn select_next(&mut self) -> Option<SnapshotId> {
        if !self.active {
            return None;
        }
        let next = self.selected? + 1;
        self.move_cursor(next)
    }

    /// Move the cursor up. Returns the new selection, if it moved.
    pub fn select_previous(&mut self) -> Option<SnapshotId> {
        if !self.active {
            return None;
        }
        let previous = self.selected?.checked_sub(1)?;
        self.move_cursor(previous)
    }

    fn move_cursor(&mut self, index: usize) -> Option<SnapshotId> {
        let id = self.snapshots.get(index)?.id;
        self.selected = Some(index);
        Some(id)
    }

    /// Restore a snapshot into the live session.
    pub fn goto(
        &self,
        id: SnapshotId,
        live: &mut LiveSessionState,
    ) -> Result<ApplyReport, ApplyError> {
        let snapshot = self
            .get(id)
            .ok_or(ApplyError::UnknownSnapshot { id: id.value() })?;
        SnapshotApplier::apply(snapshot, live)
    }

    /// Restore the selected snapshot. `Ok(None)` if nothing is selected.
    pub fn goto_selected(
        &self,
        live: &mut LiveSessionState,
    ) -> Result<Option<ApplyReport>, ApplyError> {
        match self.selected() {
            Some(snapshot) => SnapshotApplier::apply(snapshot, live).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn to_record(&self) -> RegistryRecord {
        RegistryRecord {
            snapshots: self.snapshots.clone(),
            selected: self.selected.and_then(|index| u32::try_from(index).ok()),
            next_id: self.next_id,
            created_count: self.created_count,
        }
    }

    /// Replace contents from a persisted record. The active flag is kept.
    pub(crate) fn restore_record(&mut self, record: RegistryRecord) {
        let max_id = record
            .snapshots
            .iter()
            .map(|s| s.id.value())
            .max()
            .unwrap_or(0);
        let len = record.snapshots.len();

        self.snapshots = record.snapshots;
        self.selected = record
            .selected
            .map(|index| index as usize)
            .filter(|index| *index < len);
        self.next_id = record.next_id.max(max_id + 1);
        self.created_count = record.created_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::{InteractiveState, MenuMode, RoutingBoard};
    use proptest::prelude::*;

    fn live() -> LiveSessionState {
        LiveSessionState::new(RoutingBoard::new(
            Vec::new(),
            vec!["Top".to_string(), "Bottom".to_string()],
        ))
    }

    fn registry_with(names: &[&str]) -> SnapshotRegistry {
        let live = live();
        let mut registry = SnapshotRegistry::new();
        for name in names {
            registry
                .create(*name, &live, &SnapshotAttributes::all())
                .unwrap();
        }
        registry
    }

    fn names(registry: &SnapshotRegistry) -> Vec<&str> {
        registry.snapshots().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_default_names_count_creations() {
        let live = live();
        let mask = SnapshotAttributes::all();
        let mut registry = SnapshotRegistry::new();

        assert_eq!(registry.create_default(&live, &mask).unwrap().name, "snapshot 1");
        assert_eq!(registry.create_default(&live, &mask).unwrap().name, "snapshot 2");

        let id = registry.snapshots()[1].id;
        registry.delete(id);
        assert_eq!(registry.next_default_name(), "snapshot 3");
    }

    #[test]
    fn test_create_rejected_while_busy() {
        let mut live = live();
        live.interactive = InteractiveState::Routing;
        let mut registry = SnapshotRegistry::new();

        let err = registry
            .create("x", &live, &SnapshotAttributes::all())
            .unwrap_err();
        assert!(matches!(err, SnapshotError::SessionBusy));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut registry = registry_with(&["a", "b"]);
        let b = registry.snapshots()[1].id;
        registry.delete(b);

        let live = live();
        let c = registry
            .create("c", &live, &SnapshotAttributes::all())
            .unwrap()
            .id;
        assert!(c > b);
    }

    #[test]
    fn test_navigation_requires_active() {
        let mut registry = registry_with(&["a", "b"]);
        assert_eq!(registry.select_next(), None);
        assert!(registry.selected().is_none());

        registry.set_active(true);
        assert_eq!(registry.select_next(), None);
        assert!(registry.selected().is_none());

        let first = registry.snapshots()[0].id;
        registry.select(first).unwrap();
        assert!(registry.select_next().is_some());
        assert_eq!(registry.selected().unwrap().name, "b");

        // Boundaries are no-ops
        assert_eq!(registry.select_next(), None);
        assert_eq!(registry.selected().unwrap().name, "b");

        registry.select_previous();
        assert_eq!(registry.selected().unwrap().name, "a");
        assert_eq!(registry.select_previous(), None);
        assert_eq!(registry.selected().unwrap().name, "a");
    }

    #[test]
    fn test_delete_adjusts_cursor() {
        let mut registry = registry_with(&["a", "b", "c"]);
        let ids: Vec<_> = registry.snapshots().iter().map(|s| s.id).collect();

        registry.select(ids[1]).unwrap();
        registry.delete(ids[0]);
        assert_eq!(registry.selected().unwrap().name, "b");

        registry.select(ids[2]).unwrap();
        registry.delete(ids[2]);
        assert_eq!(registry.selected().unwrap().name, "b");

        registry.delete(ids[1]);
        assert!(registry.selected().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_delete_unknown_is_none() {
        let mut registry = registry_with(&["a"]);
        assert!(registry.delete(SnapshotId::new(99)).is_none());
        assert_eq!(names(&registry), vec!["a"]);
    }

    #[test]
    fn test_delete_all_keeps_counters() {
        let mut registry = registry_with(&["a", "b"]);
        registry.delete_all();
        assert!(registry.is_empty());
        assert_eq!(registry.next_default_name(), "snapshot 3");
    }

    #[test]
    fn test_find_by_name_returns_first() {
        let registry = registry_with(&["dup", "other", "dup"]);
        let found = registry.find_by_name("dup").unwrap();
        assert_eq!(found.id, registry.snapshots()[0].id);
        assert!(registry.find_by_name("missing").is_none());
    }

    #[test]
    fn test_goto_unknown_snapshot() {
        let registry = registry_with(&["a"]);
        let mut live = live();
        let err = registry.goto(SnapshotId::new(42), &mut live).unwrap_err();
        assert_eq!(err, ApplyError::UnknownSnapshot { id: 42 });
    }

    #[test]
    fn test_goto_restores_mode() {
        let mut live = live();
        live.interactive = InteractiveState::Menu(MenuMode::Route);
        let mut registry = SnapshotRegistry::new();
        let id = registry
            .create("route", &live, &SnapshotAttributes::all())
            .unwrap()
            .id;

        live.interactive = InteractiveState::Menu(MenuMode::Select);
        registry.goto(id, &mut live).unwrap();
        assert_eq!(live.menu_mode(), Some(MenuMode::Route));
    }

    #[test]
    fn test_goto_selected_without_selection() {
        let registry = registry_with(&["a"]);
        let mut live = live();
        assert_eq!(registry.goto_selected(&mut live), Ok(None));
        assert_eq!(live.refresh.panel_refreshes, 0);
    }

    #[test]
    fn test_record_round_trip() {
        let mut registry = registry_with(&["a", "b"]);
        registry.select(registry.snapshots()[1].id).unwrap();
        let record = registry.to_record();

        let mut restored = SnapshotRegistry::new();
        restored.restore_record(record);
        assert_eq!(names(&restored), vec!["a", "b"]);
        assert_eq!(restored.selected().unwrap().name, "b");
        assert_eq!(restored.next_default_name(), "snapshot 3");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create,
        DeleteAt(usize),
        DeleteAll,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Create),
            2 => (0usize..8).prop_map(Op::DeleteAt),
            1 => Just(Op::DeleteAll),
        ]
    }

    proptest! {
        #[test]
        fn prop_ids_never_reused(ops in prop::collection::vec(op(), 0..40)) {
            let live = live();
            let mask = SnapshotAttributes::none();
            let mut registry = SnapshotRegistry::new();
            let mut issued = Vec::new();

            for op in ops {
                match op {
                    Op::Create => {
                        let id = registry.create_default(&live, &mask).unwrap().id;
                        prop_assert!(!issued.contains(&id));
                        issued.push(id);
                    }
                    Op::DeleteAt(index) => {
                        if let Some(id) = registry.snapshots().get(index).map(|s| s.id) {
                            registry.delete(id);
                        }
                    }
                    Op::DeleteAll => registry.delete_all(),
                }
                if let Some(index) = registry.selected_index() {
                    prop_assert!(index < registry.len());
                }
            }
        }
    }
}
