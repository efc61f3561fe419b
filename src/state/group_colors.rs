use std::collections::BTreeMap;

use crate::model::{GroupName, GroupRole, GroupTarget, HexColor, INITIAL_PICKER, ThemeMode};

/// Where a group override stands with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    /// Recorded locally, request in flight
    Pending,
    Confirmed,
    /// The backend rejected it; the color is kept so it can be retried
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupColorEntry {
    pub color: HexColor,
    pub status: CommitStatus,
}

/// Per-group color overrides of the active item, plus the color the user is
/// dialing in right now.
///
/// Two layers make up what is shown: the committed map, and the preview color
/// overlaid on the active group while a commit is pending or being debounced.
#[derive(Debug, Clone)]
pub struct GroupColorStore {
    entries: BTreeMap<GroupTarget, GroupColorEntry>,
    active_group: Option<GroupTarget>,
    /// Last explicitly chosen color. Survives group and item switches.
    current_color: HexColor,
    /// Rendered immediately, before any commit
    preview_color: Option<HexColor>,
}

impl Default for GroupColorStore {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            active_group: None,
            current_color: INITIAL_PICKER,
            preview_color: None,
        }
    }
}

impl GroupColorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_group(&self) -> Option<&GroupTarget> {
        self.active_group.as_ref()
    }

    pub fn current_color(&self) -> HexColor {
        self.current_color
    }

    pub fn preview_color(&self) -> Option<HexColor> {
        self.preview_color
    }

    pub fn get(&self, target: &GroupTarget) -> Option<&GroupColorEntry> {
        self.entries.get(target)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&GroupTarget, &GroupColorEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Makes `target` the active group.
    ///
    /// Grey groups get the mode default applied right away and the color is
    /// returned so the caller can commit it without further input. Every other
    /// group only previews the current color.
    pub fn select_group(&mut self, target: GroupTarget, mode: ThemeMode) -> Option<HexColor> {
        let default = match &target {
            GroupTarget::Named(name) if name.role() == GroupRole::Grey => Some(mode.default_grey()),
            _ => None,
        };
        self.active_group = Some(target);

        match default {
            Some(color) => {
                self.set_preview_color(color);
                Some(color)
            }
            None => {
                self.preview_color = Some(self.current_color);
                None
            }
        }
    }

    /// Updates what is rendered right now. Never contacts the backend.
    pub fn set_preview_color(&mut self, color: HexColor) {
        self.current_color = color;
        self.preview_color = Some(color);
    }

    /// Records an override that is about to be sent.
    pub fn record_committed(&mut self, target: GroupTarget, color: HexColor) {
        self.entries.insert(
            target,
            GroupColorEntry {
                color,
                status: CommitStatus::Pending,
            },
        );
    }

    /// Marks an entry confirmed, unless a newer color replaced it meanwhile.
    pub fn confirm(&mut self, target: &GroupTarget, color: HexColor) -> bool {
        self.set_status(target, color, CommitStatus::Confirmed)
    }

    pub fn mark_failed(&mut self, target: &GroupTarget, color: HexColor) -> bool {
        self.set_status(target, color, CommitStatus::Failed)
    }

    fn set_status(&mut self, target: &GroupTarget, color: HexColor, status: CommitStatus) -> bool {
        match self.entries.get_mut(target) {
            Some(entry) if entry.color == color => {
                entry.status = status;
                true
            }
            _ => false,
        }
    }

    /// Removes one group's override, leaving the others untouched.
    pub fn clear_group(&mut self, target: &GroupTarget) -> Option<GroupColorEntry> {
        self.entries.remove(target)
    }

    /// Drops everything scoped to the current item. The last chosen color is
    /// kept as the default for the next pick.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.active_group = None;
        self.preview_color = None;
    }

    /// Overrides visible right now: the committed map with the preview color
    /// laid over the active group.
    pub fn applied_overrides(&self) -> BTreeMap<GroupTarget, HexColor> {
        let mut applied: BTreeMap<GroupTarget, HexColor> = self
            .entries
            .iter()
            .map(|(target, entry)| (target.clone(), entry.color))
            .collect();
        if let (Some(group), Some(color)) = (&self.active_group, self.preview_color) {
            applied.insert(group.clone(), color);
        }
        applied
    }
}

/// Resolves the color of each group of a freshly loaded asset from a set of
/// overrides. Named overrides win over a whole-asset override; groups without
/// either keep their original color (`None`).
pub fn reapply(
    groups: &[GroupName],
    overrides: &BTreeMap<GroupTarget, HexColor>,
) -> Vec<(GroupName, Option<HexColor>)> {
    let whole = overrides.get(&GroupTarget::WholeAsset).copied();
    groups
        .iter()
        .map(|name| {
            let named = overrides.get(&GroupTarget::Named(name.clone())).copied();
            (name.clone(), named.or(whole))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GREY_DARK, ORIGINAL_BLUE};

    #[test]
    fn test_grey_selection_returns_default() {
        let mut store = GroupColorStore::new();
        let default = store.select_group(GroupTarget::named("Light Grey"), ThemeMode::Dark);
        assert_eq!(default, Some(GREY_DARK));
        assert_eq!(store.preview_color(), Some(GREY_DARK));
        assert_eq!(store.current_color(), GREY_DARK);
    }

    #[test]
    fn test_other_groups_preview_current_color() {
        let mut store = GroupColorStore::new();
        store.set_preview_color(ORIGINAL_BLUE);
        let default = store.select_group(GroupTarget::named("Color"), ThemeMode::Light);
        assert_eq!(default, None);
        assert_eq!(store.preview_color(), Some(ORIGINAL_BLUE));
        assert!(store.is_empty());
    }

    #[test]
    fn test_confirm_ignores_superseded_color() {
        let mut store = GroupColorStore::new();
        let grey = GroupTarget::named("Grey");
        store.record_committed(grey.clone(), GREY_DARK);
        store.record_committed(grey.clone(), ORIGINAL_BLUE);

        assert!(!store.confirm(&grey, GREY_DARK));
        assert_eq!(store.get(&grey).map(|e| e.status), Some(CommitStatus::Pending));
        assert!(store.confirm(&grey, ORIGINAL_BLUE));
        assert_eq!(store.get(&grey).map(|e| e.status), Some(CommitStatus::Confirmed));
    }

    #[test]
    fn test_preview_overlays_committed_value() {
        let mut store = GroupColorStore::new();
        let color = GroupTarget::named("Color");
        store.record_committed(color.clone(), ORIGINAL_BLUE);
        store.select_group(color.clone(), ThemeMode::Light);
        store.set_preview_color(GREY_DARK);

        let applied = store.applied_overrides();
        assert_eq!(applied.get(&color), Some(&GREY_DARK));
        assert_eq!(store.get(&color).map(|e| e.color), Some(ORIGINAL_BLUE));
    }
}
