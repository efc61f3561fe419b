use super::Selections;
use crate::model::{AssetKind, FlagShape, Folder, GroupName, ItemRef};

/// Identity of the scope a request was issued for. A response is only applied
/// while the tracker still reports the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    pub kind: AssetKind,
    pub folder: Folder,
    pub name: String,
}

impl ScopeKey {
    pub fn of(item: &ItemRef) -> Self {
        Self {
            kind: item.kind,
            folder: item.folder.clone(),
            name: item.name.clone(),
        }
    }
}

/// Which tab, folder and item(s) the user is working on.
#[derive(Debug, Clone)]
pub struct ScopeTracker {
    tab: AssetKind,
    folder: Option<Folder>,
    active: Option<ItemRef>,
    flag_shape: FlagShape,
    preview_url: Option<String>,
    groups: Vec<GroupName>,
    is_greyscale: bool,
    multi_select: bool,
    selections: Selections,
}

impl Default for ScopeTracker {
    fn default() -> Self {
        Self::new(AssetKind::Icon)
    }
}

impl ScopeTracker {
    pub fn new(tab: AssetKind) -> Self {
        Self {
            tab,
            folder: None,
            active: None,
            flag_shape: FlagShape::default(),
            preview_url: None,
            groups: Vec::new(),
            is_greyscale: false,
            multi_select: false,
            selections: Selections::default(),
        }
    }

    pub fn tab(&self) -> AssetKind {
        self.tab
    }

    /// Folder being browsed; `None` at the top level of a tab
    pub fn folder(&self) -> Option<&Folder> {
        self.folder.as_ref()
    }

    pub fn active(&self) -> Option<&ItemRef> {
        self.active.as_ref()
    }

    pub fn scope_key(&self) -> Option<ScopeKey> {
        self.active.as_ref().map(ScopeKey::of)
    }

    pub fn is_current(&self, key: &ScopeKey) -> bool {
        self.active.as_ref().is_some_and(|item| ScopeKey::of(item) == *key)
    }

    pub fn flag_shape(&self) -> FlagShape {
        self.flag_shape
    }

    pub fn set_flag_shape(&mut self, shape: FlagShape) {
        self.flag_shape = shape;
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    pub fn set_preview_url(&mut self, url: Option<String>) {
        self.preview_url = url;
    }

    pub fn groups(&self) -> &[GroupName] {
        &self.groups
    }

    pub fn is_greyscale(&self) -> bool {
        self.is_greyscale
    }

    pub fn set_greyscale(&mut self, greyscale: bool) {
        self.is_greyscale = greyscale;
    }

    pub fn multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn selections_mut(&mut self) -> &mut Selections {
        &mut self.selections
    }

    /// Selection set of the active tab
    pub fn current_selection(&self) -> &super::SelectionSet {
        self.selections.get(self.tab)
    }

    /// Makes `item` the active item. The group list and per-item flags start
    /// over; the caller sets the preview.
    pub fn activate(&mut self, item: ItemRef) {
        self.active = Some(item);
        self.groups.clear();
        self.is_greyscale = false;
    }

    pub fn clear_active(&mut self) {
        self.active = None;
        self.groups.clear();
        self.preview_url = None;
        self.is_greyscale = false;
    }

    /// Adds or removes an item from the selection set of its kind. Only valid
    /// in multi-select mode; returns whether the item is selected afterwards.
    pub fn toggle(&mut self, item: &ItemRef) -> bool {
        if !self.multi_select {
            log::warn!("Ignoring selection toggle for {} outside multi-select mode", item.name);
            return false;
        }
        self.selections
            .get_mut(item.kind)
            .toggle(&item.name, item.folder.clone())
    }

    /// Stores a group list if it was requested for the current item.
    pub fn accept_groups(&mut self, key: &ScopeKey, groups: Vec<GroupName>) -> bool {
        if !self.is_current(key) {
            return false;
        }
        self.groups = groups;
        true
    }

    /// Switches tab and drops everything scoped to the previous one.
    pub fn change_scope(&mut self, tab: AssetKind) {
        self.tab = tab;
        self.folder = None;
        self.clear_active();
        self.flag_shape = FlagShape::Rectangle;
        self.selections.clear_all();
    }

    pub fn open_folder(&mut self, folder: Option<Folder>) {
        self.folder = folder;
        self.clear_active();
    }

    /// Enters or leaves multi-select mode. Leaving clears every selection set.
    pub fn set_multi_select(&mut self, on: bool) {
        if self.multi_select && !on {
            self.selections.clear_all();
        }
        self.multi_select = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_list_is_keyed_by_item() {
        let mut tracker = ScopeTracker::new(AssetKind::Icon);
        let gear = ItemRef::new("gear", AssetKind::Icon, Folder::new("System"));
        let cloud = ItemRef::new("cloud", AssetKind::Icon, Folder::new("Weather"));

        tracker.activate(gear.clone());
        let stale = ScopeKey::of(&gear);
        tracker.activate(cloud.clone());

        assert!(!tracker.accept_groups(&stale, vec![GroupName::new("Grey")]));
        assert!(tracker.groups().is_empty());
        assert!(tracker.accept_groups(&ScopeKey::of(&cloud), vec![GroupName::new("Color")]));
        assert_eq!(tracker.groups(), &[GroupName::new("Color")]);
    }

    #[test]
    fn test_toggle_outside_multi_select_is_ignored() {
        let mut tracker = ScopeTracker::new(AssetKind::Icon);
        let gear = ItemRef::new("gear", AssetKind::Icon, Folder::Root);
        assert!(!tracker.toggle(&gear));
        assert!(tracker.selections().is_all_empty());
    }
}
