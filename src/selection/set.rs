use std::collections::HashMap;

use crate::model::{AssetKind, Folder, ItemRef};

/// Items picked in multi-select mode for one asset kind.
///
/// Names keep their insertion order, and each name remembers the folder it was
/// found in: items with the same name may live in different folders and the
/// folder is needed later to build the right request.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    order: Vec<String>,
    folders: HashMap<String, Folder>,
    /// Bumped on every mutation and on explicit refreshes so views keyed on it
    /// recompute.
    revision: u64,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the item if absent, removes it otherwise. Returns whether the item
    /// is selected afterwards.
    pub fn toggle(&mut self, name: &str, folder: Folder) -> bool {
        self.revision += 1;
        if self.folders.remove(name).is_some() {
            self.order.retain(|n| n != name);
            false
        } else {
            self.order.push(name.to_owned());
            self.folders.insert(name.to_owned(), folder);
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.folders.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// First item still selected, in selection order
    pub fn first(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Folder recorded for `name`, `Root` if none was recorded
    pub fn folder_of(&self, name: &str) -> Folder {
        self.folders.get(name).cloned().unwrap_or_default()
    }

    /// Selected items of `kind` with their recorded folders
    pub fn items(&self, kind: AssetKind) -> Vec<ItemRef> {
        self.order
            .iter()
            .map(|name| ItemRef::new(name.clone(), kind, self.folder_of(name)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.folders.clear();
        self.revision += 1;
    }

    /// Forces dependents to recompute without changing membership
    pub fn refresh(&mut self) {
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// One selection set per asset kind.
#[derive(Debug, Clone, Default)]
pub struct Selections {
    icons: SelectionSet,
    colorful_icons: SelectionSet,
    single_color_icons: SelectionSet,
    flags: SelectionSet,
}

impl Selections {
    pub fn get(&self, kind: AssetKind) -> &SelectionSet {
        match kind {
            AssetKind::Icon => &self.icons,
            AssetKind::ColorfulIcon => &self.colorful_icons,
            AssetKind::SingleColorIcon => &self.single_color_icons,
            AssetKind::Flag => &self.flags,
        }
    }

    pub fn get_mut(&mut self, kind: AssetKind) -> &mut SelectionSet {
        match kind {
            AssetKind::Icon => &mut self.icons,
            AssetKind::ColorfulIcon => &mut self.colorful_icons,
            AssetKind::SingleColorIcon => &mut self.single_color_icons,
            AssetKind::Flag => &mut self.flags,
        }
    }

    pub fn clear_all(&mut self) {
        for kind in AssetKind::ALL {
            self.get_mut(kind).clear();
        }
    }

    pub fn is_all_empty(&self) -> bool {
        AssetKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_records_and_forgets_folder() {
        let mut set = SelectionSet::new();
        assert!(set.toggle("gear", Folder::new("System")));
        assert!(set.toggle("cloud", Folder::new("Weather")));
        assert_eq!(set.folder_of("gear"), Folder::new("System"));

        assert!(!set.toggle("gear", Folder::new("System")));
        assert!(!set.contains("gear"));
        assert_eq!(set.folder_of("gear"), Folder::Root);
        assert_eq!(set.first(), Some("cloud"));
    }

    #[test]
    fn test_refresh_changes_revision_only() {
        let mut set = SelectionSet::new();
        set.toggle("gear", Folder::Root);
        let before = set.revision();
        set.refresh();
        assert!(set.revision() > before);
        assert_eq!(set.len(), 1);
    }
}
