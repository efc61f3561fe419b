//! Browsable listings of every asset kind, fetched once at startup.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::{AssetKind, FlagShape, Folder, ItemRef};

/// One kind's listing as the backend reports it.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogListing {
    /// Icons and colorful icons: names per folder
    Folders(BTreeMap<String, Vec<String>>),
    /// Single-color icon names, or flag file names
    Flat(Vec<String>),
}

impl CatalogListing {
    pub fn item_count(&self) -> usize {
        match self {
            CatalogListing::Folders(folders) => folders.values().map(Vec::len).sum(),
            CatalogListing::Flat(names) => names.len(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    listings: HashMap<AssetKind, CatalogListing>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: AssetKind, listing: CatalogListing) {
        log::info!("Loaded {} {}", listing.item_count(), kind.noun());
        self.listings.insert(kind, listing);
    }

    pub fn is_loaded(&self, kind: AssetKind) -> bool {
        self.listings.contains_key(&kind)
    }

    /// Folder names of a folder-aware kind, sorted
    pub fn folders(&self, kind: AssetKind) -> Vec<Folder> {
        match self.listings.get(&kind) {
            Some(CatalogListing::Folders(folders)) => folders.keys().map(Folder::new).collect(),
            _ => Vec::new(),
        }
    }

    /// Items to show for `kind`.
    ///
    /// With a folder open only that folder is listed. At the top level an
    /// empty search shows nothing for folder-aware kinds, while a search term
    /// looks through every folder. Flags are listed by country.
    pub fn entries(&self, kind: AssetKind, folder: Option<&Folder>, term: &str) -> Vec<ItemRef> {
        let needle = term.trim().to_lowercase();
        let matches = |name: &str| needle.is_empty() || name.to_lowercase().contains(&needle);

        match self.listings.get(&kind) {
            Some(CatalogListing::Folders(folders)) => match folder {
                Some(open) => folders
                    .get(open.as_str())
                    .into_iter()
                    .flatten()
                    .filter(|name| matches(name))
                    .map(|name| ItemRef::new(name.as_str(), kind, open.clone()))
                    .collect(),
                None if needle.is_empty() => Vec::new(),
                None => folders
                    .iter()
                    .flat_map(|(folder, names)| names.iter().map(move |name| (folder, name)))
                    .filter(|(_, name)| matches(name))
                    .map(|(folder, name)| ItemRef::new(name.as_str(), kind, Folder::new(folder.as_str())))
                    .collect(),
            },
            Some(CatalogListing::Flat(_)) if kind == AssetKind::Flag => self
                .countries()
                .into_iter()
                .filter(|name| matches(name))
                .map(|name| ItemRef::new(name, kind, Folder::Root))
                .collect(),
            Some(CatalogListing::Flat(names)) => names
                .iter()
                .filter(|name| matches(name))
                .map(|name| ItemRef::new(name.as_str(), kind, Folder::Root))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Country names derived from the flag files, deduplicated and sorted
    pub fn countries(&self) -> Vec<String> {
        let Some(CatalogListing::Flat(files)) = self.listings.get(&AssetKind::Flag) else {
            return Vec::new();
        };
        files
            .iter()
            .map(|file| country_of(file).to_owned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether `country` has a flag in `shape`. An unloaded catalog accepts
    /// every shape.
    pub fn has_flag_shape(&self, country: &str, shape: FlagShape) -> bool {
        match self.listings.get(&AssetKind::Flag) {
            Some(CatalogListing::Flat(files)) => {
                let wanted = shape.file_name(country);
                files.iter().any(|file| *file == wanted)
            }
            _ => true,
        }
    }
}

fn country_of(file: &str) -> &str {
    file.strip_suffix("_circle.svg")
        .or_else(|| file.strip_suffix(".svg"))
        .unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icons() -> Catalog {
        let mut folders = BTreeMap::new();
        folders.insert("System".to_owned(), vec!["gear".to_owned(), "cog".to_owned()]);
        folders.insert("Weather".to_owned(), vec!["cloud".to_owned(), "Gearbox".to_owned()]);
        let mut catalog = Catalog::new();
        catalog.set(AssetKind::Icon, CatalogListing::Folders(folders));
        catalog
    }

    #[test]
    fn test_search_spans_folders_at_top_level() {
        let catalog = icons();
        assert!(catalog.entries(AssetKind::Icon, None, "").is_empty());

        let found = catalog.entries(AssetKind::Icon, None, "GEAR");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].folder, Folder::new("System"));
        assert_eq!(found[1].folder, Folder::new("Weather"));
    }

    #[test]
    fn test_open_folder_filters_locally() {
        let catalog = icons();
        let system = Folder::new("System");
        let found = catalog.entries(AssetKind::Icon, Some(&system), "");
        assert_eq!(found.len(), 2);
        let found = catalog.entries(AssetKind::Icon, Some(&system), "co");
        assert_eq!(found, vec![ItemRef::new("cog", AssetKind::Icon, system)]);
    }

    #[test]
    fn test_flags_are_listed_by_country() {
        let mut catalog = Catalog::new();
        catalog.set(
            AssetKind::Flag,
            CatalogListing::Flat(vec![
                "France.svg".to_owned(),
                "France_circle.svg".to_owned(),
                "Chile.svg".to_owned(),
            ]),
        );
        assert_eq!(catalog.countries(), vec!["Chile", "France"]);
        assert!(catalog.has_flag_shape("France", FlagShape::Circle));
        assert!(!catalog.has_flag_shape("Chile", FlagShape::Circle));
    }
}
