//! The fixed, ordered set of badges a viewer can show

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// One selectable badge
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BadgeEntry {
    /// Label shown on the selection button
    #[serde(alias = "name")]
    pub display_name: String,
    /// Path handed to the asset source
    #[serde(alias = "file")]
    pub asset_path: String,
}

impl BadgeEntry {
    pub fn new(display_name: impl Into<String>, asset_path: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            asset_path: asset_path.into(),
        }
    }
}

const DEFAULT_BADGES: [&str; 6] = ["Food", "Art", "Sport", "Tour", "Travel", "Wellbeing"];

/// Ordered, non-empty list of badges
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadgeCatalog {
    entries: Vec<BadgeEntry>,
}

impl BadgeCatalog {
    pub fn new(entries: Vec<BadgeEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ViewerError::EmptyCatalog);
        }
        Ok(Self { entries })
    }

    /// The six stock badges, each at `/badge-<name>.glb`
    pub fn default_badges() -> Self {
        let entries = DEFAULT_BADGES
            .iter()
            .map(|name| BadgeEntry::new(*name, format!("/badge-{}.glb", name.to_lowercase())))
            .collect();
        Self { entries }
    }

    pub fn get(&self, index: usize) -> Option<&BadgeEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no badges
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadgeEntry> {
        self.entries.iter()
    }

    /// Index of the badge with this display name, ignoring case
    pub fn position_by_name(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|entry| entry.display_name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ViewerError::UnknownBadge(name.to_string()))
    }

    /// Validate an index into the catalog
    pub fn selection(&self, index: usize) -> Result<BadgeSelection> {
        if index < self.entries.len() {
            Ok(BadgeSelection(index))
        } else {
            Err(ViewerError::SelectionOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::default_badges()
    }
}

/// An index known to be valid for the catalog it came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BadgeSelection(usize);

impl BadgeSelection {
    pub fn index(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_badges_in_order() {
        let catalog = BadgeCatalog::default_badges();
        let names: Vec<_> = catalog.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, ["Food", "Art", "Sport", "Tour", "Travel", "Wellbeing"]);
        assert_eq!(catalog.get(5).unwrap().asset_path, "/badge-wellbeing.glb");
        assert_eq!(catalog.get(0).unwrap().asset_path, "/badge-food.glb");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(BadgeCatalog::new(Vec::new()), Err(ViewerError::EmptyCatalog)));
    }

    #[test]
    fn test_selection_bounds() {
        let catalog = BadgeCatalog::default_badges();
        assert_eq!(catalog.selection(3).unwrap().index(), 3);
        assert!(matches!(
            catalog.selection(6),
            Err(ViewerError::SelectionOutOfRange { index: 6, len: 6 })
        ));
    }

    #[test]
    fn test_position_by_name_ignores_case() {
        let catalog = BadgeCatalog::default_badges();
        assert_eq!(catalog.position_by_name("travel").unwrap(), 4);
        assert!(matches!(
            catalog.position_by_name("Chess"),
            Err(ViewerError::UnknownBadge(ref n)) if n == "Chess"
        ));
    }

    #[test]
    fn test_entry_accepts_short_keys() {
        #[derive(Deserialize)]
        struct Doc {
            badges: Vec<BadgeEntry>,
        }
        let doc: Doc = toml::from_str(
            r#"
            [[badges]]
            name = "Chess"
            file = "/badge-chess.glb"
            "#,
        )
        .unwrap();
        assert_eq!(doc.badges[0], BadgeEntry::new("Chess", "/badge-chess.glb"));
    }
}
