//! How often each interface was shown with each data folder.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{flatten::NormalizedRow, study::Interface};

/// Folder label used for rows without a data folder.
pub const UNKNOWN_FOLDER: &str = "unknown";

/// Row counts per (interface, data folder).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExposureTable {
    /// Folders in sorted order.
    pub folders: Vec<String>,
    pub counts: BTreeMap<Interface, BTreeMap<String, usize>>,
}

impl ExposureTable {
    #[must_use]
    pub fn from_rows(rows: &[NormalizedRow]) -> Self {
        let mut counts = BTreeMap::<Interface, BTreeMap<String, usize>>::new();
        for row in rows {
            let folder = folder_name(row.data_folder.as_deref());
            *counts
                .entry(row.interface)
                .or_default()
                .entry(folder.to_owned())
                .or_default() += 1;
        }
        let mut folders = counts
            .values()
            .flat_map(|by_folder| by_folder.keys().cloned())
            .collect::<Vec<_>>();
        folders.sort();
        folders.dedup();
        Self { folders, counts }
    }

    /// Rows of `interface` shown with `folder`.
    #[must_use]
    pub fn get(&self, interface: Interface, folder: &str) -> usize {
        self.counts
            .get(&interface)
            .and_then(|by_folder| by_folder.get(folder))
            .copied()
            .unwrap_or(0)
    }

    /// Rows of `interface` across all folders.
    #[must_use]
    pub fn interface_total(&self, interface: Interface) -> usize {
        self.counts
            .get(&interface)
            .map_or(0, |by_folder| by_folder.values().sum())
    }
}

/// Trimmed folder name, or [`UNKNOWN_FOLDER`] when absent or blank.
#[must_use]
pub fn folder_name(folder: Option<&str>) -> &str {
    folder
        .map(str::trim)
        .filter(|folder| !folder.is_empty())
        .unwrap_or(UNKNOWN_FOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::row;

    fn shown(id: &str, interface: Interface, folder: Option<&str>) -> NormalizedRow {
        let mut r = row(id, interface, [Some(1.0); 4]);
        r.data_folder = folder.map(str::to_owned);
        r
    }

    #[test]
    fn test_exposure_counts() {
        let rows = vec![
            shown("p1", Interface::C, Some("scene_b")),
            shown("p1", Interface::D, Some("scene_a")),
            shown("p2", Interface::C, Some("scene_b")),
            shown("p2", Interface::D, Some(" ")),
            shown("p3", Interface::C, None),
        ];
        let table = ExposureTable::from_rows(&rows);
        assert_eq!(table.folders, vec!["scene_a", "scene_b", "unknown"]);
        assert_eq!(table.get(Interface::C, "scene_b"), 2);
        assert_eq!(table.get(Interface::C, "unknown"), 1);
        assert_eq!(table.get(Interface::D, "unknown"), 1);
        assert_eq!(table.get(Interface::Y, "scene_a"), 0);
        assert_eq!(table.interface_total(Interface::C), 3);
        assert_eq!(table.interface_total(Interface::Y1), 0);
    }
}
