//! Export of the annotation as CSV tables and a JSON snapshot.
//!
//! Everything is recomputed from the store on each call and iterates sorted
//! maps, so unchanged state always produces byte-identical output.

pub mod csv;
mod report;
mod snapshot;
mod tables;

pub use report::{FloorCell, ValidationReport};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot, SnapshotSettings};
pub use tables::{
    ConnectionRow, NAVIGATION_HEADER, NavigationRow, POI_HEADER, PoiRow, VERTICAL_CONNECTIONS_HEADER,
    connection_rows, navigation_csv, navigation_rows, poi_csv, poi_rows, vertical_connections_csv,
};

use crate::store::FloorStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NAVIGATION_FILE: &str = "navigation.csv";
pub const POI_FILE: &str = "poi.csv";
pub const VERTICAL_CONNECTIONS_FILE: &str = "vertical_connections.csv";

/// Which floors the per-cell tables cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    #[default]
    CurrentFloor,
    AllFloors,
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportScope::CurrentFloor => f.write_str("current"),
            ExportScope::AllFloors => f.write_str("all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown export scope: {0:?} (expected \"current\" or \"all\")")]
pub struct ParseExportScopeError(pub String);

impl FromStr for ExportScope {
    type Err = ParseExportScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" | "current_floor" => Ok(ExportScope::CurrentFloor),
            "all" | "all_floors" => Ok(ExportScope::AllFloors),
            _ => Err(ParseExportScopeError(s.to_string())),
        }
    }
}

/// The three CSV tables of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTables {
    pub navigation: String,
    pub poi: String,
    pub vertical_connections: String,
}

impl ExportTables {
    pub fn build(store: &FloorStore, scope: ExportScope) -> Self {
        let tables = Self {
            navigation: navigation_csv(store, scope),
            poi: poi_csv(store, scope),
            vertical_connections: vertical_connections_csv(store),
        };
        log::info!(
            "Exported {} floor(s) ({} scope)",
            tables::scoped_floors(store, scope).len(),
            scope
        );
        tables
    }

    /// File name and contents of each table.
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            (NAVIGATION_FILE, self.navigation.as_str()),
            (POI_FILE, self.poi.as_str()),
            (VERTICAL_CONNECTIONS_FILE, self.vertical_connections.as_str()),
        ]
    }
}
