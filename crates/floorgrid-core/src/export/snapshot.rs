//! JSON snapshot of a whole project.

use crate::coords::CoordinateSpace;
use crate::error::ImportError;
use crate::floor::{Floor, FloorKey};
use crate::palette::{ColorKey, ColorRegistry};
use crate::project::ViewSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Project-level settings stored next to the floors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSettings {
    pub coordinate_space: CoordinateSpace,
    #[serde(default)]
    pub view: ViewSettings,
    pub paint_color: ColorKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub id: Uuid,
    pub settings: SnapshotSettings,
    #[serde(default)]
    pub current_floor: Option<FloorKey>,
    #[serde(default)]
    pub floors: BTreeMap<FloorKey, Floor>,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and fully validate a snapshot. POI categories are checked
    /// against `registry`'s POI color.
    pub fn from_json(json: &str, registry: &ColorRegistry) -> Result<Self, ImportError> {
        let header: VersionHeader = serde_json::from_str(json)?;
        if header.version != SNAPSHOT_VERSION {
            return Err(ImportError::UnsupportedVersion(header.version));
        }
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate(registry)?;
        Ok(snapshot)
    }

    /// Check cross-field consistency that serde cannot express.
    pub fn validate(&self, registry: &ColorRegistry) -> Result<(), ImportError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(ImportError::UnsupportedVersion(self.version));
        }
        let poi = registry.poi();
        for (key, floor) in &self.floors {
            if floor.key() != *key {
                return Err(ImportError::Invalid(format!(
                    "floor entry {} holds floor {}",
                    key,
                    floor.key()
                )));
            }
            if floor.name.trim() != floor.name || floor.name.is_empty() {
                return Err(ImportError::Invalid(format!("floor {} has an untrimmed name", key)));
            }
            floor
                .data
                .check(&poi)
                .map_err(|e| ImportError::Invalid(format!("floor {}: {}", key, e)))?;
        }
        if let Some(current) = &self.current_floor {
            if !self.floors.contains_key(current) {
                return Err(ImportError::Invalid(format!("current floor {} does not exist", current)));
            }
        }
        let space = &self.settings.coordinate_space;
        space
            .validate()
            .map_err(|e| ImportError::Invalid(e.to_string()))?;
        if !space.zoom_is_valid() {
            return Err(ImportError::Invalid(format!("invalid zoom {}", space.zoom())));
        }
        Ok(())
    }
}
