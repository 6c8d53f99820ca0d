//! Findings that do not block an export but usually mean missing annotation.

use crate::cell::CellKey;
use crate::floor::FloorKey;
use crate::palette::ConnectionKind;
use crate::store::FloorStore;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A cell on a specific floor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FloorCell {
    pub floor: FloorKey,
    pub cell: CellKey,
}

impl fmt::Display for FloorCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) on {}", self.cell, self.floor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Connection cells without a connection id; excluded from the
    /// vertical-connections table.
    pub unlabeled_connections: Vec<FloorCell>,
    pub uncategorized_pois: Vec<FloorCell>,
    /// Connection ids that reach only one floor.
    pub single_floor_connections: Vec<String>,
    /// Connection ids whose cells are painted with different connection types.
    pub mixed_type_connections: Vec<String>,
}

impl ValidationReport {
    pub fn build(store: &FloorStore) -> Self {
        let registry = store.registry();
        let poi = registry.poi();
        let mut report = Self::default();
        let mut groups: BTreeMap<&str, (Vec<ConnectionKind>, Vec<&FloorKey>)> = BTreeMap::new();

        for (key, data) in store.iter() {
            for (&cell, color) in &data.cells {
                if *color == poi && data.poi_category_at(cell).is_none() {
                    report.uncategorized_pois.push(FloorCell {
                        floor: key.clone(),
                        cell,
                    });
                }
                let Some(kind) = registry.category_of(color).connection_kind() else {
                    continue;
                };
                match data.first_label(cell) {
                    Some(id) => {
                        let (kinds, floors) = groups.entry(id).or_default();
                        if !kinds.contains(&kind) {
                            kinds.push(kind);
                        }
                        if !floors.contains(&key) {
                            floors.push(key);
                        }
                    }
                    None => report.unlabeled_connections.push(FloorCell {
                        floor: key.clone(),
                        cell,
                    }),
                }
            }
        }

        for (id, (kinds, floors)) in groups {
            if floors.len() < 2 {
                report.single_floor_connections.push(id.to_string());
            }
            if kinds.len() > 1 {
                report.mixed_type_connections.push(id.to_string());
            }
        }
        report
    }

    pub fn is_clean(&self) -> bool {
        self.unlabeled_connections.is_empty()
            && self.uncategorized_pois.is_empty()
            && self.single_floor_connections.is_empty()
            && self.mixed_type_connections.is_empty()
    }

    /// One human readable line per finding.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        out.extend(
            self.unlabeled_connections
                .iter()
                .map(|c| format!("Connection cell {} has no connection id", c)),
        );
        out.extend(
            self.uncategorized_pois
                .iter()
                .map(|c| format!("POI cell {} has no category", c)),
        );
        out.extend(
            self.single_floor_connections
                .iter()
                .map(|id| format!("Connection {} reaches only one floor", id)),
        );
        out.extend(
            self.mixed_type_connections
                .iter()
                .map(|id| format!("Connection {} mixes connection types", id)),
        );
        out
    }

    /// Emit every finding as a warning.
    pub fn log(&self) {
        for message in self.messages() {
            log::warn!("{}", message);
        }
    }
}
