//! Navigation, POI and vertical-connection tables.

use super::csv::{CsvWriter, Field};
use super::ExportScope;
use crate::cell::CellKey;
use crate::floor::{FloorData, FloorKey};
use crate::palette::{ConnectionKind, PaintCategory};
use crate::store::FloorStore;
use serde::Serialize;
use std::collections::BTreeMap;

pub const NAVIGATION_HEADER: [&str; 7] = [
    "row",
    "col",
    "floor_name",
    "floor_number",
    "walkable",
    "connection_type",
    "connection_id",
];

pub const POI_HEADER: [&str; 8] = [
    "poi_id",
    "name",
    "display_name",
    "row",
    "col",
    "floor_name",
    "floor_number",
    "category",
];

pub const VERTICAL_CONNECTIONS_HEADER: [&str; 5] = [
    "connection_id",
    "type",
    "floors",
    "travel_time_seconds",
    "floor_numbers",
];

/// One painted or labeled cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRow {
    pub row: i32,
    pub col: i32,
    pub floor_name: String,
    pub floor_number: i32,
    pub walkable: bool,
    pub connection_type: Option<ConnectionKind>,
    pub connection_id: String,
}

/// One POI cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoiRow {
    pub poi_id: String,
    pub name: String,
    pub display_name: String,
    pub row: i32,
    pub col: i32,
    pub floor_name: String,
    pub floor_number: i32,
    pub category: Option<&'static str>,
}

/// One connection id with every floor it reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionRow {
    pub connection_id: String,
    pub kind: ConnectionKind,
    pub floors: Vec<FloorKey>,
}

impl ConnectionRow {
    pub fn travel_time_seconds(&self) -> u32 {
        self.kind.travel_time_seconds()
    }

    pub fn floor_names(&self) -> String {
        self.floors.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(",")
    }

    pub fn floor_numbers(&self) -> String {
        self.floors
            .iter()
            .map(|f| f.number.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Floors covered by a scope, in floor order.
pub(crate) fn scoped_floors(store: &FloorStore, scope: ExportScope) -> Vec<(&FloorKey, &FloorData)> {
    match scope {
        ExportScope::AllFloors => store.iter().collect(),
        ExportScope::CurrentFloor => store
            .current_key()
            .and_then(|key| store.floor_data(key).map(|data| (key, data)))
            .into_iter()
            .collect(),
    }
}

/// Cells picked from each floor, in export order: floor number, row, col.
/// Floors sharing a number interleave by cell; exact ties keep floor order.
fn export_order<'a>(
    floors: Vec<(&'a FloorKey, &'a FloorData)>,
    cells: impl Fn(&'a FloorData) -> Vec<CellKey>,
) -> Vec<(&'a FloorKey, &'a FloorData, CellKey)> {
    let mut ordered: Vec<_> = floors
        .into_iter()
        .flat_map(|(key, data)| cells(data).into_iter().map(move |cell| (key, data, cell)))
        .collect();
    ordered.sort_by_key(|&(key, _, cell)| (key.number, cell.row, cell.col));
    ordered
}

fn category_at(store: &FloorStore, data: &FloorData, cell: CellKey) -> Option<PaintCategory> {
    data.color_at(cell).map(|color| store.registry().category_of(color))
}

pub fn navigation_rows(store: &FloorStore, scope: ExportScope) -> Vec<NavigationRow> {
    export_order(scoped_floors(store, scope), |data| data.occupied_cells().into_iter().collect())
        .into_iter()
        .map(|(key, data, cell)| {
            let category = category_at(store, data, cell);
            let connection_type = category.and_then(PaintCategory::connection_kind);
            let connection_id = match connection_type {
                Some(_) => data.first_label(cell).unwrap_or_default().to_string(),
                None => String::new(),
            };
            NavigationRow {
                row: cell.row,
                col: cell.col,
                floor_name: key.name.clone(),
                floor_number: key.number,
                walkable: category.is_some_and(PaintCategory::is_walkable),
                connection_type,
                connection_id,
            }
        })
        .collect()
}

/// POI cells in export order; `poi_id` counts along that order.
pub fn poi_rows(store: &FloorStore, scope: ExportScope) -> Vec<PoiRow> {
    let poi = store.registry().poi();
    let poi_cells = |data: &FloorData| -> Vec<CellKey> {
        data.cells
            .iter()
            .filter(|(_, color)| **color == poi)
            .map(|(&cell, _)| cell)
            .collect()
    };
    export_order(scoped_floors(store, scope), poi_cells)
        .into_iter()
        .enumerate()
        .map(|(i, (key, data, cell))| {
            let poi_id = format!("{:03}", i + 1);
            let labels = data.labels_at(cell);
            let name = labels.first().cloned().unwrap_or_else(|| format!("POI_{}", poi_id));
            let display_name = labels.get(1).cloned().unwrap_or_else(|| name.clone());
            PoiRow {
                poi_id,
                name,
                display_name,
                row: cell.row,
                col: cell.col,
                floor_name: key.name.clone(),
                floor_number: key.number,
                category: data.poi_category_at(cell).map(|c| c.as_str()),
            }
        })
        .collect()
}

/// Connection cells grouped by id across every floor. A group's type comes
/// from its first cell in export order; its floors are listed in floor order.
pub fn connection_rows(store: &FloorStore) -> Vec<ConnectionRow> {
    let registry = store.registry();
    let connection_cells = |data: &FloorData| -> Vec<CellKey> {
        data.cells
            .iter()
            .filter(|(_, color)| registry.category_of(color).connection_kind().is_some())
            .map(|(&cell, _)| cell)
            .collect()
    };

    let mut groups: BTreeMap<String, ConnectionRow> = BTreeMap::new();
    for (key, data, cell) in export_order(store.iter().collect(), connection_cells) {
        let Some(kind) = category_at(store, data, cell).and_then(PaintCategory::connection_kind) else {
            continue;
        };
        let Some(id) = data.first_label(cell) else {
            log::debug!("Skipping unlabeled {} cell {} on {}", kind.as_str(), cell, key);
            continue;
        };
        let group = groups.entry(id.to_string()).or_insert_with(|| ConnectionRow {
            connection_id: id.to_string(),
            kind,
            floors: Vec::new(),
        });
        if !group.floors.contains(key) {
            group.floors.push(key.clone());
        }
    }
    groups
        .into_values()
        .map(|mut row| {
            row.floors.sort();
            row
        })
        .collect()
}

pub fn navigation_csv(store: &FloorStore, scope: ExportScope) -> String {
    let mut csv = CsvWriter::new(&NAVIGATION_HEADER);
    for row in navigation_rows(store, scope) {
        csv.row(&[
            row.row.into(),
            row.col.into(),
            Field::Text(&row.floor_name),
            row.floor_number.into(),
            row.walkable.into(),
            Field::Text(row.connection_type.map(ConnectionKind::as_str).unwrap_or_default()),
            Field::Text(&row.connection_id),
        ]);
    }
    csv.finish()
}

pub fn poi_csv(store: &FloorStore, scope: ExportScope) -> String {
    let mut csv = CsvWriter::new(&POI_HEADER);
    for row in poi_rows(store, scope) {
        csv.row(&[
            Field::Text(&row.poi_id),
            Field::Text(&row.name),
            Field::Text(&row.display_name),
            row.row.into(),
            row.col.into(),
            Field::Text(&row.floor_name),
            row.floor_number.into(),
            Field::Text(row.category.unwrap_or_default()),
        ]);
    }
    csv.finish()
}

pub fn vertical_connections_csv(store: &FloorStore) -> String {
    let mut csv = CsvWriter::new(&VERTICAL_CONNECTIONS_HEADER);
    for row in connection_rows(store) {
        let floors = row.floor_names();
        let numbers = row.floor_numbers();
        csv.row(&[
            Field::Text(&row.connection_id),
            Field::Text(row.kind.as_str()),
            Field::Text(&floors),
            row.travel_time_seconds().into(),
            Field::Text(&numbers),
        ]);
    }
    csv.finish()
}
