//! Floors and their per-floor cell maps.

use crate::background::BackgroundImage;
use crate::cell::CellKey;
use crate::palette::{ColorKey, ColorRegistry, PoiCategory};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Identity of a floor: the `(number, name)` pair.
///
/// Ordered by number, then name. Serialized as `"{number}_{name}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FloorKey {
    /// Position in the building; lower is further down.
    pub number: i32,
    /// Display name, trimmed and non-empty.
    pub name: String,
}

impl FloorKey {
    /// Key for the floor `number` named `name`.
    pub fn new(number: i32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}

impl fmt::Display for FloorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.number, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid floor key: {0:?}")]
pub struct ParseFloorKeyError(pub String);

impl FromStr for FloorKey {
    type Err = ParseFloorKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, name) = s
            .split_once('_')
            .ok_or_else(|| ParseFloorKeyError(s.to_string()))?;
        let number = number
            .parse()
            .map_err(|_| ParseFloorKeyError(s.to_string()))?;
        if name.trim().is_empty() {
            return Err(ParseFloorKeyError(s.to_string()));
        }
        Ok(Self::new(number, name))
    }
}

impl Serialize for FloorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FloorKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Trim, truncate and de-duplicate labels, dropping empty ones.
pub fn normalize_labels<I, S>(labels: I, max_len: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label: String = label.as_ref().trim().chars().take(max_len).collect();
        let label = label.trim_end().to_string();
        if !label.is_empty() && !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

/// The editable maps of one floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorData {
    /// Painted cells and their colors.
    #[serde(default)]
    pub cells: BTreeMap<CellKey, ColorKey>,
    /// Non-empty label lists.
    #[serde(default)]
    pub labels: BTreeMap<CellKey, Vec<String>>,
    /// Labels applied on first paint with a color.
    #[serde(default)]
    pub presets: BTreeMap<ColorKey, Vec<String>>,
    #[serde(default)]
    pub poi_categories: BTreeMap<CellKey, PoiCategory>,
}

impl FloorData {
    /// Paint color of a cell.
    pub fn color_at(&self, cell: CellKey) -> Option<&ColorKey> {
        self.cells.get(&cell)
    }

    /// Labels of a cell, empty if none.
    pub fn labels_at(&self, cell: CellKey) -> &[String] {
        self.labels.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Primary label of a cell; the id for connection cells.
    pub fn first_label(&self, cell: CellKey) -> Option<&str> {
        self.labels_at(cell).first().map(String::as_str)
    }

    /// POI category of a cell.
    pub fn poi_category_at(&self, cell: CellKey) -> Option<PoiCategory> {
        self.poi_categories.get(&cell).copied()
    }

    /// Remove paint, labels and POI category. Returns whether anything changed.
    pub fn erase(&mut self, cell: CellKey) -> bool {
        let painted = self.cells.remove(&cell).is_some();
        let labeled = self.labels.remove(&cell).is_some();
        let categorized = self.poi_categories.remove(&cell).is_some();
        painted || labeled || categorized
    }

    /// Paint a cell, applying label-clearing and first-paint preset rules.
    pub fn paint(&mut self, cell: CellKey, color: &ColorKey, registry: &ColorRegistry) {
        let first_paint = self.cells.insert(cell, color.clone()).is_none();

        if registry.entry(color).is_some_and(|e| e.clears_labels()) {
            self.labels.remove(&cell);
        } else if first_paint {
            if let Some(preset) = self.presets.get(color) {
                let labels = self.labels.entry(cell).or_default();
                for label in preset {
                    if !labels.contains(label) {
                        labels.push(label.clone());
                    }
                }
                if labels.is_empty() {
                    self.labels.remove(&cell);
                }
            }
        }

        if *color != registry.poi() {
            self.poi_categories.remove(&cell);
        }
    }

    /// Replace a cell's labels. An empty result removes the entry.
    pub fn set_labels(&mut self, cell: CellKey, labels: Vec<String>) {
        if labels.is_empty() {
            self.labels.remove(&cell);
        } else {
            self.labels.insert(cell, labels);
        }
    }

    /// Replace the preset for a color. An empty list removes it.
    pub fn set_preset(&mut self, color: ColorKey, labels: Vec<String>) {
        if labels.is_empty() {
            self.presets.remove(&color);
        } else {
            self.presets.insert(color, labels);
        }
    }

    /// Store a POI category if the cell is painted with `poi_color`.
    pub fn set_poi_category(&mut self, cell: CellKey, category: PoiCategory, poi_color: &ColorKey) -> bool {
        if self.cells.get(&cell) != Some(poi_color) {
            return false;
        }
        self.poi_categories.insert(cell, category);
        true
    }

    /// Remove all paint and POI categories. Labels stay.
    pub fn clear_paint(&mut self) {
        self.cells.clear();
        self.poi_categories.clear();
    }

    /// Remove all labels.
    pub fn clear_labels(&mut self) {
        self.labels.clear();
    }

    /// Remove paint, labels and POI categories.
    pub fn clear_all(&mut self) {
        self.clear_paint();
        self.clear_labels();
    }

    /// Cells that are painted or labeled, in row-major order.
    pub fn occupied_cells(&self) -> BTreeSet<CellKey> {
        self.cells.keys().chain(self.labels.keys()).copied().collect()
    }

    /// Whether the floor has neither paint nor labels.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.labels.is_empty()
    }

    /// Check the invariants editing maintains: label and preset lists are
    /// non-empty, hold distinct trimmed non-empty labels, and POI categories
    /// only sit on cells painted with `poi_color`.
    pub fn check(&self, poi_color: &ColorKey) -> Result<(), String> {
        for (cell, labels) in &self.labels {
            check_label_list(labels).map_err(|e| format!("cell {} {}", cell, e))?;
        }
        for (color, labels) in &self.presets {
            check_label_list(labels).map_err(|e| format!("preset {} {}", color, e))?;
        }
        for (cell, category) in &self.poi_categories {
            if self.cells.get(cell) != Some(poi_color) {
                return Err(format!(
                    "cell {} has POI category {} but is not painted as a POI",
                    cell,
                    category.as_str()
                ));
            }
        }
        Ok(())
    }
}

fn check_label_list(labels: &[String]) -> Result<(), String> {
    if labels.is_empty() {
        return Err("has an empty label list".to_string());
    }
    for (i, label) in labels.iter().enumerate() {
        if label.is_empty() || label.trim() != label {
            return Err(format!("has an invalid label {:?}", label));
        }
        if labels[..i].contains(label) {
            return Err(format!("repeats label {:?}", label));
        }
    }
    Ok(())
}

/// Cell counts for one floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FloorSummary {
    /// Cells that are painted or labeled.
    pub total_cells: usize,
    pub painted_cells: usize,
    pub labeled_cells: usize,
}

impl From<&FloorData> for FloorSummary {
    fn from(data: &FloorData) -> Self {
        Self {
            total_cells: data.occupied_cells().len(),
            painted_cells: data.cells.len(),
            labeled_cells: data.labels.len(),
        }
    }
}

/// A floor entry in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub name: String,
    pub number: i32,
    #[serde(flatten)]
    pub data: FloorData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundImage>,
}

impl Floor {
    /// An empty floor with no background.
    pub fn new(key: &FloorKey) -> Self {
        Self {
            name: key.name.clone(),
            number: key.number,
            data: FloorData::default(),
            background: None,
        }
    }

    /// The `(number, name)` key this floor is stored under.
    pub fn key(&self) -> FloorKey {
        FloorKey::new(self.number, self.name.clone())
    }
}
