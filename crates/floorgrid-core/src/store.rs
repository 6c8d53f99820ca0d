//! The floor collection and the cell mutation rules.
//!
//! The current floor's maps live in a separate working set. Switching floors
//! flushes the working set back into the old floor's entry before the target
//! floor is loaded, so edits never leak across floors. Readers go through
//! [`FloorStore::floor_data`], which returns the working set for the current
//! floor.

use crate::background::BackgroundImage;
use crate::cell::CellKey;
use crate::config::MAX_LABEL_LENGTH;
use crate::error::{FloorError, FloorResult};
use crate::floor::{Floor, FloorData, FloorKey, FloorSummary, normalize_labels};
use crate::palette::{ColorKey, ColorRegistry, PoiCategory};
use crate::stroke::{PaintMode, StrokeAction, StrokeTracker};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct FloorStore {
    floors: BTreeMap<FloorKey, Floor>,
    current: Option<FloorKey>,
    working: FloorData,
    stroke: StrokeTracker,
    registry: ColorRegistry,
    max_label_length: usize,
}

impl Default for FloorStore {
    fn default() -> Self {
        Self::new(ColorRegistry::default())
    }
}

impl FloorStore {
    /// An empty store with no current floor.
    pub fn new(registry: ColorRegistry) -> Self {
        Self {
            floors: BTreeMap::new(),
            current: None,
            working: FloorData::default(),
            stroke: StrokeTracker::new(),
            registry,
            max_label_length: MAX_LABEL_LENGTH,
        }
    }

    /// Build a store from already validated floors.
    pub(crate) fn from_parts(
        floors: BTreeMap<FloorKey, Floor>,
        current: Option<FloorKey>,
        registry: ColorRegistry,
        max_label_length: usize,
    ) -> Self {
        let mut store = Self {
            floors,
            current: None,
            working: FloorData::default(),
            stroke: StrokeTracker::new(),
            registry,
            max_label_length,
        };
        let current = current.or_else(|| store.floors.keys().next().cloned());
        store.load(current);
        store
    }

    /// Longest label kept by later edits. Clamped to at least one character.
    pub fn set_max_label_length(&mut self, max: usize) {
        self.max_label_length = max.max(1);
    }

    /// Colors and their categories.
    pub fn registry(&self) -> &ColorRegistry {
        &self.registry
    }

    /// Mutable access for rebinding category colors.
    pub fn registry_mut(&mut self) -> &mut ColorRegistry {
        &mut self.registry
    }

    // --- floor lifecycle -------------------------------------------------

    /// Add an empty floor. It becomes current when no floor is current.
    pub fn create_floor(&mut self, name: &str, number: i32) -> FloorResult<FloorKey> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FloorError::EmptyName);
        }
        let key = FloorKey::new(number, name);
        if self.floors.contains_key(&key) {
            return Err(FloorError::Duplicate(key));
        }

        self.floors.insert(key.clone(), Floor::new(&key));
        log::info!("Created floor {}", key);

        if self.current.is_none() {
            self.load(Some(key.clone()));
        }
        Ok(key)
    }

    /// Make another floor current (flush, then load).
    pub fn switch_floor(&mut self, key: &FloorKey) -> FloorResult<()> {
        if !self.floors.contains_key(key) {
            return Err(FloorError::NotFound(key.clone()));
        }
        if self.current.as_ref() == Some(key) {
            return Ok(());
        }
        self.flush();
        self.load(Some(key.clone()));
        log::debug!("Switched to floor {}", key);
        Ok(())
    }

    /// Remove a floor with all its maps.
    pub fn delete_floor(&mut self, key: &FloorKey) -> FloorResult<()> {
        if self.floors.remove(key).is_none() {
            return Err(FloorError::NotFound(key.clone()));
        }
        log::info!("Deleted floor {}", key);

        if self.current.as_ref() == Some(key) {
            let next = self.floors.keys().next().cloned();
            self.load(next);
        }
        Ok(())
    }

    /// Move a floor to a new `(number, name)`, keeping its data.
    pub fn rename_floor(&mut self, old: &FloorKey, new_name: &str, new_number: i32) -> FloorResult<FloorKey> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(FloorError::EmptyName);
        }
        if !self.floors.contains_key(old) {
            return Err(FloorError::NotFound(old.clone()));
        }
        let new_key = FloorKey::new(new_number, new_name);
        if &new_key == old {
            return Ok(new_key);
        }
        if self.floors.contains_key(&new_key) {
            return Err(FloorError::Duplicate(new_key));
        }

        let is_current = self.current.as_ref() == Some(old);
        if is_current {
            self.flush();
        }
        if let Some(mut floor) = self.floors.remove(old) {
            floor.name = new_key.name.clone();
            floor.number = new_key.number;
            self.floors.insert(new_key.clone(), floor);
        }
        if is_current {
            self.current = Some(new_key.clone());
        }
        log::info!("Renamed floor {} to {}", old, new_key);
        Ok(new_key)
    }

    fn flush(&mut self) {
        if let Some(floor) = self.current.as_ref().and_then(|k| self.floors.get_mut(k)) {
            floor.data = self.working.clone();
        }
    }

    fn load(&mut self, key: Option<FloorKey>) {
        self.stroke.end();
        self.working = key
            .as_ref()
            .and_then(|k| self.floors.get(k))
            .map(|f| f.data.clone())
            .unwrap_or_default();
        self.current = key;
    }

    // --- queries ---------------------------------------------------------

    /// Key of the floor being edited.
    pub fn current_key(&self) -> Option<&FloorKey> {
        self.current.as_ref()
    }

    /// All floor keys in floor order.
    pub fn floor_keys(&self) -> Vec<FloorKey> {
        self.floors.keys().cloned().collect()
    }

    /// Number of floors.
    pub fn len(&self) -> usize {
        self.floors.len()
    }

    /// Whether no floor exists.
    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Whether a floor with this key exists.
    pub fn contains(&self, key: &FloorKey) -> bool {
        self.floors.contains_key(key)
    }

    /// The up-to-date maps of a floor.
    pub fn floor_data(&self, key: &FloorKey) -> Option<&FloorData> {
        if self.current.as_ref() == Some(key) {
            return Some(&self.working);
        }
        self.floors.get(key).map(|f| &f.data)
    }

    /// The working set of the current floor.
    pub fn current_data(&self) -> Option<&FloorData> {
        self.current.as_ref().map(|_| &self.working)
    }

    /// Every floor with its up-to-date maps, in floor order.
    pub fn iter(&self) -> impl Iterator<Item = (&FloorKey, &FloorData)> + '_ {
        self.floors.keys().filter_map(|k| self.floor_data(k).map(|d| (k, d)))
    }

    /// Clone of every floor with the working set merged in.
    pub fn floors_flushed(&self) -> BTreeMap<FloorKey, Floor> {
        let mut floors = self.floors.clone();
        if let Some(floor) = self.current.as_ref().and_then(|k| floors.get_mut(k)) {
            floor.data = self.working.clone();
        }
        floors
    }

    /// Cell counts of a floor, reflecting unsaved edits on the current one.
    pub fn summary(&self, key: &FloorKey) -> Option<FloorSummary> {
        self.floor_data(key).map(FloorSummary::from)
    }

    /// Paint color of a cell on the current floor.
    pub fn color_at(&self, cell: CellKey) -> Option<&ColorKey> {
        self.current_data()?.color_at(cell)
    }

    /// Labels of a cell on the current floor, empty if none.
    pub fn labels_at(&self, cell: CellKey) -> &[String] {
        self.current_data().map(|d| d.labels_at(cell)).unwrap_or(&[])
    }

    /// POI category of a cell on the current floor.
    pub fn poi_category_at(&self, cell: CellKey) -> Option<PoiCategory> {
        self.current_data()?.poi_category_at(cell)
    }

    /// Preset labels for a color on the current floor.
    pub fn preset(&self, color: &ColorKey) -> Option<&[String]> {
        self.current_data()?.presets.get(color).map(Vec::as_slice)
    }

    /// Background image of a floor.
    pub fn background(&self, key: &FloorKey) -> Option<&BackgroundImage> {
        self.floors.get(key)?.background.as_ref()
    }

    /// State of the drag stroke in progress.
    pub fn stroke(&self) -> &StrokeTracker {
        &self.stroke
    }

    // --- cell mutations --------------------------------------------------

    fn working_mut(&mut self) -> FloorResult<&mut FloorData> {
        if self.current.is_none() {
            return Err(FloorError::NoActiveFloor);
        }
        Ok(&mut self.working)
    }

    /// Paint or erase a cell on the current floor.
    pub fn paint_cell(&mut self, cell: CellKey, color: &ColorKey, mode: PaintMode) -> FloorResult<StrokeAction> {
        if self.current.is_none() {
            return Err(FloorError::NoActiveFloor);
        }
        let action = self.stroke.resolve(mode, self.working.color_at(cell), color);
        match action {
            StrokeAction::Paint => self.working.paint(cell, color, &self.registry),
            StrokeAction::Erase => {
                self.working.erase(cell);
            }
        }
        log::debug!("{:?} {} with {}", action, cell, color);
        Ok(action)
    }

    /// Finish the current drag stroke.
    pub fn end_stroke(&mut self) {
        self.stroke.end();
    }

    /// Remove paint, labels and POI category from a cell.
    /// Returns whether the cell held anything.
    pub fn erase_cell(&mut self, cell: CellKey) -> FloorResult<bool> {
        Ok(self.working_mut()?.erase(cell))
    }

    /// Replace a cell's labels. An empty list removes them.
    pub fn set_labels<I, S>(&mut self, cell: CellKey, labels: I) -> FloorResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = normalize_labels(labels, self.max_label_length);
        self.working_mut()?.set_labels(cell, labels);
        Ok(())
    }

    /// Assign a POI category. Ignored unless the cell is painted with the POI color.
    pub fn set_poi_category(&mut self, cell: CellKey, category: PoiCategory) -> FloorResult<bool> {
        let poi = self.registry.poi();
        let applied = self.working_mut()?.set_poi_category(cell, category, &poi);
        if !applied {
            log::debug!("Ignored POI category for non-POI cell {}", cell);
        }
        Ok(applied)
    }

    /// Drop a cell's POI category. Returns whether one was set.
    pub fn clear_poi_category(&mut self, cell: CellKey) -> FloorResult<bool> {
        Ok(self.working_mut()?.poi_categories.remove(&cell).is_some())
    }

    /// Set the labels applied when a cell is first painted with `color`.
    pub fn create_preset<I, S>(&mut self, color: ColorKey, labels: I) -> FloorResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = normalize_labels(labels, self.max_label_length);
        self.working_mut()?.set_preset(color, labels);
        Ok(())
    }

    /// Drop the preset for a color. Returns whether one existed.
    pub fn remove_preset(&mut self, color: &ColorKey) -> FloorResult<bool> {
        Ok(self.working_mut()?.presets.remove(color).is_some())
    }

    /// Erase all paint and POI categories on the current floor. Labels stay.
    pub fn clear_paint(&mut self) -> FloorResult<()> {
        self.working_mut()?.clear_paint();
        Ok(())
    }

    /// Erase all labels on the current floor.
    pub fn clear_labels(&mut self) -> FloorResult<()> {
        self.working_mut()?.clear_labels();
        Ok(())
    }

    /// Erase paint, labels and POI categories on the current floor.
    pub fn clear_all(&mut self) -> FloorResult<()> {
        self.working_mut()?.clear_all();
        Ok(())
    }

    /// Attach or remove a floor's background image.
    pub fn set_background(&mut self, key: &FloorKey, image: Option<BackgroundImage>) -> FloorResult<()> {
        let floor = self
            .floors
            .get_mut(key)
            .ok_or_else(|| FloorError::NotFound(key.clone()))?;
        floor.background = image;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{ELEVATOR_COLOR, STAIRS_COLOR};

    fn store_with_lobby() -> (FloorStore, FloorKey) {
        let mut store = FloorStore::default();
        let key = store.create_floor("Lobby", 0).unwrap();
        (store, key)
    }

    #[test]
    fn test_first_floor_becomes_current() {
        let (mut store, lobby) = store_with_lobby();
        assert_eq!(store.current_key(), Some(&lobby));
        store.create_floor("Mezzanine", 1).unwrap();
        assert_eq!(store.current_key(), Some(&lobby));
    }

    #[test]
    fn test_create_rejects_duplicates_and_empty_names() {
        let (mut store, lobby) = store_with_lobby();
        assert_eq!(store.create_floor("Lobby", 0), Err(FloorError::Duplicate(lobby)));
        assert_eq!(store.create_floor("   ", 3), Err(FloorError::EmptyName));
        // Same name on another number is a different floor.
        assert!(store.create_floor("Lobby", 1).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_switch_flushes_and_loads() {
        let (mut store, lobby) = store_with_lobby();
        let upper = store.create_floor("Upper", 1).unwrap();
        let walkway = store.registry().walkway();

        store.paint_cell(CellKey::new(0, 0), &walkway, PaintMode::Click).unwrap();
        store.switch_floor(&upper).unwrap();
        assert_eq!(store.color_at(CellKey::new(0, 0)), None);

        store.paint_cell(CellKey::new(5, 5), &walkway, PaintMode::Click).unwrap();
        store.switch_floor(&lobby).unwrap();
        assert_eq!(store.color_at(CellKey::new(0, 0)), Some(&walkway));
        assert_eq!(store.color_at(CellKey::new(5, 5)), None);
        assert_eq!(store.floor_data(&upper).unwrap().cells.len(), 1);
    }

    #[test]
    fn test_switch_to_missing_floor_is_noop() {
        let (mut store, lobby) = store_with_lobby();
        let missing = FloorKey::new(9, "Roof");
        assert_eq!(store.switch_floor(&missing), Err(FloorError::NotFound(missing)));
        assert_eq!(store.current_key(), Some(&lobby));
    }

    #[test]
    fn test_delete_last_floor_leaves_none() {
        let (mut store, lobby) = store_with_lobby();
        store.delete_floor(&lobby).unwrap();
        assert!(store.current_key().is_none());
        assert!(store.is_empty());
        assert_eq!(
            store.paint_cell(CellKey::new(0, 0), &ColorKey::new(STAIRS_COLOR), PaintMode::Click),
            Err(FloorError::NoActiveFloor)
        );

        let roof = store.create_floor("Roof", 5).unwrap();
        assert_eq!(store.current_key(), Some(&roof));
    }

    #[test]
    fn test_delete_current_picks_remaining_floor() {
        let (mut store, lobby) = store_with_lobby();
        let upper = store.create_floor("Upper", 1).unwrap();
        store.switch_floor(&upper).unwrap();
        store.paint_cell(CellKey::new(1, 1), &ColorKey::new("#abcdef"), PaintMode::Click).unwrap();
        store.switch_floor(&lobby).unwrap();
        store.delete_floor(&lobby).unwrap();
        assert_eq!(store.current_key(), Some(&upper));
        assert_eq!(store.color_at(CellKey::new(1, 1)), Some(&ColorKey::new("#abcdef")));
    }

    #[test]
    fn test_rename_preserves_data() {
        let (mut store, lobby) = store_with_lobby();
        let other = store.create_floor("Upper", 1).unwrap();
        store.set_labels(CellKey::new(2, 3), ["Desk"]).unwrap();
        store.create_preset(ColorKey::new(ELEVATOR_COLOR), ["ELV_001"]).unwrap();

        assert_eq!(
            store.rename_floor(&lobby, "Upper", 1),
            Err(FloorError::Duplicate(other))
        );

        let renamed = store.rename_floor(&lobby, "Ground", -1).unwrap();
        assert_eq!(store.current_key(), Some(&renamed));
        assert!(!store.contains(&lobby));
        assert_eq!(store.labels_at(CellKey::new(2, 3)), ["Desk".to_string()]);
        assert_eq!(store.preset(&ColorKey::new(ELEVATOR_COLOR)), Some(&["ELV_001".to_string()][..]));
        assert_eq!(store.floor_keys().first(), Some(&renamed));
    }

    #[test]
    fn test_rename_non_current_moves_background() {
        let (mut store, _) = store_with_lobby();
        let upper = store.create_floor("Upper", 1).unwrap();
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let image = BackgroundImage::from_bytes(&png, 10, 10).unwrap();
        store.set_background(&upper, Some(image.clone())).unwrap();

        let moved = store.rename_floor(&upper, "Upper Deck", 2).unwrap();
        assert_eq!(store.background(&moved), Some(&image));
        assert!(store.background(&upper).is_none());
    }

    #[test]
    fn test_stroke_started_on_same_color_erases_everything() {
        let (mut store, _) = store_with_lobby();
        let walkway = store.registry().walkway();
        let poi = store.registry().poi();
        store.paint_cell(CellKey::new(0, 0), &walkway, PaintMode::Click).unwrap();
        store.paint_cell(CellKey::new(0, 1), &poi, PaintMode::Click).unwrap();

        let first = store.paint_cell(CellKey::new(0, 0), &walkway, PaintMode::StrokeStart).unwrap();
        assert_eq!(first, StrokeAction::Erase);
        for col in 1..4 {
            let action = store
                .paint_cell(CellKey::new(0, col), &walkway, PaintMode::StrokeContinue)
                .unwrap();
            assert_eq!(action, StrokeAction::Erase);
        }
        store.end_stroke();
        assert!(store.current_data().unwrap().cells.is_empty());
    }

    #[test]
    fn test_stroke_does_not_toggle_revisited_cells() {
        let (mut store, _) = store_with_lobby();
        let walkway = store.registry().walkway();
        store.paint_cell(CellKey::new(0, 0), &walkway, PaintMode::StrokeStart).unwrap();
        store.paint_cell(CellKey::new(0, 1), &walkway, PaintMode::StrokeContinue).unwrap();
        store.paint_cell(CellKey::new(0, 0), &walkway, PaintMode::StrokeContinue).unwrap();
        store.end_stroke();
        assert_eq!(store.color_at(CellKey::new(0, 0)), Some(&walkway));
        assert_eq!(store.color_at(CellKey::new(0, 1)), Some(&walkway));
    }

    #[test]
    fn test_click_toggles() {
        let (mut store, _) = store_with_lobby();
        let color = ColorKey::new(STAIRS_COLOR);
        let cell = CellKey::new(3, 3);
        assert_eq!(store.paint_cell(cell, &color, PaintMode::Click), Ok(StrokeAction::Paint));
        assert_eq!(store.paint_cell(cell, &color, PaintMode::Click), Ok(StrokeAction::Erase));
        assert_eq!(store.color_at(cell), None);
    }

    #[test]
    fn test_erase_removes_labels_and_category() {
        let (mut store, _) = store_with_lobby();
        let poi = store.registry().poi();
        let cell = CellKey::new(1, 2);
        store.paint_cell(cell, &poi, PaintMode::Click).unwrap();
        store.set_labels(cell, ["Cafe"]).unwrap();
        assert!(store.set_poi_category(cell, PoiCategory::Cafe).unwrap());

        store.paint_cell(cell, &poi, PaintMode::Click).unwrap();
        assert!(store.labels_at(cell).is_empty());
        assert_eq!(store.poi_category_at(cell), None);

        let before = store.current_data().cloned();
        assert!(!store.erase_cell(cell).unwrap());
        assert_eq!(store.current_data().cloned(), before);
    }

    #[test]
    fn test_preset_is_not_retroactive() {
        let (mut store, _) = store_with_lobby();
        let elevator = ColorKey::new(ELEVATOR_COLOR);
        let old = CellKey::new(0, 0);
        store.paint_cell(old, &elevator, PaintMode::Click).unwrap();

        store.create_preset(elevator.clone(), ["ELV_001"]).unwrap();
        assert!(store.labels_at(old).is_empty());

        let fresh = CellKey::new(0, 1);
        store.paint_cell(fresh, &elevator, PaintMode::Click).unwrap();
        assert_eq!(store.labels_at(fresh), ["ELV_001".to_string()]);

        store.create_preset(elevator.clone(), ["ELV_002"]).unwrap();
        assert_eq!(store.labels_at(fresh), ["ELV_001".to_string()]);
    }

    #[test]
    fn test_set_labels_empty_deletes_entry() {
        let (mut store, _) = store_with_lobby();
        let cell = CellKey::new(0, 0);
        store.set_labels(cell, ["A", "B"]).unwrap();
        store.set_labels(cell, ["  ", ""]).unwrap();
        assert!(!store.current_data().unwrap().labels.contains_key(&cell));
    }

    #[test]
    fn test_poi_category_ignored_on_other_colors() {
        let (mut store, _) = store_with_lobby();
        let cell = CellKey::new(0, 0);
        store.paint_cell(cell, &ColorKey::new(STAIRS_COLOR), PaintMode::Click).unwrap();
        assert!(!store.set_poi_category(cell, PoiCategory::Exit).unwrap());
        assert!(store.current_data().unwrap().poi_categories.is_empty());
    }

    #[test]
    fn test_floors_flushed_includes_working_set() {
        let (mut store, lobby) = store_with_lobby();
        store.set_labels(CellKey::new(0, 0), ["x"]).unwrap();
        let floors = store.floors_flushed();
        assert_eq!(floors[&lobby].data.labels.len(), 1);
        assert_eq!(store.summary(&lobby).unwrap().labeled_cells, 1);
    }
}
