//! Project state: floors, view transform and editor settings.

use crate::background::BackgroundImage;
use crate::config::ProjectConfig;
use crate::connectivity::Connectivity;
use crate::coords::CoordinateSpace;
use crate::error::{FloorError, FloorResult, ImportError};
use crate::export::{ExportScope, ExportTables, SNAPSHOT_VERSION, Snapshot, SnapshotSettings, ValidationReport};
use crate::floor::FloorKey;
use crate::palette::{ColorKey, ColorRegistry, PaintCategory};
use crate::store::FloorStore;
use crate::stroke::{PaintMode, StrokeAction};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display toggles. Stored in snapshots, never read by export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub grid_visible: bool,
    pub labels_visible: bool,
    pub background_visible: bool,
    /// Draw walkway edges on top of the grid.
    pub show_connections: bool,
    pub label_size: f64,
    pub label_color: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            grid_visible: true,
            labels_visible: true,
            background_visible: true,
            show_connections: false,
            label_size: 12.0,
            label_color: "#1f2937".to_string(),
        }
    }
}

/// Everything the editor works on.
#[derive(Debug, Clone)]
pub struct Project {
    /// Unique project identifier.
    pub id: Uuid,
    pub config: ProjectConfig,
    pub space: CoordinateSpace,
    pub store: FloorStore,
    pub view: ViewSettings,
    /// Color applied by pointer painting.
    pub paint_color: ColorKey,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    pub fn new() -> Self {
        Self::with_config(ProjectConfig::default())
    }

    pub fn with_config(config: ProjectConfig) -> Self {
        let mut store = FloorStore::new(ColorRegistry::default());
        store.set_max_label_length(config.max_label_length);
        let paint_color = store.registry().walkway();
        Self {
            id: Uuid::new_v4(),
            space: CoordinateSpace::from_config(&config),
            config,
            store,
            view: ViewSettings::default(),
            paint_color,
        }
    }

    /// Replace the configuration, re-clamping the view to the new limits.
    pub fn set_config(&mut self, config: ProjectConfig) {
        self.space.apply_config(&config);
        self.store.set_max_label_length(config.max_label_length);
        self.config = config;
    }

    pub fn set_paint_color(&mut self, color: impl Into<ColorKey>) {
        self.paint_color = color.into();
    }

    /// Select the color bound to a navigation category.
    pub fn select_category(&mut self, category: PaintCategory) -> bool {
        match self.store.registry().color_for(category) {
            Some(color) => {
                self.paint_color = color.clone();
                true
            }
            None => false,
        }
    }

    // --- pointer input ---------------------------------------------------

    /// Toggle the cell under a click.
    pub fn click(&mut self, px: f64, py: f64) -> FloorResult<StrokeAction> {
        self.paint_at(px, py, PaintMode::Click)
    }

    /// Start a drag stroke at a pixel.
    pub fn pointer_down(&mut self, px: f64, py: f64) -> FloorResult<StrokeAction> {
        self.paint_at(px, py, PaintMode::StrokeStart)
    }

    /// Continue the drag stroke over another pixel.
    pub fn pointer_drag(&mut self, px: f64, py: f64) -> FloorResult<StrokeAction> {
        self.paint_at(px, py, PaintMode::StrokeContinue)
    }

    pub fn pointer_up(&mut self) {
        self.store.end_stroke();
    }

    fn paint_at(&mut self, px: f64, py: f64, mode: PaintMode) -> FloorResult<StrokeAction> {
        let cell = self.space.pixel_to_cell(px, py);
        self.store.paint_cell(cell, &self.paint_color, mode)
    }

    // --- view ------------------------------------------------------------

    pub fn zoom_in(&mut self) {
        self.space.zoom_in(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.space.zoom_out(self.config.zoom_step);
    }

    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        self.space.zoom_at(anchor, factor);
    }

    /// Reset the grid alignment and view and clear the current floor.
    pub fn reset_grid(&mut self) {
        self.space.reset_grid();
        if let Err(FloorError::NoActiveFloor) = self.store.clear_all() {
            log::debug!("Reset grid without an active floor");
        }
    }

    // --- backgrounds -----------------------------------------------------

    /// Attach encoded image bytes to a floor. Returns `false` when the
    /// format is not recognized.
    pub fn set_background_image(&mut self, key: &FloorKey, data: &[u8], width: u32, height: u32) -> FloorResult<bool> {
        let Some(image) = BackgroundImage::from_bytes(data, width, height) else {
            log::warn!("Unrecognized background image format for floor {}", key);
            return Ok(false);
        };
        self.store.set_background(key, Some(image))?;
        Ok(true)
    }

    /// Size the floor's background is drawn at, fitted into the configured bounds.
    pub fn background_display_size(&self, key: &FloorKey) -> Option<Size> {
        let (width, height) = self.config.image_bounds;
        self.store
            .background(key)
            .map(|image| image.display_size(width, height))
    }

    // --- derived data ----------------------------------------------------

    /// Walkway adjacency of the current floor.
    pub fn connectivity(&self) -> Option<Connectivity<'_>> {
        self.connectivity_for(self.store.current_key()?)
    }

    pub fn connectivity_for(&self, key: &FloorKey) -> Option<Connectivity<'_>> {
        let data = self.store.floor_data(key)?;
        let walkway = self.store.registry().color_for(PaintCategory::Walkway)?;
        Some(Connectivity::new(&data.cells, walkway))
    }

    pub fn validation_report(&self) -> ValidationReport {
        ValidationReport::build(&self.store)
    }

    pub fn export_tables(&self, scope: ExportScope) -> ExportTables {
        ExportTables::build(&self.store, scope)
    }

    // --- snapshots -------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            id: self.id,
            settings: SnapshotSettings {
                coordinate_space: self.space.clone(),
                view: self.view.clone(),
                paint_color: self.paint_color.clone(),
            },
            current_floor: self.store.current_key().cloned(),
            floors: self.store.floors_flushed(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.snapshot().to_json()
    }

    /// Replace the project with a snapshot. Nothing changes unless the
    /// snapshot parses and validates completely.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        let snapshot = Snapshot::from_json(json, self.store.registry())?;
        self.install(snapshot);
        Ok(())
    }

    /// Load a snapshot into a fresh project.
    pub fn from_json(json: &str, config: ProjectConfig) -> Result<Self, ImportError> {
        let mut project = Self::with_config(config);
        project.import_json(json)?;
        Ok(project)
    }

    fn install(&mut self, snapshot: Snapshot) {
        let floor_count = snapshot.floors.len();
        let mut space = snapshot.settings.coordinate_space;
        space.apply_config(&self.config);

        self.id = snapshot.id;
        self.space = space;
        self.view = snapshot.settings.view;
        self.paint_color = snapshot.settings.paint_color;
        self.store = FloorStore::from_parts(
            snapshot.floors,
            snapshot.current_floor,
            self.store.registry().clone(),
            self.config.max_label_length,
        );
        log::info!("Imported project {} with {} floor(s)", self.id, floor_count);
    }
}
