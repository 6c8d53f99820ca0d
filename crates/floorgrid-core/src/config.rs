//! Tunable limits and defaults.

use serde::{Deserialize, Serialize};

/// Default cell edge length in world units.
pub const DEFAULT_GRID_SIZE: u32 = 20;
/// Smallest accepted cell edge length.
pub const MIN_GRID_SIZE: u32 = 1;
/// Largest cell edge length; bigger requests are clamped.
pub const MAX_GRID_SIZE: u32 = 500;

pub const DEFAULT_ZOOM: f64 = 1.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
/// Zoom increment used by the zoom in/out buttons.
pub const ZOOM_STEP: f64 = 0.1;

/// Labels longer than this are truncated (in characters).
pub const MAX_LABEL_LENGTH: usize = 100;

/// Default bounds a floor-plan image is fitted into.
pub const DEFAULT_IMAGE_BOUNDS: (f64, f64) = (800.0, 600.0);

/// Project-wide configuration.
///
/// Every field has a default, so a partial JSON file is enough to override
/// a single limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub default_grid_size: u32,
    pub max_grid_size: u32,
    pub default_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub max_label_length: usize,
    /// Width and height the background image is fitted into.
    pub image_bounds: (f64, f64),
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_grid_size: DEFAULT_GRID_SIZE,
            max_grid_size: MAX_GRID_SIZE,
            default_zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            max_label_length: MAX_LABEL_LENGTH,
            image_bounds: DEFAULT_IMAGE_BOUNDS,
        }
    }
}

impl ProjectConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        config.sanitize();
        Ok(config)
    }

    /// Repair values that would break the coordinate math.
    fn sanitize(&mut self) {
        self.max_grid_size = self.max_grid_size.max(MIN_GRID_SIZE);
        self.default_grid_size = self.default_grid_size.clamp(MIN_GRID_SIZE, self.max_grid_size);
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            self.min_zoom = MIN_ZOOM;
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            self.max_zoom = self.min_zoom.max(MAX_ZOOM);
        }
        if !self.default_zoom.is_finite() {
            self.default_zoom = DEFAULT_ZOOM;
        }
        self.default_zoom = self.default_zoom.clamp(self.min_zoom, self.max_zoom);
        if self.max_label_length == 0 {
            self.max_label_length = MAX_LABEL_LENGTH;
        }
    }
}
