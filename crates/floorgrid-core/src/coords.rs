//! Pixel, world and grid-cell coordinate transforms.

use crate::cell::CellKey;
use crate::config::ProjectConfig;
use crate::error::GridError;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Quotients this close to an integer are treated as that integer, so a
/// cell origin pushed through the view transform maps back to its own cell.
const CELL_SNAP_EPSILON: f64 = 1e-9;

/// Maps pointer pixels to world space (pan/zoom) and world space to cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSpace {
    /// Cell edge length in world units.
    grid_size: u32,
    /// World-space position of the grid origin.
    pub grid_offset: Vec2,
    /// Pan, in pixels.
    pub canvas_offset: Vec2,
    /// Pixels per world unit.
    zoom: f64,
    #[serde(skip, default = "default_min_zoom")]
    min_zoom: f64,
    #[serde(skip, default = "default_max_zoom")]
    max_zoom: f64,
    #[serde(skip, default = "default_max_grid_size")]
    max_grid_size: u32,
    #[serde(skip, default = "default_zoom")]
    default_zoom: f64,
}

fn default_min_zoom() -> f64 {
    crate::config::MIN_ZOOM
}

fn default_max_zoom() -> f64 {
    crate::config::MAX_ZOOM
}

fn default_max_grid_size() -> u32 {
    crate::config::MAX_GRID_SIZE
}

fn default_zoom() -> f64 {
    crate::config::DEFAULT_ZOOM
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self::from_config(&ProjectConfig::default())
    }
}

impl CoordinateSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            grid_size: config.default_grid_size.max(1),
            grid_offset: Vec2::ZERO,
            canvas_offset: Vec2::ZERO,
            zoom: config.default_zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            max_grid_size: config.max_grid_size.max(1),
            default_zoom: config.default_zoom,
        }
    }

    /// Re-apply limits from a configuration, keeping the current view.
    pub fn apply_config(&mut self, config: &ProjectConfig) {
        self.min_zoom = config.min_zoom;
        self.max_zoom = config.max_zoom;
        self.max_grid_size = config.max_grid_size.max(1);
        self.default_zoom = config.default_zoom;
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self.grid_size = self.grid_size.min(self.max_grid_size);
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the cell edge length. Non-positive sizes are rejected, sizes above
    /// the configured maximum are clamped.
    pub fn set_grid_size(&mut self, size: i64) -> Result<u32, GridError> {
        if size < 1 {
            return Err(GridError::InvalidGridSize(size));
        }
        self.grid_size = size.min(i64::from(self.max_grid_size)) as u32;
        Ok(self.grid_size)
    }

    pub fn set_grid_offset(&mut self, offset: Vec2) {
        self.grid_offset = offset;
    }

    /// World-to-pixel transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.canvas_offset) * Affine::scale(self.zoom)
    }

    /// Pixel-to-world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.canvas_offset)
    }

    pub fn pixel_to_world(&self, pixel: Point) -> Point {
        self.inverse_transform() * pixel
    }

    pub fn world_to_pixel(&self, world: Point) -> Point {
        self.transform() * world
    }

    /// The cell containing a world-space point.
    pub fn world_to_cell(&self, world: Point) -> CellKey {
        let size = f64::from(self.grid_size);
        let col = snap_floor((world.x - self.grid_offset.x) / size);
        let row = snap_floor((world.y - self.grid_offset.y) / size);
        CellKey::new(row, col)
    }

    /// The cell under a pointer position.
    pub fn pixel_to_cell(&self, px: f64, py: f64) -> CellKey {
        self.world_to_cell(self.pixel_to_world(Point::new(px, py)))
    }

    /// World-space top-left corner of a cell.
    pub fn cell_to_world_origin(&self, cell: CellKey) -> Point {
        let size = f64::from(self.grid_size);
        Point::new(
            f64::from(cell.col) * size + self.grid_offset.x,
            f64::from(cell.row) * size + self.grid_offset.y,
        )
    }

    /// Pixel position of a cell's top-left corner.
    pub fn cell_to_pixel_origin(&self, cell: CellKey) -> Point {
        self.world_to_pixel(self.cell_to_world_origin(cell))
    }

    /// World-space bounds of a cell.
    pub fn cell_rect(&self, cell: CellKey) -> Rect {
        let origin = self.cell_to_world_origin(cell);
        let size = f64::from(self.grid_size);
        Rect::from_origin_size(origin, Size::new(size, size))
    }

    /// Inclusive range of cells intersecting a viewport of the given pixel size.
    pub fn visible_cells(&self, viewport: Size) -> (CellKey, CellKey) {
        let top_left = self.pixel_to_cell(0.0, 0.0);
        let bottom_right = self.pixel_to_cell(viewport.width, viewport.height);
        (top_left, bottom_right)
    }

    /// Pan by a delta in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.canvas_offset += delta;
    }

    /// Set the zoom directly, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Zoom by `factor`, keeping the given pixel fixed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.pixel_to_world(anchor);
        self.zoom = new_zoom;

        let new_pixel = self.world_to_pixel(world_point);
        self.canvas_offset += Vec2::new(anchor.x - new_pixel.x, anchor.y - new_pixel.y);
    }

    pub fn zoom_in(&mut self, step: f64) {
        self.set_zoom(self.zoom + step);
    }

    pub fn zoom_out(&mut self, step: f64) {
        self.set_zoom(self.zoom - step);
    }

    /// Reset pan and zoom.
    pub fn reset_view(&mut self) {
        self.canvas_offset = Vec2::ZERO;
        self.zoom = self.default_zoom;
    }

    /// Reset pan, zoom and grid alignment.
    pub fn reset_grid(&mut self) {
        self.grid_offset = Vec2::ZERO;
        self.reset_view();
    }

    /// Check a deserialized space before it is installed.
    pub(crate) fn validate(&self) -> Result<(), GridError> {
        if self.grid_size < 1 {
            return Err(GridError::InvalidGridSize(i64::from(self.grid_size)));
        }
        Ok(())
    }

    pub(crate) fn zoom_is_valid(&self) -> bool {
        self.zoom.is_finite() && self.zoom > 0.0
    }
}

/// Floor of a grid-unit quotient. Cells are half-open `[k, k + 1)` except
/// that a point within `CELL_SNAP_EPSILON` grid units below `k + 1` already
/// belongs to cell `k + 1`. Out-of-range values saturate at the `i32` bounds.
fn snap_floor(value: f64) -> i32 {
    let nearest = value.round();
    if (value - nearest).abs() < CELL_SNAP_EPSILON {
        nearest as i32
    } else {
        value.floor() as i32
    }
}

/// Display size of an image fitted into `bounds`, preserving aspect ratio.
pub fn fit_to_bounds(image: Size, bounds: Size) -> Size {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Size::ZERO;
    }
    let scale = (bounds.width / image.width).min(bounds.height / image.height);
    Size::new(image.width * scale, image.height * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(grid_size: i64, grid_offset: Vec2, canvas_offset: Vec2, zoom: f64) -> CoordinateSpace {
        let mut space = CoordinateSpace::new();
        space.set_grid_size(grid_size).unwrap();
        space.grid_offset = grid_offset;
        space.canvas_offset = canvas_offset;
        space.set_zoom(zoom);
        space
    }

    #[test]
    fn test_default_space() {
        let space = CoordinateSpace::new();
        assert_eq!(space.grid_size(), 20);
        assert!((space.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(space.pixel_to_cell(0.0, 0.0), CellKey::new(0, 0));
        assert_eq!(space.pixel_to_cell(39.9, 20.0), CellKey::new(1, 1));
    }

    #[test]
    fn test_negative_cells() {
        let space = CoordinateSpace::new();
        assert_eq!(space.pixel_to_cell(-0.5, -20.0), CellKey::new(-1, -1));
        assert_eq!(space.pixel_to_cell(-20.5, 5.0), CellKey::new(0, -2));
    }

    #[test]
    fn test_pixel_to_cell_with_pan_and_zoom() {
        let space = space(10, Vec2::new(5.0, 0.0), Vec2::new(100.0, 50.0), 2.0);
        // world = ((130 - 100) / 2, (90 - 50) / 2) = (15, 20)
        assert_eq!(space.pixel_to_cell(130.0, 90.0), CellKey::new(2, 1));
    }

    #[test]
    fn test_cell_origin() {
        let space = space(25, Vec2::new(3.0, -4.0), Vec2::ZERO, 1.0);
        let origin = space.cell_to_world_origin(CellKey::new(2, -1));
        assert!((origin.x - (-22.0)).abs() < f64::EPSILON);
        assert!((origin.y - 46.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_recovers_cell() {
        let params = [
            (20, Vec2::ZERO, Vec2::ZERO, 1.0),
            (7, Vec2::new(3.3, -1.7), Vec2::new(-41.5, 12.25), 0.3),
            (13, Vec2::new(-0.1, 0.7), Vec2::new(250.0, -90.0), 2.7),
            (1, Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0), 9.9),
            (500, Vec2::new(-250.0, 125.0), Vec2::new(3.0, 7.0), 0.1),
        ];
        for (size, grid_offset, canvas_offset, zoom) in params {
            let space = space(size, grid_offset, canvas_offset, zoom);
            for row in [-1000, -17, -1, 0, 1, 3, 42, 999] {
                for col in [-523, -2, 0, 1, 8, 77, 1234] {
                    let cell = CellKey::new(row, col);
                    let pixel = space.cell_to_pixel_origin(cell);
                    assert_eq!(space.pixel_to_cell(pixel.x, pixel.y), cell);
                }
            }
        }
    }

    #[test]
    fn test_repeated_mapping_does_not_drift() {
        let space = space(9, Vec2::new(1.1, 2.2), Vec2::new(-7.3, 4.4), 1.7);
        let mut cell = CellKey::new(5, -6);
        for _ in 0..100 {
            let pixel = space.cell_to_pixel_origin(cell);
            cell = space.pixel_to_cell(pixel.x, pixel.y);
        }
        assert_eq!(cell, CellKey::new(5, -6));
    }

    #[test]
    fn test_snap_tolerance_at_cell_edge() {
        let space = space(1, Vec2::ZERO, Vec2::ZERO, 1.0);
        assert_eq!(space.pixel_to_cell(1.0 - 1e-6, 0.0), CellKey::new(0, 0));
        assert_eq!(space.pixel_to_cell(1.0 - 1e-12, 0.0), CellKey::new(0, 1));
        assert_eq!(space.pixel_to_cell(-1e-12, -1e-6), CellKey::new(-1, 0));
    }

    #[test]
    fn test_invalid_grid_size_rejected() {
        let mut space = CoordinateSpace::new();
        assert_eq!(space.set_grid_size(0), Err(GridError::InvalidGridSize(0)));
        assert_eq!(space.set_grid_size(-5), Err(GridError::InvalidGridSize(-5)));
        assert_eq!(space.grid_size(), 20);
        assert_eq!(space.set_grid_size(10_000), Ok(500));
    }

    #[test]
    fn test_zoom_clamp() {
        let mut space = CoordinateSpace::new();
        space.zoom_at(Point::ZERO, 0.001);
        assert!((space.zoom() - 0.1).abs() < f64::EPSILON);

        space.set_zoom(1.0);
        space.zoom_at(Point::ZERO, 1000.0);
        assert!((space.zoom() - 10.0).abs() < f64::EPSILON);

        space.set_zoom(f64::NAN);
        assert!((space.zoom() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let mut space = CoordinateSpace::new();
        let anchor = Point::new(200.0, 150.0);
        let before = space.pixel_to_world(anchor);
        space.zoom_at(anchor, 2.5);
        let after = space.pixel_to_world(anchor);
        assert!((before.x - after.x).abs() < 1e-10);
        assert!((before.y - after.y).abs() < 1e-10);
    }

    #[test]
    fn test_pan_only_moves_offset() {
        let mut space = CoordinateSpace::new();
        space.pan(Vec2::new(10.0, 20.0));
        assert_eq!(space.canvas_offset, Vec2::new(10.0, 20.0));
        assert!((space.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(space.pixel_to_cell(10.0, 20.0), CellKey::new(0, 0));
        assert_eq!(space.pixel_to_cell(9.0, 20.0), CellKey::new(0, -1));
    }

    #[test]
    fn test_zoom_steps_and_reset() {
        let mut space = CoordinateSpace::new();
        space.zoom_in(0.5);
        assert!((space.zoom() - 1.5).abs() < 1e-12);
        space.zoom_out(0.25);
        assert!((space.zoom() - 1.25).abs() < 1e-12);
        space.pan(Vec2::new(3.0, 4.0));
        space.grid_offset = Vec2::new(1.0, 1.0);
        space.reset_view();
        assert_eq!(space.canvas_offset, Vec2::ZERO);
        assert_eq!(space.grid_offset, Vec2::new(1.0, 1.0));
        space.reset_grid();
        assert_eq!(space.grid_offset, Vec2::ZERO);
    }

    #[test]
    fn test_visible_cells() {
        let space = space(10, Vec2::ZERO, Vec2::new(-25.0, 0.0), 1.0);
        let (first, last) = space.visible_cells(Size::new(100.0, 50.0));
        assert_eq!(first, CellKey::new(0, 2));
        assert_eq!(last, CellKey::new(5, 12));
    }

    #[test]
    fn test_fit_to_bounds() {
        let fitted = fit_to_bounds(Size::new(1600.0, 600.0), Size::new(800.0, 600.0));
        assert!((fitted.width - 800.0).abs() < 1e-9);
        assert!((fitted.height - 300.0).abs() < 1e-9);

        let upscaled = fit_to_bounds(Size::new(100.0, 100.0), Size::new(800.0, 600.0));
        assert!((upscaled.width - 600.0).abs() < 1e-9);
        assert_eq!(fit_to_bounds(Size::new(0.0, 10.0), Size::new(800.0, 600.0)), Size::ZERO);
    }
}
