//! Pixel-space camera that follows the player.

use glam::Vec2;
use shamble_core::{GridCoord, TileWindow};

/// Axis-aligned view rectangle in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    origin: Vec2,
    size: Vec2,
}

impl Camera {
    /// Creates a camera of the given size anchored at the world origin.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::ZERO,
            size: Vec2::new(width.max(0.0), height.max(0.0)),
        }
    }

    /// Upper-left corner in world pixels.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height in pixels.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Centers the camera on `target` while keeping it inside `world_size`.
    ///
    /// Each axis is clamped below at zero first and above at
    /// `world_size - size` second, then floored to whole pixels. A world
    /// smaller than the camera therefore ends up with a negative origin.
    pub fn focus(&mut self, target: Vec2, world_size: Vec2) {
        let centered = target - self.size / 2.0;
        self.origin = centered.max(Vec2::ZERO).min(world_size - self.size).floor();
    }

    /// Changes the camera size, keeping the current origin.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width.max(0.0), height.max(0.0));
    }

    /// Converts a world position into a position relative to the camera.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.origin
    }

    /// Cells touched by the camera on a `columns` x `rows` map of `field_size` pixel fields.
    #[must_use]
    pub fn tile_window(&self, field_size: f32, columns: u32, rows: u32) -> TileWindow {
        let columns = i32::try_from(columns).unwrap_or(i32::MAX);
        let rows = i32::try_from(rows).unwrap_or(i32::MAX);

        let first = (self.origin / field_size).floor();
        let last = ((self.origin + self.size) / field_size).floor();

        let start = GridCoord::new((first.x as i32).max(0), (first.y as i32).max(0));
        let end = GridCoord::new(
            (last.x as i32).saturating_add(1).min(columns),
            (last.y as i32).saturating_add(1).min(rows),
        );
        TileWindow::new(start, end)
    }
}

/// World position of the upper-left corner of `cell`.
#[must_use]
pub fn grid_to_world(cell: GridCoord, field_size: f32) -> Vec2 {
    Vec2::new(cell.column() as f32, cell.row() as f32) * field_size
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::splat(64.0 * 32.0);

    #[test]
    fn focus_centers_on_target_away_from_edges() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.focus(grid_to_world(GridCoord::new(50, 50), 32.0), WORLD);
        assert_eq!(camera.origin(), Vec2::new(1200.0, 1300.0));
    }

    #[test]
    fn focus_clamps_to_both_edges() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.focus(Vec2::new(10.0, 10.0), WORLD);
        assert_eq!(camera.origin(), Vec2::ZERO);

        camera.focus(grid_to_world(GridCoord::new(63, 63), 32.0), WORLD);
        assert_eq!(camera.origin(), Vec2::new(1248.0, 1448.0));
    }

    #[test]
    fn focus_floors_to_whole_pixels() {
        let mut camera = Camera::new(801.0, 601.0);
        camera.focus(Vec2::new(1000.0, 1000.0), WORLD);
        assert_eq!(camera.origin(), Vec2::new(599.0, 699.0));
    }

    #[test]
    fn small_world_yields_negative_origin() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.focus(Vec2::new(32.0, 32.0), Vec2::splat(320.0));
        assert_eq!(camera.origin(), Vec2::new(-480.0, -280.0));
        let window = camera.tile_window(32.0, 10, 10);
        assert_eq!(window.start(), GridCoord::new(0, 0));
        assert_eq!(window.end(), GridCoord::new(10, 10));
    }

    #[test]
    fn tile_window_spans_visible_cells() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.focus(grid_to_world(GridCoord::new(50, 50), 32.0), WORLD);
        let window = camera.tile_window(32.0, 64, 64);
        assert_eq!(window.start(), GridCoord::new(37, 40));
        assert_eq!(window.end(), GridCoord::new(63, 60));
    }

    #[test]
    fn tile_window_stops_at_map_edge() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.focus(WORLD, WORLD);
        let window = camera.tile_window(32.0, 64, 64);
        assert_eq!(window.start(), GridCoord::new(39, 45));
        assert_eq!(window.end(), GridCoord::new(64, 64));
    }

    #[test]
    fn resize_keeps_origin_and_converts_positions() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.focus(Vec2::new(1000.0, 1000.0), WORLD);
        camera.resize(1024.0, 768.0);
        assert_eq!(camera.size(), Vec2::new(1024.0, 768.0));
        assert_eq!(camera.origin(), Vec2::new(600.0, 700.0));
        assert_eq!(
            camera.world_to_screen(Vec2::new(640.0, 704.0)),
            Vec2::new(40.0, 4.0)
        );
    }
}
