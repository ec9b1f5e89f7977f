#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Line-of-sight fog of war computed against obstacle tiles.
//!
//! Visibility between two cells is decided in pixel space: the segment joining
//! the two cell centers is tested against the full rectangle of every obstacle
//! cell inside the pair's bounding box. The cost is proportional to the box
//! area, which is acceptable because the fog is only refreshed once per player
//! phase and only inside the camera window.

mod geometry;

use glam::Vec2;
use shamble_core::{GridCoord, TileWindow};

pub use self::geometry::{segment_intersects_bounds, PixelBounds};

/// Distance in cells beyond which nothing is visible.
pub const VISIBILITY_RANGE: f32 = 15.0;

/// Fog value of a cell that is completely dark.
pub const DARK: f32 = 1.0;

/// Per-cell fog values, `0.0` fully lit and `1.0` fully dark.
#[derive(Clone, Debug, PartialEq)]
pub struct FogMap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl FogMap {
    /// Allocates a map of the given size with every cell dark.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            values: vec![DARK; capacity],
        }
    }

    /// Number of columns covered by the map.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows covered by the map.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Fog value stored for the cell. Cells outside the map are dark.
    #[must_use]
    pub fn fog(&self, cell: GridCoord) -> f32 {
        self.index(cell)
            .and_then(|index| self.values.get(index).copied())
            .unwrap_or(DARK)
    }

    fn set(&mut self, cell: GridCoord, value: f32) -> bool {
        match self.index(cell).and_then(|index| self.values.get_mut(index)) {
            Some(slot) => {
                *slot = value.clamp(0.0, DARK);
                true
            }
            None => false,
        }
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
    }
}

/// Visibility engine parameterised by tile size and sight range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visibility {
    field_size: f32,
    range: f32,
}

impl Visibility {
    /// Creates an engine for tiles of `field_size` pixels and the given sight range in cells.
    #[must_use]
    pub const fn new(field_size: f32, range: f32) -> Self {
        Self { field_size, range }
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub const fn field_size(&self) -> f32 {
        self.field_size
    }

    /// Sight range in cells.
    #[must_use]
    pub const fn range(&self) -> f32 {
        self.range
    }

    /// Reports whether `to` can be seen from `from`.
    ///
    /// Every obstacle cell in the inclusive bounding box of the two cells
    /// vetoes visibility when its rectangle touches the center-to-center
    /// segment.
    pub fn test_visibility<F>(&self, from: GridCoord, to: GridCoord, is_obstacle: F) -> bool
    where
        F: Fn(GridCoord) -> bool,
    {
        let start = self.cell_center(from);
        let end = self.cell_center(to);

        let columns = from.column().min(to.column())..=from.column().max(to.column());
        let rows = from.row().min(to.row())..=from.row().max(to.row());

        for column in columns {
            for row in rows.clone() {
                let cell = GridCoord::new(column, row);
                if is_obstacle(cell)
                    && segment_intersects_bounds(start, end, self.cell_bounds(cell))
                {
                    return false;
                }
            }
        }

        true
    }

    /// Fog value for a visible cell at `distance` cells from the viewer.
    ///
    /// Falls off linearly to the range boundary and is fully dark beyond it.
    #[must_use]
    pub fn fog_for_distance(&self, distance: f32) -> f32 {
        if self.range <= 0.0 || distance > self.range {
            DARK
        } else {
            distance / self.range
        }
    }

    /// Recomputes the fog of every cell in `window` as seen from `viewer`.
    ///
    /// Cells outside the window keep their previous values. Returns the number
    /// of cells written.
    pub fn refresh<F>(
        &self,
        fog: &mut FogMap,
        window: TileWindow,
        viewer: GridCoord,
        is_obstacle: F,
    ) -> usize
    where
        F: Fn(GridCoord) -> bool,
    {
        let mut written = 0;
        for cell in window.iter() {
            let target = bias_toward_origin(cell, viewer);
            let value = if self.test_visibility(viewer, target, &is_obstacle) {
                self.fog_for_distance(cell.distance(viewer))
            } else {
                DARK
            };
            if fog.set(cell, value) {
                written += 1;
            }
        }
        written
    }

    /// Pixel-space center of the cell.
    #[must_use]
    pub fn cell_center(&self, cell: GridCoord) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(self.field_size / 2.0)
    }

    /// Pixel-space rectangle covered by the cell.
    #[must_use]
    pub fn cell_bounds(&self, cell: GridCoord) -> PixelBounds {
        PixelBounds::from_origin_and_size(self.cell_origin(cell), Vec2::splat(self.field_size))
    }

    fn cell_origin(&self, cell: GridCoord) -> Vec2 {
        Vec2::new(cell.column() as f32, cell.row() as f32) * self.field_size
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::new(32.0, VISIBILITY_RANGE)
    }
}

/// Moves `cell` one unit toward `origin`, rounding each axis toward the origin.
///
/// The line-of-sight test ends at this nudged cell instead of `cell` itself so
/// that the walls of the observed cell do not occlude it.
#[must_use]
pub fn bias_toward_origin(cell: GridCoord, origin: GridCoord) -> GridCoord {
    let direction = Vec2::new(
        (origin.column() - cell.column()) as f32,
        (origin.row() - cell.row()) as f32,
    )
    .normalize_or_zero();
    let column = cell.column() as f32 + direction.x;
    let row = cell.row() as f32 + direction.y;

    let column = if cell.column() > origin.column() {
        column.floor()
    } else {
        column.ceil()
    };
    let row = if cell.row() > origin.row() {
        row.floor()
    } else {
        row.ceil()
    };

    GridCoord::new(column as i32, row as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_steps_straight_neighbours_onto_the_origin() {
        let origin = GridCoord::new(5, 5);
        assert_eq!(bias_toward_origin(GridCoord::new(6, 5), origin), origin);
        assert_eq!(bias_toward_origin(GridCoord::new(5, 4), origin), origin);
        assert_eq!(bias_toward_origin(origin, origin), origin);
    }

    #[test]
    fn bias_rounds_each_axis_toward_the_origin() {
        let origin = GridCoord::new(0, 0);
        assert_eq!(
            bias_toward_origin(GridCoord::new(3, 1), origin),
            GridCoord::new(2, 0)
        );
        assert_eq!(
            bias_toward_origin(GridCoord::new(-3, -1), origin),
            GridCoord::new(-2, 0)
        );
        assert_eq!(
            bias_toward_origin(GridCoord::new(4, 0), origin),
            GridCoord::new(3, 0)
        );
    }

    #[test]
    fn fog_map_starts_dark_and_ignores_outside_writes() {
        let mut fog = FogMap::new(3, 2);
        assert!((fog.fog(GridCoord::new(2, 1)) - DARK).abs() < f32::EPSILON);
        assert!(!fog.set(GridCoord::new(3, 0), 0.0));
        assert!(fog.set(GridCoord::new(0, 0), 0.25));
        assert!((fog.fog(GridCoord::new(0, 0)) - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn fog_falls_off_linearly_then_cuts_to_dark() {
        let visibility = Visibility::default();
        assert!(visibility.fog_for_distance(0.0).abs() < f32::EPSILON);
        assert!((visibility.fog_for_distance(7.5) - 0.5).abs() < 1e-6);
        assert!((visibility.fog_for_distance(15.0) - 1.0).abs() < 1e-6);
        assert!((visibility.fog_for_distance(15.01) - DARK).abs() < f32::EPSILON);
    }

    #[test]
    fn cell_geometry_uses_field_size() {
        let visibility = Visibility::new(32.0, VISIBILITY_RANGE);
        assert_eq!(
            visibility.cell_center(GridCoord::new(2, 1)),
            Vec2::new(80.0, 48.0)
        );
        let bounds = visibility.cell_bounds(GridCoord::new(2, 1));
        assert_eq!(bounds.min(), Vec2::new(64.0, 32.0));
        assert_eq!(bounds.max(), Vec2::new(96.0, 64.0));
    }
}
