//! Segment and rectangle primitives used by the line-of-sight test.

use glam::Vec2;

/// Closed axis-aligned rectangle in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelBounds {
    min: Vec2,
    max: Vec2,
}

impl PixelBounds {
    /// Creates bounds from the upper-left corner and size.
    #[must_use]
    pub fn from_origin_and_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Lower-right corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }
}

/// Reports whether the segment `from..=to` touches or crosses the rectangle.
///
/// Clips the segment's parameter range against each slab in turn; grazing an
/// edge or a corner counts as an intersection.
#[must_use]
pub fn segment_intersects_bounds(from: Vec2, to: Vec2, bounds: PixelBounds) -> bool {
    let delta = to - from;
    let mut enter = 0.0_f32;
    let mut exit = 1.0_f32;

    let slabs = [
        (-delta.x, from.x - bounds.min.x),
        (delta.x, bounds.max.x - from.x),
        (-delta.y, from.y - bounds.min.y),
        (delta.y, bounds.max.y - from.y),
    ];

    for (direction, distance) in slabs {
        if direction == 0.0 {
            if distance < 0.0 {
                return false;
            }
            continue;
        }

        let ratio = distance / direction;
        if direction < 0.0 {
            if ratio > exit {
                return false;
            }
            enter = enter.max(ratio);
        } else {
            if ratio < enter {
                return false;
            }
            exit = exit.min(ratio);
        }
    }

    enter <= exit
}
