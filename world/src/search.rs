//! Expanding-ring free-field search.

use shamble_core::{GridCoord, SpawnError};

/// Largest ring radius scanned before the search gives up.
pub const FREE_FIELD_SEARCH_RADIUS: u32 = 9;

/// Returns the first cell accepted by `is_free`, scanning outward from `origin`.
///
/// The origin is checked first. Each ring of radius `d` is then scanned in a
/// fixed order: the top and bottom rows left to right (top before bottom for
/// each column), followed by the left and right columns top to bottom with the
/// corners skipped. Ties are broken by this order rather than by distance, so
/// the same occupancy snapshot always yields the same cell.
pub(crate) fn find_free_field<F>(origin: GridCoord, is_free: F) -> Result<GridCoord, SpawnError>
where
    F: Fn(GridCoord) -> bool,
{
    if is_free(origin) {
        return Ok(origin);
    }

    (1..=FREE_FIELD_SEARCH_RADIUS as i32)
        .flat_map(|radius| ring(origin, radius))
        .find(|cell| is_free(*cell))
        .ok_or(SpawnError::NoFreeField {
            radius: FREE_FIELD_SEARCH_RADIUS,
        })
}

fn ring(origin: GridCoord, radius: i32) -> impl Iterator<Item = GridCoord> {
    let rows = (-radius..=radius).flat_map(move |dx| {
        [origin.offset(dx, -radius), origin.offset(dx, radius)]
    });
    let columns = (-radius + 1..radius).flat_map(move |dy| {
        [origin.offset(-radius, dy), origin.offset(radius, dy)]
    });
    rows.chain(columns)
}
