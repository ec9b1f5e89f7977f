//! Dense occupancy grid mirroring actor positions.

use shamble_core::{ActorId, GridCoord};

/// Row-major record of which actor stands on each cell.
#[derive(Clone, Debug)]
pub(crate) struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<ActorId>>,
}

impl OccupancyGrid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    /// Actor standing on the cell, if any. Out-of-bounds cells are never occupied.
    pub(crate) fn occupant(&self, cell: GridCoord) -> Option<ActorId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    pub(crate) fn occupy(&mut self, actor: ActorId, cell: GridCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(actor);
            }
        }
    }

    pub(crate) fn vacate(&mut self, cell: GridCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    pub(crate) fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shamble_core::EnemyId;

    #[test]
    fn occupy_and_vacate_track_single_cell() {
        let mut grid = OccupancyGrid::new(3, 3);
        let cell = GridCoord::new(1, 2);
        let enemy = ActorId::Enemy(EnemyId::new(4));

        grid.occupy(enemy, cell);
        assert_eq!(grid.occupant(cell), Some(enemy));
        assert_eq!(grid.occupied_count(), 1);

        grid.vacate(cell);
        assert_eq!(grid.occupant(cell), None);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn out_of_bounds_cells_are_ignored() {
        let mut grid = OccupancyGrid::new(2, 2);
        grid.occupy(ActorId::Player, GridCoord::new(-1, 0));
        grid.occupy(ActorId::Player, GridCoord::new(2, 0));

        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.occupant(GridCoord::new(-1, 0)), None);
    }
}
