use proptest::prelude::*;
use shamble_core::{Command, GridCoord, SpawnError, TileKind, TileMap};
use shamble_world::{self as world, query, World, FREE_FIELD_SEARCH_RADIUS};

fn spawn_enemies(world: &mut World, cells: &[GridCoord]) {
    let mut events = Vec::new();
    for &near in cells {
        world::apply(world, Command::SpawnEnemy { near }, &mut events);
    }
}

#[test]
fn free_origin_is_returned_immediately() {
    let world = World::new(TileMap::filled(4, 4, TileKind::Interior));

    assert_eq!(
        query::find_free_field(&world, GridCoord::new(1, 1)),
        Ok(GridCoord::new(1, 1))
    );
}

#[test]
fn walled_origin_resolves_to_upper_left_neighbour() {
    let mut tiles = TileMap::filled(10, 10, TileKind::Road);
    tiles.set(GridCoord::new(5, 5), TileKind::Wall);
    let world = World::new(tiles);

    assert_eq!(
        query::find_free_field(&world, GridCoord::new(5, 5)),
        Ok(GridCoord::new(4, 4))
    );
}

#[test]
fn occupied_cells_are_skipped_in_scan_order() {
    let mut world = World::new(TileMap::filled(10, 10, TileKind::Road));
    spawn_enemies(
        &mut world,
        &[
            GridCoord::new(5, 5),
            GridCoord::new(4, 4),
            GridCoord::new(4, 6),
        ],
    );

    assert_eq!(
        query::find_free_field(&world, GridCoord::new(5, 5)),
        Ok(GridCoord::new(5, 4))
    );
}

#[test]
fn search_near_map_corner_skips_out_of_bounds_cells() {
    let mut tiles = TileMap::filled(3, 3, TileKind::Road);
    tiles.set(GridCoord::new(0, 0), TileKind::Hedge);
    let world = World::new(tiles);

    assert_eq!(
        query::find_free_field(&world, GridCoord::new(0, 0)),
        Ok(GridCoord::new(0, 1))
    );
}

#[test]
fn fully_blocked_neighbourhood_reports_no_free_field() {
    let world = World::new(TileMap::filled(30, 30, TileKind::Wall));

    assert_eq!(
        query::find_free_field(&world, GridCoord::new(15, 15)),
        Err(SpawnError::NoFreeField {
            radius: FREE_FIELD_SEARCH_RADIUS
        })
    );
}

proptest! {
    #[test]
    fn out_of_bounds_cells_are_obstacles(
        column in -200i32..200,
        row in -200i32..200,
    ) {
        let world = World::new(TileMap::filled(16, 12, TileKind::Grass));
        let inside = (0..16).contains(&column) && (0..12).contains(&row);
        prop_assert_eq!(query::is_obstacle(&world, GridCoord::new(column, row)), !inside);
    }

    #[test]
    fn found_field_is_free_and_stable(
        walls in proptest::collection::vec((0i32..12, 0i32..12), 0..60),
        enemies in proptest::collection::vec((0i32..12, 0i32..12), 0..20),
        origin in (0i32..12, 0i32..12),
    ) {
        let mut tiles = TileMap::filled(12, 12, TileKind::Pavement);
        for (column, row) in walls {
            tiles.set(GridCoord::new(column, row), TileKind::Wall);
        }
        let mut world = World::new(tiles);
        let enemy_cells: Vec<GridCoord> = enemies
            .into_iter()
            .map(|(column, row)| GridCoord::new(column, row))
            .collect();
        spawn_enemies(&mut world, &enemy_cells);

        let origin = GridCoord::new(origin.0, origin.1);
        let first = query::find_free_field(&world, origin);
        let second = query::find_free_field(&world, origin);
        prop_assert_eq!(first, second);

        if let Ok(cell) = first {
            prop_assert!(!query::is_obstacle(&world, cell));
            prop_assert!(query::actor_at(&world, cell).is_none());
        }
    }
}
