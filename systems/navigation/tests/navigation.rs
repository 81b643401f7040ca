use glam::Vec2;
use undercroft_core::{Cell, CellCoord, GenerationSettings, Graph, RasterSettings, Rect, RoomId};
use undercroft_system_layout::generate;
use undercroft_system_navigation::{
    find_path, plan_waypoints, Endpoint, PathMode, PathQueryError, PathfindingMap, TileId,
};
use undercroft_system_raster::{rasterize, stamp_graph};

/// Three 5x5 rooms in a row joined by single-cell doors at (4, 2) and (8, 2).
fn corridor() -> PathfindingMap {
    let mut graph = Graph::new();
    let _ = graph.add_edge(
        Rect::new(0, 0, 5, 5),
        Rect::new(4, 0, 5, 5),
        Rect::new(4, 2, 1, 1),
    );
    let _ = graph.add_edge(
        Rect::new(4, 0, 5, 5),
        Rect::new(8, 0, 5, 5),
        Rect::new(8, 2, 1, 1),
    );
    let tilemap = stamp_graph(&graph, 13, 5, 1, None);
    PathfindingMap::build(tilemap.occupancy(), tilemap.room_index(), &graph, 1.0)
}

fn tile(map: &PathfindingMap, column: u32, row: u32) -> TileId {
    map.tile_at(CellCoord::new(column, row))
        .expect("cell inside the grid")
}

fn walkable_only(map: &PathfindingMap, path: &[Vec2]) {
    for &point in path {
        let id = map.nearest_walkable(point).expect("waypoint inside the grid");
        let tile = map.tile(id).expect("tile exists");
        assert_eq!(tile.position(), point, "waypoint {point} is a tile centre");
        assert!(tile.is_walkable(), "waypoint {point} is walkable");
    }
}

#[test]
fn hierarchical_path_passes_every_door_in_order() {
    let map = corridor();

    let path = find_path(
        &map,
        Vec2::new(1.5, 2.5),
        Vec2::new(11.5, 2.5),
        PathMode::HierarchicalAStar,
    )
    .expect("both endpoints are on the floor");

    let first_door = path.iter().position(|&p| p == Vec2::new(4.5, 2.5));
    let second_door = path.iter().position(|&p| p == Vec2::new(8.5, 2.5));
    assert!(matches!((first_door, second_door), (Some(a), Some(b)) if a < b));
    assert_eq!(path.first(), Some(&Vec2::new(1.5, 2.5)));
    assert_eq!(path.last(), Some(&Vec2::new(11.5, 2.5)));
    walkable_only(&map, &path);
}

#[test]
fn hierarchical_waypoints_are_the_door_tiles() {
    let map = corridor();
    let start = tile(&map, 1, 1);
    let end = tile(&map, 11, 3);

    assert_eq!(
        plan_waypoints(&map, start, end),
        vec![start, tile(&map, 4, 2), tile(&map, 8, 2), end]
    );
}

#[test]
fn queries_within_one_room_need_at_most_two_waypoints() {
    let map = corridor();
    let start = tile(&map, 1, 1);
    let end = tile(&map, 3, 3);

    assert_eq!(plan_waypoints(&map, start, end), vec![start, end]);
    assert_eq!(plan_waypoints(&map, start, start), vec![start]);

    let path = find_path(
        &map,
        Vec2::new(1.2, 1.7),
        Vec2::new(1.4, 1.6),
        PathMode::HierarchicalAStar,
    )
    .expect("both endpoints are on the floor");
    assert_eq!(path, vec![Vec2::new(1.5, 1.5)]);
}

#[test]
fn tile_search_reaches_the_far_room() {
    let map = corridor();

    let path = find_path(
        &map,
        Vec2::new(2.5, 2.5),
        Vec2::new(10.5, 2.5),
        PathMode::TileAStar,
    )
    .expect("both endpoints are on the floor");

    assert_eq!(path.first(), Some(&Vec2::new(2.5, 2.5)));
    assert_eq!(path.last(), Some(&Vec2::new(10.5, 2.5)));
    assert!(path.contains(&Vec2::new(4.5, 2.5)));
    assert!(path.contains(&Vec2::new(8.5, 2.5)));
    walkable_only(&map, &path);
}

#[test]
fn positions_outside_the_grid_are_unresolvable() {
    let map = corridor();

    let error = find_path(
        &map,
        Vec2::new(-3.0, 2.0),
        Vec2::new(2.5, 2.5),
        PathMode::TileAStar,
    )
    .expect_err("start lies left of the grid");
    assert_eq!(
        error,
        PathQueryError::UnresolvableEndpoint {
            endpoint: Endpoint::Start,
            position: Vec2::new(-3.0, 2.0),
        }
    );

    let error = find_path(
        &map,
        Vec2::new(2.5, 2.5),
        Vec2::new(2.5, 40.0),
        PathMode::HierarchicalAStar,
    )
    .expect_err("end lies below the grid");
    assert!(matches!(
        error,
        PathQueryError::UnresolvableEndpoint {
            endpoint: Endpoint::End,
            ..
        }
    ));
}

#[test]
fn sealed_rooms_have_no_path() {
    let mut graph = Graph::new();
    let _ = graph.add_room(Rect::new(0, 0, 5, 5));
    let _ = graph.add_room(Rect::new(4, 0, 5, 5));
    let tilemap = stamp_graph(&graph, 9, 5, 1, None);
    let map = PathfindingMap::build(tilemap.occupancy(), tilemap.room_index(), &graph, 1.0);

    for mode in [PathMode::TileAStar, PathMode::HierarchicalAStar] {
        let path = find_path(&map, Vec2::new(2.5, 2.5), Vec2::new(6.5, 2.5), mode)
            .expect("both endpoints are on the floor");
        assert!(path.is_empty(), "{mode:?}");
    }
}

#[test]
fn generated_dungeon_is_navigable() {
    let generation = GenerationSettings {
        grid_width: 40,
        grid_height: 40,
        min_room_width: 6,
        min_room_height: 6,
        wall_width: 1,
        door_width: 2,
        door_height: 2,
        seed: 42,
        ..GenerationSettings::default()
    };
    let graph = generate(&generation).expect("scenario settings are valid");
    let raster = rasterize(&graph, &generation, &RasterSettings::default());
    let map = PathfindingMap::build(
        raster.tilemap.occupancy(),
        raster.tilemap.room_index(),
        &graph,
        1.0,
    );

    for (index, tile) in map.tiles().iter().enumerate() {
        let id = TileId::new(u32::try_from(index).expect("grid fits in u32"));
        for &neighbor in tile.neighbors() {
            let back = map.tile(neighbor).expect("neighbour exists");
            assert!(back.neighbors().contains(&id), "{id:?} <-> {neighbor:?}");
        }
    }

    let last = RoomId::from_index(graph.len() - 1);
    let (far_cell, _) = raster
        .tilemap
        .occupancy()
        .iter()
        .find(|&(cell, value)| {
            *value == Cell::Floor && raster.tilemap.room_at(cell) == Some(last)
        })
        .expect("the last room has floor");
    let start = raster.spawn_point.expect("room 0 has floor");
    let end = far_cell.center(1.0);

    for mode in [PathMode::TileAStar, PathMode::HierarchicalAStar] {
        let path = find_path(&map, start, end, mode).expect("both endpoints are on the floor");
        assert_eq!(path.first(), Some(&start), "{mode:?}");
        assert_eq!(path.last(), Some(&end), "{mode:?}");
        walkable_only(&map, &path);
    }
}
