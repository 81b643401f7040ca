use std::collections::{HashSet, VecDeque};

use undercroft_core::{Cell, Phase, RoomId, Settings};
use undercroft_system_navigation::PathMode;
use undercroft_system_raster::{AssetKind, AssetSpawner, Placement};
use undercroft_world::{query, GenerationError, Generator, Status};

fn scenario() -> Settings {
    let mut settings = Settings::default();
    settings.generation.grid_width = 40;
    settings.generation.grid_height = 40;
    settings.generation.min_room_width = 6;
    settings.generation.min_room_height = 6;
    settings.generation.wall_width = 1;
    settings.generation.seed = 42;
    settings
}

#[derive(Default)]
struct Counter {
    floors: usize,
    walls: usize,
}

impl AssetSpawner for Counter {
    type Handle = AssetKind;

    fn spawn(&mut self, placement: &Placement) -> AssetKind {
        match placement.kind {
            AssetKind::Floor => self.floors += 1,
            AssetKind::Wall(_) => self.walls += 1,
        }
        placement.kind
    }
}

#[test]
fn scenario_reaches_ready_with_every_room_reachable() {
    let mut generator = Generator::new(scenario()).expect("scenario settings are valid");
    let dungeon = generator.run_to_completion().expect("run completes");
    let graph = dungeon.graph();

    let mut discovered = HashSet::from([RoomId::new(0)]);
    let mut queue = VecDeque::from([RoomId::new(0)]);
    while let Some(room) = queue.pop_front() {
        for neighbor in graph.neighbors(room) {
            if discovered.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    assert!(graph.len() > 1);
    assert_eq!(discovered.len(), graph.len());
    assert_eq!(query::phase(&generator), Phase::Ready);
}

#[test]
fn spawner_sees_every_floor_and_wall_placement() {
    let mut generator =
        Generator::with_spawner(scenario(), Counter::default()).expect("scenario settings are valid");
    let floor_cells = generator
        .run_to_completion()
        .expect("run completes")
        .tilemap()
        .floor_count();

    let counter = query::spawner(&generator);
    assert_eq!(counter.floors, floor_cells, "the dungeon is one connected floor");
    assert!(counter.walls > 0);
    assert_eq!(
        query::handles(&generator).len(),
        counter.floors + counter.walls
    );
    assert_eq!(query::handles(&generator)[0], AssetKind::Floor);
}

#[test]
fn cancellation_discards_the_run() {
    let mut generator =
        Generator::with_spawner(scenario(), Counter::default()).expect("scenario settings are valid");
    while query::phase(&generator) != Phase::WallClassifying {
        let _ = generator.advance();
    }
    assert!(!query::handles(&generator).is_empty());

    generator.cancel();

    assert_eq!(query::phase(&generator), Phase::Aborted);
    assert!(query::handles(&generator).is_empty());
    assert!(query::dungeon(&generator).is_none());
    assert_eq!(generator.advance(), Status::Aborted);
    assert_eq!(
        generator.run_to_completion().err(),
        Some(GenerationError::Aborted)
    );
}

#[test]
fn cancelled_run_restarts_from_idle() {
    let mut generator = Generator::new(scenario()).expect("scenario settings are valid");
    for _ in 0..5 {
        let _ = generator.advance();
    }
    generator.cancel();

    generator.reset();

    assert_eq!(query::phase(&generator), Phase::Idle);
    assert!(generator.run_to_completion().is_ok());
}

#[test]
fn pruning_extremes_keep_the_dungeon_connected() {
    let mut untouched = scenario();
    untouched.generation.room_removal_percentage = 0.0;
    let mut pruned = scenario();
    pruned.generation.room_removal_percentage = 100.0;

    let full = undercroft_world::generate_dungeon(untouched).expect("valid settings");
    let sparse = undercroft_world::generate_dungeon(pruned).expect("valid settings");

    assert!(sparse.graph().len() <= full.graph().len());
    assert!(full.graph().is_connected());
    assert!(sparse.graph().is_connected());
}

#[test]
fn dungeon_answers_path_queries() {
    let dungeon = undercroft_world::generate_dungeon(scenario()).expect("valid settings");
    let start = dungeon.spawn_point().expect("room 0 has floor");
    let (far, _) = dungeon
        .tilemap()
        .occupancy()
        .iter()
        .filter(|&(_, value)| *value == Cell::Floor)
        .last()
        .expect("the dungeon has floor");
    let end = far.center(1.0);

    for mode in [PathMode::TileAStar, PathMode::HierarchicalAStar] {
        let path = dungeon.find_path(start, end, mode).expect("endpoints resolve");
        assert_eq!(path.first(), Some(&start), "{mode:?}");
        assert_eq!(path.last(), Some(&end), "{mode:?}");
    }
}
