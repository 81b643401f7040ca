use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use undercroft_core::{DoorLayout, Settings};
use undercroft_world::{generate_dungeon, Dungeon};

fn settings(door_layout: DoorLayout) -> Settings {
    let mut settings = Settings::default();
    settings.generation.grid_width = 48;
    settings.generation.grid_height = 36;
    settings.generation.seed = 0x5eed_cafe;
    settings.generation.door_layout = door_layout;
    settings.raster.batch_size = 17;
    settings
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    rooms: Vec<(i32, i32, i32, i32)>,
    doors: Vec<(i32, i32, u32, u32)>,
    cells: Vec<i32>,
    links: Vec<Vec<u32>>,
}

impl ReplayOutcome {
    fn capture(dungeon: &Dungeon) -> Self {
        let graph = dungeon.graph();
        Self {
            rooms: graph
                .rooms()
                .iter()
                .map(|room| {
                    let bounds = room.bounds();
                    (bounds.x(), bounds.y(), bounds.width(), bounds.height())
                })
                .collect(),
            doors: graph
                .doors()
                .iter()
                .map(|door| {
                    let [a, b] = door.rooms();
                    (door.bounds().x(), door.bounds().y(), a.get(), b.get())
                })
                .collect(),
            cells: dungeon
                .tilemap()
                .occupancy()
                .cells()
                .iter()
                .map(|cell| cell.value())
                .collect(),
            links: dungeon
                .pathfinding_map()
                .tiles()
                .iter()
                .map(|tile| tile.neighbors().iter().map(|id| id.get()).collect())
                .collect(),
        }
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.rooms.hash(&mut hasher);
        self.doors.hash(&mut hasher);
        self.cells.hash(&mut hasher);
        self.links.hash(&mut hasher);
        hasher.finish()
    }
}

fn replay(door_layout: DoorLayout) -> ReplayOutcome {
    let dungeon = generate_dungeon(settings(door_layout)).expect("valid settings");
    ReplayOutcome::capture(&dungeon)
}

#[test]
fn identical_settings_replay_identically() {
    for layout in [DoorLayout::AllDoors, DoorLayout::SpanningTree] {
        let first = replay(layout);
        let second = replay(layout);

        assert_eq!(first, second, "{layout:?} replay diverged");
        assert_eq!(first.fingerprint(), second.fingerprint());
    }
}

#[test]
fn different_seeds_produce_different_dungeons() {
    let first = replay(DoorLayout::AllDoors);
    let mut other = settings(DoorLayout::AllDoors);
    other.generation.seed += 1;
    let second = ReplayOutcome::capture(&generate_dungeon(other).expect("valid settings"));

    assert_ne!(first.fingerprint(), second.fingerprint());
}
