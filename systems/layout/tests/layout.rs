use undercroft_core::{DoorLayout, GenerationSettings, Rect, SettingsError};
use undercroft_system_layout::{generate, Partitioner, PruneStep, Pruner, RandomSource, SplitStep};

fn scenario() -> GenerationSettings {
    GenerationSettings {
        grid_width: 40,
        grid_height: 40,
        min_room_width: 6,
        min_room_height: 6,
        wall_width: 1,
        door_width: 2,
        door_height: 2,
        seed: 42,
        ..GenerationSettings::default()
    }
}

#[test]
fn generated_graph_is_connected() {
    let graph = generate(&scenario()).expect("scenario settings are valid");

    assert!(graph.len() > 1, "a 40x40 area splits at least once");
    assert!(graph.is_connected());
    for room in graph.rooms() {
        assert!(Rect::new(0, 0, 40, 40).contains_rect(&room.bounds()));
    }
}

#[test]
fn doors_lie_on_the_wall_between_their_rooms() {
    let graph = generate(&scenario()).expect("scenario settings are valid");

    for door in graph.doors() {
        let [a, b] = door.rooms();
        let a = graph.room(a).expect("door room exists").bounds();
        let b = graph.room(b).expect("door room exists").bounds();
        let wall = a.intersection(&b).expect("door rooms share a wall");
        assert!(
            wall.intersects(&door.bounds()),
            "door {:?} misses wall {:?}",
            door.bounds(),
            wall
        );
    }
}

#[test]
fn spanning_tree_layout_has_one_door_fewer_than_rooms() {
    let settings = GenerationSettings {
        door_layout: DoorLayout::SpanningTree,
        ..scenario()
    };

    let graph = generate(&settings).expect("scenario settings are valid");

    assert_eq!(graph.doors().len(), graph.len() - 1);
    assert!(graph.is_connected());
}

#[test]
fn identical_seeds_produce_identical_graphs() {
    let first = generate(&scenario()).expect("scenario settings are valid");
    let second = generate(&scenario()).expect("scenario settings are valid");

    let bounds = |graph: &undercroft_core::Graph| -> Vec<Rect> {
        graph.rooms().iter().map(|room| room.bounds()).collect()
    };
    let doors = |graph: &undercroft_core::Graph| -> Vec<(Rect, u32, u32)> {
        graph
            .doors()
            .iter()
            .map(|door| {
                let [a, b] = door.rooms();
                (door.bounds(), a.get(), b.get())
            })
            .collect()
    };

    assert_eq!(bounds(&first), bounds(&second));
    assert_eq!(doors(&first), doors(&second));
}

#[test]
fn zero_percent_pruning_keeps_every_leaf() {
    let settings = GenerationSettings {
        room_removal_percentage: 0.0,
        ..scenario()
    };
    let mut rng = RandomSource::from_seed(settings.seed);
    let mut partitioner = Partitioner::new(&settings);
    while partitioner.step(&mut rng) != SplitStep::Finished {}
    let mut floorplan = partitioner.into_floorplan();
    let leaves = floorplan.active().len();

    let mut pruner = Pruner::new(&floorplan, settings.room_removal_percentage);
    while pruner.step(&mut floorplan) != PruneStep::Finished {}

    assert_eq!(pruner.removed(), 0);
    assert_eq!(floorplan.active().len(), leaves);
}

#[test]
fn full_pruning_leaves_no_removable_room() {
    let settings = GenerationSettings {
        room_removal_percentage: 100.0,
        ..scenario()
    };
    let mut rng = RandomSource::from_seed(settings.seed);
    let mut partitioner = Partitioner::new(&settings);
    while partitioner.step(&mut rng) != SplitStep::Finished {}
    let mut floorplan = partitioner.into_floorplan();
    let connected_before = floorplan.is_connected();

    let mut pruner = Pruner::new(&floorplan, settings.room_removal_percentage);
    while pruner.step(&mut floorplan) != PruneStep::Finished {}

    let active = floorplan.active().to_vec();
    if active.len() > 1 {
        for &id in &active {
            assert!(
                !floorplan.can_remove(id, &active),
                "room {} could still be removed",
                id.get()
            );
        }
    }
    if connected_before {
        assert!(floorplan.is_connected());
    }
}

#[test]
fn infeasible_settings_are_rejected() {
    let settings = GenerationSettings {
        min_room_width: 50,
        ..scenario()
    };

    assert!(matches!(
        generate(&settings),
        Err(SettingsError::InfeasibleMinimumRoom { .. })
    ));
}
