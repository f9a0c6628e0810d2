use std::collections::{BTreeSet, VecDeque};

use deepfall_core::mapgen::{FINAL_FLOOR_INDEX, STARTING_FLOOR_INDEX};
use deepfall_core::{ContentPack, DungeonConfig, GeneratorKind, Map, Pos, TileKind, generate_floor};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

const GENERATORS: [GeneratorKind; 3] =
    [GeneratorKind::Rooms, GeneratorKind::Cave, GeneratorKind::Noise];

fn walkable_set(map: &Map) -> BTreeSet<Pos> {
    map.walkable_tiles().collect()
}

fn flood_from(map: &Map, start: Pos) -> BTreeSet<Pos> {
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        for next in [
            Pos { y: pos.y - 1, x: pos.x },
            Pos { y: pos.y + 1, x: pos.x },
            Pos { y: pos.y, x: pos.x - 1 },
            Pos { y: pos.y, x: pos.x + 1 },
        ] {
            if map.is_walkable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn check_map(map: &Map, floor_index: u32) -> Result<(), TestCaseError> {
    let walkable = walkable_set(map);
    let reached = flood_from(map, map.entry_tile);
    if reached != walkable {
        return Err(TestCaseError::fail(format!(
            "floor {floor_index}: {} walkable tiles but only {} reachable from spawn",
            walkable.len(),
            reached.len()
        )));
    }

    let up_tiles = map.tiles.iter().filter(|&&tile| tile == TileKind::UpStairs).count();
    let down_tiles = map.tiles.iter().filter(|&&tile| tile == TileKind::DownStairs).count();
    if map.up_stairs.is_some() != (floor_index > STARTING_FLOOR_INDEX) || up_tiles > 1 {
        return Err(TestCaseError::fail(format!("floor {floor_index}: bad up-stairs")));
    }
    if map.down_stairs.is_some() != (floor_index < FINAL_FLOOR_INDEX) || down_tiles > 1 {
        return Err(TestCaseError::fail(format!("floor {floor_index}: bad down-stairs")));
    }

    let mut occupied = BTreeSet::new();
    for entity in map.entities.values() {
        if !occupied.insert(entity.pos) || entity.pos == map.player_pos {
            return Err(TestCaseError::fail(format!(
                "floor {floor_index}: two occupants at {:?}",
                entity.pos
            )));
        }
        if !map.is_walkable(entity.pos) {
            return Err(TestCaseError::fail(format!(
                "floor {floor_index}: {} placed inside a wall",
                entity.template
            )));
        }
    }
    Ok(())
}

#[test]
fn every_generator_yields_closed_reachable_floors() {
    let content = ContentPack::build_default();
    let mut runner = TestRunner::new(ProptestConfig { cases: 24, ..ProptestConfig::default() });

    runner
        .run(&(any::<u64>(), 1_u32..=12, 0_usize..GENERATORS.len()), |(seed, floor, kind)| {
            let config = DungeonConfig::with_generator(GENERATORS[kind]);
            let map = generate_floor(&config, &content, seed, floor)
                .map_err(|error| TestCaseError::fail(error.to_string()))?;
            check_map(&map, floor)
        })
        .expect("generated floors must satisfy reachability, stair and occupancy rules");
}

#[test]
fn small_room_maps_stay_closed_across_floor_range() {
    let content = ContentPack::build_default();
    let mut config = DungeonConfig::with_generator(GeneratorKind::Rooms);
    config.width = 40;
    config.height = 30;
    config.rooms.max_rooms = 8;
    config.rooms.room_min_size = 4;
    config.rooms.room_max_size = 6;

    for floor in 1..=11 {
        let map = generate_floor(&config, &content, 4_242, floor).expect("rooms floor");
        if let Err(error) = check_map(&map, floor) {
            panic!("{error}");
        }
    }
}
