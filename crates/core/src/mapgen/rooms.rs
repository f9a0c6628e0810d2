//! Rectangular rooms joined by L-shaped tunnels, populated one room at a time.

use tracing::debug;

use crate::error::GenerationError;
use crate::map::Map;
use crate::types::{GeneratorKind, Pos, TileKind};

use super::dice::Dice;
use super::grid::{bresenham_line, farthest_from};
use super::progression::{has_down_stairs, has_up_stairs};
use super::reachability::prune_unreachable;
use super::spawns::place_entities;
use super::{DungeonGenerator, GenerationContext};

/// Axis-aligned room rectangle. The outer ring is wall; only the inner area is carved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x1: x, y1: y, x2: x + width, y2: y + height }
    }

    pub fn center(&self) -> Pos {
        Pos { y: (self.y1 + self.y2) / 2, x: (self.x1 + self.x2) / 2 }
    }

    pub fn inner(&self) -> impl Iterator<Item = Pos> + use<> {
        let (x1, x2) = (self.x1, self.x2);
        ((self.y1 + 1)..self.y2).flat_map(move |y| ((x1 + 1)..x2).map(move |x| Pos { y, x }))
    }

    /// Overlap or shared edges both count.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }
}

/// A carved rooms floor together with the rooms that were accepted, in placement order.
#[derive(Clone)]
pub struct RoomLayout {
    pub map: Map,
    pub rooms: Vec<Room>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RoomCarver;

impl RoomCarver {
    pub fn carve(&self, context: &mut GenerationContext<'_>) -> Result<RoomLayout, GenerationError> {
        let config = context.config;
        config.validate_for(GeneratorKind::Rooms)?;
        let params = &config.rooms;
        let floor_index = context.floor_index;
        let mut map = Map::new(config.width, config.height, floor_index);
        let mut rooms: Vec<Room> = Vec::new();

        for attempt in 0..params.max_rooms {
            let dice = &mut context.dice;
            let room_width = dice.range_usize(params.room_min_size, params.room_max_size);
            let room_height = dice.range_usize(params.room_min_size, params.room_max_size);
            let x = dice.range_usize(0, config.width - room_width - 1);
            let y = dice.range_usize(0, config.height - room_height - 1);
            let candidate = Room::new(x as i32, y as i32, room_width as i32, room_height as i32);

            if rooms.iter().any(|room| room.intersects(&candidate)) {
                continue;
            }

            for pos in candidate.inner() {
                map.set_tile(pos, TileKind::Floor);
            }
            match rooms.last() {
                None => {
                    map.player_pos = candidate.center();
                    map.entry_tile = candidate.center();
                }
                Some(previous) => {
                    for pos in tunnel_between(previous.center(), candidate.center(), dice) {
                        map.set_tile(pos, TileKind::Floor);
                    }
                }
            }

            let spawn = map.player_pos;
            let mut pool: Vec<Pos> = prune_unreachable(&mut map, spawn).into_iter().collect();
            let outcome = place_entities(&mut map, floor_index, &mut pool, context.content, dice);
            debug!(attempt, room = rooms.len(), ?candidate, placed = outcome.placed, "room accepted");
            rooms.push(candidate);
        }

        place_room_stairs(&mut map, &rooms);
        Ok(RoomLayout { map, rooms })
    }
}

impl DungeonGenerator for RoomCarver {
    fn generate(&self, context: &mut GenerationContext<'_>) -> Result<Map, GenerationError> {
        self.carve(context).map(|layout| layout.map)
    }
}

fn place_room_stairs(map: &mut Map, rooms: &[Room]) {
    let (Some(first), Some(last)) = (rooms.first(), rooms.last()) else {
        return;
    };

    if has_down_stairs(map.floor_index) {
        let target = if rooms.len() > 1 {
            last.center()
        } else {
            let walkable: Vec<Pos> = map.walkable_tiles().collect();
            farthest_from(first.center(), &walkable)
        };
        map.place_down_stairs(target);
    }
    if has_up_stairs(map.floor_index) {
        map.place_up_stairs(first.center());
    }
}

/// Two straight legs through a corner chosen by coin flip.
pub(super) fn tunnel_between(start: Pos, end: Pos, dice: &mut Dice) -> Vec<Pos> {
    let corner = if dice.coin_flip() {
        Pos { y: start.y, x: end.x }
    } else {
        Pos { y: end.y, x: start.x }
    };
    let mut path = bresenham_line(start, corner);
    path.extend(bresenham_line(corner, end));
    path
}
