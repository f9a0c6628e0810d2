//! Flood fill from the spawn tile and pruning of disconnected floor pockets.

use std::collections::BTreeSet;

use crate::map::Map;
use crate::types::{Pos, TileKind};

use super::grid::cardinal_neighbors;

/// Walks every walkable tile connected to `start` through 4-directional steps and rewrites
/// each unreached `Floor` tile to `Wall`.
///
/// The returned set excludes `start`; callers that need it add it back themselves. A start
/// tile that is not walkable yields an empty set and prunes every floor tile.
pub fn prune_unreachable(map: &mut Map, start: Pos) -> BTreeSet<Pos> {
    let mut visited = BTreeSet::new();
    if map.is_walkable(start) {
        let mut stack = vec![start];
        visited.insert(start);
        while let Some(current) = stack.pop() {
            for neighbor in cardinal_neighbors(current) {
                if map.is_walkable(neighbor) && visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }
    }

    for y in 0..map.height {
        for x in 0..map.width {
            let pos = Pos { y: y as i32, x: x as i32 };
            if map.tile_at(pos) == TileKind::Floor && !visited.contains(&pos) {
                map.set_tile(pos, TileKind::Wall);
            }
        }
    }

    visited.remove(&start);
    visited
}
