//! Floor-scaled monster, item and unique placement onto reachable tiles.

use tracing::trace;

use crate::content::ContentPack;
use crate::map::Map;
use crate::types::{Pos, SpawnRange};

use super::dice::Dice;
use super::tables::{ChanceEntry, FloorTable};

/// What one placement call put on the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub placed: usize,
    pub skipped: usize,
    pub uniques: usize,
}

/// Draws monster and item counts for `floor_index`, picks templates by weight and puts each one
/// on a coordinate taken from `pool`, then rolls the unique entries.
///
/// The count table yields a ceiling for the floor; the count itself is uniform in `0..=ceiling`.
///
/// A draw whose coordinate is already occupied is skipped; the coordinate stays consumed. An
/// exhausted pool ends placement quietly.
pub fn place_entities(
    map: &mut Map,
    floor_index: u32,
    pool: &mut Vec<Pos>,
    content: &ContentPack,
    dice: &mut Dice,
) -> PlacementOutcome {
    let tables = &content.spawn_tables;
    let monster_count = sample_count(&tables.monster_counts, floor_index, dice);
    let item_count = sample_count(&tables.item_counts, floor_index, dice);

    let mut chosen = choose_templates(&tables.monsters, floor_index, monster_count, dice);
    chosen.extend(choose_templates(&tables.items, floor_index, item_count, dice));

    let mut outcome = PlacementOutcome::default();
    for key in chosen {
        let Some(pos) = dice.take_random(pool) else {
            break;
        };
        let spawned = content
            .template(key)
            .and_then(|template| map.spawn(template, pos, false))
            .is_some();
        if spawned {
            outcome.placed += 1;
        } else {
            outcome.skipped += 1;
        }
    }

    outcome.uniques = place_unique_entities(map, floor_index, pool, content, dice);
    trace!(floor_index, ?outcome, remaining = pool.len(), "entity placement pass");
    outcome
}

/// Rolls every unique entry applicable to `floor_index` independently. Each success consumes one
/// pool coordinate. A template already present on the map as a unique is not rolled again.
pub fn place_unique_entities(
    map: &mut Map,
    floor_index: u32,
    pool: &mut Vec<Pos>,
    content: &ContentPack,
    dice: &mut Dice,
) -> usize {
    let Some(entries) = content.spawn_tables.uniques.lookup(floor_index) else {
        return 0;
    };

    let mut placed = 0;
    for entry in entries {
        if map.has_unique(entry.template) {
            continue;
        }
        let percent = sample(entry.range, dice);
        if !dice.chance(f64::from(percent) / 100.0) {
            continue;
        }
        let Some(pos) = dice.take_random(pool) else {
            break;
        };
        let spawned = content
            .template(entry.template)
            .and_then(|template| map.spawn(template, pos, true))
            .is_some();
        placed += usize::from(spawned);
    }
    placed
}

fn sample(range: SpawnRange, dice: &mut Dice) -> u32 {
    dice.range_inclusive(range.min, range.max)
}

fn sample_count(table: &FloorTable<SpawnRange>, floor_index: u32, dice: &mut Dice) -> u32 {
    let Some(&range) = table.lookup(floor_index) else {
        return 0;
    };
    let ceiling = sample(range, dice);
    dice.range_inclusive(0, ceiling)
}

/// Weights are drawn once here and shared by every draw of this call.
fn choose_templates(
    table: &FloorTable<Vec<ChanceEntry>>,
    floor_index: u32,
    count: u32,
    dice: &mut Dice,
) -> Vec<&'static str> {
    let Some(entries) = table.lookup(floor_index) else {
        return Vec::new();
    };
    let weights: Vec<u32> = entries.iter().map(|entry| sample(entry.range, dice)).collect();
    (0..count)
        .filter_map(|_| dice.weighted_index(&weights).map(|index| entries[index].template))
        .collect()
}
