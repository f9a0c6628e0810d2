//! Rejection sampling shared by the whole-map generators, plus their stair and entity pass.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::map::Map;
use crate::types::{GeneratorKind, Pos};

use super::dice::Dice;
use super::progression::{has_down_stairs, has_up_stairs};
use super::reachability::prune_unreachable;
use super::spawns::place_entities;
use super::GenerationContext;

/// Runs `fill` on a fresh all-wall map until the spawn component clears the reachable-tile bar.
///
/// `fill` receives the zero-based attempt number so a generator can vary its own seeding per
/// attempt. Every attempt starts from scratch; nothing carries over from a rejected map.
pub(super) fn generate_until_accepted<F>(
    generator: GeneratorKind,
    context: &mut GenerationContext<'_>,
    mut fill: F,
) -> Result<Map, GenerationError>
where
    F: FnMut(&mut Map, u32, &mut Dice),
{
    let config = context.config;
    config.validate_for(generator)?;
    let required = config.acceptance.min_reachable_tiles;
    let max_attempts = config.acceptance.max_attempts;
    let mut best_reachable = 0;

    for attempt in 0..max_attempts {
        let mut map = Map::new(config.width, config.height, context.floor_index);
        fill(&mut map, attempt, &mut context.dice);

        let floor_tiles: Vec<Pos> = map.walkable_tiles().collect();
        let Some(&spawn) = context.dice.pick(&floor_tiles) else {
            debug!(generator = generator.label(), attempt, "rejected map without floor");
            continue;
        };
        map.player_pos = spawn;
        map.entry_tile = spawn;

        let reachable = prune_unreachable(&mut map, spawn);
        if reachable.len() < required {
            best_reachable = best_reachable.max(reachable.len());
            debug!(
                generator = generator.label(),
                attempt,
                reachable = reachable.len(),
                required,
                "rejected map below reachable target"
            );
            continue;
        }

        debug!(generator = generator.label(), attempt, reachable = reachable.len(), "map accepted");
        populate(&mut map, reachable, context);
        return Ok(map);
    }

    warn!(
        generator = generator.label(),
        attempts = max_attempts,
        best_reachable,
        required,
        "retry cap reached"
    );
    Err(GenerationError::AttemptsExhausted {
        generator,
        attempts: max_attempts,
        best_reachable,
        required,
    })
}

/// Up-stairs go on the spawn tile, down-stairs on a tile taken from the pool, then the
/// configured number of placement batches draw from what is left.
fn populate(map: &mut Map, reachable: BTreeSet<Pos>, context: &mut GenerationContext<'_>) {
    let floor_index = context.floor_index;
    let mut pool: Vec<Pos> = reachable.into_iter().collect();

    if has_up_stairs(floor_index) {
        map.place_up_stairs(map.player_pos);
    }
    if has_down_stairs(floor_index)
        && let Some(pos) = context.dice.take_random(&mut pool)
    {
        map.place_down_stairs(pos);
    }

    for _ in 0..context.config.placement_batches {
        if pool.is_empty() {
            break;
        }
        place_entities(map, floor_index, &mut pool, context.content, &mut context.dice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DungeonConfig;
    use crate::content::ContentPack;
    use crate::error::ConfigError;
    use crate::types::TileKind;

    fn context<'a>(config: &'a DungeonConfig, content: &'a ContentPack) -> GenerationContext<'a> {
        GenerationContext { config, content, floor_index: 3, dice: Dice::from_seed(21) }
    }

    fn small_config() -> DungeonConfig {
        let mut config = DungeonConfig::with_generator(GeneratorKind::Cave);
        config.width = 10;
        config.height = 8;
        config.acceptance.min_reachable_tiles = 20;
        config.acceptance.max_attempts = 4;
        config
    }

    #[test]
    fn later_attempt_is_accepted_after_rejections() {
        let config = small_config();
        let content = ContentPack::build_default();
        let mut context = context(&config, &content);
        let mut seen = Vec::new();

        let map = generate_until_accepted(GeneratorKind::Cave, &mut context, |map, attempt, _| {
            seen.push(attempt);
            // Only the third attempt opens enough floor.
            let rows = if attempt == 2 { 1..7 } else { 1..2 };
            for y in rows {
                for x in 1..9 {
                    map.set_tile(Pos { y, x }, TileKind::Floor);
                }
            }
        })
        .expect("third attempt clears the bar");

        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(map.up_stairs, Some(map.player_pos));
        assert!(map.down_stairs.is_some());
        assert_ne!(map.down_stairs, map.up_stairs);
    }

    #[test]
    fn exhausted_attempts_report_best_effort() {
        let config = small_config();
        let content = ContentPack::build_default();
        let mut context = context(&config, &content);

        let result = generate_until_accepted(GeneratorKind::Noise, &mut context, |map, _, _| {
            for x in 1..6 {
                map.set_tile(Pos { y: 2, x }, TileKind::Floor);
            }
        });

        assert_eq!(
            result.err(),
            Some(GenerationError::AttemptsExhausted {
                generator: GeneratorKind::Noise,
                attempts: 4,
                best_reachable: 4,
                required: 20,
            })
        );
    }

    #[test]
    fn solid_maps_are_rejected_not_panicking() {
        let config = small_config();
        let content = ContentPack::build_default();
        let mut context = context(&config, &content);
        let result = generate_until_accepted(GeneratorKind::Cave, &mut context, |_, _, _| {});
        assert!(matches!(
            result,
            Err(GenerationError::AttemptsExhausted { best_reachable: 0, .. })
        ));
    }

    #[test]
    fn zero_reachable_target_fails_before_any_attempt() {
        let mut config = small_config();
        config.acceptance.min_reachable_tiles = 0;
        let content = ContentPack::build_default();
        let mut context = context(&config, &content);
        let mut attempts = 0;

        let result = generate_until_accepted(GeneratorKind::Cave, &mut context, |map, _, _| {
            attempts += 1;
            map.set_tile(Pos { y: 2, x: 2 }, TileKind::Floor);
        });

        assert_eq!(result.err(), Some(GenerationError::Config(ConfigError::NoReachableTarget)));
        assert_eq!(attempts, 0);
    }

    #[test]
    fn smallest_accepted_map_still_gets_both_stairs() {
        let mut config = small_config();
        config.acceptance.min_reachable_tiles = 1;
        let content = ContentPack::build_default();
        let mut context = context(&config, &content);

        let map = generate_until_accepted(GeneratorKind::Cave, &mut context, |map, _, _| {
            map.set_tile(Pos { y: 2, x: 2 }, TileKind::Floor);
            map.set_tile(Pos { y: 2, x: 3 }, TileKind::Floor);
        })
        .expect("two connected tiles clear a target of one");

        let up = map.up_stairs.expect("floor 3 has up-stairs");
        let down = map.down_stairs.expect("floor 3 has down-stairs");
        assert_ne!(up, down);
    }
}
