//! Procedural floor generation split into coherent submodules.

pub mod progression;

mod acceptance;
mod cave;
mod dice;
mod grid;
mod noise_field;
mod reachability;
mod rooms;
mod spawns;
mod tables;

use crate::config::DungeonConfig;
use crate::content::ContentPack;
use crate::error::GenerationError;
use crate::map::Map;
use crate::types::GeneratorKind;

pub use cave::{CaveGenerator, CellularAutomata};
pub use dice::{Dice, derive_floor_seed};
pub use grid::bresenham_line;
pub use noise_field::{NoiseFieldGenerator, carve_noise_field};
pub use progression::{FINAL_FLOOR_INDEX, STARTING_FLOOR_INDEX};
pub use reachability::prune_unreachable;
pub use rooms::{Room, RoomCarver, RoomLayout};
pub use spawns::{PlacementOutcome, place_entities, place_unique_entities};
pub use tables::{ChanceEntry, FloorTable, SpawnTables, chance};

/// Everything one generation call may read, plus the floor's own random stream.
pub struct GenerationContext<'a> {
    pub config: &'a DungeonConfig,
    pub content: &'a ContentPack,
    pub floor_index: u32,
    pub dice: Dice,
}

impl<'a> GenerationContext<'a> {
    pub fn for_floor(
        config: &'a DungeonConfig,
        content: &'a ContentPack,
        run_seed: u64,
        floor_index: u32,
    ) -> Self {
        Self { config, content, floor_index, dice: Dice::for_floor(run_seed, floor_index) }
    }
}

/// A floor layout strategy. The produced map has every floor tile reachable from
/// `Map::player_pos`, stairs placed for its floor index, and entities populated.
pub trait DungeonGenerator {
    fn generate(&self, context: &mut GenerationContext<'_>) -> Result<Map, GenerationError>;
}

pub fn generator_for(kind: GeneratorKind) -> &'static dyn DungeonGenerator {
    match kind {
        GeneratorKind::Rooms => &RoomCarver,
        GeneratorKind::Cave => &CaveGenerator,
        GeneratorKind::Noise => &NoiseFieldGenerator,
    }
}

/// Generates floor `floor_index` of the run with the configured generator.
pub fn generate_floor(
    config: &DungeonConfig,
    content: &ContentPack,
    run_seed: u64,
    floor_index: u32,
) -> Result<Map, GenerationError> {
    let mut context = GenerationContext::for_floor(config, content, run_seed, floor_index);
    generator_for(config.generator).generate(&mut context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn generate_floor_matches_direct_generator_output() {
        let config = DungeonConfig::default();
        let content = ContentPack::build_default();
        let seed = 123_u64;

        let from_helper = generate_floor(&config, &content, seed, 2).expect("rooms floor");
        let mut context = GenerationContext::for_floor(&config, &content, seed, 2);
        let from_generator = RoomCarver.generate(&mut context).expect("rooms floor");

        assert_eq!(from_helper.fingerprint(), from_generator.fingerprint());
    }

    #[test]
    fn generator_kind_selects_matching_strategy() {
        let content = ContentPack::build_default();
        for kind in [GeneratorKind::Rooms, GeneratorKind::Cave, GeneratorKind::Noise] {
            let config = DungeonConfig::with_generator(kind);
            let map = generate_floor(&config, &content, 9, 1).expect("default config generates");
            assert_eq!(map.floor_index, 1);
            assert!(map.is_walkable(map.player_pos));
        }
    }

    #[test]
    fn oversized_rooms_surface_a_config_error() {
        let mut config = DungeonConfig::default();
        config.width = 20;
        config.rooms.room_max_size = 30;
        let content = ContentPack::build_default();

        assert_eq!(
            generate_floor(&config, &content, 1, 1).err(),
            Some(GenerationError::Config(ConfigError::RoomDoesNotFit {
                size: 30,
                width: 20,
                height: 43,
            }))
        );
    }

    #[test]
    fn direct_generator_calls_validate_too() {
        let mut config = DungeonConfig::with_generator(GeneratorKind::Cave);
        config.cave.wall_chance = 1.5;
        let content = ContentPack::build_default();
        let mut context = GenerationContext::for_floor(&config, &content, 4, 1);

        let result = CaveGenerator.generate(&mut context);
        assert!(matches!(
            result,
            Err(GenerationError::Config(ConfigError::ProbabilityOutOfRange {
                name: "wall_chance",
                ..
            }))
        ));
    }
}
