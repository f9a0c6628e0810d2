//! Process-wide generation settings: which generator runs and how it is tuned.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::GeneratorKind;

/// Smallest side length any generator can work with.
pub const MIN_MAP_SIDE: usize = 5;
/// Largest side length; tile coordinates must stay well inside `i32`.
pub const MAX_MAP_SIDE: usize = 4096;
/// Smallest room side whose inner floor still holds two distinct stair tiles.
pub const MIN_ROOM_SIZE: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub width: usize,
    pub height: usize,
    pub generator: GeneratorKind,
    pub rooms: RoomParams,
    pub cave: CaveParams,
    pub noise: NoiseParams,
    pub acceptance: AcceptanceParams,
    /// Number of entity placement passes run on an accepted cave or noise floor.
    pub placement_batches: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomParams {
    /// Upper bound on placement attempts, not on accepted rooms.
    pub max_rooms: u32,
    pub room_min_size: usize,
    pub room_max_size: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveParams {
    /// Probability that a seeded cell starts as a live (wall) cell.
    pub wall_chance: f64,
    /// A floor cell turns to wall when it has more than this many wall neighbours.
    pub birth_limit: u8,
    /// A wall cell turns to floor when it has fewer than this many wall neighbours.
    pub death_limit: u8,
    pub steps: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Samples at or above this value become floor.
    pub threshold: f64,
    /// Scale applied to tile coordinates before sampling.
    pub frequency: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceParams {
    pub min_reachable_tiles: usize,
    pub max_attempts: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 43,
            generator: GeneratorKind::Rooms,
            rooms: RoomParams::default(),
            cave: CaveParams::default(),
            noise: NoiseParams::default(),
            acceptance: AcceptanceParams::default(),
            placement_batches: 30,
        }
    }
}

impl Default for RoomParams {
    fn default() -> Self {
        Self { max_rooms: 30, room_min_size: 6, room_max_size: 10 }
    }
}

impl Default for CaveParams {
    fn default() -> Self {
        Self { wall_chance: 0.4, birth_limit: 4, death_limit: 3, steps: 5 }
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self { threshold: -0.5, frequency: 0.08 }
    }
}

impl Default for AcceptanceParams {
    fn default() -> Self {
        Self { min_reachable_tiles: 1000, max_attempts: 64 }
    }
}

impl DungeonConfig {
    pub fn with_generator(generator: GeneratorKind) -> Self {
        Self { generator, ..Self::default() }
    }

    pub fn tile_count(&self) -> usize {
        self.width * self.height
    }

    /// Rejects settings that would make generation loop forever or index out of the grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_for(self.generator)
    }

    /// Same checks as [`DungeonConfig::validate`], for whichever generator is about to run.
    pub fn validate_for(&self, generator: GeneratorKind) -> Result<(), ConfigError> {
        if self.width < MIN_MAP_SIDE || self.height < MIN_MAP_SIDE {
            return Err(ConfigError::MapTooSmall {
                width: self.width,
                height: self.height,
                min_side: MIN_MAP_SIDE,
            });
        }
        if self.width > MAX_MAP_SIDE || self.height > MAX_MAP_SIDE {
            return Err(ConfigError::MapTooLarge {
                width: self.width,
                height: self.height,
                max_side: MAX_MAP_SIDE,
            });
        }

        match generator {
            GeneratorKind::Rooms => self.rooms.validate(self.width, self.height),
            GeneratorKind::Cave => {
                self.cave.validate()?;
                self.acceptance.validate(self.tile_count())
            }
            GeneratorKind::Noise => self.acceptance.validate(self.tile_count()),
        }
    }
}

impl RoomParams {
    fn validate(&self, width: usize, height: usize) -> Result<(), ConfigError> {
        if self.max_rooms == 0 {
            return Err(ConfigError::NoRooms);
        }
        if self.room_min_size < MIN_ROOM_SIZE {
            return Err(ConfigError::RoomTooSmall {
                size: self.room_min_size,
                min: MIN_ROOM_SIZE,
            });
        }
        if self.room_min_size > self.room_max_size {
            return Err(ConfigError::RoomSizeInverted {
                min: self.room_min_size,
                max: self.room_max_size,
            });
        }
        // The bounding rectangle spans size + 1 tiles and must leave the last row/column free.
        if self.room_max_size + 1 >= width || self.room_max_size + 1 >= height {
            return Err(ConfigError::RoomDoesNotFit { size: self.room_max_size, width, height });
        }
        Ok(())
    }
}

impl CaveParams {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.wall_chance) {
            return Err(ConfigError::ProbabilityOutOfRange {
                name: "wall_chance",
                value: self.wall_chance,
            });
        }
        if self.birth_limit > 8 {
            return Err(ConfigError::NeighbourLimitOutOfRange {
                name: "birth_limit",
                value: self.birth_limit,
            });
        }
        if self.death_limit > 8 {
            return Err(ConfigError::NeighbourLimitOutOfRange {
                name: "death_limit",
                value: self.death_limit,
            });
        }
        Ok(())
    }
}

impl AcceptanceParams {
    fn validate(&self, available: usize) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        // Down-stairs are taken from the reachable tiles, so at least one is needed.
        if self.min_reachable_tiles == 0 {
            return Err(ConfigError::NoReachableTarget);
        }
        // The spawn tile itself is never counted as reachable.
        if self.min_reachable_tiles >= available {
            return Err(ConfigError::ReachableTargetUnreachable {
                required: self.min_reachable_tiles,
                available,
            });
        }
        Ok(())
    }
}
