//! Error types surfaced by configuration validation and floor generation.

use thiserror::Error;

use crate::types::GeneratorKind;

/// Parameter combinations that can never produce a playable floor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("map of {width}x{height} is too small, need at least {min_side} tiles per side")]
    MapTooSmall { width: usize, height: usize, min_side: usize },

    #[error("map of {width}x{height} is too large, at most {max_side} tiles per side")]
    MapTooLarge { width: usize, height: usize, max_side: usize },

    #[error("room_min_size must be at least {min}, got {size}")]
    RoomTooSmall { size: usize, min: usize },

    #[error("room_min_size {min} exceeds room_max_size {max}")]
    RoomSizeInverted { min: usize, max: usize },

    #[error("room_max_size {size} does not fit a {width}x{height} map with its wall margin")]
    RoomDoesNotFit { size: usize, width: usize, height: usize },

    #[error("max_rooms must be at least 1")]
    NoRooms,

    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be at most 8 neighbours, got {value}")]
    NeighbourLimitOutOfRange { name: &'static str, value: u8 },

    #[error("max_attempts must be at least 1")]
    NoAttempts,

    #[error("min_reachable_tiles must be at least 1")]
    NoReachableTarget,

    #[error("min_reachable_tiles {required} can never fit in a map of {available} tiles")]
    ReachableTargetUnreachable { required: usize, available: usize },

    #[error("spawn table refers to unknown template `{0}`")]
    UnknownTemplate(&'static str),

    #[error("spawn range {min}..={max} is inverted")]
    RangeInverted { min: u32, max: u32 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(
        "{} generator gave up after {attempts} attempts: best map reached {best_reachable} tiles, {required} required",
        .generator.label()
    )]
    AttemptsExhausted {
        generator: GeneratorKind,
        attempts: u32,
        best_reachable: usize,
        required: usize,
    },
}
