pub mod config;
pub mod content;
pub mod error;
pub mod map;
pub mod mapgen;
pub mod types;
pub mod world;

pub use config::DungeonConfig;
pub use content::{ContentPack, EntityTemplate};
pub use error::{ConfigError, GenerationError};
pub use map::{Entity, Map};
pub use mapgen::{Dice, DungeonGenerator, GenerationContext, generate_floor, generator_for};
pub use types::*;
pub use world::{FloorState, World};
