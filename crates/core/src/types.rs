use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    UpStairs,
    DownStairs,
}

impl TileKind {
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }
}

/// Whether a placed entity is something that acts or something that is picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Actor,
    Item,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    Rooms,
    Cave,
    Noise,
}

impl GeneratorKind {
    pub fn label(self) -> &'static str {
        match self {
            GeneratorKind::Rooms => "rectangular rooms",
            GeneratorKind::Cave => "cellular automata",
            GeneratorKind::Noise => "simplex noise",
        }
    }
}

/// Inclusive `[min, max]` integer range used for counts, weights and percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: u32,
    pub max: u32,
}

impl SpawnRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}
