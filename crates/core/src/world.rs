//! Floor controller: owns the current map, the floor counter and the backtracking caches.

use std::collections::VecDeque;

use tracing::info;

use crate::config::DungeonConfig;
use crate::content::ContentPack;
use crate::error::{ConfigError, GenerationError};
use crate::map::Map;
use crate::mapgen::{self, STARTING_FLOOR_INDEX};

/// Floors kept per direction for backtracking. Older entries are dropped silently.
pub const BACKTRACK_CACHE_LIMIT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloorState {
    NoFloor,
    OnFloor(u32),
}

pub struct World {
    config: DungeonConfig,
    content: ContentPack,
    run_seed: u64,
    floor_index: u32,
    current: Option<Map>,
    /// Floors above the current one, most recent last.
    upward: VecDeque<Map>,
    /// Floors below the current one that were left by ascending, most recent last.
    downward: VecDeque<Map>,
}

impl World {
    /// Validates the configuration and registry up front so generation never loops on them.
    pub fn new(
        config: DungeonConfig,
        content: ContentPack,
        run_seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        content.validate()?;
        Ok(Self {
            config,
            content,
            run_seed,
            floor_index: 0,
            current: None,
            upward: VecDeque::with_capacity(BACKTRACK_CACHE_LIMIT + 1),
            downward: VecDeque::with_capacity(BACKTRACK_CACHE_LIMIT + 1),
        })
    }

    pub fn state(&self) -> FloorState {
        match self.current {
            Some(_) => FloorState::OnFloor(self.floor_index),
            None => FloorState::NoFloor,
        }
    }

    pub fn floor_index(&self) -> u32 {
        self.floor_index
    }

    pub fn run_seed(&self) -> u64 {
        self.run_seed
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn content(&self) -> &ContentPack {
        &self.content
    }

    pub fn current(&self) -> Option<&Map> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Map> {
        self.current.as_mut()
    }

    /// Number of cached floors above and below the current one.
    pub fn cached_floor_counts(&self) -> (usize, usize) {
        (self.upward.len(), self.downward.len())
    }

    /// Advances the counter and makes a freshly generated floor current. The previous map, if
    /// any, is discarded rather than cached.
    pub fn generate_floor(&mut self) -> Result<&Map, GenerationError> {
        let floor_index = self.floor_index + 1;
        let map = self.build_floor(floor_index)?;
        self.floor_index = floor_index;
        info!(
            floor_index,
            generator = self.config.generator.label(),
            entities = map.entities.len(),
            "generated floor"
        );
        Ok(&*self.current.insert(map))
    }

    /// Moves one floor down, reusing a cached deeper floor when there is one. The player lands
    /// on that floor's up-stairs.
    pub fn descend(&mut self) -> Result<&Map, GenerationError> {
        let Some(current) = self.current.take() else {
            return self.generate_floor();
        };

        let target = self.floor_index + 1;
        let next = match pop_cached(&mut self.downward, target) {
            Some(mut map) => {
                map.player_pos = map.up_stairs.unwrap_or(map.entry_tile);
                map
            }
            None => match self.build_floor(target) {
                Ok(map) => map,
                Err(error) => {
                    self.current = Some(current);
                    return Err(error);
                }
            },
        };

        push_bounded(&mut self.upward, current);
        self.floor_index = target;
        info!(floor_index = target, cached_above = self.upward.len(), "descended");
        Ok(&*self.current.insert(next))
    }

    /// Moves one floor up and lands the player on the down-stairs. A floor dropped from the
    /// upward cache is rebuilt from its own stream. Returns `None` on the first floor or before
    /// any floor exists.
    pub fn ascend(&mut self) -> Result<Option<&Map>, GenerationError> {
        if self.current.is_none() || self.floor_index <= STARTING_FLOOR_INDEX {
            return Ok(None);
        }

        let target = self.floor_index - 1;
        let mut previous = match pop_cached(&mut self.upward, target) {
            Some(map) => map,
            None => {
                info!(floor_index = target, "upper floor not cached, regenerating");
                self.build_floor(target)?
            }
        };
        previous.player_pos = previous.down_stairs.unwrap_or(previous.entry_tile);

        if let Some(current) = self.current.take() {
            push_bounded(&mut self.downward, current);
        }
        self.floor_index = target;
        info!(floor_index = target, cached_below = self.downward.len(), "ascended");
        Ok(Some(&*self.current.insert(previous)))
    }

    fn build_floor(&self, floor_index: u32) -> Result<Map, GenerationError> {
        mapgen::generate_floor(&self.config, &self.content, self.run_seed, floor_index)
    }
}

fn push_bounded(cache: &mut VecDeque<Map>, map: Map) {
    cache.push_back(map);
    while cache.len() > BACKTRACK_CACHE_LIMIT {
        cache.pop_front();
    }
}

/// Takes the most recent cached map if it is the floor being entered; anything else is stale.
fn pop_cached(cache: &mut VecDeque<Map>, floor_index: u32) -> Option<Map> {
    match cache.back() {
        Some(map) if map.floor_index == floor_index => cache.pop_back(),
        Some(_) => {
            cache.clear();
            None
        }
        None => None,
    }
}
