//! Simplex-noise terrain thresholded into floor and wall.

use noise::{NoiseFn, Simplex};

use crate::config::NoiseParams;
use crate::error::GenerationError;
use crate::map::Map;
use crate::types::{GeneratorKind, Pos, TileKind};

use super::acceptance::generate_until_accepted;
use super::{DungeonGenerator, GenerationContext};

/// Samples one simplex field per seed and opens every tile whose value clears the threshold.
pub fn carve_noise_field(map: &mut Map, seed: u32, params: &NoiseParams) {
    let field = Simplex::new(seed);
    for y in 0..map.height {
        for x in 0..map.width {
            let value = field.get([x as f64 * params.frequency, y as f64 * params.frequency]);
            if value >= params.threshold {
                map.set_tile(Pos { y: y as i32, x: x as i32 }, TileKind::Floor);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoiseFieldGenerator;

impl DungeonGenerator for NoiseFieldGenerator {
    fn generate(&self, context: &mut GenerationContext<'_>) -> Result<Map, GenerationError> {
        let config = context.config;
        // Drawn from the floor stream so each floor gets its own field.
        let base_seed = (context.dice.next_u64() >> 32) as u32;
        generate_until_accepted(GeneratorKind::Noise, context, |map, attempt, _| {
            carve_noise_field(map, base_seed.wrapping_add(attempt), &config.noise);
        })
    }
}
