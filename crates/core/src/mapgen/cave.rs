//! Cellular-automata caves: random wall seeding smoothed by birth/death neighbour rules.

use crate::config::CaveParams;
use crate::error::GenerationError;
use crate::map::Map;
use crate::types::{GeneratorKind, Pos, TileKind};

use super::acceptance::generate_until_accepted;
use super::dice::Dice;
use super::{DungeonGenerator, GenerationContext};

/// Wall/floor cell grid under simulation. `true` marks a live (wall) cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellularAutomata {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl CellularAutomata {
    /// Each cell independently starts as wall with probability `wall_chance`.
    pub fn seeded(width: usize, height: usize, wall_chance: f64, dice: &mut Dice) -> Self {
        let cells = (0..width * height).map(|_| dice.chance(wall_chance)).collect();
        Self { width, height, cells }
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self { width, height, cells }
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    /// Moore-neighbourhood wall count. Cells past the edge count as wall.
    pub fn wall_neighbors(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for dy in -1_i64..=1 {
            for dx in -1_i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                let off_grid =
                    nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64;
                if off_grid || self.is_wall(nx as usize, ny as usize) {
                    count += 1;
                }
            }
        }
        count
    }

    /// One synchronous step; every cell reads the previous generation only.
    pub fn step(&self, birth_limit: u8, death_limit: u8) -> Self {
        let mut next = Vec::with_capacity(self.cells.len());
        for y in 0..self.height {
            for x in 0..self.width {
                let walls = self.wall_neighbors(x, y);
                let wall = if self.is_wall(x, y) { walls >= death_limit } else { walls > birth_limit };
                next.push(wall);
            }
        }
        Self { width: self.width, height: self.height, cells: next }
    }

    pub fn run(mut self, params: &CaveParams) -> Self {
        for _ in 0..params.steps {
            self = self.step(params.birth_limit, params.death_limit);
        }
        self
    }

    /// Writes floor for every dead cell; live cells keep the map's wall.
    pub fn carve_into(&self, map: &mut Map) {
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.is_wall(x, y) {
                    map.set_tile(Pos { y: y as i32, x: x as i32 }, TileKind::Floor);
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CaveGenerator;

impl DungeonGenerator for CaveGenerator {
    fn generate(&self, context: &mut GenerationContext<'_>) -> Result<Map, GenerationError> {
        let config = context.config;
        let params = &config.cave;
        generate_until_accepted(GeneratorKind::Cave, context, |map, _, dice| {
            CellularAutomata::seeded(map.width, map.height, params.wall_chance, dice)
                .run(params)
                .carve_into(map);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> CellularAutomata {
        let cells = rows.iter().flat_map(|row| row.chars().map(|cell| cell == '#')).collect();
        CellularAutomata::from_cells(rows[0].len(), rows.len(), cells)
    }

    #[test]
    fn off_grid_neighbours_count_as_wall() {
        let automata = grid(&[
            "...", //
            "...", //
            "...",
        ]);
        assert_eq!(automata.wall_neighbors(0, 0), 5);
        assert_eq!(automata.wall_neighbors(1, 0), 3);
        assert_eq!(automata.wall_neighbors(1, 1), 0);
    }

    #[test]
    fn isolated_wall_dies_and_crowded_floor_is_born() {
        let automata = grid(&[
            ".....", //
            ".#...", //
            ".....", //
            "...##", //
            "..#.#",
        ]);
        let next = automata.step(4, 3);

        assert!(!next.is_wall(1, 1), "lone wall has no wall neighbours");
        assert!(next.is_wall(3, 4), "floor at the edge is surrounded by walls");
        assert!(!next.is_wall(2, 2), "open floor stays floor");
    }

    #[test]
    fn step_reads_only_the_previous_generation() {
        // (2,2) is born this step; (3,2) must still see it as floor.
        let automata = grid(&[
            "......", //
            ".##...", //
            "......", //
            ".#..#.", //
            "......",
        ]);
        let next = automata.step(2, 0);
        assert!(next.is_wall(2, 2));
        assert!(!next.is_wall(3, 2));
    }

    #[test]
    fn zero_death_eight_birth_keeps_seed_unchanged() {
        let mut dice = Dice::from_seed(4);
        let automata = CellularAutomata::seeded(16, 12, 0.5, &mut dice);
        assert_eq!(automata.step(8, 0), automata);
    }

    #[test]
    fn seeding_follows_wall_chance_extremes() {
        let mut dice = Dice::from_seed(1);
        let solid = CellularAutomata::seeded(6, 6, 1.0, &mut dice);
        let open = CellularAutomata::seeded(6, 6, 0.0, &mut dice);
        assert!(solid.cells.iter().all(|&wall| wall));
        assert!(open.cells.iter().all(|&wall| !wall));
    }
}
