//! Floor-threshold lookup tables for spawn counts, weights and unique chances.

use crate::error::ConfigError;
use crate::types::SpawnRange;

/// Values keyed by the first floor they apply to.
///
/// A query for floor `F` resolves to the entry with the largest threshold `<= F`.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorTable<T> {
    thresholds: Vec<(u32, T)>,
}

impl<T> FloorTable<T> {
    pub fn new(mut thresholds: Vec<(u32, T)>) -> Self {
        thresholds.sort_by_key(|(floor, _)| *floor);
        thresholds.dedup_by_key(|(floor, _)| *floor);
        Self { thresholds }
    }

    pub fn lookup(&self, floor: u32) -> Option<&T> {
        let applicable = self.thresholds.partition_point(|(threshold, _)| *threshold <= floor);
        applicable.checked_sub(1).map(|index| &self.thresholds[index].1)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.thresholds.iter().map(|(_, value)| value)
    }
}

/// One template with the range its weight (or percentage chance) is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChanceEntry {
    pub template: &'static str,
    pub range: SpawnRange,
}

pub const fn chance(template: &'static str, min: u32, max: u32) -> ChanceEntry {
    ChanceEntry { template, range: SpawnRange::new(min, max) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTables {
    pub monster_counts: FloorTable<SpawnRange>,
    pub item_counts: FloorTable<SpawnRange>,
    pub monsters: FloorTable<Vec<ChanceEntry>>,
    pub items: FloorTable<Vec<ChanceEntry>>,
    /// Percentage chances, rolled independently per entry.
    pub uniques: FloorTable<Vec<ChanceEntry>>,
}

impl SpawnTables {
    pub fn referenced_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        [&self.monsters, &self.items, &self.uniques]
            .into_iter()
            .flat_map(FloorTable::values)
            .flatten()
            .map(|entry| entry.template)
    }

    pub fn validate_ranges(&self) -> Result<(), ConfigError> {
        let counts = self.monster_counts.values().chain(self.item_counts.values());
        let chances = [&self.monsters, &self.items, &self.uniques]
            .into_iter()
            .flat_map(FloorTable::values)
            .flatten()
            .map(|entry| &entry.range);
        for range in counts.chain(chances) {
            if range.min > range.max {
                return Err(ConfigError::RangeInverted { min: range.min, max: range.max });
            }
        }
        Ok(())
    }
}
