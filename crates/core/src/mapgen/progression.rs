//! Floor progression rules: stair bounds and the standard spawn tables.

use crate::content::keys::*;
use crate::types::SpawnRange;

use super::tables::{ChanceEntry, FloorTable, SpawnTables, chance};

pub const STARTING_FLOOR_INDEX: u32 = 1;
/// This floor and every deeper one get no down-stairs.
pub const FINAL_FLOOR_INDEX: u32 = 10;

pub fn has_up_stairs(floor_index: u32) -> bool {
    floor_index > STARTING_FLOOR_INDEX
}

pub fn has_down_stairs(floor_index: u32) -> bool {
    floor_index < FINAL_FLOOR_INDEX
}

impl SpawnTables {
    pub fn standard() -> Self {
        standard_tables()
    }
}

pub(crate) fn standard_tables() -> SpawnTables {
    SpawnTables {
        monster_counts: FloorTable::new(vec![
            (1, SpawnRange::new(2, 3)),
            (3, SpawnRange::new(3, 5)),
            (5, SpawnRange::new(4, 6)),
            (8, SpawnRange::new(5, 7)),
            (10, SpawnRange::new(7, 9)),
        ]),
        item_counts: FloorTable::new(vec![
            (1, SpawnRange::new(2, 3)),
            (5, SpawnRange::new(3, 5)),
            (8, SpawnRange::new(5, 8)),
        ]),
        monsters: FloorTable::new(monster_weights()),
        items: FloorTable::new(item_weights()),
        uniques: FloorTable::new(unique_chances()),
    }
}

fn monster_weights() -> Vec<(u32, Vec<ChanceEntry>)> {
    vec![
        (1, vec![chance(BAT, 25, 35), chance(SPIDER, 5, 15), chance(RAT, 1, 5)]),
        (3, vec![chance(BAT, 10, 25), chance(SPIDER, 25, 30), chance(RAT, 5, 10)]),
        (
            5,
            vec![
                chance(BAT, 10, 15),
                chance(SPIDER, 25, 35),
                chance(RAT, 5, 15),
                chance(MARIONETTE, 1, 5),
                chance(SKELETON, 1, 3),
            ],
        ),
        (
            7,
            vec![
                chance(BAT, 10, 50),
                chance(SPIDER, 25, 55),
                chance(RAT, 10, 35),
                chance(MARIONETTE, 5, 15),
                chance(SKELETON, 1, 10),
                chance(SERPENT, 1, 5),
                chance(TROLL, 1, 3),
            ],
        ),
        (
            9,
            vec![
                chance(BAT, 10, 50),
                chance(SPIDER, 15, 60),
                chance(RAT, 15, 45),
                chance(MARIONETTE, 5, 25),
                chance(SKELETON, 1, 15),
                chance(SERPENT, 1, 10),
                chance(TROLL, 1, 5),
                chance(ORC, 1, 3),
                chance(KNIGHT, 1, 3),
            ],
        ),
        (
            10,
            vec![
                chance(BAT, 10, 50),
                chance(SPIDER, 15, 60),
                chance(RAT, 15, 30),
                chance(MARIONETTE, 5, 35),
                chance(SKELETON, 5, 20),
                chance(SERPENT, 5, 15),
                chance(TROLL, 3, 10),
                chance(ORC, 3, 10),
                chance(KNIGHT, 3, 5),
                chance(WRAITH, 1, 5),
                chance(REAPER_HENCHMEN, 1, 3),
            ],
        ),
        (
            11,
            vec![
                chance(BAT, 25, 35),
                chance(SPIDER, 40, 60),
                chance(RAT, 30, 75),
                chance(MARIONETTE, 30, 50),
                chance(SKELETON, 20, 30),
                chance(SERPENT, 10, 25),
                chance(TROLL, 10, 20),
                chance(ORC, 5, 15),
                chance(KNIGHT, 3, 10),
                chance(WRAITH, 5, 15),
                chance(REAPER_HENCHMEN, 5, 10),
            ],
        ),
    ]
}

fn item_weights() -> Vec<(u32, Vec<ChanceEntry>)> {
    vec![
        (
            1,
            vec![
                chance(HEALTH_POTION, 25, 35),
                chance(CONFUSION_SCROLL, 15, 25),
                chance(ARROW, 5, 10),
                chance(SMITE_SCROLL, 5, 10),
                chance(POISON_SCROLL, 5, 10),
            ],
        ),
        (
            2,
            vec![
                chance(HEALTH_POTION, 25, 35),
                chance(CONFUSION_SCROLL, 15, 25),
                chance(ARROW, 5, 10),
                chance(SMITE_SCROLL, 5, 10),
                chance(POISON_SCROLL, 5, 10),
                chance(CHAIN_LIGHTNING_SCROLL, 5, 10),
            ],
        ),
        (
            3,
            vec![
                chance(HEALTH_POTION, 35, 40),
                chance(CONFUSION_SCROLL, 20, 25),
                chance(ARROW, 10, 13),
                chance(POISON_SCROLL, 10, 15),
                chance(SMITE_SCROLL, 10, 15),
                chance(CHAIN_LIGHTNING_SCROLL, 10, 15),
                chance(FIREBALL_SCROLL, 5, 10),
            ],
        ),
        (
            5,
            vec![
                chance(HEALTH_POTION, 15, 25),
                chance(CONFUSION_SCROLL, 25, 30),
                chance(ARROW, 20, 25),
                chance(POISON_SCROLL, 30, 40),
                chance(SMITE_SCROLL, 35, 45),
                chance(CHAIN_LIGHTNING_SCROLL, 15, 30),
                chance(FIREBALL_SCROLL, 10, 15),
            ],
        ),
        (
            8,
            vec![
                chance(HEALTH_POTION, 15, 30),
                chance(CONFUSION_SCROLL, 10, 30),
                chance(ARROW, 10, 35),
                chance(POISON_SCROLL, 15, 40),
                chance(SMITE_SCROLL, 15, 55),
                chance(CHAIN_LIGHTNING_SCROLL, 15, 35),
                chance(FIREBALL_SCROLL, 10, 25),
            ],
        ),
    ]
}

fn unique_chances() -> Vec<(u32, Vec<ChanceEntry>)> {
    // Later floors extend the earlier list, so each tier is built on a shared core.
    let core = |scrolls: (u32, u32), bow: (u32, u32), daggers: (u32, u32), minions: (u32, u32)| {
        vec![
            chance(FIREBALL_SCROLL, scrolls.0, scrolls.1),
            chance(CHAIN_LIGHTNING_SCROLL, scrolls.0, scrolls.1),
            chance(BOW, bow.0, bow.1),
            chance(TWIN_DAGGERS, daggers.0, daggers.1),
            chance(MARIONETTE, minions.0, minions.1),
            chance(SKELETON, minions.0, minions.1),
        ]
    };

    vec![
        (1, core((3, 5), (1, 5), (1, 5), (1, 2))),
        (
            3,
            [
                core((5, 8), (3, 5), (3, 5), (2, 3)),
                vec![
                    chance(SERPENTS_FANG, 3, 5),
                    chance(CYCLOPS_CLUB, 3, 5),
                    chance(CURSED_THORNAIL, 1, 3),
                    chance(VIPERLORD_VESTURE, 1, 3),
                ],
            ]
            .concat(),
        ),
        (
            5,
            [
                core((5, 10), (5, 10), (5, 10), (3, 5)),
                vec![
                    chance(SERPENTS_FANG, 3, 8),
                    chance(CYCLOPS_CLUB, 3, 8),
                    chance(CURSED_THORNAIL, 3, 5),
                    chance(VIPERLORD_VESTURE, 3, 5),
                    chance(DOOMBRINGER_AXE, 1, 3),
                    chance(LUNAR_WEAVER, 1, 5),
                ],
            ]
            .concat(),
        ),
        (
            8,
            [
                core((5, 15), (5, 15), (5, 10), (3, 10)),
                vec![
                    chance(SERPENTS_FANG, 5, 10),
                    chance(CYCLOPS_CLUB, 5, 10),
                    chance(CURSED_THORNAIL, 3, 8),
                    chance(VIPERLORD_VESTURE, 3, 8),
                    chance(DOOMBRINGER_AXE, 3, 5),
                    chance(LUNAR_WEAVER, 3, 5),
                    chance(SOULREAVER_SCYTHE, 1, 5),
                    chance(DRAGONSCALE_ARMOR, 5, 10),
                ],
            ]
            .concat(),
        ),
        (
            9,
            [
                core((5, 25), (5, 20), (5, 20), (3, 15)),
                vec![
                    chance(SERPENTS_FANG, 5, 10),
                    chance(CYCLOPS_CLUB, 5, 10),
                    chance(CURSED_THORNAIL, 5, 10),
                    chance(VIPERLORD_VESTURE, 5, 10),
                    chance(DOOMBRINGER_AXE, 3, 5),
                    chance(LUNAR_WEAVER, 5, 10),
                    chance(SOULREAVER_SCYTHE, 3, 5),
                    chance(DRAGONSCALE_ARMOR, 1, 10),
                    chance(REAPER_HENCHMEN, 1, 3),
                ],
            ]
            .concat(),
        ),
        (
            10,
            [
                core((5, 25), (5, 25), (5, 25), (3, 15)),
                late_game_uniques((5, 10), (3, 5), (1, 3)),
                vec![chance(REAPER_HENCHMEN, 1, 5), chance(GRIM_REAPER, 3, 8)],
            ]
            .concat(),
        ),
        (
            13,
            [
                core((5, 25), (3, 25), (5, 25), (3, 25)),
                late_game_uniques((5, 10), (5, 10), (3, 5)),
                vec![
                    chance(THOR_HAMMER, 1, 3),
                    chance(STORMBREAKER_PLATE, 1, 3),
                    chance(REAPER_HENCHMEN, 3, 10),
                    chance(GRIM_REAPER, 5, 10),
                ],
            ]
            .concat(),
        ),
        (
            15,
            [
                core((5, 25), (3, 25), (5, 25), (3, 25)),
                late_game_uniques((5, 10), (5, 10), (5, 10)),
                vec![
                    chance(THOR_HAMMER, 3, 5),
                    chance(STORMBREAKER_PLATE, 3, 5),
                    chance(REAPER_HENCHMEN, 5, 15),
                    chance(GRIM_REAPER, 5, 20),
                ],
            ]
            .concat(),
        ),
    ]
}

fn late_game_uniques(
    mid_tier: (u32, u32),
    scythe_tier: (u32, u32),
    flame_tier: (u32, u32),
) -> Vec<ChanceEntry> {
    vec![
        chance(SERPENTS_FANG, mid_tier.0, mid_tier.1),
        chance(CYCLOPS_CLUB, mid_tier.0, mid_tier.1),
        chance(CURSED_THORNAIL, mid_tier.0, mid_tier.1),
        chance(VIPERLORD_VESTURE, mid_tier.0, mid_tier.1),
        chance(DOOMBRINGER_AXE, mid_tier.0, mid_tier.1),
        chance(LUNAR_WEAVER, mid_tier.0, mid_tier.1),
        chance(SOULREAVER_SCYTHE, scythe_tier.0, scythe_tier.1),
        chance(DRAGONSCALE_ARMOR, scythe_tier.0, scythe_tier.1),
        chance(FLAMEBRAND_SWORD, flame_tier.0, flame_tier.1),
        chance(FLAMESHROUD_REGALIA, flame_tier.0, flame_tier.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stairs_follow_floor_bounds() {
        assert!(!has_up_stairs(1));
        assert!(has_up_stairs(2));
        assert!(has_down_stairs(9));
        assert!(!has_down_stairs(10));
    }

    #[test]
    fn standard_monster_table_widens_with_depth() {
        let tables = SpawnTables::standard();
        let shallow = tables.monsters.lookup(2).expect("floor 2 entries");
        let deep = tables.monsters.lookup(12).expect("floor 12 entries");
        assert_eq!(shallow.len(), 3);
        assert_eq!(deep.len(), 11);
        assert!(deep.iter().any(|entry| entry.template == WRAITH));
    }

    #[test]
    fn grim_reaper_is_only_a_late_unique() {
        let tables = SpawnTables::standard();
        let has_reaper = |floor| {
            tables
                .uniques
                .lookup(floor)
                .is_some_and(|entries| entries.iter().any(|entry| entry.template == GRIM_REAPER))
        };
        assert!(!has_reaper(9));
        assert!(has_reaper(10));
        assert!(has_reaper(14));
    }
}
