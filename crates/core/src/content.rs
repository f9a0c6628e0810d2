use crate::error::ConfigError;
use crate::mapgen::SpawnTables;
use crate::types::Category;

pub mod keys {
    pub const BAT: &str = "bat";
    pub const SPIDER: &str = "spider";
    pub const RAT: &str = "rat";
    pub const MARIONETTE: &str = "marionette";
    pub const SKELETON: &str = "skeleton";
    pub const SERPENT: &str = "serpent";
    pub const TROLL: &str = "troll";
    pub const ORC: &str = "orc";
    pub const KNIGHT: &str = "knight";
    pub const WRAITH: &str = "wraith";
    pub const REAPER_HENCHMEN: &str = "reaper_henchmen";
    pub const GRIM_REAPER: &str = "grim_reaper";

    pub const HEALTH_POTION: &str = "health_potion";
    pub const CONFUSION_SCROLL: &str = "confusion_scroll";
    pub const FIREBALL_SCROLL: &str = "fireball_scroll";
    pub const SMITE_SCROLL: &str = "smite_scroll";
    pub const CHAIN_LIGHTNING_SCROLL: &str = "chain_lightning_scroll";
    pub const POISON_SCROLL: &str = "poison_scroll";
    pub const ARROW: &str = "arrow";

    pub const BOW: &str = "bow";
    pub const TWIN_DAGGERS: &str = "twin_daggers";
    pub const SERPENTS_FANG: &str = "serpents_fang";
    pub const CYCLOPS_CLUB: &str = "cyclops_club";
    pub const DOOMBRINGER_AXE: &str = "doombringer_axe";
    pub const SOULREAVER_SCYTHE: &str = "soulreaver_scythe";
    pub const FLAMEBRAND_SWORD: &str = "flamebrand_sword";
    pub const THOR_HAMMER: &str = "thor_hammer";
    pub const CURSED_THORNAIL: &str = "cursed_thornail";
    pub const VIPERLORD_VESTURE: &str = "viperlord_vesture";
    pub const LUNAR_WEAVER: &str = "lunar_weaver";
    pub const DRAGONSCALE_ARMOR: &str = "dragonscale_armor";
    pub const FLAMESHROUD_REGALIA: &str = "flameshroud_regalia";
    pub const STORMBREAKER_PLATE: &str = "stormbreaker_plate";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorStats {
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    pub xp_given: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EquipmentSlot {
    Weapon,
    RangedWeapon,
    Armor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemProfile {
    Consumable { stack_size: u8 },
    Equippable { slot: EquipmentSlot, power_bonus: i32, defense_bonus: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    Actor(ActorStats),
    Item(ItemProfile),
}

/// Immutable blueprint for something that can be placed on a map.
///
/// `glyph` and `color` are carried for the renderer and never interpreted here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub glyph: char,
    pub color: [u8; 3],
    pub kind: TemplateKind,
}

impl EntityTemplate {
    pub fn category(&self) -> Category {
        match self.kind {
            TemplateKind::Actor(_) => Category::Actor,
            TemplateKind::Item(_) => Category::Item,
        }
    }
}

/// Read-only template registry plus the floor-scaled spawn tables that reference it.
///
/// Built once at startup and passed by reference into generation.
pub struct ContentPack {
    pub templates: Vec<EntityTemplate>,
    pub spawn_tables: SpawnTables,
}

impl ContentPack {
    pub fn build_default() -> Self {
        Self { templates: default_templates(), spawn_tables: SpawnTables::standard() }
    }

    pub fn template(&self, key: &str) -> Option<&EntityTemplate> {
        self.templates.iter().find(|template| template.key == key)
    }

    /// Checks that every table entry names a registered template and every range is ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for key in self.spawn_tables.referenced_keys() {
            if self.template(key).is_none() {
                return Err(ConfigError::UnknownTemplate(key));
            }
        }
        self.spawn_tables.validate_ranges()
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self::build_default()
    }
}

fn actor(
    key: &'static str,
    name: &'static str,
    glyph: char,
    color: [u8; 3],
    stats: ActorStats,
) -> EntityTemplate {
    EntityTemplate { key, name, glyph, color, kind: TemplateKind::Actor(stats) }
}

fn consumable(
    key: &'static str,
    name: &'static str,
    glyph: char,
    color: [u8; 3],
    stack_size: u8,
) -> EntityTemplate {
    EntityTemplate {
        key,
        name,
        glyph,
        color,
        kind: TemplateKind::Item(ItemProfile::Consumable { stack_size }),
    }
}

fn equippable(
    key: &'static str,
    name: &'static str,
    color: [u8; 3],
    slot: EquipmentSlot,
    power_bonus: i32,
    defense_bonus: i32,
) -> EntityTemplate {
    let glyph = match slot {
        EquipmentSlot::Weapon => '/',
        EquipmentSlot::RangedWeapon => '}',
        EquipmentSlot::Armor => '[',
    };
    EntityTemplate {
        key,
        name,
        glyph,
        color,
        kind: TemplateKind::Item(ItemProfile::Equippable { slot, power_bonus, defense_bonus }),
    }
}

const fn stats(hp: i32, defense: i32, power: i32, xp_given: u32) -> ActorStats {
    ActorStats { hp, defense, power, xp_given }
}

fn default_templates() -> Vec<EntityTemplate> {
    use EquipmentSlot::{Armor, RangedWeapon, Weapon};

    vec![
        actor(keys::BAT, "Bat", 'b', [0, 0, 0], stats(10, 0, 10, 10)),
        actor(keys::SPIDER, "Black Widow Spider", 's', [128, 128, 128], stats(20, 0, 10, 10)),
        actor(keys::RAT, "Giant Rat", 'r', [139, 69, 19], stats(25, 3, 10, 50)),
        actor(keys::MARIONETTE, "Cursed Marionette", 'M', [255, 0, 0], stats(25, 2, 10, 75)),
        actor(keys::SKELETON, "Risen Skeleton", 'S', [128, 128, 128], stats(30, 3, 10, 100)),
        actor(keys::SERPENT, "Serpent", 's', [255, 0, 0], stats(35, 5, 10, 125)),
        actor(keys::TROLL, "Troll", 'T', [0, 255, 0], stats(40, 5, 11, 125)),
        actor(keys::ORC, "Giant Orc", 'O', [0, 255, 0], stats(50, 6, 12, 150)),
        actor(keys::KNIGHT, "Undead Knight", 'K', [192, 192, 192], stats(60, 8, 13, 175)),
        actor(keys::WRAITH, "Wraith", 'W', [128, 128, 128], stats(75, 6, 13, 200)),
        actor(keys::REAPER_HENCHMEN, "Reaper's Henchmen", 'r', [0, 255, 0], stats(80, 7, 13, 250)),
        actor(keys::GRIM_REAPER, "Grim Reaper", 'R', [0, 255, 0], stats(75, 8, 15, 300)),
        consumable(keys::HEALTH_POTION, "Health Potion", '!', [127, 0, 255], 5),
        consumable(keys::CONFUSION_SCROLL, "Confusion Scroll", '~', [207, 63, 255], 3),
        consumable(keys::FIREBALL_SCROLL, "Fireball Scroll", '~', [255, 0, 0], 3),
        consumable(keys::SMITE_SCROLL, "Smite Scroll", '~', [255, 255, 0], 3),
        consumable(keys::CHAIN_LIGHTNING_SCROLL, "Chain Lightning Scroll", '~', [230, 230, 0], 3),
        consumable(keys::POISON_SCROLL, "Poison Scroll", '~', [34, 139, 34], 3),
        consumable(keys::ARROW, "Arrow", '^', [255, 255, 255], 10),
        equippable(keys::BOW, "Longbow", [255, 255, 255], RangedWeapon, 1, 0),
        equippable(keys::TWIN_DAGGERS, "Twin Daggers", [255, 255, 255], Weapon, 2, 0),
        equippable(keys::SERPENTS_FANG, "Serpent's Fang", [32, 186, 109], Weapon, 4, 0),
        equippable(keys::CYCLOPS_CLUB, "Cyclops's Club", [101, 67, 33], Weapon, 5, 0),
        equippable(keys::DOOMBRINGER_AXE, "Doombringer Axe", [181, 0, 0], Weapon, 7, 0),
        equippable(keys::SOULREAVER_SCYTHE, "Soulreaver Scythe", [70, 70, 70], Weapon, 8, 0),
        equippable(keys::FLAMEBRAND_SWORD, "Flamebrand Sword", [255, 120, 0], Weapon, 10, 0),
        equippable(keys::THOR_HAMMER, "Thor Hammer", [0, 102, 255], Weapon, 12, 0),
        equippable(keys::CURSED_THORNAIL, "Cursed Thornail", [108, 31, 49], Armor, 0, 4),
        equippable(keys::VIPERLORD_VESTURE, "Viperlord Vesture", [0, 102, 255], Armor, 0, 5),
        equippable(keys::LUNAR_WEAVER, "Lunar Weaver", [150, 190, 255], Armor, 0, 6),
        equippable(keys::DRAGONSCALE_ARMOR, "Dragonscale Armor", [62, 38, 4], Armor, 0, 8),
        equippable(keys::FLAMESHROUD_REGALIA, "Flameshroud Regalia", [255, 0, 0], Armor, 0, 10),
        equippable(keys::STORMBREAKER_PLATE, "Stormbreaker Plate", [0, 204, 255], Armor, 0, 12),
    ]
}
