//! Floor map state: tile grid, fog-of-war grids, stairs and placed entities.

use slotmap::SlotMap;
use xxhash_rust::xxh3::xxh3_64;

use crate::content::{EntityTemplate, TemplateKind};
use crate::types::{Category, EntityId, Pos, TileKind};

/// Live instance of a template, bound to exactly one map.
#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub template: &'static str,
    pub category: Category,
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub unique: bool,
}

impl Entity {
    pub fn is_alive(&self) -> bool {
        self.category == Category::Actor && self.hp > 0
    }

    pub fn blocks_movement(&self) -> bool {
        self.is_alive()
    }
}

#[derive(Clone)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    pub floor_index: u32,
    pub tiles: Vec<TileKind>,
    pub visible: Vec<bool>,
    pub explored: Vec<bool>,
    /// Tile the player spawned on when the map was generated.
    pub entry_tile: Pos,
    pub player_pos: Pos,
    pub up_stairs: Option<Pos>,
    pub down_stairs: Option<Pos>,
    pub entities: SlotMap<EntityId, Entity>,
}

impl Map {
    /// Creates a solid-wall map; generators carve floor into it.
    pub fn new(width: usize, height: usize, floor_index: u32) -> Self {
        Self {
            width,
            height,
            floor_index,
            tiles: vec![TileKind::Wall; width * height],
            visible: vec![false; width * height],
            explored: vec![false; width * height],
            entry_tile: Pos { y: 0, x: 0 },
            player_pos: Pos { y: 0, x: 0 },
            up_stairs: None,
            down_stairs: None,
            entities: SlotMap::with_key(),
        }
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_walkable()
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn set_visible(&mut self, pos: Pos, visible: bool) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.visible[idx] = visible;
        if visible {
            self.explored[idx] = true;
        }
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.visible[self.index(pos)]
    }

    pub fn is_explored(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.explored[self.index(pos)]
    }

    pub fn place_down_stairs(&mut self, pos: Pos) {
        self.set_tile(pos, TileKind::DownStairs);
        self.down_stairs = Some(pos);
    }

    pub fn place_up_stairs(&mut self, pos: Pos) {
        self.set_tile(pos, TileKind::UpStairs);
        self.up_stairs = Some(pos);
    }

    /// True when the player or any placed entity stands on `pos`.
    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.player_pos == pos || self.entity_at(pos).is_some()
    }

    /// Instantiates `template` at `pos`; returns `None` when the tile is already taken.
    pub fn spawn(&mut self, template: &EntityTemplate, pos: Pos, unique: bool) -> Option<EntityId> {
        if self.is_occupied(pos) {
            return None;
        }
        let hp = match template.kind {
            TemplateKind::Actor(stats) => stats.hp,
            TemplateKind::Item(_) => 0,
        };
        let entity = Entity {
            id: EntityId::default(),
            template: template.key,
            category: template.category(),
            pos,
            hp,
            max_hp: hp,
            unique,
        };
        let id = self.entities.insert(entity);
        self.entities[id].id = id;
        Some(id)
    }

    pub fn entity_at(&self, pos: Pos) -> Option<&Entity> {
        self.entities.values().find(|entity| entity.pos == pos)
    }

    pub fn blocking_entity_at(&self, pos: Pos) -> Option<&Entity> {
        self.entities.values().find(|entity| entity.blocks_movement() && entity.pos == pos)
    }

    pub fn actor_at(&self, pos: Pos) -> Option<&Entity> {
        self.actors().find(|entity| entity.pos == pos)
    }

    /// Living actors only.
    pub fn actors(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|entity| entity.is_alive())
    }

    pub fn items(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|entity| entity.category == Category::Item)
    }

    pub fn has_unique(&self, template: &str) -> bool {
        self.entities.values().any(|entity| entity.unique && entity.template == template)
    }

    pub fn walkable_tiles(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| {
                let pos = Pos { y: y as i32, x: x as i32 };
                self.is_walkable(pos).then_some(pos)
            })
        })
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.floor_index.to_le_bytes());
        for tile in &self.tiles {
            bytes.push(match tile {
                TileKind::Wall => 0,
                TileKind::Floor => 1,
                TileKind::UpStairs => 2,
                TileKind::DownStairs => 3,
            });
        }
        bytes.extend(self.entry_tile.y.to_le_bytes());
        bytes.extend(self.entry_tile.x.to_le_bytes());
        for stairs in [self.up_stairs, self.down_stairs] {
            match stairs {
                Some(pos) => {
                    bytes.push(1);
                    bytes.extend(pos.y.to_le_bytes());
                    bytes.extend(pos.x.to_le_bytes());
                }
                None => bytes.push(0),
            }
        }

        let mut placed: Vec<(Pos, &'static str)> =
            self.entities.values().map(|entity| (entity.pos, entity.template)).collect();
        placed.sort();
        bytes.extend((placed.len() as u32).to_le_bytes());
        for (pos, template) in placed {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
            bytes.extend(template.as_bytes());
            bytes.push(0);
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentPack, keys};

    fn open_map() -> Map {
        let mut map = Map::new(6, 5, 1);
        for y in 1..4 {
            for x in 1..5 {
                map.set_tile(Pos { y, x }, TileKind::Floor);
            }
        }
        map.player_pos = Pos { y: 1, x: 1 };
        map
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let map = open_map();
        assert_eq!(map.tile_at(Pos { y: -1, x: 2 }), TileKind::Wall);
        assert_eq!(map.tile_at(Pos { y: 2, x: 6 }), TileKind::Wall);
        assert!(!map.in_bounds(Pos { y: 5, x: 0 }));
    }

    #[test]
    fn spawn_refuses_occupied_tiles() {
        let content = ContentPack::default();
        let bat = content.template(keys::BAT).expect("bat template");
        let potion = content.template(keys::HEALTH_POTION).expect("potion template");
        let mut map = open_map();

        assert!(map.spawn(bat, Pos { y: 1, x: 1 }, false).is_none(), "player tile is taken");
        assert!(map.spawn(bat, Pos { y: 2, x: 2 }, false).is_some());
        assert!(map.spawn(potion, Pos { y: 2, x: 2 }, false).is_none());
        assert_eq!(map.entities.len(), 1);
    }

    #[test]
    fn actors_and_items_are_split_by_category() {
        let content = ContentPack::default();
        let mut map = open_map();
        let bat = content.template(keys::BAT).expect("bat template");
        let arrow = content.template(keys::ARROW).expect("arrow template");
        map.spawn(bat, Pos { y: 2, x: 2 }, false);
        map.spawn(arrow, Pos { y: 3, x: 3 }, false);

        assert_eq!(map.actors().count(), 1);
        assert_eq!(map.items().count(), 1);
        assert!(map.blocking_entity_at(Pos { y: 2, x: 2 }).is_some());
        assert!(map.blocking_entity_at(Pos { y: 3, x: 3 }).is_none());
        assert_eq!(map.actor_at(Pos { y: 2, x: 2 }).map(|actor| actor.template), Some(keys::BAT));
    }

    #[test]
    fn becoming_visible_marks_tile_explored() {
        let mut map = open_map();
        let pos = Pos { y: 2, x: 3 };
        map.set_visible(pos, true);
        map.set_visible(pos, false);
        assert!(!map.is_visible(pos));
        assert!(map.is_explored(pos));
    }

    #[test]
    fn fingerprint_tracks_stairs_and_entities() {
        let content = ContentPack::default();
        let mut map = open_map();
        let baseline = map.fingerprint();

        map.place_down_stairs(Pos { y: 3, x: 4 });
        let with_stairs = map.fingerprint();
        assert_ne!(baseline, with_stairs);

        let rat = content.template(keys::RAT).expect("rat template");
        map.spawn(rat, Pos { y: 2, x: 4 }, false);
        assert_ne!(with_stairs, map.fingerprint());
    }
}
