//! Shared plumbing for the developer binaries: config loading, logging and floor reports.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use clap::{Args, ValueEnum};
use deepfall_core::mapgen::{FINAL_FLOOR_INDEX, STARTING_FLOOR_INDEX, prune_unreachable};
use deepfall_core::{Category, ContentPack, DungeonConfig, GeneratorKind, Map, Pos, TileKind};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, defaulting to warnings.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GeneratorArg {
    Rooms,
    Cave,
    Noise,
}

impl From<GeneratorArg> for GeneratorKind {
    fn from(value: GeneratorArg) -> Self {
        match value {
            GeneratorArg::Rooms => GeneratorKind::Rooms,
            GeneratorArg::Cave => GeneratorKind::Cave,
            GeneratorArg::Noise => GeneratorKind::Noise,
        }
    }
}

/// Config file plus per-field overrides shared by every binary.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// TOML file with generation settings; missing keys keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured generator
    #[arg(short, long, value_enum)]
    pub generator: Option<GeneratorArg>,
    #[arg(long)]
    pub width: Option<usize>,
    #[arg(long)]
    pub height: Option<usize>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<DungeonConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => DungeonConfig::default(),
        };
        if let Some(generator) = self.generator {
            config.generator = generator.into();
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config.validate().context("invalid generation config")?;
        Ok(config)
    }
}

pub fn load_config(path: &Path) -> Result<DungeonConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config file {}", path.display()))
}

#[derive(Debug, Serialize)]
pub struct PlacedEntity {
    pub template: &'static str,
    pub pos: Pos,
    pub unique: bool,
}

#[derive(Debug, Serialize)]
pub struct FloorReport {
    pub seed: u64,
    pub floor_index: u32,
    pub generator: GeneratorKind,
    pub width: usize,
    pub height: usize,
    pub fingerprint: String,
    pub walkable_tiles: usize,
    pub player: Pos,
    pub up_stairs: Option<Pos>,
    pub down_stairs: Option<Pos>,
    pub actors: Vec<PlacedEntity>,
    pub items: Vec<PlacedEntity>,
}

impl FloorReport {
    pub fn new(map: &Map, seed: u64, generator: GeneratorKind) -> Self {
        let placed = |category: Category| {
            let mut entities: Vec<PlacedEntity> = map
                .entities
                .values()
                .filter(|entity| entity.category == category)
                .map(|entity| PlacedEntity {
                    template: entity.template,
                    pos: entity.pos,
                    unique: entity.unique,
                })
                .collect();
            entities.sort_by_key(|entity| (entity.pos, entity.template));
            entities
        };

        Self {
            seed,
            floor_index: map.floor_index,
            generator,
            width: map.width,
            height: map.height,
            fingerprint: format!("{:016x}", map.fingerprint()),
            walkable_tiles: map.walkable_tiles().count(),
            player: map.player_pos,
            up_stairs: map.up_stairs,
            down_stairs: map.down_stairs,
            actors: placed(Category::Actor),
            items: placed(Category::Item),
        }
    }
}

/// ASCII view: `@` player, template glyphs for entities, `<`/`>` stairs.
pub fn render_ascii(map: &Map, content: &ContentPack) -> String {
    let mut out = String::with_capacity((map.width + 1) * map.height);
    for y in 0..map.height as i32 {
        for x in 0..map.width as i32 {
            let pos = Pos { y, x };
            let glyph = if pos == map.player_pos {
                '@'
            } else if let Some(entity) = map.entity_at(pos) {
                content.template(entity.template).map_or('?', |template| template.glyph)
            } else {
                match map.tile_at(pos) {
                    TileKind::Wall => '#',
                    TileKind::Floor => '.',
                    TileKind::UpStairs => '<',
                    TileKind::DownStairs => '>',
                }
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// Checks one freshly entered floor: full reachability from the entry tile, stair bounds for
/// its index and one occupant per tile.
pub fn audit_floor(map: &Map) -> Result<()> {
    let floor = map.floor_index;
    let walkable: BTreeSet<Pos> = map.walkable_tiles().collect();
    let mut probe = map.clone();
    let reachable = prune_unreachable(&mut probe, map.entry_tile);
    ensure!(
        reachable.len() + 1 == walkable.len(),
        "floor {floor}: {} of {} walkable tiles reachable from spawn",
        reachable.len() + 1,
        walkable.len()
    );

    ensure!(
        map.up_stairs.is_some() == (floor > STARTING_FLOOR_INDEX),
        "floor {floor}: up-stairs {:?} out of bounds",
        map.up_stairs
    );
    ensure!(
        map.down_stairs.is_some() == (floor < FINAL_FLOOR_INDEX),
        "floor {floor}: down-stairs {:?} out of bounds",
        map.down_stairs
    );
    for stairs in [map.up_stairs, map.down_stairs].into_iter().flatten() {
        ensure!(walkable.contains(&stairs), "floor {floor}: stairs at {stairs:?} are walled in");
    }

    let mut occupied = BTreeSet::new();
    for entity in map.entities.values() {
        ensure!(
            occupied.insert(entity.pos),
            "floor {floor}: two entities share {:?}",
            entity.pos
        );
        ensure!(
            walkable.contains(&entity.pos),
            "floor {floor}: {} stands in a wall at {:?}",
            entity.template,
            entity.pos
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use deepfall_core::content::keys;
    use deepfall_core::generate_floor;
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn small_room_floors_always_pass_audit(seed in any::<u64>(), floor in 1_u32..14) {
            let mut config = DungeonConfig::default();
            config.width = 36;
            config.height = 24;
            config.rooms.room_min_size = 4;
            config.rooms.room_max_size = 7;
            let content = ContentPack::build_default();
            let map = generate_floor(&config, &content, seed, floor).expect("rooms floor");
            prop_assert!(audit_floor(&map).is_ok());
        }
    }

    #[test]
    fn config_file_is_merged_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "width = 60\n\n[rooms]\nmax_rooms = 12").expect("write config");

        let args = ConfigArgs {
            config: Some(file.path().to_path_buf()),
            generator: Some(GeneratorArg::Rooms),
            width: None,
            height: Some(40),
        };
        let config = args.resolve().expect("config resolves");

        assert_eq!(config.width, 60);
        assert_eq!(config.height, 40);
        assert_eq!(config.rooms.max_rooms, 12);
        assert_eq!(config.rooms.room_max_size, 10);
    }

    #[test]
    fn invalid_override_is_reported() {
        let args = ConfigArgs { width: Some(3), ..ConfigArgs::default() };
        let error = args.resolve().expect_err("3 tiles wide is too small");
        assert!(format!("{error:#}").contains("too small"));
    }

    #[test]
    fn unreadable_config_names_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("missing.toml");
        let error = load_config(&missing).expect_err("file does not exist");
        assert!(error.to_string().contains("missing.toml"));
    }

    #[test]
    fn generated_floor_passes_audit_and_renders_every_row() {
        let config = DungeonConfig::default();
        let content = ContentPack::build_default();
        let map = generate_floor(&config, &content, 99, 3).expect("floor 3");

        audit_floor(&map).expect("fresh floor is consistent");
        let ascii = render_ascii(&map, &content);
        assert_eq!(ascii.lines().count(), config.height);
        assert_eq!(ascii.matches('@').count(), 1);

        let report = FloorReport::new(&map, 99, config.generator);
        let json = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(json["floor_index"], 3);
        assert_eq!(json["actors"].as_array().map(Vec::len), Some(map.actors().count()));
    }

    #[test]
    fn audit_flags_stacked_entities() {
        let content = ContentPack::build_default();
        let mut map = generate_floor(&DungeonConfig::default(), &content, 1, 1).expect("floor 1");
        let stairs = map.down_stairs.expect("floor 1 has down-stairs");
        map.entities.clear();
        let bat = content.template(keys::BAT).expect("bat");
        map.spawn(bat, stairs, false).expect("empty stairs tile");
        let duplicate = map.entities.values().next().cloned().expect("one bat");
        map.entities.insert(duplicate);

        assert!(audit_floor(&map).is_err());
    }
}
