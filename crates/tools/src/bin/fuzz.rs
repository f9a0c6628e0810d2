use anyhow::{Context, Result, ensure};
use clap::Parser;
use deepfall_core::{ContentPack, DungeonConfig, GeneratorKind, World};
use deepfall_tools::{ConfigArgs, audit_floor, init_logging};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{debug, info};

/// Walk many seeded runs up and down the dungeon and audit every floor entered.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive run seeds to walk
    #[arg(long, default_value_t = 16)]
    runs: u64,
    /// Floor transitions per run
    #[arg(long, default_value_t = 40)]
    steps: u32,
    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let base_config = args.config.resolve()?;
    let generators = match args.config.generator {
        Some(generator) => vec![generator.into()],
        None => vec![GeneratorKind::Rooms, GeneratorKind::Cave, GeneratorKind::Noise],
    };

    println!(
        "Fuzzing {} runs x {} generators, {} transitions each...",
        args.runs,
        generators.len(),
        args.steps
    );
    let mut floors_checked = 0_u64;
    for run_seed in args.seed..args.seed + args.runs {
        for &generator in &generators {
            let mut config = base_config.clone();
            config.generator = generator;
            floors_checked += walk(config, run_seed, args.steps)
                .with_context(|| format!("run seed {run_seed} with {}", generator.label()))?;
        }
    }

    println!("Fuzzing completed successfully: {floors_checked} floors audited.");
    Ok(())
}

/// Descends about three times as often as it ascends so runs reach the deeper tables.
fn walk(config: DungeonConfig, run_seed: u64, steps: u32) -> Result<u64> {
    let mut world = World::new(config, ContentPack::build_default(), run_seed)?;
    let mut rng = ChaCha8Rng::seed_from_u64(run_seed);
    let mut audited = 0;

    audit_floor(world.generate_floor()?)?;
    for step in 0..steps {
        let before = world.floor_index();
        let descend = rng.next_u64() % 4 != 0;
        let expected = if descend {
            audit_floor(world.descend()?)?;
            before + 1
        } else {
            match world.ascend()? {
                Some(map) => {
                    audit_floor(map)?;
                    before - 1
                }
                None => before,
            }
        };
        ensure!(
            world.floor_index() == expected,
            "step {step}: floor counter went from {before} to {}",
            world.floor_index()
        );
        let map = world.current().context("world lost its current floor")?;
        ensure!(map.floor_index == expected, "step {step}: map floor index mismatch");
        debug!(step, floor = expected, "transition audited");
        audited += 1;
    }

    info!(run_seed, audited, "run finished");
    Ok(audited)
}
