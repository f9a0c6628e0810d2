use anyhow::{Context, Result, ensure};
use clap::Parser;
use deepfall_core::{ContentPack, World};
use deepfall_tools::{ConfigArgs, FloorReport, init_logging, render_ascii};
use tracing::info;

/// Generate one floor of a run and print it.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Floor to stop on; earlier floors are descended through like in play
    #[arg(short, long, default_value_t = 1)]
    floor: u32,
    /// Print a JSON report instead of the ASCII map
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    ensure!(args.floor >= 1, "floor numbering starts at 1");

    let config = args.config.resolve()?;
    let generator = config.generator;
    let content = ContentPack::build_default();
    let mut world = World::new(config, content, args.seed).context("world setup failed")?;

    while world.floor_index() < args.floor {
        let next = world.floor_index() + 1;
        world.descend().with_context(|| format!("failed to generate floor {next}"))?;
    }
    info!(seed = args.seed, floor = args.floor, "floor ready");

    let map = world.current().context("no floor was generated")?;
    if args.json {
        let report = FloorReport::new(map, args.seed, generator);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_ascii(map, world.content()));
        println!(
            "seed {} floor {} ({}): {} actors, {} items, fingerprint {:016x}",
            args.seed,
            map.floor_index,
            generator.label(),
            map.actors().count(),
            map.items().count(),
            map.fingerprint()
        );
    }

    Ok(())
}
