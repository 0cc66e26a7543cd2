use std::{path::PathBuf, time::Instant};

use oxiswarm_engine::{Genotype, SimConfig, World, WorldSeed};
use rand::Rng as _;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Genotype JSON file for the ally team (defaults to the reference
    /// behavior)
    #[arg(long)]
    genotype: Option<PathBuf>,
    /// Simulation config JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured tick limit
    #[arg(long)]
    iterations: Option<u64>,
    /// World seed for a reproducible run (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let mut config: SimConfig = match &arg.config {
        Some(path) => util::read_json_file("simulation config", path)?,
        None => SimConfig::default(),
    };
    if let Some(iterations) = arg.iterations {
        config.maximum_time = iterations;
    }
    let genotype: Genotype = match &arg.genotype {
        Some(path) => util::read_json_file("genotype", path)?,
        None => Genotype::default(),
    };
    let seed = arg.seed.map_or_else(|| rand::rng().random(), WorldSeed::new);

    let mut world = World::new(config.clone(), genotype, Genotype::default(), seed);
    eprintln!(
        "Starting headless simulation ({} ticks, seed {seed:?})",
        config.maximum_time
    );
    let start = Instant::now();
    while world.time() < config.maximum_time {
        world.tick()?;
        if world.time() % 1000 == 0 {
            eprintln!("{}k iterations completed", world.time() / 1000);
        }
    }
    let elapsed = start.elapsed();

    eprintln!(
        "Ran {} time steps in {:.3} seconds",
        world.time(),
        elapsed.as_secs_f64()
    );
    eprintln!(
        "Agents successfully collected {} resources ({} for the enemy)",
        world.ally_home_stash(),
        world.enemy_home_stash()
    );
    Ok(())
}
