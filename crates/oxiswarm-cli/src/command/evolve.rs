use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use oxiswarm_engine::SimConfig;
use oxiswarm_evolve::{EvolutionParams, Evolver, MutationRates, PopulationDir, ThreadDispatcher};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    /// Directory with the population and fitness files
    #[arg(short, long, default_value = "population")]
    dirname: PathBuf,
    /// Number of generations to evolve up to
    #[arg(short = 'g', long, default_value_t = 999)]
    maxgens: usize,
    /// Size of the population
    #[arg(short, long, default_value_t = 50)]
    popsize: usize,
    /// Seconds to wait between checks of simulation status
    #[arg(short, long, default_value_t = 20)]
    wait: u64,
    /// Starting generation, in case a restart is needed
    #[arg(short, long, default_value_t = 0)]
    start: usize,
    /// Individuals carried forward unchanged each generation
    #[arg(long, default_value_t = 1)]
    elites: usize,
    /// Tournament sample size for selection
    #[arg(long, default_value_t = 3)]
    tournament_size: usize,
    /// Simulation config JSON file used for every evaluation
    #[arg(long)]
    config: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let config: SimConfig = match &arg.config {
        Some(path) => util::read_json_file("simulation config", path)?,
        None => SimConfig::default(),
    };
    let dir = PopulationDir::new(&arg.dirname, arg.popsize, arg.maxgens);
    let params = EvolutionParams {
        elites: arg.elites,
        tournament_size: arg.tournament_size,
        recombination_probability: 0.3,
        mutation: MutationRates::default(),
        max_retries: 2,
    };
    let mut evolver = Evolver::new(
        dir,
        ThreadDispatcher::new(),
        params,
        Duration::from_secs(arg.wait),
        config,
    );

    let started = Instant::now();
    evolver.run(arg.start)?;
    eprintln!(
        "{:.1} seconds to evolve {} generations",
        started.elapsed().as_secs_f64(),
        evolver.current_generation() - arg.start
    );
    Ok(())
}
