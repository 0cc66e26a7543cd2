use std::{fs, path::PathBuf};

use anyhow::{Context as _, bail};
use oxiswarm_engine::{Genotype, SimConfig, World, WorldSeed};
use oxiswarm_stats::timeseries;
use rand::Rng as _;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HeadToHeadArg {
    /// Genotype JSON file of the design to evaluate
    genotype: PathBuf,
    /// Number of independent trials to evaluate on
    #[arg(short = 'n', long, default_value_t = 20)]
    trials: usize,
    /// Number of iterations per trial
    #[arg(short, long, default_value_t = 10_000)]
    iterations: u64,
    /// Directory where the per-trial and aggregate results are written
    #[arg(short = 'd', long, default_value = "trials")]
    outdir: PathBuf,
    /// Prefix of the result files written
    #[arg(short, long, default_value = "simresult")]
    prefix: String,
    /// Simulation config JSON file
    #[arg(long)]
    config: Option<PathBuf>,
}

pub(crate) fn run(arg: &HeadToHeadArg) -> anyhow::Result<()> {
    let genotype: Genotype = util::read_json_file("genotype", &arg.genotype)?;
    let mut config: SimConfig = match &arg.config {
        Some(path) => util::read_json_file("simulation config", path)?,
        None => SimConfig::default(),
    };
    config.maximum_time = arg.iterations;

    prepare_outdir(arg)?;

    let mut all_trials: Vec<Vec<Vec<f64>>> = Vec::with_capacity(arg.trials);
    for trial in 1..=arg.trials {
        let seed: WorldSeed = rand::rng().random();
        let rows = run_trial(&config, genotype.clone(), seed)?;

        let outpath = arg.outdir.join(format!("{}_{trial:02}.csv", arg.prefix));
        write_rows(&config, outpath, &rows)?;
        eprintln!("Trial {trial}/{} complete", arg.trials);
        all_trials.push(rows);
    }

    let averaged = timeseries::average_columnwise(&all_trials);
    let outpath = arg.outdir.join(format!("{}_mean.csv", arg.prefix));
    write_rows(&config, outpath, &averaged)?;

    eprintln!(
        "{} trials of {} iterations evaluated; results written to {}",
        arg.trials,
        arg.iterations,
        arg.outdir.display()
    );
    Ok(())
}

/// Runs one instrumented simulation, producing one status row per tick
/// (plus the initial state).
fn run_trial(
    config: &SimConfig,
    genotype: Genotype,
    seed: WorldSeed,
) -> anyhow::Result<Vec<Vec<f64>>> {
    let mut world = World::new(config.clone(), genotype, Genotype::default(), seed);
    let mut rows = Vec::with_capacity(usize::try_from(config.maximum_time).unwrap_or(0) + 1);
    rows.push(status_row(&world));
    while world.time() < config.maximum_time {
        world.tick()?;
        rows.push(status_row(&world));
    }
    Ok(rows)
}

#[expect(clippy::cast_precision_loss)]
fn status_row(world: &World) -> Vec<f64> {
    world.status().iter().map(|v| *v as f64).collect()
}

fn write_rows(config: &SimConfig, path: PathBuf, rows: &[Vec<f64>]) -> anyhow::Result<()> {
    let mut output = Output::open(path)?;
    let mut header = vec!["ally".to_string(), "enemy".to_string()];
    header.extend((0..config.deposits).map(|_| "deposit".to_string()));
    output.write_csv_row(header)?;
    for row in rows {
        output.write_csv_row(row.iter().map(ToString::to_string))?;
    }
    output.finish()
}

fn prepare_outdir(arg: &HeadToHeadArg) -> anyhow::Result<()> {
    if arg.outdir.exists() {
        if !arg.outdir.is_dir() {
            bail!("output path {} is not a directory", arg.outdir.display());
        }
        let occupied = fs::read_dir(&arg.outdir)?
            .filter_map(Result::ok)
            .any(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(&arg.prefix)
            });
        if occupied {
            bail!(
                "output path {} already holds {}_* results",
                arg.outdir.display(),
                arg.prefix
            );
        }
    } else {
        fs::create_dir_all(&arg.outdir)
            .with_context(|| format!("Failed to create {}", arg.outdir.display()))?;
    }
    Ok(())
}
