use std::{fs, path::PathBuf};

use anyhow::Context as _;
use oxiswarm_evolve::FitnessRecord;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Directory with the population and fitness files
    #[arg(short, long, default_value = "population")]
    dirname: PathBuf,
    /// Location to write the statistics CSV (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// One parsed fitness file.
struct Row {
    generation: usize,
    individual: usize,
    record: FitnessRecord,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    let mut stats_files = 0usize;

    let entries = fs::read_dir(&arg.dirname)
        .with_context(|| format!("Failed to read directory: {}", arg.dirname.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("fit") => {
                if let Some((generation, individual)) = parse_individual_stem(&path) {
                    let record = util::read_json_file("fitness", &path)?;
                    rows.push(Row {
                        generation,
                        individual,
                        record,
                    });
                }
            }
            Some("stats") => stats_files += 1,
            _ => {}
        }
    }
    rows.sort_by_key(|row| (row.generation, row.individual));

    let mut output = Output::from_output_path(arg.output.clone())?;
    output.write_csv_row([
        "generation",
        "individual",
        "fitness",
        "run_time",
        "iterations",
        "home_stash",
        "enemy_stash",
    ])?;
    let count = rows.len();
    for row in rows {
        output.write_csv_row([
            row.generation.to_string(),
            row.individual.to_string(),
            row.record.fitness.to_string(),
            row.record.run_time.to_string(),
            row.record.iterations.to_string(),
            row.record.home_stash.to_string(),
            row.record.enemy_stash.to_string(),
        ])?;
    }
    let path = output.display_path();
    output.finish()?;

    eprintln!("{count} fitness records over {stats_files} completed generations written to {path}");
    Ok(())
}

/// Parses `{generation}_{individual}` out of a fitness file stem.
fn parse_individual_stem(path: &std::path::Path) -> Option<(usize, usize)> {
    let stem = path.file_stem()?.to_str()?;
    let (generation, individual) = stem.split_once('_')?;
    Some((generation.parse().ok()?, individual.parse().ok()?))
}
