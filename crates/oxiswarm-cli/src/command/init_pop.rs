use std::path::PathBuf;

use anyhow::bail;
use oxiswarm_evolve::PopulationDir;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InitPopArg {
    /// Directory to hold the population and fitness files
    #[arg(short, long, default_value = "population")]
    dirname: PathBuf,
    /// Size of the population to initialize
    #[arg(short, long, default_value_t = 50)]
    popsize: usize,
    /// Generation limit the directory is laid out for
    #[arg(long, default_value_t = 999)]
    maxgens: usize,
}

pub(crate) fn run(arg: &InitPopArg) -> anyhow::Result<()> {
    let dir = PopulationDir::new(&arg.dirname, arg.popsize, arg.maxgens);
    if dir.is_initialized() {
        bail!(
            "population already initialized in {}",
            arg.dirname.display()
        );
    }
    dir.initialize(&mut rand::rng())?;
    eprintln!(
        "Population with {} individuals generated in {}",
        arg.popsize,
        arg.dirname.display()
    );
    Ok(())
}
