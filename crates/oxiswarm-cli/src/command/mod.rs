use clap::{Parser, Subcommand};

use self::{
    evaluate::EvaluateArg, evolve::EvolveArg, head_to_head::HeadToHeadArg, init_pop::InitPopArg,
    simulate::SimulateArg,
};

mod evaluate;
mod evolve;
mod head_to_head;
mod init_pop;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run one headless simulation
    Simulate(#[clap(flatten)] SimulateArg),
    /// Initialize a random population in a directory
    InitPop(#[clap(flatten)] InitPopArg),
    /// Run async evolution for some number of generations
    Evolve(#[clap(flatten)] EvolveArg),
    /// Summarize the state of an evolution directory as CSV
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Evaluate one genotype head-to-head over several trials
    H2h(#[clap(flatten)] HeadToHeadArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::InitPop(arg) => init_pop::run(&arg)?,
        Mode::Evolve(arg) => evolve::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::H2h(arg) => head_to_head::run(&arg)?,
    }
    Ok(())
}
