//! Evolutionary driver: optimizes swarm behavior genotypes over generations
//! of asynchronously evaluated simulation runs.
//!
//! # How Evolution Works
//!
//! 1. **Population** - A directory of genotype records, one generation at a
//!    time ([`PopulationDir`])
//! 2. **Dispatch** - Each individual's simulation run is submitted as an
//!    independent job ([`Dispatcher`])
//! 3. **Poll** - The driver sleeps between poll sweeps until every job in
//!    the generation has reached a terminal state
//! 4. **Aggregate** - Fitness statistics are persisted per generation
//! 5. **Evolve** - Elitism, tournament selection, averaging recombination,
//!    and bounded mutation produce the next generation
//! 6. **Repeat** - Until the configured generation limit
//!
//! # Architecture
//!
//! ```text
//! Evolver
//!     ↓ reads/writes genotypes + fitness records
//! PopulationDir (durable storage)
//!     ↓ genotypes flow out as
//! SimulationJob
//!     ↓ submitted through
//! Dispatcher -> JobHandle (polled)
//!     ↓ runs
//! World + Particles (oxiswarm-engine)
//!     ↓ produces
//! FitnessRecord
//! ```
//!
//! # Concurrency Model
//!
//! Each simulation run is an independent unit of work: jobs share no mutable
//! state and results land in individual-specific files, so completion in any
//! order needs no locking beyond atomic single-file writes. The driver
//! itself is single-threaded; it polls handles rather than blocking on any
//! one job. Fitness files double as a checkpoint: restarting mid-generation
//! re-scans storage and skips already-stamped individuals. In-flight jobs
//! from before a crash are neither cancelled nor deduplicated - a known
//! resume hazard of the polling design.
//!
//! # Failure Semantics
//!
//! A job that fails (a simulation raising a configuration error) reaches an
//! explicit failed terminal state rather than being indistinguishable from
//! "still running". The driver retries a failed individual a bounded number
//! of times, then aborts the generation loop; a failed run is never reported
//! as a zero-fitness success, and a generation loaded with fewer individuals
//! than the population size is a hard error rather than something to
//! average over.

pub use self::{
    dispatch::*, evolver::*, job::*, population::*, record::*, variation::MutationRates,
};

pub mod dispatch;
pub mod evolver;
pub mod job;
pub mod population;
pub mod record;
pub mod variation;

use std::path::PathBuf;

/// Errors raised by the evolutionary driver.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvolveError {
    /// The population directory has no generation-zero genotypes.
    #[display("population directory is not initialized: {}", root.display())]
    Uninitialized { root: PathBuf },
    /// Selection parameters leave no pool to run tournaments over.
    #[display("elite count {elites} must be smaller than population size {popsize}")]
    NoTournamentPool { elites: usize, popsize: usize },
    /// The children set ended up with the wrong number of individuals.
    #[display("next generation holds {found} children, expected {expected}")]
    PopulationSizeViolation { found: usize, expected: usize },
    /// A simulation job failed and exhausted its retries.
    #[display(
        "job for individual {individual} of generation {generation} failed after {attempts} attempts: {reason}"
    )]
    JobFailed {
        generation: usize,
        individual: usize,
        attempts: u32,
        reason: String,
    },
    #[display("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
    #[display("{context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },
}

impl EvolveError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }
}
