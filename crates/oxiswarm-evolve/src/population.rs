use std::{
    fs,
    path::{Path, PathBuf},
};

use oxiswarm_engine::Genotype;
use rand::Rng;
use serde::{Serialize, de::DeserializeOwned};

use crate::{EvolveError, FitnessRecord, GenerationStats};

/// Durable population storage: one directory of genotype, fitness, and
/// statistics records keyed by (generation, individual).
///
/// File layout (indices zero-padded to the widths of the configured
/// generation and population limits):
///
/// - `{generation}_{individual}.json` - genotype record
/// - `{generation}_{individual}.fit` - fitness record, written once,
///   atomically, when the owning job completes
/// - `{generation}.stats` - aggregate generation statistics
///
/// Records are never rewritten; each generation is a fresh set of files,
/// which is what makes fitness files usable as a restart checkpoint.
#[derive(Debug, Clone)]
pub struct PopulationDir {
    root: PathBuf,
    popsize: usize,
    maxgens: usize,
}

impl PopulationDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, popsize: usize, maxgens: usize) -> Self {
        Self {
            root: root.into(),
            popsize,
            maxgens,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn popsize(&self) -> usize {
        self.popsize
    }

    #[must_use]
    pub const fn maxgens(&self) -> usize {
        self.maxgens
    }

    fn generation_width(&self) -> usize {
        digits(self.maxgens.saturating_sub(1))
    }

    fn individual_width(&self) -> usize {
        digits(self.popsize.saturating_sub(1))
    }

    fn basename(&self, generation: usize, individual: usize) -> String {
        format!(
            "{generation:0gw$}_{individual:0iw$}",
            gw = self.generation_width(),
            iw = self.individual_width(),
        )
    }

    #[must_use]
    pub fn genotype_path(&self, generation: usize, individual: usize) -> PathBuf {
        self.root
            .join(format!("{}.json", self.basename(generation, individual)))
    }

    #[must_use]
    pub fn fitness_path(&self, generation: usize, individual: usize) -> PathBuf {
        self.root
            .join(format!("{}.fit", self.basename(generation, individual)))
    }

    #[must_use]
    pub fn stats_path(&self, generation: usize) -> PathBuf {
        self.root.join(format!(
            "{generation:0gw$}.stats",
            gw = self.generation_width()
        ))
    }

    /// Whether a generation-zero population exists here.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.genotype_path(0, 0).exists()
    }

    /// Writes a full random generation-zero population.
    ///
    /// Kept separate from the evolver so that creating a population is
    /// always an explicit operation.
    pub fn initialize<R>(&self, rng: &mut R) -> Result<(), EvolveError>
    where
        R: Rng + ?Sized,
    {
        fs::create_dir_all(&self.root).map_err(|source| {
            EvolveError::io(
                format!("failed to create population directory {}", self.root.display()),
                source,
            )
        })?;
        for individual in 0..self.popsize {
            self.write_genotype(0, individual, &Genotype::random(rng))?;
        }
        Ok(())
    }

    pub fn write_genotype(
        &self,
        generation: usize,
        individual: usize,
        genotype: &Genotype,
    ) -> Result<(), EvolveError> {
        write_json_atomic(&self.genotype_path(generation, individual), genotype)
    }

    pub fn read_genotype(
        &self,
        generation: usize,
        individual: usize,
    ) -> Result<Genotype, EvolveError> {
        read_json(&self.genotype_path(generation, individual))
    }

    /// Persists a fitness record durably. The write is atomic (temp file
    /// plus rename), so a concurrent reader never observes a partial record.
    pub fn write_fitness(
        &self,
        generation: usize,
        individual: usize,
        record: &FitnessRecord,
    ) -> Result<(), EvolveError> {
        write_json_atomic(&self.fitness_path(generation, individual), record)
    }

    pub fn read_fitness(
        &self,
        generation: usize,
        individual: usize,
    ) -> Result<FitnessRecord, EvolveError> {
        read_json(&self.fitness_path(generation, individual))
    }

    #[must_use]
    pub fn has_fitness(&self, generation: usize, individual: usize) -> bool {
        self.fitness_path(generation, individual).exists()
    }

    pub fn write_stats(
        &self,
        generation: usize,
        stats: &GenerationStats,
    ) -> Result<(), EvolveError> {
        write_json_atomic(&self.stats_path(generation), stats)
    }

    pub fn read_stats(&self, generation: usize) -> Result<GenerationStats, EvolveError> {
        read_json(&self.stats_path(generation))
    }

    /// Loads every (genotype, fitness) pair of a generation.
    ///
    /// A missing or unreadable record is a hard error: a generation with
    /// fewer loadable individuals than the population size indicates a
    /// consistency bug and must never be averaged over.
    pub fn load_generation(
        &self,
        generation: usize,
    ) -> Result<Vec<(Genotype, FitnessRecord)>, EvolveError> {
        (0..self.popsize)
            .map(|individual| {
                Ok((
                    self.read_genotype(generation, individual)?,
                    self.read_fitness(generation, individual)?,
                ))
            })
            .collect()
    }
}

fn digits(n: usize) -> usize {
    n.to_string().len()
}

fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), EvolveError>
where
    T: Serialize,
{
    let json = serde_json::to_vec_pretty(value)
        .map_err(|source| EvolveError::json(format!("failed to encode {}", path.display()), source))?;
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    fs::write(&tmp, json).map_err(|source| {
        EvolveError::io(format!("failed to write {}", tmp.display()), source)
    })?;
    fs::rename(&tmp, path).map_err(|source| {
        EvolveError::io(format!("failed to move {} into place", tmp.display()), source)
    })
}

fn read_json<T>(path: &Path) -> Result<T, EvolveError>
where
    T: DeserializeOwned,
{
    let bytes = fs::read(path).map_err(|source| {
        EvolveError::io(format!("failed to read {}", path.display()), source)
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|source| EvolveError::json(format!("failed to parse {}", path.display()), source))
}
