//! The generational evolution loop.
//!
//! Each generation passes through four phases:
//!
//! 1. **Dispatch** - submit one simulation job per individual, skipping any
//!    whose fitness record already exists (restart support)
//! 2. **Poll** - sleep-interval sweeps over the outstanding handles until
//!    every individual has a durable fitness record
//! 3. **Aggregate** - persist the generation's fitness statistics
//! 4. **Evolve** - elitism, tournament selection, recombination, and
//!    mutation produce the next generation's genotype files
//!
//! # Selection Design
//!
//! The top `elites` individuals are copied forward unchanged and take no
//! part in tournaments; every remaining slot is filled by the best of
//! `tournament_size` individuals drawn uniformly from the non-elite pool.
//! Recombination and mutation are applied to non-elite children only, so an
//! elite genotype file in generation N+1 is byte-identical to its
//! generation-N counterpart.

use std::{
    thread,
    time::{Duration, Instant},
};

use chrono::Utc;
use oxiswarm_engine::{Genotype, SimConfig};
use oxiswarm_stats::fitness::FitnessSummary;
use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    Dispatcher, EvolveError, FitnessRecord, GenerationStats, JobHandle, JobStatus, PopulationDir,
    SimulationJob, variation,
    variation::MutationRates,
};

/// Evolution parameters for one driver run.
#[derive(Debug, Clone)]
pub struct EvolutionParams {
    /// Individuals preserved unchanged each generation (elitism).
    pub elites: usize,
    /// Tournament sample size; larger means stronger selection pressure.
    pub tournament_size: usize,
    /// Probability of replacing a non-elite child with the average of
    /// itself and a random other child.
    pub recombination_probability: f64,
    pub mutation: MutationRates,
    /// Resubmissions allowed per individual before the generation aborts.
    pub max_retries: u32,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            elites: 1,
            tournament_size: 3,
            recombination_probability: 0.3,
            mutation: MutationRates::default(),
            max_retries: 2,
        }
    }
}

/// The evolutionary driver.
///
/// Owns a [`PopulationDir`] and a [`Dispatcher`] and advances the
/// population one generation at a time. The driver thread is the only
/// writer of genotype and statistics files; fitness files are written as
/// soon as the corresponding job completes.
#[derive(Debug)]
pub struct Evolver<D> {
    dir: PopulationDir,
    dispatcher: D,
    params: EvolutionParams,
    /// Sleep interval between poll sweeps.
    wait: Duration,
    config: SimConfig,
    opponent: Genotype,
    current_generation: usize,
}

struct Outstanding {
    individual: usize,
    handle: Box<dyn JobHandle>,
    attempts: u32,
}

impl<D> Evolver<D>
where
    D: Dispatcher,
{
    #[must_use]
    pub fn new(
        dir: PopulationDir,
        dispatcher: D,
        params: EvolutionParams,
        wait: Duration,
        config: SimConfig,
    ) -> Self {
        Self {
            dir,
            dispatcher,
            params,
            wait,
            config,
            opponent: Genotype::default(),
            current_generation: 0,
        }
    }

    /// The generation the driver will evaluate next.
    #[must_use]
    pub const fn current_generation(&self) -> usize {
        self.current_generation
    }

    /// Runs the evolution loop from `start` up to the directory's
    /// generation limit.
    ///
    /// The population must already be initialized. Restarting with the
    /// generation a previous run died in resumes it: individuals with
    /// fitness records on disk are not re-dispatched.
    pub fn run(&mut self, start: usize) -> Result<(), EvolveError> {
        if !self.dir.is_initialized() {
            return Err(EvolveError::Uninitialized {
                root: self.dir.root().to_path_buf(),
            });
        }
        if self.params.elites >= self.dir.popsize() {
            return Err(EvolveError::NoTournamentPool {
                elites: self.params.elites,
                popsize: self.dir.popsize(),
            });
        }

        self.current_generation = start;
        for generation in start..self.dir.maxgens() {
            let started = Instant::now();
            eprintln!("Generation #{generation} started at {}", Utc::now());

            self.evaluate_generation(generation)?;
            let stats = self.aggregate(generation)?;
            eprintln!(
                "  fitness mean {:.2} / max {:.2} / min {:.2} (best: {:?})",
                stats.mean_fitness, stats.max_fitness, stats.min_fitness, stats.best,
            );

            if generation + 1 < self.dir.maxgens() {
                self.evolve_generation(generation)?;
            }
            self.current_generation = generation + 1;
            eprintln!(
                "Generation #{generation} finished at {} ({:.1}s elapsed)",
                Utc::now(),
                started.elapsed().as_secs_f64()
            );
        }
        Ok(())
    }

    /// Dispatches jobs for every unstamped individual and polls until the
    /// whole generation has fitness records.
    fn evaluate_generation(&self, generation: usize) -> Result<(), EvolveError> {
        let popsize = self.dir.popsize();
        let mut outstanding = Vec::new();
        for individual in 0..popsize {
            if self.dir.has_fitness(generation, individual) {
                continue;
            }
            outstanding.push(Outstanding {
                individual,
                handle: self.submit(generation, individual)?,
                attempts: 0,
            });
        }
        eprintln!(
            "  dispatched {} of {popsize} individuals ({} already complete)",
            outstanding.len(),
            popsize - outstanding.len(),
        );

        while !outstanding.is_empty() {
            thread::sleep(self.wait);
            let mut still_running = Vec::new();
            for mut entry in outstanding {
                match entry.handle.status() {
                    JobStatus::Running => still_running.push(entry),
                    JobStatus::Completed(record) => {
                        self.dir.write_fitness(generation, entry.individual, &record)?;
                        eprintln!(
                            "  individual {} complete (fitness {:.1})",
                            entry.individual, record.fitness,
                        );
                    }
                    JobStatus::Failed(reason) => {
                        if entry.attempts >= self.params.max_retries {
                            return Err(EvolveError::JobFailed {
                                generation,
                                individual: entry.individual,
                                attempts: entry.attempts + 1,
                                reason,
                            });
                        }
                        eprintln!(
                            "  individual {} failed ({reason}); retrying",
                            entry.individual,
                        );
                        entry.handle = self.submit(generation, entry.individual)?;
                        entry.attempts += 1;
                        still_running.push(entry);
                    }
                }
            }
            outstanding = still_running;
        }
        Ok(())
    }

    fn submit(
        &self,
        generation: usize,
        individual: usize,
    ) -> Result<Box<dyn JobHandle>, EvolveError> {
        let genotype = self.dir.read_genotype(generation, individual)?;
        let job = SimulationJob {
            genotype,
            opponent: self.opponent.clone(),
            config: self.config.clone(),
            seed: rand::rng().random(),
        };
        Ok(self.dispatcher.submit(job))
    }

    /// Computes and persists the generation's fitness statistics.
    fn aggregate(&self, generation: usize) -> Result<GenerationStats, EvolveError> {
        let fitness: Vec<f64> = (0..self.dir.popsize())
            .map(|individual| {
                Ok(self.dir.read_fitness(generation, individual)?.fitness)
            })
            .collect::<Result<_, EvolveError>>()?;
        let summary =
            FitnessSummary::new(&fitness).ok_or(EvolveError::PopulationSizeViolation {
                found: 0,
                expected: self.dir.popsize(),
            })?;
        let stats = GenerationStats::new(generation, &summary);
        self.dir.write_stats(generation, &stats)?;
        Ok(stats)
    }

    /// Produces generation N+1 from generation N.
    ///
    /// Every child is an independent clone; selection, recombination, and
    /// mutation never share state between children, and the resulting set
    /// must hold exactly `popsize` genotypes before anything is persisted.
    pub fn evolve_generation(&self, generation: usize) -> Result<(), EvolveError> {
        let popsize = self.dir.popsize();
        let mut ranked = self.dir.load_generation(generation)?;
        ranked.sort_by(|a, b| b.1.fitness.total_cmp(&a.1.fitness));

        let elites = self.params.elites.min(popsize);
        let pool = &ranked[elites..];
        if pool.is_empty() {
            return Err(EvolveError::NoTournamentPool {
                elites: self.params.elites,
                popsize,
            });
        }

        let mut rng = rand::rng();
        let mut children: Vec<Genotype> = ranked
            .iter()
            .take(elites)
            .map(|(genotype, _)| genotype.clone())
            .collect();
        while children.len() < popsize {
            children.push(tournament(pool, self.params.tournament_size, &mut rng).clone());
        }

        for index in elites..children.len() {
            if children.len() > 1 && rng.random_bool(self.params.recombination_probability) {
                let partner = children[pick_other(children.len(), index, &mut rng)].clone();
                variation::average(&mut children[index], &partner);
            }
        }
        for child in children.iter_mut().skip(elites) {
            variation::mutate(child, &self.params.mutation, &mut rng);
        }

        if children.len() != popsize {
            return Err(EvolveError::PopulationSizeViolation {
                found: children.len(),
                expected: popsize,
            });
        }
        for (individual, child) in children.iter().enumerate() {
            self.dir.write_genotype(generation + 1, individual, child)?;
        }
        Ok(())
    }
}

/// Best of `size` individuals drawn uniformly from the non-elite pool.
fn tournament<'a, R>(
    pool: &'a [(Genotype, FitnessRecord)],
    size: usize,
    rng: &mut R,
) -> &'a Genotype
where
    R: Rng + ?Sized,
{
    let (genotype, _) = pool
        .choose_multiple(rng, size.max(1))
        .max_by(|a, b| a.1.fitness.total_cmp(&b.1.fitness))
        .expect("tournament pool is never empty");
    genotype
}

/// A uniformly random index other than `index`.
fn pick_other<R>(len: usize, index: usize, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let drawn = rng.random_range(0..len - 1);
    if drawn >= index { drawn + 1 } else { drawn }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const POPSIZE: usize = 25;

    fn test_dir(root: &std::path::Path) -> PopulationDir {
        PopulationDir::new(root, POPSIZE, 100)
    }

    /// Stamps generation 0 with distinct random fitness values.
    fn random_fitness(dir: &PopulationDir) {
        let mut rng = rand::rng();
        for individual in 0..dir.popsize() {
            #[expect(clippy::cast_precision_loss)]
            let fitness = individual as f64 + rng.random_range(0.0..0.5);
            let record = FitnessRecord {
                fitness,
                run_time: 0.0,
                iterations: 0,
                home_stash: 0,
                enemy_stash: 0,
            };
            dir.write_fitness(0, individual, &record).unwrap();
        }
    }

    fn evolver(dir: PopulationDir, params: EvolutionParams) -> Evolver<crate::ThreadDispatcher> {
        Evolver::new(
            dir,
            crate::ThreadDispatcher::new(),
            params,
            Duration::ZERO,
            SimConfig::default(),
        )
    }

    #[test]
    fn test_elites_carried_forward_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = test_dir(tmp.path());
        dir.initialize(&mut rand::rng()).unwrap();
        random_fitness(&dir);

        const ELITES: usize = 3;
        let params = EvolutionParams {
            elites: ELITES,
            // Mutate every scalar so non-elite children cannot stay
            // byte-identical by chance.
            mutation: MutationRates {
                probability: 1.0,
                ..MutationRates::default()
            },
            ..EvolutionParams::default()
        };
        evolver(dir.clone(), params).evolve_generation(0).unwrap();

        let parents: Vec<Vec<u8>> = (0..POPSIZE)
            .map(|i| fs::read(dir.genotype_path(0, i)).unwrap())
            .collect();
        let carried = (0..POPSIZE)
            .filter(|i| {
                let child = fs::read(dir.genotype_path(1, *i)).unwrap();
                parents.contains(&child)
            })
            .count();
        assert_eq!(carried, ELITES);
    }

    #[test]
    fn test_population_size_invariant_and_parent_immutability() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = test_dir(tmp.path());
        dir.initialize(&mut rand::rng()).unwrap();
        random_fitness(&dir);

        let before: Vec<Vec<u8>> = (0..POPSIZE)
            .map(|i| fs::read(dir.genotype_path(0, i)).unwrap())
            .collect();

        evolver(dir.clone(), EvolutionParams::default())
            .evolve_generation(0)
            .unwrap();

        for individual in 0..POPSIZE {
            assert!(dir.genotype_path(1, individual).exists());
            let after = fs::read(dir.genotype_path(0, individual)).unwrap();
            assert_eq!(after, before[individual], "generation 0 was modified");
        }
        assert!(!dir.genotype_path(1, POPSIZE).exists());
    }

    #[test]
    fn test_children_stay_within_mutation_bounds() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = test_dir(tmp.path());
        dir.initialize(&mut rand::rng()).unwrap();
        random_fitness(&dir);

        let params = EvolutionParams {
            mutation: MutationRates {
                probability: 1.0,
                ..MutationRates::default()
            },
            ..EvolutionParams::default()
        };
        evolver(dir.clone(), params).evolve_generation(0).unwrap();

        for individual in 0..POPSIZE {
            let genotype = dir.read_genotype(1, individual).unwrap();
            assert!(genotype.home_guard_threshold <= 5);
            for behavior in genotype.behaviors() {
                for component in behavior.components.values() {
                    assert!((0.0..=1.0).contains(&component.weight));
                    if let Some(radius) = component.radius {
                        assert!((1.0..=500.0).contains(&radius));
                    }
                    assert!((1.0..=359.0).contains(&component.alpha));
                }
            }
        }
    }

    #[test]
    fn test_run_requires_initialized_population() {
        let tmp = tempfile::tempdir().unwrap();
        let mut evolver = evolver(test_dir(tmp.path()), EvolutionParams::default());
        assert!(matches!(
            evolver.run(0),
            Err(EvolveError::Uninitialized { .. })
        ));
    }

    #[test]
    fn test_evaluate_skips_stamped_individuals() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = PopulationDir::new(tmp.path(), 3, 100);
        dir.initialize(&mut rand::rng()).unwrap();

        // Pre-stamp one individual with a recognizable record.
        let stamped = FitnessRecord {
            fitness: 123.0,
            run_time: 0.0,
            iterations: 0,
            home_stash: 123,
            enemy_stash: 0,
        };
        dir.write_fitness(0, 1, &stamped).unwrap();

        let config = SimConfig {
            maximum_time: 3,
            team_size: 2,
            deposits: 1,
            ..SimConfig::default()
        };
        let evolver = Evolver::new(
            dir.clone(),
            crate::ThreadDispatcher::new(),
            EvolutionParams::default(),
            Duration::from_millis(10),
            config,
        );
        evolver.evaluate_generation(0).unwrap();

        for individual in 0..3 {
            assert!(dir.has_fitness(0, individual));
        }
        // The stamped individual was not re-dispatched and overwritten.
        assert_eq!(dir.read_fitness(0, 1).unwrap(), stamped);
    }

    #[test]
    fn test_pick_other_never_returns_index() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let picked = pick_other(5, 2, &mut rng);
            assert!(picked < 5);
            assert_ne!(picked, 2);
        }
    }
}
