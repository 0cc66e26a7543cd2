use std::time::Instant;

use oxiswarm_engine::{Genotype, SimConfig, SimulationError, World, WorldSeed};

use crate::FitnessRecord;

/// One fitness evaluation: run a full simulation for a genotype against a
/// fixed opposing configuration.
///
/// A job owns everything it needs - genotype, opponent, config snapshot,
/// and seed - so dispatched jobs share no mutable state and can complete in
/// any order.
#[derive(Debug, Clone)]
pub struct SimulationJob {
    pub genotype: Genotype,
    pub opponent: Genotype,
    pub config: SimConfig,
    pub seed: WorldSeed,
}

impl SimulationJob {
    /// A job evaluating `genotype` against the default opposing behavior.
    #[must_use]
    pub fn new(genotype: Genotype, config: SimConfig, seed: WorldSeed) -> Self {
        Self {
            genotype,
            opponent: Genotype::default(),
            config,
            seed,
        }
    }

    /// Runs the simulation to its configured tick limit and scores it.
    ///
    /// A tick raising a configuration error fails the whole job; a failed
    /// run is never reported as a zero-fitness success.
    pub fn run(&self) -> Result<FitnessRecord, SimulationError> {
        let start = Instant::now();
        let mut world = World::new(
            self.config.clone(),
            self.genotype.clone(),
            self.opponent.clone(),
            self.seed,
        );
        while world.time() < self.config.maximum_time {
            world.tick()?;
        }

        #[expect(clippy::cast_precision_loss)]
        let fitness = world.ally_home_stash() as f64;
        Ok(FitnessRecord {
            fitness,
            run_time: start.elapsed().as_secs_f64(),
            iterations: world.time(),
            home_stash: world.ally_home_stash(),
            enemy_stash: world.enemy_home_stash(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_config() -> SimConfig {
        SimConfig {
            maximum_time: 5,
            team_size: 3,
            deposits: 1,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_run_reports_iterations_and_stashes() {
        let job = SimulationJob::new(Genotype::default(), tiny_config(), WorldSeed::new(1));
        let record = job.run().unwrap();
        assert_eq!(record.iterations, 5);
        assert_eq!(record.fitness, record.home_stash as f64);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let job = SimulationJob::new(Genotype::default(), tiny_config(), WorldSeed::new(9));
        let a = job.run().unwrap();
        let b = job.run().unwrap();
        assert_eq!(a.home_stash, b.home_stash);
        assert_eq!(a.enemy_stash, b.enemy_stash);
    }
}
