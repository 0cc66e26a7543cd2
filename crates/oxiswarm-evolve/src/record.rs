use chrono::{DateTime, Utc};
use oxiswarm_stats::fitness::FitnessSummary;
use serde::{Deserialize, Serialize};

/// Outcome of one scored simulation run.
///
/// Produced exactly once per (generation, individual) and immutable once
/// written. `fitness` is the quantity the evolutionary driver maximizes -
/// the number of resources the evolved team delivered home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
    pub fitness: f64,
    /// Wall-clock duration of the run, in seconds.
    pub run_time: f64,
    /// Ticks actually simulated.
    pub iterations: u64,
    pub home_stash: u64,
    pub enemy_stash: u64,
}

/// Aggregate fitness summary persisted per generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub mean_fitness: f64,
    pub max_fitness: f64,
    pub min_fitness: f64,
    /// Individuals that achieved the maximum fitness.
    pub best: Vec<usize>,
    pub completed_at: DateTime<Utc>,
}

impl GenerationStats {
    #[must_use]
    pub fn new(generation: usize, summary: &FitnessSummary) -> Self {
        Self {
            generation,
            mean_fitness: summary.mean,
            max_fitness: summary.max,
            min_fitness: summary.min,
            best: summary.best.clone(),
            completed_at: Utc::now(),
        }
    }
}
