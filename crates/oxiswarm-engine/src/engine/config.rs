use serde::{Deserialize, Serialize};

use crate::core::Vec2;

/// Immutable configuration snapshot for a single simulation run.
///
/// Every run owns one `SimConfig`; the engine never reads process-global
/// state, so concurrent runs cannot interfere with each other. All fields
/// have defaults matching the reference parameter set, and a config loaded
/// from JSON may override any subset of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square toroidal arena.
    pub world_size: f64,
    /// Maximum particle speed; composed velocities are rescaled to this.
    pub maximum_velocity: f64,
    /// Number of ticks a scored simulation runs for.
    pub maximum_time: u64,
    /// Particles per team.
    pub team_size: usize,
    /// Number of mineral deposits placed in the arena.
    pub deposits: usize,
    /// Initial stash of each mineral deposit.
    pub stash_size: u64,
    /// Radius of the circular deployment area around each home base.
    pub deploy_radius: f64,
    /// Radius within which a spreading particle notices a mineral deposit.
    pub discovery_radius: f64,
    /// Field-of-view angle (degrees) for mineral discovery.
    pub discovery_alpha: f64,
    /// Distance below which a particle counts as having reached its target.
    pub arrival_radius: f64,
    /// Position of the ally team's home base.
    pub ally_home: Vec2,
    /// Position of the enemy team's home base.
    pub enemy_home: Vec2,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_size: 1000.0,
            maximum_velocity: 100.0,
            maximum_time: 10_000,
            team_size: 20,
            deposits: 4,
            stash_size: 30,
            deploy_radius: 100.0,
            discovery_radius: 200.0,
            discovery_alpha: 360.0,
            arrival_radius: 10.0,
            ally_home: Vec2::new(300.0, 300.0),
            enemy_home: Vec2::new(700.0, 700.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"world_size": 500.0, "team_size": 5}"#).unwrap();
        assert_eq!(config.world_size, 500.0);
        assert_eq!(config.team_size, 5);
        assert_eq!(config.deposits, SimConfig::default().deposits);
    }
}
