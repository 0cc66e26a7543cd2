use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::ParticleState;

/// The closed set of velocity component kinds a behavior may reference.
///
/// Each kind maps to one computation in the particle behavior engine, so a
/// configured behavior can never name a component the engine cannot run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Flee the nearest opposing-team neighbor.
    Avoidance,
    /// Back away from the same-team centroid.
    Separation,
    /// Break symmetric deadlocks by sliding orthogonally to the heading.
    Clearance,
    /// Match the average heading of same-team neighbors.
    Alignment,
    /// Pull toward the same-team centroid.
    Cohesion,
    /// Head straight for the current target.
    Seek,
    /// Head straight for the home base.
    Homing,
    /// Pull toward nearby mineral deposits (guarding only).
    MineralCohesion,
}

/// Parameters of one weighted velocity component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityComponent {
    /// Evaluation order; components are summed in ascending priority.
    pub priority: u32,
    /// Contribution weight in [0, 1].
    pub weight: f64,
    /// Perception radius; `None` means unbounded and is honored only by
    /// [`ComponentKind::Homing`].
    pub radius: Option<f64>,
    /// Field-of-view angle in degrees, symmetric about the heading.
    pub alpha: f64,
}

impl VelocityComponent {
    #[must_use]
    pub const fn new(priority: u32, weight: f64, radius: Option<f64>, alpha: f64) -> Self {
        Self {
            priority,
            weight,
            radius,
            alpha,
        }
    }
}

/// A state's movement behavior: named velocity components with priorities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementBehavior {
    pub components: BTreeMap<ComponentKind, VelocityComponent>,
}

impl MovementBehavior {
    #[must_use]
    pub fn new<I>(components: I) -> Self
    where
        I: IntoIterator<Item = (ComponentKind, VelocityComponent)>,
    {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Components in ascending priority order (ties broken by kind, so the
    /// order is deterministic).
    pub fn ordered(&self) -> impl Iterator<Item = (ComponentKind, &VelocityComponent)> {
        let mut entries: Vec<_> = self.components.iter().map(|(k, c)| (*k, c)).collect();
        entries.sort_by_key(|(kind, c)| (c.priority, *kind));
        entries.into_iter()
    }

    /// The largest finite perception radius configured in this behavior.
    #[must_use]
    pub fn max_radius(&self) -> f64 {
        self.components
            .values()
            .filter_map(|c| c.radius)
            .fold(0.0, f64::max)
    }
}

/// The evolvable parameter tree configuring one team's behavior.
///
/// A genotype holds one [`MovementBehavior`] per particle state plus the
/// guard-count thresholds. Genotypes are created randomly for generation
/// zero, then recombined and mutated to produce each subsequent generation;
/// once persisted a genotype record is never modified.
///
/// Serialization is deterministic (component maps are ordered), so two equal
/// genotypes always produce byte-identical JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genotype {
    /// Number of particles assigned to guard the home base, in [0, 5].
    pub home_guard_threshold: u8,
    /// Number of particles assigned to guard mineral deposits, in [0, 5].
    pub depo_guard_threshold: u8,
    pub spreading: MovementBehavior,
    pub seeking: MovementBehavior,
    pub caravan: MovementBehavior,
    pub guarding: MovementBehavior,
}

impl Genotype {
    /// The behavior driving a particle in the given state.
    #[must_use]
    pub fn behavior(&self, state: ParticleState) -> &MovementBehavior {
        match state {
            ParticleState::Spreading => &self.spreading,
            ParticleState::Seeking => &self.seeking,
            ParticleState::Caravan => &self.caravan,
            ParticleState::Guarding => &self.guarding,
        }
    }

    /// All four behaviors, for uniform traversal.
    #[must_use]
    pub fn behaviors(&self) -> [&MovementBehavior; 4] {
        [&self.spreading, &self.seeking, &self.caravan, &self.guarding]
    }

    /// All four behaviors, for uniform traversal by variation operators.
    pub fn behaviors_mut(&mut self) -> [&mut MovementBehavior; 4] {
        [
            &mut self.spreading,
            &mut self.seeking,
            &mut self.caravan,
            &mut self.guarding,
        ]
    }

    /// The largest finite perception radius across all states.
    #[must_use]
    pub fn max_radius(&self) -> f64 {
        self.behaviors()
            .into_iter()
            .map(MovementBehavior::max_radius)
            .fold(0.0, f64::max)
    }

    /// Draws a random genotype for the initial population.
    ///
    /// Weights are uniform in [0, 1] rounded to three decimals, radii are
    /// integers in [50, 400), and angles integers in [30, 360); guard
    /// thresholds start at zero.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut genotype = Self::default();
        for behavior in genotype.behaviors_mut() {
            for component in behavior.components.values_mut() {
                component.weight = (rng.random_range(0.0_f64..=1.0) * 1000.0).round() / 1000.0;
                component.radius = Some(f64::from(rng.random_range(50..400)));
                component.alpha = f64::from(rng.random_range(30..360));
            }
        }
        genotype
    }
}

impl Default for Genotype {
    /// The hand-tuned reference parameter set.
    fn default() -> Self {
        use ComponentKind::*;

        let component = VelocityComponent::new;
        Self {
            home_guard_threshold: 0,
            depo_guard_threshold: 0,
            spreading: MovementBehavior::new([
                (Avoidance, component(1, 0.66, Some(100.0), 180.0)),
                (Separation, component(2, 0.83, Some(150.0), 180.0)),
                (Clearance, component(3, 0.83, Some(150.0), 115.0)),
                (Alignment, component(4, 0.83, Some(250.0), 115.0)),
                (Cohesion, component(5, 0.83, Some(300.0), 360.0)),
            ]),
            seeking: MovementBehavior::new([
                (Avoidance, component(1, 0.83, Some(100.0), 180.0)),
                (Seek, component(2, 0.66, Some(250.0), 360.0)),
                (Separation, component(3, 0.25, Some(50.0), 90.0)),
            ]),
            caravan: MovementBehavior::new([
                (Avoidance, component(1, 0.83, Some(100.0), 180.0)),
                (Homing, component(2, 0.83, None, 360.0)),
                (Separation, component(3, 0.83, Some(100.0), 180.0)),
                (Clearance, component(4, 0.83, Some(150.0), 60.0)),
            ]),
            guarding: MovementBehavior::new([
                (Avoidance, component(1, 1.0, Some(100.0), 180.0)),
                (Separation, component(2, 0.62, Some(50.0), 180.0)),
                (MineralCohesion, component(3, 0.62, Some(150.0), 360.0)),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_follows_priority() {
        let genotype = Genotype::default();
        let priorities: Vec<u32> = genotype
            .spreading
            .ordered()
            .map(|(_, c)| c.priority)
            .collect();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_max_radius_ignores_unbounded_homing() {
        let genotype = Genotype::default();
        assert_eq!(genotype.caravan.max_radius(), 150.0);
        assert_eq!(genotype.max_radius(), 300.0);
    }

    #[test]
    fn test_random_genotype_within_generation_bounds() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let genotype = Genotype::random(&mut rng);
            for behavior in [
                &genotype.spreading,
                &genotype.seeking,
                &genotype.caravan,
                &genotype.guarding,
            ] {
                for component in behavior.components.values() {
                    assert!((0.0..=1.0).contains(&component.weight));
                    let radius = component.radius.unwrap();
                    assert!((50.0..400.0).contains(&radius));
                    assert!((30.0..360.0).contains(&component.alpha));
                }
            }
        }
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let genotype = Genotype::random(&mut rand::rng());
        let first = serde_json::to_string(&genotype).unwrap();
        let second = serde_json::to_string(&genotype.clone()).unwrap();
        assert_eq!(first, second);

        let reloaded: Genotype = serde_json::from_str(&first).unwrap();
        assert_eq!(reloaded, genotype);
    }
}
