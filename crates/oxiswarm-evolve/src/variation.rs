//! Genotype variation operators for the evolutionary driver.
//!
//! Two operators produce new genotypes from selected parents:
//!
//! - **Recombination**: [`average`] replaces a child's parameter tree with
//!   the componentwise mean of itself and a partner
//! - **Mutation**: [`mutate`] perturbs each scalar independently with a
//!   configured probability, within hard clamp bounds
//!
//! Every operator works on an owned genotype, so children can never share
//! mutable state with their parents or each other.
//!
//! # Clamp Bounds
//!
//! Mutation and recombination keep every scalar inside its documented
//! range: weights in [0, 1], radii in [1, 500], angles in [1, 359], and
//! guard thresholds in [0, 5]. An unbounded radius (homing) stays
//! unbounded; averaging a bounded radius with an unbounded one yields
//! unbounded.

use oxiswarm_engine::Genotype;
use rand::Rng;

/// Per-scalar mutation probability and step sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRates {
    /// Independent probability of perturbing each scalar.
    pub probability: f64,
    /// Maximum absolute weight offset (uniform in ±this).
    pub weight_step: f64,
    /// Maximum absolute radius offset (integer, uniform in ±this).
    pub radius_step: i32,
    /// Maximum absolute angle offset (integer, uniform in ±this).
    pub alpha_step: i32,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            probability: 0.2,
            weight_step: 0.2,
            radius_step: 20,
            alpha_step: 20,
        }
    }
}

/// Mutates a genotype in place.
///
/// Each guard threshold is nudged by ±1 (clamped to [0, 5]) with the
/// configured probability; each component's weight, radius, and angle is
/// independently perturbed by a uniform offset and clamped to its range.
pub fn mutate<R>(genotype: &mut Genotype, rates: &MutationRates, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if rng.random_bool(rates.probability) {
        genotype.home_guard_threshold = nudge_threshold(genotype.home_guard_threshold, rng);
    }
    if rng.random_bool(rates.probability) {
        genotype.depo_guard_threshold = nudge_threshold(genotype.depo_guard_threshold, rng);
    }

    for behavior in genotype.behaviors_mut() {
        for component in behavior.components.values_mut() {
            if rng.random_bool(rates.probability) {
                let offset = rng.random_range(-rates.weight_step..=rates.weight_step);
                component.weight = round3((component.weight + offset).clamp(0.0, 1.0));
            }
            if rng.random_bool(rates.probability)
                && let Some(radius) = component.radius
            {
                let offset = f64::from(rng.random_range(-rates.radius_step..=rates.radius_step));
                component.radius = Some((radius + offset).clamp(1.0, 500.0));
            }
            if rng.random_bool(rates.probability) {
                let offset = f64::from(rng.random_range(-rates.alpha_step..=rates.alpha_step));
                component.alpha = (component.alpha + offset).clamp(1.0, 359.0);
            }
        }
    }
}

/// Replaces `child`'s parameter tree with the componentwise average of
/// itself and `partner`.
///
/// Weights, radii, and angles are each averaged and clamped; guard
/// thresholds are left to mutation since they are small integers.
pub fn average(child: &mut Genotype, partner: &Genotype) {
    let partner_behaviors = partner.behaviors();
    for (mine, theirs) in child.behaviors_mut().into_iter().zip(partner_behaviors) {
        for (kind, component) in &mut mine.components {
            let Some(other) = theirs.components.get(kind) else {
                continue;
            };
            component.weight = round3(midpoint(component.weight, other.weight).clamp(0.0, 1.0));
            component.radius = match (component.radius, other.radius) {
                (Some(a), Some(b)) => Some(midpoint(a, b).clamp(1.0, 500.0)),
                _ => None,
            };
            component.alpha = midpoint(component.alpha, other.alpha).clamp(1.0, 359.0);
        }
    }
}

fn midpoint(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

fn nudge_threshold<R>(threshold: u8, rng: &mut R) -> u8
where
    R: Rng + ?Sized,
{
    if rng.random_bool(0.5) {
        (threshold + 1).min(5)
    } else {
        threshold.saturating_sub(1)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_probability_changes_nothing() {
        let mut rng = rand::rng();
        let original = Genotype::random(&mut rng);
        let rates = MutationRates {
            probability: 0.0,
            ..MutationRates::default()
        };

        let mut mutated = original.clone();
        for _ in 0..100 {
            mutate(&mut mutated, &rates, &mut rng);
        }
        assert_eq!(mutated, original);
    }

    #[test]
    fn test_mutation_respects_clamp_bounds() {
        let mut rng = rand::rng();
        let rates = MutationRates {
            probability: 1.0,
            ..MutationRates::default()
        };

        let mut genotype = Genotype::random(&mut rng);
        for _ in 0..500 {
            mutate(&mut genotype, &rates, &mut rng);
            assert!(genotype.home_guard_threshold <= 5);
            assert!(genotype.depo_guard_threshold <= 5);
            for behavior in genotype.behaviors() {
                for component in behavior.components.values() {
                    assert!((0.0..=1.0).contains(&component.weight));
                    let radius = component.radius.unwrap();
                    assert!((1.0..=500.0).contains(&radius));
                    assert!((1.0..=359.0).contains(&component.alpha));
                }
            }
        }
    }

    #[test]
    fn test_mutation_preserves_unbounded_radius() {
        let mut rng = rand::rng();
        let rates = MutationRates {
            probability: 1.0,
            ..MutationRates::default()
        };

        // The default genotype's homing component has no radius.
        let mut genotype = Genotype::default();
        for _ in 0..50 {
            mutate(&mut genotype, &rates, &mut rng);
        }
        let homing = &genotype.caravan.components[&oxiswarm_engine::ComponentKind::Homing];
        assert_eq!(homing.radius, None);
    }

    #[test]
    fn test_average_takes_componentwise_midpoint() {
        let mut a = Genotype::default();
        let b = Genotype::default();

        let kind = oxiswarm_engine::ComponentKind::Cohesion;
        let before_a = a.spreading.components[&kind];
        let before_b = b.spreading.components[&kind];

        average(&mut a, &b);

        let after = a.spreading.components[&kind];
        assert_eq!(after.weight, round3(midpoint(before_a.weight, before_b.weight)));
        assert_eq!(
            after.radius,
            Some(midpoint(before_a.radius.unwrap(), before_b.radius.unwrap()))
        );
        assert_eq!(after.alpha, midpoint(before_a.alpha, before_b.alpha));
    }
}
