use serde::{Deserialize, Serialize};

use super::particle::Team;
use crate::core::Vec2;

/// Stable identifier of a resource within a [`World`](super::World).
///
/// Particles remember targets by id and look them up through the world's
/// resource table, so a stale id degrades to "not found" instead of a
/// dangling reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub(crate) usize);

impl ResourceId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A stationary particle holding a resource stash.
///
/// Mineral deposits carry [`Team::Mineral`]; home bases carry their owning
/// team and start with an empty stash. Resources never move and are exempt
/// from the tick update/commit protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceParticle {
    position: Vec2,
    team: Team,
    stash: u64,
}

impl ResourceParticle {
    #[must_use]
    pub const fn new(position: Vec2, team: Team, stash: u64) -> Self {
        Self {
            position,
            team,
            stash,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    #[must_use]
    pub const fn stash(&self) -> u64 {
        self.stash
    }

    /// Takes one unit from the stash. Returns whether anything remained to
    /// take; once the stash is empty every further call returns `false`.
    pub const fn mine(&mut self) -> bool {
        if self.stash > 0 {
            self.stash -= 1;
            true
        } else {
            false
        }
    }

    /// Adds one unit to the stash (a caravan delivering to a home base).
    /// Always succeeds.
    pub const fn drop_off(&mut self) -> bool {
        self.stash += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mine_succeeds_exactly_stash_times() {
        let mut deposit = ResourceParticle::new(Vec2::ZERO, Team::Mineral, 3);
        for _ in 0..3 {
            assert!(deposit.mine());
        }
        assert!(!deposit.mine());
        assert!(!deposit.mine());
        assert_eq!(deposit.stash(), 0);
    }

    #[test]
    fn test_drop_off_always_succeeds() {
        let mut home = ResourceParticle::new(Vec2::ZERO, Team::Ally, 0);
        for expected in 1..=5 {
            assert!(home.drop_off());
            assert_eq!(home.stash(), expected);
        }
    }
}
