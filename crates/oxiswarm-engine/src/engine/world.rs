use rand::Rng as _;

use super::{
    behavior::Genotype,
    config::SimConfig,
    particle::{Kinematics, Particle, ParticleState, Team, TickContext, TransitionIntent},
    resource::{ResourceId, ResourceParticle},
    seed::WorldSeed,
};
use crate::{SimulationError, core::Vec2};

/// The fixed-size toroidal arena.
///
/// Both axes wrap around, so every distance and direction is measured along
/// the shorter of the direct and wrapped paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    size: Vec2,
}

impl Arena {
    #[must_use]
    pub const fn new(side: f64) -> Self {
        Self {
            size: Vec2::new(side, side),
        }
    }

    #[must_use]
    pub const fn size(self) -> Vec2 {
        self.size
    }

    /// Wraps a point back into the arena, componentwise.
    #[must_use]
    pub fn wrap(self, point: Vec2) -> Vec2 {
        Vec2::new(point.x.rem_euclid(self.size.x), point.y.rem_euclid(self.size.y))
    }

    /// The position an observer at `observer` perceives `other` at.
    ///
    /// Whenever the raw difference on an axis exceeds half the arena, the
    /// other point is translated by one arena length toward the observer, so
    /// the returned position is the nearest periodic image of `other`.
    #[must_use]
    pub fn relative_position(self, observer: Vec2, other: Vec2) -> Vec2 {
        let mut rel = other;
        if (other.x - observer.x).abs() > self.size.x / 2.0 {
            rel.x += if other.x > observer.x {
                -self.size.x
            } else {
                self.size.x
            };
        }
        if (other.y - observer.y).abs() > self.size.y / 2.0 {
            rel.y += if other.y > observer.y {
                -self.size.y
            } else {
                self.size.y
            };
        }
        rel
    }
}

/// What a cached neighbor entry points back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborRef {
    /// Index of a mover in the world's particle collection.
    Mover(usize),
    /// A resource (deposit or home base).
    Resource(ResourceId),
}

impl NeighborRef {
    #[must_use]
    pub const fn resource_id(self) -> Option<ResourceId> {
        match self {
            Self::Resource(id) => Some(id),
            Self::Mover(_) => None,
        }
    }
}

/// Snapshot of one agent as seen by an observer, with the wraparound-relative
/// position and distance precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub reference: NeighborRef,
    pub team: Team,
    pub state: ParticleState,
    pub velocity: Vec2,
    pub rel_position: Vec2,
    pub distance: f64,
}

/// The cached candidate neighbor set of one observer for one tick.
///
/// The world computes this once per agent per tick against the largest
/// radius any configured behavior uses, so each behavior component only
/// filters a small cached set by its own radius, field of view, and team
/// instead of sweeping the whole agent collection again.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    observer_position: Vec2,
    observer_velocity: Vec2,
    entries: Vec<Neighbor>,
}

impl Neighborhood {
    #[must_use]
    pub(crate) const fn new(
        observer_position: Vec2,
        observer_velocity: Vec2,
        entries: Vec<Neighbor>,
    ) -> Self {
        Self {
            observer_position,
            observer_velocity,
            entries,
        }
    }

    /// Whether a candidate lies within `radius` and inside the symmetric
    /// field-of-view cone of `alpha` degrees about the observer's heading.
    fn in_sight(&self, neighbor: &Neighbor, radius: f64, alpha: f64) -> bool {
        if neighbor.distance > radius {
            return false;
        }
        let delta = neighbor.rel_position - self.observer_position;
        self.observer_velocity.angle(delta).to_degrees() <= alpha / 2.0
    }

    /// Candidates matching a component's radius, field of view, and team
    /// filter. `None` team matches any.
    pub fn select(
        &self,
        radius: f64,
        alpha: f64,
        team: Option<Team>,
    ) -> impl Iterator<Item = &Neighbor> {
        self.entries.iter().filter(move |neighbor| {
            team.is_none_or(|team| neighbor.team == team)
                && self.in_sight(neighbor, radius, alpha)
        })
    }

    /// The minimum-distance candidate matching the filter, if any.
    #[must_use]
    pub fn nearest(&self, radius: f64, alpha: f64, team: Option<Team>) -> Option<&Neighbor> {
        self.select(radius, alpha, team)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Centroid of the relative positions of the given candidates, or `None`
    /// when there are none.
    #[must_use]
    pub fn centroid<'a, I>(&self, neighbors: I) -> Option<Vec2>
    where
        I: IntoIterator<Item = &'a Neighbor>,
    {
        let mut sum = Vec2::ZERO;
        let mut count = 0usize;
        for neighbor in neighbors {
            sum = sum + neighbor.rel_position;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        #[expect(clippy::cast_precision_loss)]
        let inverse = 1.0 / count as f64;
        Some(sum * inverse)
    }
}

/// The periodic arena and the full agent collection, advanced one discrete
/// tick at a time.
///
/// The world guarantees the compute-all-then-commit-all protocol: every
/// particle plans against the previous tick's committed snapshot before any
/// particle's new state becomes visible, so the outcome of a tick does not
/// depend on update order.
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    arena: Arena,
    ally_genotype: Genotype,
    enemy_genotype: Genotype,
    movers: Vec<Particle>,
    resources: Vec<ResourceParticle>,
    deposits: Vec<ResourceId>,
    ally_home: Option<ResourceId>,
    enemy_home: Option<ResourceId>,
    rmax: f64,
    time: u64,
}

impl World {
    /// Builds a fully populated world: both home bases, `deposits` mineral
    /// deposits at seeded-random positions, and both teams deployed in a
    /// circle around their homes.
    ///
    /// The genotypes' guard thresholds assign the leading particles of each
    /// team to guard duty: `home_guard_threshold` of them hold at the home
    /// base and the next `depo_guard_threshold` are spread over the deposits.
    #[must_use]
    pub fn new(config: SimConfig, ally: Genotype, enemy: Genotype, seed: WorldSeed) -> Self {
        let mut rng = seed.rng();
        let mut world = Self::empty(config, ally, enemy);

        let size = world.arena.size();
        for _ in 0..world.config.deposits {
            let position = Vec2::new(
                rng.random_range(0.0..size.x),
                rng.random_range(0.0..size.y),
            );
            let id = world.insert_resource(ResourceParticle::new(
                position,
                Team::Mineral,
                world.config.stash_size,
            ));
            world.deposits.push(id);
        }

        let ally_home = world.insert_resource(ResourceParticle::new(
            world.config.ally_home,
            Team::Ally,
            0,
        ));
        world.ally_home = Some(ally_home);
        let enemy_home = world.insert_resource(ResourceParticle::new(
            world.config.enemy_home,
            Team::Enemy,
            0,
        ));
        world.enemy_home = Some(enemy_home);

        world.deploy_team(Team::Ally, ally_home, &mut rng);
        world.deploy_team(Team::Enemy, enemy_home, &mut rng);
        world
    }

    /// A world with no agents, for incremental construction.
    #[must_use]
    pub fn empty(config: SimConfig, ally: Genotype, enemy: Genotype) -> Self {
        let arena = Arena::new(config.world_size);
        let rmax = ally
            .max_radius()
            .max(enemy.max_radius())
            .max(config.discovery_radius);
        Self {
            config,
            arena,
            ally_genotype: ally,
            enemy_genotype: enemy,
            movers: Vec::new(),
            resources: Vec::new(),
            deposits: Vec::new(),
            ally_home: None,
            enemy_home: None,
            rmax,
            time: 0,
        }
    }

    fn deploy_team<R>(&mut self, team: Team, home: ResourceId, rng: &mut R)
    where
        R: rand::Rng + ?Sized,
    {
        let genotype = self.genotype_for(team);
        let home_guards = usize::from(genotype.home_guard_threshold);
        let depo_guards = usize::from(genotype.depo_guard_threshold);
        let center = self.resources[home.index()].position();
        let count = self.config.team_size;

        for i in 0..count {
            #[expect(clippy::cast_precision_loss)]
            let theta = std::f64::consts::TAU * (i as f64) / (count.max(1) as f64);
            let reach = self.config.deploy_radius * rng.random::<f64>();
            let position = self
                .arena
                .wrap(center + Vec2::new(reach * theta.cos(), reach * theta.sin()));
            let vmax = self.config.maximum_velocity;
            let velocity = if vmax > 0.0 {
                Vec2::new(rng.random_range(0.0..vmax), rng.random_range(0.0..vmax))
            } else {
                Vec2::ZERO
            };

            let mut particle = Particle::new(position, velocity, team).with_home(home);
            if i < home_guards {
                particle = particle.with_state(ParticleState::Guarding).with_target(home);
            } else if i < home_guards + depo_guards && !self.deposits.is_empty() {
                let deposit = self.deposits[(i - home_guards) % self.deposits.len()];
                particle = particle
                    .with_state(ParticleState::Guarding)
                    .with_target(deposit);
            }
            self.insert_particle(particle);
        }
    }

    /// Adds a mover; returns its index.
    pub fn insert_particle(&mut self, particle: Particle) -> usize {
        self.movers.push(particle);
        self.movers.len() - 1
    }

    /// Adds a resource; returns its id.
    pub fn insert_resource(&mut self, resource: ResourceParticle) -> ResourceId {
        self.resources.push(resource);
        ResourceId(self.resources.len() - 1)
    }

    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub const fn arena(&self) -> Arena {
        self.arena
    }

    /// Completed ticks since construction.
    #[must_use]
    pub const fn time(&self) -> u64 {
        self.time
    }

    #[must_use]
    pub fn movers(&self) -> &[Particle] {
        &self.movers
    }

    #[must_use]
    pub fn resources(&self) -> &[ResourceParticle] {
        &self.resources
    }

    #[must_use]
    pub fn resource(&self, id: ResourceId) -> Option<&ResourceParticle> {
        self.resources.get(id.index())
    }

    #[must_use]
    pub fn ally_home_stash(&self) -> u64 {
        self.home_stash(self.ally_home)
    }

    #[must_use]
    pub fn enemy_home_stash(&self) -> u64 {
        self.home_stash(self.enemy_home)
    }

    fn home_stash(&self, home: Option<ResourceId>) -> u64 {
        home.and_then(|id| self.resource(id))
            .map_or(0, ResourceParticle::stash)
    }

    /// One instrumentation row: ally home stash, enemy home stash, then each
    /// deposit's remaining stash.
    #[must_use]
    pub fn status(&self) -> Vec<u64> {
        let mut row = vec![self.ally_home_stash(), self.enemy_home_stash()];
        row.extend(
            self.deposits
                .iter()
                .filter_map(|id| self.resource(*id))
                .map(ResourceParticle::stash),
        );
        row
    }

    #[must_use]
    const fn genotype_for(&self, team: Team) -> &Genotype {
        match team {
            Team::Enemy => &self.enemy_genotype,
            Team::Ally | Team::Mineral => &self.ally_genotype,
        }
    }

    /// The cached candidate neighbor set of one mover, computed against the
    /// largest configured radius with a full 360° view.
    #[must_use]
    pub fn neighborhood(&self, observer: usize) -> Neighborhood {
        let observer_particle = &self.movers[observer];
        let position = observer_particle.position();
        let mut entries = Vec::new();

        for (index, other) in self.movers.iter().enumerate() {
            if index == observer {
                continue;
            }
            self.push_candidate(
                &mut entries,
                position,
                NeighborRef::Mover(index),
                other.team(),
                other.state(),
                other.velocity(),
                other.position(),
            );
        }
        for (index, resource) in self.resources.iter().enumerate() {
            // Resources are stationary; they expose a fixed placeholder
            // heading so alignment averages stay well-defined.
            self.push_candidate(
                &mut entries,
                position,
                NeighborRef::Resource(ResourceId(index)),
                resource.team(),
                ParticleState::Spreading,
                Vec2::new(0.0, 1.0),
                resource.position(),
            );
        }

        Neighborhood::new(position, observer_particle.velocity(), entries)
    }

    #[expect(clippy::too_many_arguments)]
    fn push_candidate(
        &self,
        entries: &mut Vec<Neighbor>,
        observer: Vec2,
        reference: NeighborRef,
        team: Team,
        state: ParticleState,
        velocity: Vec2,
        position: Vec2,
    ) {
        let rel_position = self.arena.relative_position(observer, position);
        let distance = observer.distance(rel_position);
        if distance <= self.rmax {
            entries.push(Neighbor {
                reference,
                team,
                state,
                velocity,
                rel_position,
                distance,
            });
        }
    }

    /// The minimum-distance agent an observer sees under the given filter.
    #[must_use]
    pub fn find_nearest(
        &self,
        observer: usize,
        radius: f64,
        alpha: f64,
        team: Option<Team>,
    ) -> Option<Neighbor> {
        self.neighborhood(observer)
            .nearest(radius, alpha, team)
            .copied()
    }

    /// Advances the simulation one tick.
    ///
    /// Every mover plans its shadow state against the committed snapshot,
    /// then all shadows are committed at once and the tick counter advances.
    /// Resources take no part in the update/commit protocol.
    pub fn tick(&mut self) -> Result<(), SimulationError> {
        for index in 0..self.movers.len() {
            let (shadow, intent) = {
                let mover = &self.movers[index];
                let behavior = self.genotype_for(mover.team()).behavior(mover.state());
                let ctx = TickContext {
                    config: &self.config,
                    behavior,
                    hood: self.neighborhood(index),
                    resources: &self.resources,
                    arena: self.arena,
                };
                mover.plan(&ctx)?
            };
            let shadow = self.apply_intent(index, shadow, intent);
            self.movers[index].set_shadow(shadow);
        }

        for mover in &mut self.movers {
            mover.commit();
        }
        self.time += 1;
        Ok(())
    }

    /// Applies a state transition, performing the mining/delivery side
    /// effects on the resource table.
    fn apply_intent(
        &mut self,
        index: usize,
        mut shadow: Kinematics,
        intent: TransitionIntent,
    ) -> Kinematics {
        match intent {
            TransitionIntent::Stay => {}
            TransitionIntent::Discover(id) => {
                self.movers[index].memory_push(id);
                shadow.target = Some(id);
                shadow.state = ParticleState::Seeking;
            }
            TransitionIntent::Arrive(id) => {
                let mined = self.resources[id.index()].mine();
                shadow.loaded = mined;
                if mined {
                    shadow.target = self.movers[index].home();
                    shadow.state = ParticleState::Caravan;
                } else {
                    // Exhausted deposit: drop it and fall back to the next
                    // remembered one.
                    self.movers[index].memory_pop();
                    self.retarget_from_memory(index, &mut shadow);
                }
            }
            TransitionIntent::Deliver(id) => {
                self.resources[id.index()].drop_off();
                shadow.loaded = false;
                self.retarget_from_memory(index, &mut shadow);
            }
            TransitionIntent::Lost(id) => {
                self.movers[index].memory_forget(id);
                shadow.target = None;
                shadow.state = ParticleState::Spreading;
            }
        }
        shadow
    }

    fn retarget_from_memory(&self, index: usize, shadow: &mut Kinematics) {
        match self.movers[index].memory_top() {
            Some(next) => {
                shadow.target = Some(next);
                shadow.state = ParticleState::Seeking;
            }
            None => {
                shadow.target = None;
                shadow.state = ParticleState::Spreading;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SimConfig {
        SimConfig {
            world_size: 1000.0,
            ..SimConfig::default()
        }
    }

    fn empty_world() -> World {
        World::empty(test_config(), Genotype::default(), Genotype::default())
    }

    fn mover(world: &mut World, x: f64, y: f64, vx: f64, vy: f64, team: Team) -> usize {
        world.insert_particle(Particle::new(Vec2::new(x, y), Vec2::new(vx, vy), team))
    }

    mod arena {
        use super::*;

        #[test]
        fn test_wrap_is_periodic() {
            let arena = Arena::new(1000.0);
            assert_eq!(arena.wrap(Vec2::new(1010.0, -20.0)), Vec2::new(10.0, 980.0));
            assert_eq!(arena.wrap(Vec2::new(500.0, 0.0)), Vec2::new(500.0, 0.0));
        }

        #[test]
        fn test_relative_position_crosses_boundary() {
            let arena = Arena::new(1000.0);
            let rel = arena.relative_position(Vec2::new(10.0, 10.0), Vec2::new(990.0, 990.0));
            assert_eq!(rel, Vec2::new(-10.0, -10.0));
        }

        #[test]
        fn test_relative_position_direct_path() {
            let arena = Arena::new(1000.0);
            let rel = arena.relative_position(Vec2::new(100.0, 100.0), Vec2::new(300.0, 250.0));
            assert_eq!(rel, Vec2::new(300.0, 250.0));
        }
    }

    mod neighbor_search {
        use super::*;

        #[test]
        fn test_periodic_neighborhood() {
            let mut world = empty_world();
            mover(&mut world, 10.0, 10.0, 5.0, 5.0, Team::Ally);
            mover(&mut world, 10.0, 990.0, 5.0, 5.0, Team::Ally);
            mover(&mut world, 990.0, 10.0, 5.0, 5.0, Team::Ally);
            mover(&mut world, 990.0, 990.0, 5.0, 5.0, Team::Ally);

            let seen = world.neighborhood(0).select(100.0, 360.0, None).count();
            assert_eq!(seen, 3);
        }

        #[test]
        fn test_wraparound_pair_find_each_other() {
            let mut world = empty_world();
            let a = mover(&mut world, 10.0, 10.0, 5.0, 5.0, Team::Ally);
            let b = mover(&mut world, 990.0, 990.0, 5.0, 5.0, Team::Ally);

            for (observer, expected) in [(a, b), (b, a)] {
                let hood = world.neighborhood(observer);
                let seen: Vec<_> = hood.select(100.0, 360.0, None).collect();
                assert_eq!(seen.len(), 1);
                assert_eq!(seen[0].reference, NeighborRef::Mover(expected));
            }
        }

        #[test]
        fn test_field_of_view_filters_by_heading() {
            let mut world = empty_world();
            mover(&mut world, 500.0, 500.0, 10.0, 0.0, Team::Ally);
            let ahead = mover(&mut world, 600.0, 500.0, 0.0, 0.0, Team::Ally);
            mover(&mut world, 400.0, 500.0, 0.0, 0.0, Team::Ally);

            let hood = world.neighborhood(0);
            let seen: Vec<_> = hood.select(300.0, 90.0, None).collect();
            assert_eq!(seen.len(), 1);
            assert_eq!(seen[0].reference, NeighborRef::Mover(ahead));
        }

        #[test]
        fn test_team_filter() {
            let mut world = empty_world();
            mover(&mut world, 500.0, 500.0, 10.0, 0.0, Team::Ally);
            mover(&mut world, 520.0, 500.0, 0.0, 0.0, Team::Ally);
            mover(&mut world, 540.0, 500.0, 0.0, 0.0, Team::Enemy);

            let hood = world.neighborhood(0);
            assert_eq!(hood.select(300.0, 360.0, Some(Team::Ally)).count(), 1);
            assert_eq!(hood.select(300.0, 360.0, Some(Team::Enemy)).count(), 1);
            assert_eq!(hood.select(300.0, 360.0, None).count(), 2);
        }

        #[test]
        fn test_find_nearest_across_boundary() {
            let mut world = empty_world();
            mover(&mut world, 10.0, 10.0, 5.0, 5.0, Team::Ally);
            let near = mover(&mut world, 990.0, 990.0, 5.0, 5.0, Team::Ally);
            mover(&mut world, 80.0, 10.0, 5.0, 5.0, Team::Ally);

            let nearest = world.find_nearest(0, 100.0, 360.0, None).unwrap();
            assert_eq!(nearest.reference, NeighborRef::Mover(near));
        }
    }

    mod state_machine {
        use super::*;

        #[test]
        fn test_spreading_discovers_mineral() {
            let mut world = empty_world();
            let deposit =
                world.insert_resource(ResourceParticle::new(Vec2::new(600.0, 500.0), Team::Mineral, 5));
            let index = mover(&mut world, 500.0, 500.0, 1.0, 0.0, Team::Ally);

            world.tick().unwrap();

            let particle = &world.movers()[index];
            assert_eq!(particle.state(), ParticleState::Seeking);
            assert_eq!(particle.target(), Some(deposit));
            assert_eq!(particle.memory(), &[deposit]);
        }

        #[test]
        fn test_seeking_arrival_mines_and_turns_home() {
            let mut world = empty_world();
            let home =
                world.insert_resource(ResourceParticle::new(Vec2::new(100.0, 100.0), Team::Ally, 0));
            let deposit =
                world.insert_resource(ResourceParticle::new(Vec2::new(505.0, 500.0), Team::Mineral, 1));
            let particle = Particle::new(Vec2::new(500.0, 500.0), Vec2::new(1.0, 0.0), Team::Ally)
                .with_home(home)
                .with_state(ParticleState::Seeking)
                .with_target(deposit);
            let index = world.insert_particle(particle);

            world.tick().unwrap();

            let particle = &world.movers()[index];
            assert_eq!(particle.state(), ParticleState::Caravan);
            assert_eq!(particle.target(), Some(home));
            assert!(particle.loaded());
            assert_eq!(world.resource(deposit).unwrap().stash(), 0);
        }

        #[test]
        fn test_seeking_exhausted_deposit_reverts_to_spreading() {
            let mut world = empty_world();
            let deposit =
                world.insert_resource(ResourceParticle::new(Vec2::new(505.0, 500.0), Team::Mineral, 0));
            let mut particle =
                Particle::new(Vec2::new(500.0, 500.0), Vec2::new(1.0, 0.0), Team::Ally)
                    .with_state(ParticleState::Seeking)
                    .with_target(deposit);
            particle.memory_push(deposit);
            let index = world.insert_particle(particle);

            world.tick().unwrap();

            let particle = &world.movers()[index];
            assert_eq!(particle.state(), ParticleState::Spreading);
            assert_eq!(particle.target(), None);
            assert!(particle.memory().is_empty());
            assert!(!particle.loaded());
        }

        #[test]
        fn test_caravan_delivery_returns_to_remembered_deposit() {
            let mut world = empty_world();
            let home =
                world.insert_resource(ResourceParticle::new(Vec2::new(500.0, 500.0), Team::Ally, 0));
            let deposit =
                world.insert_resource(ResourceParticle::new(Vec2::new(800.0, 800.0), Team::Mineral, 5));
            let mut particle =
                Particle::new(Vec2::new(505.0, 500.0), Vec2::new(-1.0, 0.0), Team::Ally)
                    .with_home(home)
                    .with_state(ParticleState::Caravan)
                    .with_target(home);
            particle.memory_push(deposit);
            let index = world.insert_particle(particle);

            world.tick().unwrap();

            let particle = &world.movers()[index];
            assert_eq!(world.resource(home).unwrap().stash(), 1);
            assert_eq!(particle.state(), ParticleState::Seeking);
            assert_eq!(particle.target(), Some(deposit));
            assert!(!particle.loaded());
        }
    }

    mod ticking {
        use super::*;

        #[test]
        fn test_tick_wraps_positions_and_counts() {
            let mut world = empty_world();
            let index = mover(&mut world, 999.0, 500.0, 50.0, 0.0, Team::Ally);

            world.tick().unwrap();

            assert_eq!(world.time(), 1);
            let position = world.movers()[index].position();
            assert!(position.x < 999.0, "position should have wrapped: {position:?}");
        }

        #[test]
        fn test_velocity_is_clamped_to_maximum() {
            let config = SimConfig {
                maximum_velocity: 10.0,
                ..test_config()
            };
            let mut world = World::empty(config, Genotype::default(), Genotype::default());
            // A tight cluster produces large separation contributions.
            for x in 0..5 {
                mover(&mut world, 500.0 + f64::from(x), 500.0, 5.0, 5.0, Team::Ally);
            }

            world.tick().unwrap();

            for particle in world.movers() {
                assert!(particle.velocity().length() <= 10.0 + 1e-9);
            }
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn test_new_world_is_fully_populated() {
            let config = test_config();
            let world = World::new(
                config.clone(),
                Genotype::default(),
                Genotype::default(),
                WorldSeed::new(7),
            );

            assert_eq!(world.movers().len(), config.team_size * 2);
            // Homes plus deposits.
            assert_eq!(world.resources().len(), config.deposits + 2);
            assert_eq!(world.status().len(), config.deposits + 2);
            assert_eq!(world.ally_home_stash(), 0);
        }

        #[test]
        fn test_same_seed_builds_identical_worlds() {
            let a = World::new(
                test_config(),
                Genotype::default(),
                Genotype::default(),
                WorldSeed::new(42),
            );
            let b = World::new(
                test_config(),
                Genotype::default(),
                Genotype::default(),
                WorldSeed::new(42),
            );

            for (x, y) in a.movers().iter().zip(b.movers()) {
                assert_eq!(x.position(), y.position());
                assert_eq!(x.velocity(), y.velocity());
            }
        }

        #[test]
        fn test_guard_thresholds_assign_guards() {
            let ally = Genotype {
                home_guard_threshold: 2,
                depo_guard_threshold: 1,
                ..Genotype::default()
            };
            let world = World::new(
                test_config(),
                ally,
                Genotype::default(),
                WorldSeed::new(3),
            );

            let guards = world
                .movers()
                .iter()
                .filter(|p| p.team() == Team::Ally && p.state() == ParticleState::Guarding)
                .count();
            assert_eq!(guards, 3);
            let enemy_guards = world
                .movers()
                .iter()
                .filter(|p| p.team() == Team::Enemy && p.state() == ParticleState::Guarding)
                .count();
            assert_eq!(enemy_guards, 0);
        }
    }
}
