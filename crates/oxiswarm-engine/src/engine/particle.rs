use serde::{Deserialize, Serialize};

use super::{
    behavior::{ComponentKind, MovementBehavior, VelocityComponent},
    config::SimConfig,
    resource::{ResourceId, ResourceParticle},
    world::{Arena, Neighbor, Neighborhood},
};
use crate::{SimulationError, core::Vec2};

/// Team affiliation of an agent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Ally,
    Enemy,
    Mineral,
}

impl Team {
    /// The team this team's avoidance component flees from.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Ally => Self::Enemy,
            Self::Enemy => Self::Ally,
            Self::Mineral => Self::Mineral,
        }
    }
}

/// Behavioral state of a particle's finite-state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleState {
    /// Fanning out in search of mineral deposits.
    Spreading,
    /// Heading to a known deposit.
    Seeking,
    /// Carrying a mined unit back to the home base.
    Caravan,
    /// Holding position near the home base or a deposit.
    Guarding,
}

/// The double-buffered kinematic fields of a particle.
///
/// One `Kinematics` value is the committed previous-tick snapshot every
/// other agent reads; a second is filled in as the shadow during planning
/// and swapped in at commit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    pub state: ParticleState,
    pub target: Option<ResourceId>,
    pub loaded: bool,
}

/// State-machine transition selected during planning.
///
/// Planning only reads committed state; transitions that mutate a resource
/// (mining, delivering) are described here and applied by the world, which
/// owns the resource table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransitionIntent {
    /// Remain in the current state.
    Stay,
    /// A spreading particle spotted this deposit.
    Discover(ResourceId),
    /// A seeking particle reached its deposit and will attempt to mine it.
    Arrive(ResourceId),
    /// A caravan particle reached home and will drop its load.
    Deliver(ResourceId),
    /// The particle's target no longer exists.
    Lost(ResourceId),
}

/// Per-particle view of the world for one planning step.
pub(crate) struct TickContext<'a> {
    pub config: &'a SimConfig,
    pub behavior: &'a MovementBehavior,
    pub hood: Neighborhood,
    pub resources: &'a [ResourceParticle],
    pub arena: Arena,
}

/// An autonomous flocking agent.
///
/// A particle owns its kinematic state and computes its own next-tick
/// velocity, position, and state; the [`World`](super::World) owning it
/// supplies the neighbor context and drives the update/commit protocol.
#[derive(Debug, Clone)]
pub struct Particle {
    team: Team,
    home: Option<ResourceId>,
    current: Kinematics,
    shadow: Option<Kinematics>,
    memory: Vec<ResourceId>,
}

impl Particle {
    #[must_use]
    pub fn new(position: Vec2, velocity: Vec2, team: Team) -> Self {
        Self {
            team,
            home: None,
            current: Kinematics {
                position,
                velocity,
                state: ParticleState::Spreading,
                target: None,
                loaded: false,
            },
            shadow: None,
            memory: Vec::new(),
        }
    }

    /// Sets the home base this particle delivers to.
    #[must_use]
    pub fn with_home(mut self, home: ResourceId) -> Self {
        self.home = Some(home);
        self
    }

    /// Puts the particle in the given initial state.
    #[must_use]
    pub fn with_state(mut self, state: ParticleState) -> Self {
        self.current.state = state;
        self
    }

    /// Sets the particle's initial target.
    #[must_use]
    pub fn with_target(mut self, target: ResourceId) -> Self {
        self.current.target = Some(target);
        self
    }

    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.current.position
    }

    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.current.velocity
    }

    #[must_use]
    pub const fn state(&self) -> ParticleState {
        self.current.state
    }

    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    #[must_use]
    pub const fn target(&self) -> Option<ResourceId> {
        self.current.target
    }

    #[must_use]
    pub const fn loaded(&self) -> bool {
        self.current.loaded
    }

    #[must_use]
    pub const fn home(&self) -> Option<ResourceId> {
        self.home
    }

    /// Deposits this particle remembers, most recently seen last.
    #[must_use]
    pub fn memory(&self) -> &[ResourceId] {
        &self.memory
    }

    /// Computes the shadow kinematics and the state transition for this tick
    /// without touching any committed field.
    pub(crate) fn plan(
        &self,
        ctx: &TickContext<'_>,
    ) -> Result<(Kinematics, TransitionIntent), SimulationError> {
        let velocity = self.next_velocity(ctx)?;
        let position = ctx.arena.wrap(self.position() + velocity);
        let shadow = Kinematics {
            position,
            velocity,
            ..self.current
        };
        Ok((shadow, self.transition_intent(ctx)))
    }

    /// Weighted sum of the active behavior's components on top of the
    /// previous velocity, clamped to the maximum speed.
    fn next_velocity(&self, ctx: &TickContext<'_>) -> Result<Vec2, SimulationError> {
        let mut velocity = self.velocity();
        for (kind, component) in ctx.behavior.ordered() {
            let contribution = self.component_velocity(kind, component, ctx)?;
            velocity = velocity + contribution * component.weight;
        }
        Ok(velocity.clamp_length(ctx.config.maximum_velocity))
    }

    fn component_velocity(
        &self,
        kind: ComponentKind,
        component: &VelocityComponent,
        ctx: &TickContext<'_>,
    ) -> Result<Vec2, SimulationError> {
        match kind {
            ComponentKind::Cohesion => self.centroid_pull(kind, component, ctx, self.team),
            ComponentKind::MineralCohesion => {
                self.centroid_pull(kind, component, ctx, Team::Mineral)
            }
            ComponentKind::Separation => self.separation(kind, component, ctx),
            ComponentKind::Alignment => self.alignment(kind, component, ctx),
            ComponentKind::Avoidance => self.avoidance(kind, component, ctx),
            ComponentKind::Clearance => self.clearance(kind, component, ctx),
            ComponentKind::Seek | ComponentKind::Homing => self.steer_to_target(kind, ctx),
        }
    }

    /// Direction toward the centroid of `team` neighbors, scaled by
    /// (‖Δ‖ / r)².
    fn centroid_pull(
        &self,
        kind: ComponentKind,
        component: &VelocityComponent,
        ctx: &TickContext<'_>,
        team: Team,
    ) -> Result<Vec2, SimulationError> {
        let radius = radius(kind, component)?;
        let Some(centroid) = ctx
            .hood
            .centroid(ctx.hood.select(radius, component.alpha, Some(team)))
        else {
            return Ok(Vec2::ZERO);
        };
        let delta = centroid - self.position();
        let scale = (delta.length() / radius).powi(2);
        Ok(delta.unit() * (ctx.config.maximum_velocity * scale))
    }

    /// Direction away from the same-team centroid, scaled by
    /// ((r − ‖Δ‖) / r)².
    fn separation(
        &self,
        kind: ComponentKind,
        component: &VelocityComponent,
        ctx: &TickContext<'_>,
    ) -> Result<Vec2, SimulationError> {
        let radius = radius(kind, component)?;
        let Some(centroid) = ctx
            .hood
            .centroid(ctx.hood.select(radius, component.alpha, Some(self.team)))
        else {
            return Ok(Vec2::ZERO);
        };
        let delta = centroid - self.position();
        let scale = ((radius - delta.length()) / radius).powi(2);
        Ok(-(delta.unit() * (ctx.config.maximum_velocity * scale)))
    }

    /// Direction of the average heading of same-team neighbors that are not
    /// themselves hauling resources.
    fn alignment(
        &self,
        kind: ComponentKind,
        component: &VelocityComponent,
        ctx: &TickContext<'_>,
    ) -> Result<Vec2, SimulationError> {
        let radius = radius(kind, component)?;
        let neighbors: Vec<&Neighbor> = ctx
            .hood
            .select(radius, component.alpha, Some(self.team))
            .filter(|n| n.state != ParticleState::Caravan)
            .collect();
        let Some(centroid) = ctx.hood.centroid(neighbors.iter().copied()) else {
            return Ok(Vec2::ZERO);
        };

        let scale = ((centroid - self.position()).length() / radius).powi(2);
        #[expect(clippy::cast_precision_loss)]
        let inv_len = 1.0 / neighbors.len() as f64;
        let average_heading = neighbors
            .iter()
            .fold(Vec2::ZERO, |acc, n| acc + n.velocity)
            * inv_len;
        Ok(average_heading.unit() * (ctx.config.maximum_velocity * scale))
    }

    /// Direction away from the nearest opposing-team neighbor, scaled by
    /// ((r − ‖Δ‖) / r)².
    fn avoidance(
        &self,
        kind: ComponentKind,
        component: &VelocityComponent,
        ctx: &TickContext<'_>,
    ) -> Result<Vec2, SimulationError> {
        let radius = radius(kind, component)?;
        let Some(threat) =
            ctx.hood
                .nearest(radius, component.alpha, Some(self.team.opponent()))
        else {
            return Ok(Vec2::ZERO);
        };
        let delta = threat.rel_position - self.position();
        let scale = ((radius - delta.length()) / radius).powi(2);
        Ok(-(delta.unit() * (ctx.config.maximum_velocity * scale)))
    }

    /// Orthogonal slide, emitted only while at least one same-team neighbor
    /// is in range.
    fn clearance(
        &self,
        kind: ComponentKind,
        component: &VelocityComponent,
        ctx: &TickContext<'_>,
    ) -> Result<Vec2, SimulationError> {
        let radius = radius(kind, component)?;
        if ctx
            .hood
            .select(radius, component.alpha, Some(self.team))
            .next()
            .is_some()
        {
            Ok(self.velocity().orthogonal() * ctx.config.maximum_velocity)
        } else {
            Ok(Vec2::ZERO)
        }
    }

    /// Unit direction toward the current target's wraparound-relative
    /// position, at full speed.
    fn steer_to_target(
        &self,
        kind: ComponentKind,
        ctx: &TickContext<'_>,
    ) -> Result<Vec2, SimulationError> {
        let id = self
            .target()
            .ok_or(SimulationError::MissingTarget { kind })?;
        let Some(resource) = ctx.resources.get(id.index()) else {
            // Stale target; the state machine reverts to spreading this tick.
            return Ok(Vec2::ZERO);
        };
        let rel = ctx
            .arena
            .relative_position(self.position(), resource.position());
        Ok((rel - self.position()).unit() * ctx.config.maximum_velocity)
    }

    /// Evaluates the finite-state machine against the committed snapshot.
    fn transition_intent(&self, ctx: &TickContext<'_>) -> TransitionIntent {
        match self.state() {
            ParticleState::Guarding => TransitionIntent::Stay,
            ParticleState::Spreading => {
                match ctx.hood.nearest(
                    ctx.config.discovery_radius,
                    ctx.config.discovery_alpha,
                    Some(Team::Mineral),
                ) {
                    Some(deposit) => match deposit.reference.resource_id() {
                        Some(id) => TransitionIntent::Discover(id),
                        None => TransitionIntent::Stay,
                    },
                    None => TransitionIntent::Stay,
                }
            }
            ParticleState::Seeking => self.arrival_intent(ctx, TransitionIntent::Arrive),
            ParticleState::Caravan => self.arrival_intent(ctx, TransitionIntent::Deliver),
        }
    }

    fn arrival_intent(
        &self,
        ctx: &TickContext<'_>,
        arrived: fn(ResourceId) -> TransitionIntent,
    ) -> TransitionIntent {
        let Some(id) = self.target() else {
            return TransitionIntent::Stay;
        };
        let Some(resource) = ctx.resources.get(id.index()) else {
            return TransitionIntent::Lost(id);
        };
        let rel = ctx
            .arena
            .relative_position(self.position(), resource.position());
        if self.position().distance(rel) < ctx.config.arrival_radius {
            arrived(id)
        } else {
            TransitionIntent::Stay
        }
    }

    pub(crate) fn set_shadow(&mut self, shadow: Kinematics) {
        self.shadow = Some(shadow);
    }

    /// Swaps the shadow fields into the committed fields. A particle that
    /// was not updated this tick keeps its committed state.
    pub(crate) fn commit(&mut self) {
        if let Some(shadow) = self.shadow.take() {
            self.current = shadow;
        }
    }

    pub(crate) fn memory_push(&mut self, id: ResourceId) {
        self.memory.push(id);
    }

    pub(crate) fn memory_pop(&mut self) -> Option<ResourceId> {
        self.memory.pop()
    }

    pub(crate) fn memory_top(&self) -> Option<ResourceId> {
        self.memory.last().copied()
    }

    pub(crate) fn memory_forget(&mut self, id: ResourceId) {
        self.memory.retain(|remembered| *remembered != id);
    }
}

fn radius(kind: ComponentKind, component: &VelocityComponent) -> Result<f64, SimulationError> {
    component
        .radius
        .ok_or(SimulationError::UnboundedRadius { kind })
}
