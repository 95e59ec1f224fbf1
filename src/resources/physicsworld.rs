//! Rapier2D world owned by the simulation.
//!
//! [`PhysicsWorld`] bundles every piece of rapier state the pipeline needs
//! (`PhysicsPipeline::step` borrows all sets at once) together with the
//! bookkeeping that ties rapier handles back to ECS entities:
//!
//! - an entity → body map, the source of truth for "is this entity realized"
//! - a collider → [`FixtureTag`] table used to resolve contact events
//!
//! The world is always advanced by the fixed [`PHYSICS_DT`], never by the
//! variable frame delta.
//!
//! # Contact stream
//!
//! Rapier reports contacts to a single [`EventHandler`]. [`ContactSink`] is
//! that handler: it pushes raw events into a crossbeam channel during the
//! step, and [`PhysicsWorld::step`] drains and resolves them afterwards.
//! Fixture tags of destroyed bodies are retired only after the next step,
//! because rapier emits the matching end events during that step.
use std::num::NonZeroUsize;

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::Vec2;
use log::{debug, trace};
use rapier2d::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::physicsbody::{FixtureDef, PhysicsBody, RealizedBody, Shape};
use crate::events::contact::{Contact, ContactPhase, FixtureKind, FixtureRef};

/// Fixed simulation step in seconds.
pub const PHYSICS_DT: f32 = 1.0 / 60.0;
/// Solver (velocity) iterations per step.
pub const VELOCITY_ITERATIONS: usize = 6;
/// Stabilization (position) iterations per step.
pub const POSITION_ITERATIONS: usize = 6;

/// Filter group shared by every ordinary fixture. Fixtures in a negative group
/// never collide with each other.
pub const DEFAULT_FILTER_GROUP: i16 = -1;
/// Filter group of the player's fixtures.
pub const PLAYER_FILTER_GROUP: i16 = 1;

// Player feet geometry, relative to the body origin.
const TRACTION_FEET_HALF: Vec2 = Vec2::new(0.55, 0.15);
const TRACTION_FEET_OFFSET: Vec2 = Vec2::new(0.0, -0.9);
const TRACTION_FEET_FRICTION: f32 = 0.9;
const SLIDE_FEET_HALF: Vec2 = Vec2::new(0.6, 0.05);
const SLIDE_FEET_OFFSET: Vec2 = Vec2::new(0.0, -1.0);
const FOOT_SENSOR_HALF: Vec2 = Vec2::new(0.55, 0.05);
const FOOT_SENSOR_OFFSET: Vec2 = Vec2::new(0.0, -1.0);

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Rapier user data for fixtures and bodies owned by `entity`.
pub fn entity_user_data(entity: Entity) -> u128 {
    entity.to_bits() as u128
}

/// Collision groups implementing the filter-group rule: members of a negative
/// group skip each other, a non-negative group collides with everything.
pub fn interaction_groups(filter_group: i16) -> InteractionGroups {
    if filter_group < 0 {
        InteractionGroups::new(Group::GROUP_1, Group::ALL.difference(Group::GROUP_1))
    } else {
        InteractionGroups::new(Group::GROUP_2, Group::ALL)
    }
}

/// What the owning entity carries besides its body, decided at realization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RealizeOptions {
    /// Force every fixture to be a sensor (map triggers).
    pub force_sensor: bool,
    pub fixed_rotation: bool,
    /// Add feet fixtures and the foot sensor, and use the player filter group.
    pub player: bool,
}

/// Metadata recorded for every live collider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixtureTag {
    pub entity: Entity,
    pub kind: FixtureKind,
    pub is_sensor: bool,
}

enum RawContact {
    Collision(CollisionEvent),
    Force {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        total_force: Real,
    },
}

/// The only event handler handed to rapier.
struct ContactSink {
    sender: Sender<RawContact>,
}

impl EventHandler for ContactSink {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        // The receiver lives as long as the sink, inside the same PhysicsWorld.
        let _ = self.sender.send(RawContact::Collision(event));
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        contact_pair: &ContactPair,
        total_force_magnitude: Real,
    ) {
        let _ = self.sender.send(RawContact::Force {
            collider1: contact_pair.collider1,
            collider2: contact_pair.collider2,
            total_force: total_force_magnitude,
        });
    }
}

/// All rapier state plus the entity bookkeeping, as one ECS resource.
#[derive(Resource)]
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    sink: ContactSink,
    receiver: Receiver<RawContact>,
    entity_bodies: FxHashMap<Entity, RigidBodyHandle>,
    fixtures: FxHashMap<ColliderHandle, FixtureTag>,
    retired: Vec<ColliderHandle>,
    contacts: Vec<Contact>,
    steps: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, -9.81))
    }
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity (y up).
    pub fn new(gravity: Vec2) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = PHYSICS_DT;
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(VELOCITY_ITERATIONS).unwrap_or(NonZeroUsize::MIN);
        integration_parameters.num_internal_stabilization_iterations = POSITION_ITERATIONS;

        let (sender, receiver) = unbounded();

        Self {
            gravity: to_na(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            sink: ContactSink { sender },
            receiver,
            entity_bodies: FxHashMap::default(),
            fixtures: FxHashMap::default(),
            retired: Vec::new(),
            contacts: Vec::new(),
            steps: 0,
        }
    }

    pub fn gravity(&self) -> Vec2 {
        from_na(&self.gravity)
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_na(gravity);
    }

    pub fn integration_parameters(&self) -> &IntegrationParameters {
        &self.integration_parameters
    }

    /// Number of steps taken since creation.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Create the rapier body and colliders for `entity`.
    ///
    /// Every collider gets the entity as user data and is registered in the
    /// fixture table. Player bodies also receive two feet fixtures (one
    /// high-friction, one frictionless) and a foot sensor.
    pub fn realize(
        &mut self,
        entity: Entity,
        position: Vec2,
        body: &PhysicsBody,
        options: RealizeOptions,
    ) -> RealizedBody {
        let mut builder = RigidBodyBuilder::new(body.body_type.to_rapier())
            .translation(to_na(position))
            .user_data(entity_user_data(entity));
        if options.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let handle = self.bodies.insert(builder);

        let groups = if options.player {
            interaction_groups(PLAYER_FILTER_GROUP)
        } else {
            interaction_groups(DEFAULT_FILTER_GROUP)
        };

        let is_sensor = body.is_sensor || options.force_sensor;
        let mut fixtures: SmallVec<[ColliderHandle; 4]> = SmallVec::new();
        for def in body.fixture_defs() {
            let collider = self.attach(entity, handle, &def, is_sensor, FixtureKind::Body, groups);
            fixtures.push(collider);
        }

        if options.player {
            let traction = FixtureDef::new(Shape::rect_at(
                TRACTION_FEET_HALF.x,
                TRACTION_FEET_HALF.y,
                TRACTION_FEET_OFFSET,
            ))
            .with_density(0.0)
            .with_friction(TRACTION_FEET_FRICTION);
            let slide = FixtureDef::new(Shape::rect_at(
                SLIDE_FEET_HALF.x,
                SLIDE_FEET_HALF.y,
                SLIDE_FEET_OFFSET,
            ))
            .with_density(0.0)
            .with_friction(0.0);
            let foot = FixtureDef::new(Shape::rect_at(
                FOOT_SENSOR_HALF.x,
                FOOT_SENSOR_HALF.y,
                FOOT_SENSOR_OFFSET,
            ))
            .with_density(0.0);

            fixtures.push(self.attach(entity, handle, &traction, false, FixtureKind::Traction, groups));
            fixtures.push(self.attach(entity, handle, &slide, false, FixtureKind::Traction, groups));
            fixtures.push(self.attach(entity, handle, &foot, true, FixtureKind::FootSensor, groups));
        }

        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }

        if let Some(previous) = self.entity_bodies.insert(entity, handle) {
            // Callers check `has_body` first; a leftover here would leak a body.
            debug!("entity {:?} replaced an existing body {:?}", entity, previous);
            self.remove_body(previous);
        }

        debug!(
            "realized body {:?} for entity {:?} with {} fixtures",
            handle,
            entity,
            fixtures.len()
        );

        RealizedBody {
            body: handle,
            fixtures,
        }
    }

    fn attach(
        &mut self,
        entity: Entity,
        body: RigidBodyHandle,
        def: &FixtureDef,
        is_sensor: bool,
        kind: FixtureKind,
        groups: InteractionGroups,
    ) -> ColliderHandle {
        let builder = match def.shape {
            Shape::Box {
                half_width,
                half_height,
                offset,
            } => ColliderBuilder::cuboid(half_width, half_height).translation(to_na(offset)),
            Shape::Circle { radius, offset } => {
                ColliderBuilder::ball(radius).translation(to_na(offset))
            }
        };
        let collider = builder
            .density(def.density)
            .friction(def.friction)
            .restitution(def.restitution)
            .sensor(is_sensor)
            .collision_groups(groups)
            .active_events(ActiveEvents::COLLISION_EVENTS | ActiveEvents::CONTACT_FORCE_EVENTS)
            .user_data(entity_user_data(entity))
            .build();
        let handle = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        self.fixtures.insert(
            handle,
            FixtureTag {
                entity,
                kind,
                is_sensor,
            },
        );
        handle
    }

    /// Destroy the body of `entity` and all its colliders.
    ///
    /// Returns `false` if the entity had no body.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        let Some(handle) = self.entity_bodies.remove(&entity) else {
            return false;
        };
        self.remove_body(handle);
        debug!("destroyed body {:?} of entity {:?}", handle, entity);
        true
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.bodies.get(handle) {
            self.retired.extend(body.colliders().iter().copied());
        }
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance the simulation by one fixed step and resolve its contacts.
    ///
    /// Resolved contacts accumulate until [`take_contacts`](Self::take_contacts).
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.sink,
        );
        self.steps += 1;

        let resolved: Vec<Contact> = self
            .receiver
            .try_iter()
            .filter_map(|raw| self.resolve(raw))
            .collect();
        self.contacts.extend(resolved);

        for handle in self.retired.drain(..) {
            self.fixtures.remove(&handle);
        }
    }

    fn resolve(&self, raw: RawContact) -> Option<Contact> {
        let (collider1, collider2, phase) = match raw {
            RawContact::Collision(event) => {
                let phase = if event.started() {
                    ContactPhase::Begin
                } else {
                    ContactPhase::End
                };
                (event.collider1(), event.collider2(), phase)
            }
            RawContact::Force {
                collider1,
                collider2,
                total_force,
            } => (collider1, collider2, ContactPhase::PostSolve { total_force }),
        };
        let (Some(a), Some(b)) = (self.fixture_ref(collider1), self.fixture_ref(collider2)) else {
            trace!(
                "dropping contact between untracked colliders {:?} and {:?}",
                collider1, collider2
            );
            return None;
        };
        Some(Contact { phase, a, b })
    }

    fn fixture_ref(&self, collider: ColliderHandle) -> Option<FixtureRef> {
        self.fixtures.get(&collider).map(|tag| FixtureRef {
            entity: tag.entity,
            collider,
            kind: tag.kind,
            is_sensor: tag.is_sensor,
        })
    }

    /// Drain contacts resolved since the last call.
    pub fn take_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.contacts)
    }

    pub fn has_body(&self, entity: Entity) -> bool {
        self.entity_bodies.contains_key(&entity)
    }

    pub fn body_handle(&self, entity: Entity) -> Option<RigidBodyHandle> {
        self.entity_bodies.get(&entity).copied()
    }

    /// Number of live rapier bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn rigid_body(&self, entity: Entity) -> Option<&RigidBody> {
        self.body_handle(entity).and_then(|h| self.bodies.get(h))
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    pub fn fixture(&self, handle: ColliderHandle) -> Option<&FixtureTag> {
        self.fixtures.get(&handle)
    }

    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.rigid_body(entity).map(|rb| from_na(rb.translation()))
    }

    pub fn linear_velocity(&self, entity: Entity) -> Option<Vec2> {
        self.rigid_body(entity).map(|rb| from_na(rb.linvel()))
    }

    pub fn set_linear_velocity(&mut self, entity: Entity, velocity: Vec2) -> bool {
        let Some(handle) = self.body_handle(entity) else {
            return false;
        };
        match self.bodies.get_mut(handle) {
            Some(rb) => {
                rb.set_linvel(to_na(velocity), true);
                true
            }
            None => false,
        }
    }

    /// Apply an impulse at the body's center of mass, waking it up.
    pub fn apply_impulse(&mut self, entity: Entity, impulse: Vec2) -> bool {
        let Some(handle) = self.body_handle(entity) else {
            return false;
        };
        match self.bodies.get_mut(handle) {
            Some(rb) => {
                rb.apply_impulse(to_na(impulse), true);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::physicsbody::PhysicsBody;

    fn entity(world: &mut World) -> Entity {
        world.spawn_empty().id()
    }

    #[test]
    fn test_fixed_step_parameters() {
        let physics = PhysicsWorld::default();
        let params = physics.integration_parameters();
        assert!((params.dt - 1.0 / 60.0).abs() < 1e-9);
        assert_eq!(params.num_solver_iterations.get(), VELOCITY_ITERATIONS);
        assert_eq!(
            params.num_internal_stabilization_iterations,
            POSITION_ITERATIONS
        );
    }

    #[test]
    fn test_realize_single_fixture() {
        let mut ecs = World::new();
        let e = entity(&mut ecs);
        let mut physics = PhysicsWorld::default();
        let realized = physics.realize(
            e,
            Vec2::new(1.0, 2.0),
            &PhysicsBody::dynamic(Shape::rect(0.5, 0.5)).with_friction(0.4),
            RealizeOptions::default(),
        );
        assert_eq!(realized.fixtures.len(), 1);
        assert!(physics.has_body(e));
        assert_eq!(physics.position(e), Some(Vec2::new(1.0, 2.0)));

        let collider = physics.collider(realized.fixtures[0]).unwrap();
        assert_eq!(collider.user_data, entity_user_data(e));
        assert_eq!(collider.friction(), 0.4);
        assert!(!collider.is_sensor());
        assert_eq!(
            collider.collision_groups(),
            interaction_groups(DEFAULT_FILTER_GROUP)
        );
    }

    #[test]
    fn test_realize_forced_sensor() {
        let mut ecs = World::new();
        let e = entity(&mut ecs);
        let mut physics = PhysicsWorld::default();
        let realized = physics.realize(
            e,
            Vec2::ZERO,
            &PhysicsBody::fixed(Shape::rect(1.0, 1.0)),
            RealizeOptions {
                force_sensor: true,
                ..Default::default()
            },
        );
        let tag = physics.fixture(realized.fixtures[0]).unwrap();
        assert!(tag.is_sensor);
        assert!(physics.collider(realized.fixtures[0]).unwrap().is_sensor());
    }

    #[test]
    fn test_body_sensor_flag_governs_listed_fixtures() {
        let mut ecs = World::new();
        let solid = entity(&mut ecs);
        let ghost = entity(&mut ecs);
        let mut physics = PhysicsWorld::default();
        let body = PhysicsBody::fixed(Shape::rect(1.0, 1.0))
            .with_fixture(FixtureDef::new(Shape::circle(0.5)))
            .with_fixture(FixtureDef::new(Shape::rect(0.2, 0.2)));

        let realized = physics.realize(solid, Vec2::ZERO, &body, RealizeOptions::default());
        for handle in &realized.fixtures {
            assert!(!physics.collider(*handle).unwrap().is_sensor());
            assert!(!physics.fixture(*handle).unwrap().is_sensor);
        }

        let realized = physics.realize(
            ghost,
            Vec2::ZERO,
            &body.with_sensor(true),
            RealizeOptions::default(),
        );
        for handle in &realized.fixtures {
            assert!(physics.collider(*handle).unwrap().is_sensor());
        }
    }

    #[test]
    fn test_realize_player_adds_feet_and_foot_sensor() {
        let mut ecs = World::new();
        let e = entity(&mut ecs);
        let mut physics = PhysicsWorld::default();
        let realized = physics.realize(
            e,
            Vec2::ZERO,
            &PhysicsBody::dynamic(Shape::rect(0.5, 1.0)),
            RealizeOptions {
                fixed_rotation: true,
                player: true,
                ..Default::default()
            },
        );
        assert_eq!(realized.fixtures.len(), 4);

        let kinds: Vec<FixtureKind> = realized
            .fixtures
            .iter()
            .map(|h| physics.fixture(*h).unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                FixtureKind::Body,
                FixtureKind::Traction,
                FixtureKind::Traction,
                FixtureKind::FootSensor
            ]
        );

        let foot = physics.collider(realized.fixtures[3]).unwrap();
        assert!(foot.is_sensor());
        for handle in &realized.fixtures {
            assert_eq!(
                physics.collider(*handle).unwrap().collision_groups(),
                interaction_groups(PLAYER_FILTER_GROUP)
            );
        }
        assert!(physics.rigid_body(e).unwrap().is_rotation_locked());
    }

    #[test]
    fn test_destroy_removes_body() {
        let mut ecs = World::new();
        let e = entity(&mut ecs);
        let mut physics = PhysicsWorld::default();
        physics.realize(
            e,
            Vec2::ZERO,
            &PhysicsBody::dynamic(Shape::circle(0.5)),
            RealizeOptions::default(),
        );
        assert_eq!(physics.body_count(), 1);
        assert!(physics.destroy(e));
        assert_eq!(physics.body_count(), 0);
        assert!(!physics.has_body(e));
        assert!(!physics.destroy(e));
    }

    #[test]
    fn test_step_applies_gravity() {
        let mut ecs = World::new();
        let e = entity(&mut ecs);
        let mut physics = PhysicsWorld::default();
        physics.realize(
            e,
            Vec2::ZERO,
            &PhysicsBody::dynamic(Shape::rect(0.5, 0.5)),
            RealizeOptions::default(),
        );
        physics.step();
        assert_eq!(physics.steps(), 1);
        let pos = physics.position(e).unwrap();
        assert!(pos.y < 0.0);
        assert!(pos.x.abs() < 1e-6);
    }

    #[test]
    fn test_apply_impulse_changes_velocity() {
        let mut ecs = World::new();
        let e = entity(&mut ecs);
        let mut physics = PhysicsWorld::new(Vec2::ZERO);
        physics.realize(
            e,
            Vec2::ZERO,
            &PhysicsBody::dynamic(Shape::rect(0.5, 0.5)),
            RealizeOptions::default(),
        );
        assert!(physics.apply_impulse(e, Vec2::new(1.0, 0.0)));
        assert!(physics.linear_velocity(e).unwrap().x > 0.0);
    }

    #[test]
    fn test_missing_entity_queries() {
        let mut ecs = World::new();
        let e = entity(&mut ecs);
        let mut physics = PhysicsWorld::default();
        assert_eq!(physics.position(e), None);
        assert_eq!(physics.linear_velocity(e), None);
        assert!(!physics.apply_impulse(e, Vec2::X));
        assert!(!physics.set_linear_velocity(e, Vec2::X));
    }
}
