//! Contact notifications produced by the physics world.
//!
//! [`PhysicsWorld::step`](crate::resources::physicsworld::PhysicsWorld::step)
//! resolves every raw rapier event into a [`Contact`] whose two sides already
//! carry the owning entity and fixture metadata. The
//! [`ContactAggregator`](crate::resources::contacts::ContactAggregator) then
//! fans each contact out to its listeners.
//!
//! No ordering guarantee is given between sides `a` and `b`.
use bevy_ecs::prelude::Entity;
use rapier2d::prelude::ColliderHandle;

/// Role of a fixture on its body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    /// Fixture declared by the entity's `PhysicsBody`.
    Body,
    /// Extra feet fixture added to the player for ground traction.
    Traction,
    /// Player sensor used only for ground-contact counting.
    FootSensor,
}

/// One side of a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixtureRef {
    pub entity: Entity,
    pub collider: ColliderHandle,
    pub kind: FixtureKind,
    pub is_sensor: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContactPhase {
    /// Fixtures started touching or overlapping.
    Begin,
    /// Fixtures stopped touching, or one of them was destroyed.
    End,
    /// Solver finished a touching pair; carries the summed contact force.
    PostSolve { total_force: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub phase: ContactPhase,
    pub a: FixtureRef,
    pub b: FixtureRef,
}

impl Contact {
    /// Owner of the foot sensor if this contact pairs a foot sensor with a
    /// non-sensor fixture. Sensor/sensor pairs (e.g. foot vs trigger) never
    /// count as ground.
    pub fn foot_contact(&self) -> Option<Entity> {
        if self.a.kind == FixtureKind::FootSensor && !self.b.is_sensor {
            Some(self.a.entity)
        } else if self.b.kind == FixtureKind::FootSensor && !self.a.is_sensor {
            Some(self.b.entity)
        } else {
            None
        }
    }

    /// The other entity if `entity` is one of the two sides.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a.entity == entity {
            Some(self.b.entity)
        } else if self.b.entity == entity {
            Some(self.a.entity)
        } else {
            None
        }
    }
}
