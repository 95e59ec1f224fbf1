//! Rigid body declaration and realized physics handles.
//!
//! A [`PhysicsBody`] only *declares* how an entity should be simulated. The
//! rapier body and its colliders are created later, when the entity enters
//! the physics-tagged set (it carries both `PhysicsBody` and
//! [`Transform`](super::transform::Transform)). The live handles are then
//! attached to the entity as a [`RealizedBody`].
//!
//! Handles stored in a `RealizedBody` are only meaningful while the entity is
//! still in the physics-tagged set. After removal the body is destroyed and
//! the handles must not be used again.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle, RigidBodyType};
use smallvec::SmallVec;

/// How the physics world moves a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyType {
    /// Never moves (ground, walls, triggers).
    Static,
    /// Moved by forces, impulses and contacts.
    Dynamic,
    /// Moved by its velocity only, ignores forces.
    Kinematic,
}

impl BodyType {
    pub(crate) fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Static => RigidBodyType::Fixed,
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Kinematic => RigidBodyType::KinematicVelocityBased,
        }
    }
}

/// Collision shape, relative to the body origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box {
        half_width: f32,
        half_height: f32,
        offset: Vec2,
    },
    Circle {
        radius: f32,
        offset: Vec2,
    },
}

impl Shape {
    /// Axis-aligned box centered on the body origin.
    pub fn rect(half_width: f32, half_height: f32) -> Self {
        Shape::Box {
            half_width,
            half_height,
            offset: Vec2::ZERO,
        }
    }

    /// Axis-aligned box centered at `offset` from the body origin.
    pub fn rect_at(half_width: f32, half_height: f32, offset: Vec2) -> Self {
        Shape::Box {
            half_width,
            half_height,
            offset,
        }
    }

    pub fn circle(radius: f32) -> Self {
        Shape::Circle {
            radius,
            offset: Vec2::ZERO,
        }
    }
}

/// A single collider to attach to a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixtureDef {
    pub shape: Shape,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl FixtureDef {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            density: DEFAULT_DENSITY,
            friction: DEFAULT_FRICTION,
            restitution: 0.0,
        }
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }
}

const DEFAULT_DENSITY: f32 = 1.0;
const DEFAULT_FRICTION: f32 = 0.2;

/// Declaration of a simulated body.
///
/// If `fixtures` is empty a single collider is synthesized from `shape`,
/// `density`, `friction` and `restitution`. Otherwise every entry of
/// `fixtures` is realized and the top-level material fields are ignored.
/// `is_sensor` decides the sensor flag of every collider of the body,
/// listed or synthesized.
///
/// # Example
/// ```ignore
/// let crate_body = PhysicsBody::dynamic(Shape::rect(0.5, 0.5)).with_friction(0.6);
/// world.spawn((Transform::new(2.0, 4.0), crate_body));
/// ```
#[derive(Component, Clone, Debug, PartialEq)]
pub struct PhysicsBody {
    pub body_type: BodyType,
    pub shape: Shape,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub is_sensor: bool,
    pub fixtures: Vec<FixtureDef>,
}

impl PhysicsBody {
    pub fn new(body_type: BodyType, shape: Shape) -> Self {
        Self {
            body_type,
            shape,
            density: DEFAULT_DENSITY,
            friction: DEFAULT_FRICTION,
            restitution: 0.0,
            is_sensor: false,
            fixtures: Vec::new(),
        }
    }

    pub fn dynamic(shape: Shape) -> Self {
        Self::new(BodyType::Dynamic, shape)
    }

    pub fn fixed(shape: Shape) -> Self {
        Self::new(BodyType::Static, shape)
    }

    pub fn kinematic(shape: Shape) -> Self {
        Self::new(BodyType::Kinematic, shape)
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Add an explicit fixture. Once any fixture is listed, the implicit
    /// single fixture is no longer synthesized.
    pub fn with_fixture(mut self, fixture: FixtureDef) -> Self {
        self.fixtures.push(fixture);
        self
    }

    /// Fixture definitions to realize for this body.
    pub fn fixture_defs(&self) -> Vec<FixtureDef> {
        if self.fixtures.is_empty() {
            vec![FixtureDef {
                shape: self.shape,
                density: self.density,
                friction: self.friction,
                restitution: self.restitution,
            }]
        } else {
            self.fixtures.clone()
        }
    }
}

/// Marker: the body never rotates.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct FixedRotation;

/// Live rapier handles of a realized [`PhysicsBody`].
///
/// Inserted by the physics lifecycle pass, never by game code.
#[derive(Component, Clone, Debug)]
pub struct RealizedBody {
    pub body: RigidBodyHandle,
    pub fixtures: SmallVec<[ColliderHandle; 4]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_fixture_synthesized_from_body_fields() {
        let body = PhysicsBody::dynamic(Shape::rect(0.5, 1.0))
            .with_friction(0.7)
            .with_density(2.0)
            .with_restitution(0.1);
        let defs = body.fixture_defs();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].shape, Shape::rect(0.5, 1.0));
        assert_eq!(defs[0].friction, 0.7);
        assert_eq!(defs[0].density, 2.0);
        assert_eq!(defs[0].restitution, 0.1);
    }

    #[test]
    fn test_explicit_fixtures_replace_synthesized_one() {
        let body = PhysicsBody::fixed(Shape::rect(1.0, 1.0))
            .with_fixture(FixtureDef::new(Shape::circle(0.5)))
            .with_fixture(FixtureDef::new(Shape::rect(0.2, 0.2)).with_friction(0.0));
        let defs = body.fixture_defs();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].shape, Shape::circle(0.5));
        assert_eq!(defs[1].friction, 0.0);
    }

    #[test]
    fn test_body_type_maps_to_rapier() {
        assert_eq!(BodyType::Static.to_rapier(), RigidBodyType::Fixed);
        assert_eq!(BodyType::Dynamic.to_rapier(), RigidBodyType::Dynamic);
        assert_eq!(
            BodyType::Kinematic.to_rapier(),
            RigidBodyType::KinematicVelocityBased
        );
    }
}
