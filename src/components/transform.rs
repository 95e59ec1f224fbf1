//! World-space position component.
//!
//! For entities that also carry a [`PhysicsBody`](super::physicsbody::PhysicsBody)
//! the position is owned by the physics world: it is overwritten every tick by
//! [`sync_transforms`](crate::systems::physics::sync_transforms) and writes
//! made by other systems are lost. Entities without a body may be moved freely.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Position of an entity in world units (y grows upwards).
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
}

impl Transform {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
        }
    }

    pub fn from_position(position: Vec2) -> Self {
        Self { position }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
        }
    }
}
