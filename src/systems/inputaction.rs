//! Input-to-impulse controller for platformer movement.
//!
//! Reads the shared [`InputState`] and drives every entity carrying
//! [`PlayerControlled`], [`PhysicsBody`] and [`Transform`] (entities with
//! [`DisableInput`] are excluded, [`Dead`] ones are skipped):
//!
//! 1. Anti-float: an airborne body sinking slowly gets a small downward push,
//!    so jumps don't feel floaty at the apex.
//! 2. Each bound action whose key is held, in [`GameAction::ALL`] order.
//!
//! Velocities are read back from the physics world before every decision,
//! so an impulse applied earlier in the same tick is already visible.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{info, trace};

use crate::components::physicsbody::PhysicsBody;
use crate::components::playercontrolled::{Dead, DisableInput, GameAction, PlayerControlled};
use crate::components::transform::Transform;
use crate::resources::exitrequest::ExitRequest;
use crate::resources::groundcontacts::GroundContacts;
use crate::resources::input::{InputSource, InputState};
use crate::resources::physicsworld::PhysicsWorld;

/// Horizontal speed above which move impulses are no longer applied.
pub const MAX_HORIZONTAL_VELOCITY: f32 = 8.0;
pub const JUMP_IMPULSE: Vec2 = Vec2::new(0.0, 22.0);
pub const JUMP_FALL_IMPULSE: Vec2 = Vec2::new(0.0, -0.5);
pub const LEFT_IMPULSE: Vec2 = Vec2::new(-1.0, 0.0);
pub const RIGHT_IMPULSE: Vec2 = Vec2::new(1.0, 0.0);

/// Vertical velocity band (exclusive) in which the anti-float push applies.
const FALL_ASSIST_MIN_VY: f32 = -15.0;
const FALL_ASSIST_MAX_VY: f32 = -1.0;

fn current_velocity(physics: &PhysicsWorld, entity: Entity) -> Vec2 {
    match physics.linear_velocity(entity) {
        Some(velocity) => velocity,
        None => panic!(
            "entity {:?} is input controlled but has no realized body",
            entity
        ),
    }
}

/// Turn held actions into impulses, jumps, and exit requests.
pub fn input_action_system(
    query: Query<
        (Entity, &PlayerControlled, Has<Dead>),
        (With<PhysicsBody>, With<Transform>, Without<DisableInput>),
    >,
    input: Res<InputState>,
    mut physics: ResMut<PhysicsWorld>,
    mut ground: ResMut<GroundContacts>,
    mut exit: ResMut<ExitRequest>,
) {
    for (entity, controlled, dead) in query.iter() {
        if dead {
            continue;
        }

        let velocity = current_velocity(&physics, entity);
        if !ground.can_jump(entity)
            && velocity.y > FALL_ASSIST_MIN_VY
            && velocity.y < FALL_ASSIST_MAX_VY
        {
            physics.apply_impulse(entity, JUMP_FALL_IMPULSE);
        }

        for (action, key) in controlled.bindings.iter() {
            if !input.is_active(key) {
                continue;
            }
            match action {
                GameAction::Jump => {
                    if ground.can_jump(entity) {
                        physics.apply_impulse(entity, JUMP_IMPULSE);
                        ground.reset(entity);
                        trace!("{:?} jumped", entity);
                    }
                }
                GameAction::MoveLeft => {
                    if current_velocity(&physics, entity).x > -MAX_HORIZONTAL_VELOCITY {
                        physics.apply_impulse(entity, LEFT_IMPULSE);
                    }
                }
                GameAction::MoveRight => {
                    if current_velocity(&physics, entity).x < MAX_HORIZONTAL_VELOCITY {
                        physics.apply_impulse(entity, RIGHT_IMPULSE);
                    }
                }
                GameAction::Quit => {
                    if !exit.requested {
                        info!("exit requested by {:?}", entity);
                    }
                    exit.request();
                }
                GameAction::Use => {}
            }
        }
    }
}
