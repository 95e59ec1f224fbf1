//! Physics synchronization systems.
//!
//! - [`process_physics_lifecycle`] – realize or destroy rapier bodies for
//!   entities entering or leaving the physics-tagged set
//! - [`physics_step`] – advance the physics world by one fixed step
//! - [`sync_transforms`] – copy body positions back into `Transform`
//!
//! After the lifecycle pass, an entity has a body if and only if it carries
//! both `PhysicsBody` and `Transform`.
use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::components::maptrigger::MapTrigger;
use crate::components::physicsbody::{FixedRotation, PhysicsBody, RealizedBody};
use crate::components::playercontrolled::Player;
use crate::components::transform::Transform;
use crate::events::lifecycle::{LifecycleEvent, PhysicsLifecycle};
use crate::resources::groundcontacts::GroundContacts;
use crate::resources::physicsworld::{PhysicsWorld, RealizeOptions};

/// Drain the lifecycle queue and apply each change in order.
///
/// Runs twice per tick: before the physics step, and after trigger dispatch so
/// entities spawned by handlers get a body before the next step.
///
/// Both operations are idempotent: an insert for an entity that already has a
/// body (or lacks one of the tag components) does nothing, and a removal for
/// an entity without a body does nothing.
pub fn process_physics_lifecycle(world: &mut World) {
    let events = world.resource_mut::<PhysicsLifecycle>().drain();
    for event in events {
        match event {
            LifecycleEvent::Inserted(entity) => realize_entity(world, entity),
            LifecycleEvent::Removed(entity) => teardown_entity(world, entity),
        }
    }
}

fn realize_entity(world: &mut World, entity: Entity) {
    if world.resource::<PhysicsWorld>().has_body(entity) {
        trace!("entity {:?} already realized", entity);
        return;
    }
    let Ok(entity_ref) = world.get_entity(entity) else {
        return;
    };
    let (Some(transform), Some(body)) =
        (entity_ref.get::<Transform>(), entity_ref.get::<PhysicsBody>())
    else {
        return;
    };
    let position = transform.position;
    let body = body.clone();
    let options = RealizeOptions {
        force_sensor: entity_ref.contains::<MapTrigger>(),
        fixed_rotation: entity_ref.contains::<FixedRotation>(),
        player: entity_ref.contains::<Player>(),
    };

    let realized = world
        .resource_mut::<PhysicsWorld>()
        .realize(entity, position, &body, options);
    world.entity_mut(entity).insert(realized);
}

fn teardown_entity(world: &mut World, entity: Entity) {
    if !world.resource_mut::<PhysicsWorld>().destroy(entity) {
        return;
    }
    world.resource_mut::<GroundContacts>().forget(entity);
    if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
        entity_mut.remove::<RealizedBody>();
    }
    debug!("physics body of {:?} torn down", entity);
}

/// Advance the physics world by one fixed step.
///
/// The step size is always [`PHYSICS_DT`](crate::resources::physicsworld::PHYSICS_DT),
/// independent of the frame delta.
pub fn physics_step(mut physics: ResMut<PhysicsWorld>) {
    physics.step();
}

/// Copy each body's position into its entity's `Transform`.
///
/// # Panics
/// If a physics-tagged entity has no body. The lifecycle pass runs before
/// this system, so that can only happen if the bookkeeping is broken.
pub fn sync_transforms(
    physics: Res<PhysicsWorld>,
    mut query: Query<(Entity, &mut Transform), With<PhysicsBody>>,
) {
    for (entity, mut transform) in query.iter_mut() {
        let Some(position) = physics.position(entity) else {
            panic!(
                "entity {:?} has PhysicsBody and Transform but no realized body",
                entity
            );
        };
        if transform.position != position {
            transform.position = position;
        }
    }
}
