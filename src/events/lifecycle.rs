//! Physics lifecycle queue and its observers.
//!
//! An entity is *physics-tagged* while it carries both
//! [`PhysicsBody`](crate::components::physicsbody::PhysicsBody) and
//! [`Transform`](crate::components::transform::Transform). The observers in
//! this module watch those two components and record every add and remove in
//! the [`PhysicsLifecycle`] queue. The queue is drained by
//! [`process_physics_lifecycle`], which creates or destroys rapier bodies.
//!
//! Observers run immediately when the component changes, but the body work is
//! deferred to the drain so it always happens with exclusive world access and
//! in the order the changes were made.
//!
//! Register the observers once at setup:
//! ```ignore
//! world.add_observer(observe_physics_tag_added::<PhysicsBody>);
//! world.add_observer(observe_physics_tag_added::<Transform>);
//! world.add_observer(observe_physics_tag_removed::<PhysicsBody>);
//! world.add_observer(observe_physics_tag_removed::<Transform>);
//! ```
//!
//! [`process_physics_lifecycle`]: crate::systems::physics::process_physics_lifecycle
use bevy_ecs::lifecycle::{Add, Remove};
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::trace;

/// A change to the physics-tagged set, as seen by the observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// One of the tag components was added. The entity may now be tagged.
    Inserted(Entity),
    /// One of the tag components is being removed, or the entity despawned.
    Removed(Entity),
}

/// FIFO of pending lifecycle changes.
#[derive(Resource, Debug, Default)]
pub struct PhysicsLifecycle {
    pending: Vec<LifecycleEvent>,
}

impl PhysicsLifecycle {
    pub fn push(&mut self, event: LifecycleEvent) {
        self.pending.push(event);
    }

    /// Take all pending changes in arrival order.
    pub fn drain(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Observer queuing an insert when `C` is added to an entity.
pub fn observe_physics_tag_added<C: Component>(
    trigger: On<Add, C>,
    mut lifecycle: ResMut<PhysicsLifecycle>,
) {
    let entity = trigger.event().entity;
    trace!("physics tag added on {:?}", entity);
    lifecycle.push(LifecycleEvent::Inserted(entity));
}

/// Observer queuing a removal when `C` leaves an entity (including despawn).
pub fn observe_physics_tag_removed<C: Component>(
    trigger: On<Remove, C>,
    mut lifecycle: ResMut<PhysicsLifecycle>,
) {
    let entity = trigger.event().entity;
    trace!("physics tag removed from {:?}", entity);
    lifecycle.push(LifecycleEvent::Removed(entity));
}
