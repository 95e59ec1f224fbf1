//! Contact dispatch and the ground-contact listener.
use bevy_ecs::prelude::*;
use log::trace;

use crate::events::contact::Contact;
use crate::resources::contacts::{ContactAggregator, ContactListener};
use crate::resources::groundcontacts::GroundContacts;
use crate::resources::physicsworld::PhysicsWorld;

/// Forward the contacts of the last physics step to every listener.
pub fn dispatch_contacts(world: &mut World) {
    let contacts = world.resource_mut::<PhysicsWorld>().take_contacts();
    if contacts.is_empty() {
        return;
    }
    trace!("dispatching {} contacts", contacts.len());
    world.resource_scope(|world, mut aggregator: Mut<ContactAggregator>| {
        aggregator.dispatch(&contacts, world);
    });
}

/// Counts non-sensor fixtures touching each foot sensor.
///
/// Writes to the [`GroundContacts`] resource.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroundContactTracker;

impl ContactListener for GroundContactTracker {
    fn begin_contact(&mut self, contact: &Contact, world: &mut World) {
        if let Some(entity) = contact.foot_contact() {
            world.resource_mut::<GroundContacts>().begin(entity);
        }
    }

    fn end_contact(&mut self, contact: &Contact, world: &mut World) {
        if let Some(entity) = contact.foot_contact() {
            world.resource_mut::<GroundContacts>().end(entity);
        }
    }

    fn name(&self) -> &'static str {
        "ground_contact_tracker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::contact::{ContactPhase, FixtureKind, FixtureRef};
    use rapier2d::prelude::ColliderHandle;

    fn foot_contact(phase: ContactPhase, player: Entity, other: Entity, other_sensor: bool) -> Contact {
        Contact {
            phase,
            a: FixtureRef {
                entity: player,
                collider: ColliderHandle::invalid(),
                kind: FixtureKind::FootSensor,
                is_sensor: true,
            },
            b: FixtureRef {
                entity: other,
                collider: ColliderHandle::invalid(),
                kind: FixtureKind::Body,
                is_sensor: other_sensor,
            },
        }
    }

    #[test]
    fn test_tracker_counts_solid_contacts() {
        let mut world = World::new();
        world.init_resource::<GroundContacts>();
        let player = world.spawn_empty().id();
        let ground = world.spawn_empty().id();
        let mut tracker = GroundContactTracker;

        tracker.begin_contact(&foot_contact(ContactPhase::Begin, player, ground, false), &mut world);
        tracker.begin_contact(&foot_contact(ContactPhase::Begin, player, ground, false), &mut world);
        tracker.end_contact(&foot_contact(ContactPhase::End, player, ground, false), &mut world);

        let counters = world.resource::<GroundContacts>();
        assert_eq!(counters.count(player), 1);
        assert!(counters.can_jump(player));
    }

    #[test]
    fn test_tracker_ignores_sensors() {
        let mut world = World::new();
        world.init_resource::<GroundContacts>();
        let player = world.spawn_empty().id();
        let trigger = world.spawn_empty().id();
        let mut tracker = GroundContactTracker;

        tracker.begin_contact(&foot_contact(ContactPhase::Begin, player, trigger, true), &mut world);
        assert_eq!(world.resource::<GroundContacts>().count(player), 0);
    }
}
