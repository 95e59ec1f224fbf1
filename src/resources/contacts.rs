//! Contact fan-out.
//!
//! The physics world produces one stream of [`Contact`]s per step. The
//! [`ContactAggregator`] is the only consumer of that stream and forwards each
//! contact to every registered [`ContactListener`], in registration order.
//!
//! Listeners are registered once at setup and are never removed. Dispatch runs
//! inside the exclusive [`dispatch_contacts`] system, which gives each
//! listener mutable access to the world.
//!
//! Pre-solve callbacks are not forwarded; listeners see begin, end and
//! post-solve only.
//!
//! [`dispatch_contacts`]: crate::systems::contacts::dispatch_contacts
use bevy_ecs::prelude::*;

use crate::events::contact::{Contact, ContactPhase};

/// Capability trait for anything interested in physics contacts.
pub trait ContactListener: Send + Sync {
    fn begin_contact(&mut self, contact: &Contact, world: &mut World);

    fn end_contact(&mut self, contact: &Contact, world: &mut World);

    /// Called after the solver handled a touching pair. Most listeners don't care.
    fn post_solve(&mut self, _contact: &Contact, _total_force: f32, _world: &mut World) {}

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Ordered list of contact listeners.
#[derive(Resource, Default)]
pub struct ContactAggregator {
    listeners: Vec<Box<dyn ContactListener>>,
}

impl ContactAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. It receives contacts after every earlier listener.
    pub fn add_listener(&mut self, listener: impl ContactListener + 'static) {
        log::debug!("registered contact listener {}", listener.name());
        self.listeners.push(Box::new(listener));
    }

    pub fn with_listener(mut self, listener: impl ContactListener + 'static) -> Self {
        self.add_listener(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Forward each contact to all listeners.
    pub fn dispatch(&mut self, contacts: &[Contact], world: &mut World) {
        for contact in contacts {
            for listener in self.listeners.iter_mut() {
                match contact.phase {
                    ContactPhase::Begin => listener.begin_contact(contact, world),
                    ContactPhase::End => listener.end_contact(contact, world),
                    ContactPhase::PostSolve { total_force } => {
                        listener.post_solve(contact, total_force, world)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::contact::{FixtureKind, FixtureRef};
    use rapier2d::prelude::ColliderHandle;

    #[derive(Resource, Default)]
    struct Log(Vec<String>);

    struct Recorder(&'static str);

    impl ContactListener for Recorder {
        fn begin_contact(&mut self, _contact: &Contact, world: &mut World) {
            world.resource_mut::<Log>().0.push(format!("{}:begin", self.0));
        }

        fn end_contact(&mut self, _contact: &Contact, world: &mut World) {
            world.resource_mut::<Log>().0.push(format!("{}:end", self.0));
        }
    }

    fn contact(world: &mut World, phase: ContactPhase) -> Contact {
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let side = |entity| FixtureRef {
            entity,
            collider: ColliderHandle::invalid(),
            kind: FixtureKind::Body,
            is_sensor: false,
        };
        Contact {
            phase,
            a: side(a),
            b: side(b),
        }
    }

    #[test]
    fn test_listeners_receive_in_registration_order() {
        let mut world = World::new();
        world.init_resource::<Log>();
        let mut aggregator = ContactAggregator::new()
            .with_listener(Recorder("first"))
            .with_listener(Recorder("second"));
        assert_eq!(aggregator.len(), 2);

        let contacts = vec![
            contact(&mut world, ContactPhase::Begin),
            contact(&mut world, ContactPhase::End),
        ];
        aggregator.dispatch(&contacts, &mut world);

        assert_eq!(
            world.resource::<Log>().0,
            vec!["first:begin", "second:begin", "first:end", "second:end"]
        );
    }

    #[test]
    fn test_post_solve_defaults_to_noop() {
        let mut world = World::new();
        world.init_resource::<Log>();
        let mut aggregator = ContactAggregator::new().with_listener(Recorder("only"));
        let contacts = vec![contact(
            &mut world,
            ContactPhase::PostSolve { total_force: 3.0 },
        )];
        aggregator.dispatch(&contacts, &mut world);
        assert!(world.resource::<Log>().0.is_empty());
    }

    #[test]
    fn test_empty_aggregator() {
        let mut world = World::new();
        let mut aggregator = ContactAggregator::new();
        assert!(aggregator.is_empty());
        let contacts = vec![contact(&mut world, ContactPhase::Begin)];
        aggregator.dispatch(&contacts, &mut world);
    }
}
