//! Trigger contact listener and dispatch system.
use bevy_ecs::prelude::*;
use log::{debug, error};

use crate::components::maptrigger::MapTrigger;
use crate::components::playercontrolled::Player;
use crate::events::contact::Contact;
use crate::resources::contacts::ContactListener;
use crate::triggers::{PendingTriggers, TriggerRegistry, dispatch_trigger};

/// Queues a (player, trigger) pair when the player starts touching a trigger.
///
/// The handler does not run here: dispatch happens later in the tick, outside
/// the contact callbacks, so handlers are free to despawn entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct TriggerContactListener;

impl ContactListener for TriggerContactListener {
    fn begin_contact(&mut self, contact: &Contact, world: &mut World) {
        let (a, b) = (contact.a.entity, contact.b.entity);
        for (player, trigger) in [(a, b), (b, a)] {
            if world.get::<Player>(player).is_some() && world.get::<MapTrigger>(trigger).is_some() {
                world.resource_mut::<PendingTriggers>().push(player, trigger);
            }
        }
    }

    fn end_contact(&mut self, _contact: &Contact, _world: &mut World) {}

    fn name(&self) -> &'static str {
        "trigger_contact_listener"
    }
}

/// Run the handler of every queued trigger.
///
/// A failing handler is logged and its trigger is dropped: the entity is
/// despawned if the handler left it alive, so it cannot fire again.
pub fn dispatch_triggers(world: &mut World) {
    let pending = world.resource_mut::<PendingTriggers>().take();
    if pending.is_empty() {
        return;
    }
    world.resource_scope(|world, registry: Mut<TriggerRegistry>| {
        for (player, trigger) in pending {
            match dispatch_trigger(world, &registry, player, trigger) {
                Ok(true) => debug!("trigger {:?} fired for {:?}", trigger, player),
                Ok(false) => debug!("trigger {:?} already consumed", trigger),
                Err(e) => {
                    error!("trigger {:?} failed for {:?}: {}", trigger, player, e);
                    if world.get_entity(trigger).is_ok() {
                        world.despawn(trigger);
                    }
                }
            }
        }
    });
}
