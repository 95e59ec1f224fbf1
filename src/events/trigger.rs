//! Trigger fired notification.
//!
//! [`dispatch_trigger`](crate::triggers::dispatch_trigger) emits a
//! [`TriggerFired`] after a handler ran successfully. Observers can use it
//! for sounds, analytics, or tests, without touching the handlers.
use bevy_ecs::prelude::*;

use crate::components::maptrigger::TriggerKind;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerFired {
    pub player: Entity,
    /// The trigger entity. It may already be despawned by its handler.
    pub trigger: Entity,
    pub kind: TriggerKind,
}
