//! Map trigger dispatch.
//!
//! When the player starts touching an entity carrying
//! [`MapTrigger`], the contact listener queues the pair in [`PendingTriggers`].
//! The [`dispatch_triggers`](crate::systems::triggers::dispatch_triggers)
//! system later drains that queue and runs the [`TriggerHandler`] registered
//! for the trigger's [`TriggerKind`].
//!
//! The set of kinds is closed: [`TriggerRegistry::new`] installs one handler
//! per kind. Replacing a handler with [`TriggerRegistry::register`] is
//! allowed; a kind without a handler is reported as
//! [`TriggerError::NoHandler`].
//!
//! Submodules overview:
//! - [`minigame`] – start a minigame and remove the trigger
//! - [`tutorial`] – tutorial markers, currently a no-op
pub mod minigame;
pub mod tutorial;

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

use crate::components::maptrigger::{MapTrigger, TriggerKind};
use crate::error::TriggerError;
use crate::events::trigger::TriggerFired;
use crate::minigames::MinigameManager;

use self::minigame::MinigameTriggerHandler;
use self::tutorial::TutorialTriggerHandler;

/// Behavior attached to a trigger kind.
pub trait TriggerHandler: Send + Sync {
    /// Run the trigger for `player`.
    ///
    /// `trigger` is a copy of the component taken before the call, so the
    /// handler may despawn `trigger_entity` and still read the properties.
    fn run(
        &self,
        world: &mut World,
        player: Entity,
        trigger_entity: Entity,
        trigger: &MapTrigger,
    ) -> Result<(), TriggerError>;
}

/// Handlers keyed by trigger kind.
#[derive(Resource)]
pub struct TriggerRegistry {
    handlers: FxHashMap<TriggerKind, Box<dyn TriggerHandler>>,
}

impl Default for TriggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerRegistry {
    /// Registry with the built-in handler for every kind.
    pub fn new() -> Self {
        Self::with_minigames(MinigameManager::default())
    }

    /// Registry whose minigame handler resolves games through `manager`.
    pub fn with_minigames(manager: MinigameManager) -> Self {
        let mut registry = Self::empty();
        registry.register(TriggerKind::Minigame, MinigameTriggerHandler::new(manager));
        registry.register(TriggerKind::Tutorial, TutorialTriggerHandler);
        registry
    }

    /// Registry without handlers.
    pub fn empty() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Install `handler` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: TriggerKind, handler: impl TriggerHandler + 'static) {
        self.handlers.insert(kind, Box::new(handler));
    }

    pub fn handler(&self, kind: TriggerKind) -> Result<&dyn TriggerHandler, TriggerError> {
        self.handlers
            .get(&kind)
            .map(|h| h.as_ref())
            .ok_or(TriggerError::NoHandler(kind))
    }
}

/// (player, trigger) pairs waiting for dispatch, in contact order.
#[derive(Resource, Debug, Default)]
pub struct PendingTriggers {
    pending: Vec<(Entity, Entity)>,
}

impl PendingTriggers {
    /// Queue a pair. A trigger already queued is not queued again.
    pub fn push(&mut self, player: Entity, trigger: Entity) -> bool {
        if self.pending.iter().any(|(_, t)| *t == trigger) {
            return false;
        }
        self.pending.push((player, trigger));
        true
    }

    pub fn take(&mut self) -> Vec<(Entity, Entity)> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Run the handler for one (player, trigger) pair.
///
/// Returns `Ok(false)` when the trigger entity no longer carries a
/// [`MapTrigger`] (already consumed this tick). On success a
/// [`TriggerFired`] event is triggered.
pub fn dispatch_trigger(
    world: &mut World,
    registry: &TriggerRegistry,
    player: Entity,
    trigger_entity: Entity,
) -> Result<bool, TriggerError> {
    let Some(trigger) = world.get::<MapTrigger>(trigger_entity).cloned() else {
        return Ok(false);
    };
    let handler = registry.handler(trigger.kind)?;
    handler.run(world, player, trigger_entity, &trigger)?;
    world.trigger(TriggerFired {
        player,
        trigger: trigger_entity,
        kind: trigger.kind,
    });
    Ok(true)
}
