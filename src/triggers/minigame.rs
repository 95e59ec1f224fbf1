//! Minigame trigger handler.
//!
//! Consumes the trigger and starts the minigame named by its `minigame_type`
//! property. The trigger entity is despawned first, so the same overlap can
//! never start a second game even if a later step fails.
use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::{debug, info};

use super::TriggerHandler;
use crate::components::maptrigger::MapTrigger;
use crate::components::minigame::MinigameComponent;
use crate::error::TriggerError;
use crate::minigames::MinigameManager;
use crate::resources::maploader::{MapLoader, MapLoaderHandle, NullMapLoader};

/// Property holding the minigame key.
pub const MINIGAME_TYPE_PROPERTY: &str = "minigame_type";

pub struct MinigameTriggerHandler {
    manager: MinigameManager,
}

impl MinigameTriggerHandler {
    pub fn new(manager: MinigameManager) -> Self {
        Self { manager }
    }
}

impl TriggerHandler for MinigameTriggerHandler {
    fn run(
        &self,
        world: &mut World,
        player: Entity,
        trigger_entity: Entity,
        trigger: &MapTrigger,
    ) -> Result<(), TriggerError> {
        if world.get_entity(trigger_entity).is_ok() {
            world.despawn(trigger_entity);
        }

        let minigame_type = trigger
            .str_property(MINIGAME_TYPE_PROPERTY)
            .ok_or(TriggerError::MissingProperty(MINIGAME_TYPE_PROPERTY))?;
        let mut minigame = self.manager.get_minigame(minigame_type)?;

        let loader: Arc<dyn MapLoader> = match world.get_resource::<MapLoaderHandle>() {
            Some(handle) => handle.0.clone(),
            None => Arc::new(NullMapLoader),
        };
        minigame.reset(&trigger.properties, world, loader.as_ref())?;

        let entity = world.spawn(MinigameComponent::new(minigame)).id();
        info!(
            "player {:?} started minigame '{}' as {:?}",
            player, minigame_type, entity
        );
        debug!("minigame trigger {:?} consumed", trigger_entity);
        Ok(())
    }
}
