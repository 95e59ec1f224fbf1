//! Tutorial trigger handler.
//!
//! Tutorial markers are placed in levels but drive no behavior yet. The
//! handler logs the `tutorial_type` property, if it can be read, and never
//! fails; the trigger stays in the world.
use bevy_ecs::prelude::*;
use log::debug;
use serde::Deserialize;

use super::TriggerHandler;
use crate::components::maptrigger::{MapTrigger, TutorialType};
use crate::error::TriggerError;

/// Property holding the tutorial sub-type.
pub const TUTORIAL_TYPE_PROPERTY: &str = "tutorial_type";

pub struct TutorialTriggerHandler;

impl TutorialTriggerHandler {
    /// Decode the tutorial sub-type of `trigger`, if present and known.
    pub fn tutorial_type(trigger: &MapTrigger) -> Option<TutorialType> {
        trigger
            .properties
            .get(TUTORIAL_TYPE_PROPERTY)
            .and_then(|value| TutorialType::deserialize(value).ok())
    }
}

impl TriggerHandler for TutorialTriggerHandler {
    fn run(
        &self,
        _world: &mut World,
        player: Entity,
        trigger_entity: Entity,
        trigger: &MapTrigger,
    ) -> Result<(), TriggerError> {
        match Self::tutorial_type(trigger) {
            Some(TutorialType::Start) => debug!(
                "tutorial start reached by {:?} at {:?}",
                player, trigger_entity
            ),
            Some(TutorialType::End) => debug!(
                "tutorial end reached by {:?} at {:?}",
                player, trigger_entity
            ),
            None => debug!(
                "tutorial marker {:?} without a known {} reached by {:?}",
                trigger_entity, TUTORIAL_TYPE_PROPERTY, player
            ),
        }
        Ok(())
    }
}
