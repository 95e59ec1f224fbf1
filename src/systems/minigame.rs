//! Minigame update system.
use bevy_ecs::prelude::*;
use log::warn;

use crate::components::minigame::MinigameComponent;
use crate::resources::worldtime::WorldTime;

/// Advance every active minigame by the frame delta.
///
/// Components without an instance, or with an instance that was never reset,
/// are skipped this tick with a warning.
pub fn update_minigames(mut query: Query<(Entity, &mut MinigameComponent)>, time: Res<WorldTime>) {
    for (entity, mut component) in query.iter_mut() {
        let Some(minigame) = component.minigame.as_mut() else {
            warn!("minigame component on {:?} has no minigame, skipping", entity);
            continue;
        };
        if !minigame.is_ready() {
            warn!(
                "minigame '{}' on {:?} was not reset, skipping",
                minigame.name(),
                entity
            );
            continue;
        }
        if minigame.is_active() {
            minigame.update(time.delta);
        }
    }
}
