//! Component owning a running minigame instance.
//!
//! Spawned by the minigame trigger handler. The instance is driven by
//! [`update_minigames`](crate::systems::minigame::update_minigames); a
//! component whose `minigame` is still `None` is skipped with a warning.

use bevy_ecs::prelude::Component;

use crate::minigames::Minigame;

#[derive(Component, Default)]
pub struct MinigameComponent {
    pub minigame: Option<Box<dyn Minigame>>,
}

impl MinigameComponent {
    pub fn new(minigame: Box<dyn Minigame>) -> Self {
        Self {
            minigame: Some(minigame),
        }
    }

    /// Name of the owned minigame, if any.
    pub fn name(&self) -> Option<&str> {
        self.minigame.as_deref().map(|m| m.name())
    }
}

impl std::fmt::Debug for MinigameComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinigameComponent")
            .field("minigame", &self.name())
            .finish()
    }
}
