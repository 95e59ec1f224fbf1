//! Minigames launched by map triggers.
//!
//! A minigame is a self-contained piece of gameplay owned by a
//! [`MinigameComponent`](crate::components::minigame::MinigameComponent). The
//! [`MinigameManager`] resolves a string key (the trigger's `minigame_type`
//! property) to a fresh instance; the trigger handler then resets it with the
//! trigger properties and hands it to a new entity.
//!
//! Submodules overview:
//! - [`memory`] – card matching game
pub mod memory;

use bevy_ecs::prelude::World;
use rustc_hash::FxHashMap;

use crate::components::maptrigger::TriggerProperties;
use crate::error::MinigameError;
use crate::resources::maploader::MapLoader;

/// A minigame instance.
pub trait Minigame: Send + Sync {
    /// Key this minigame is registered under.
    fn name(&self) -> &str;

    /// Prepare a new round from trigger properties.
    ///
    /// Called exactly once before the instance is attached to an entity.
    fn reset(
        &mut self,
        properties: &TriggerProperties,
        world: &mut World,
        map_loader: &dyn MapLoader,
    ) -> Result<(), MinigameError>;

    /// Whether `reset` succeeded on this instance.
    fn is_ready(&self) -> bool;

    /// Whether the round is still being played.
    fn is_active(&self) -> bool;

    /// Advance by `dt` seconds.
    fn update(&mut self, dt: f32);
}

/// Constructor stored in the manager.
pub type MinigameFactory = fn() -> Box<dyn Minigame>;

/// Registry of minigame constructors keyed by name.
pub struct MinigameManager {
    factories: FxHashMap<String, MinigameFactory>,
}

impl Default for MinigameManager {
    /// Manager with every built-in minigame registered.
    fn default() -> Self {
        let mut manager = Self::empty();
        manager.register(memory::MEMORY_MINIGAME, memory::MemoryMinigame::boxed);
        manager
    }
}

impl MinigameManager {
    pub fn empty() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, factory: MinigameFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Create a fresh, not yet reset, instance of the named minigame.
    pub fn get_minigame(&self, name: &str) -> Result<Box<dyn Minigame>, MinigameError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| MinigameError::UnknownMinigameType(name.to_string()))
    }
}
