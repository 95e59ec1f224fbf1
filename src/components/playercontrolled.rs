//! Player control components.
//!
//! - [`PlayerControlled`] – action bindings for an input-driven entity
//! - [`Player`] – tag for the distinguished controllable entity
//! - [`DisableInput`] – excludes an entity from input processing
//! - [`Dead`] – suppresses input without removing other components
//!
//! [`input_action_system`](crate::systems::inputaction::input_action_system)
//! reads these components and turns held keys into physics impulses.

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;

use crate::resources::input::KeyCode;

/// Semantic actions a controllable entity can perform.
///
/// The declaration order is the evaluation order used each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameAction {
    Jump,
    MoveLeft,
    MoveRight,
    Quit,
    Use,
}

impl GameAction {
    pub const ALL: [GameAction; 5] = [
        GameAction::Jump,
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::Quit,
        GameAction::Use,
    ];

    /// Key name used in the `[bindings]` config section.
    pub fn config_key(&self) -> &'static str {
        match self {
            GameAction::Jump => "jump",
            GameAction::MoveLeft => "move_left",
            GameAction::MoveRight => "move_right",
            GameAction::Quit => "quit",
            GameAction::Use => "use",
        }
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

impl FromStr for GameAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameAction::ALL
            .into_iter()
            .find(|a| a.config_key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

/// Mapping from action to the raw key that triggers it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bindings {
    bindings: FxHashMap<GameAction, KeyCode>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut bindings = FxHashMap::default();
        bindings.insert(GameAction::Jump, KeyCode::Space);
        bindings.insert(GameAction::MoveLeft, KeyCode::A);
        bindings.insert(GameAction::MoveRight, KeyCode::D);
        bindings.insert(GameAction::Quit, KeyCode::Escape);
        bindings.insert(GameAction::Use, KeyCode::E);
        Self { bindings }
    }
}

impl Bindings {
    /// Bindings with no action bound.
    pub fn empty() -> Self {
        Self {
            bindings: FxHashMap::default(),
        }
    }

    pub fn bind(&mut self, action: GameAction, key: KeyCode) {
        self.bindings.insert(action, key);
    }

    pub fn with(mut self, action: GameAction, key: KeyCode) -> Self {
        self.bind(action, key);
        self
    }

    pub fn key_for(&self, action: GameAction) -> Option<KeyCode> {
        self.bindings.get(&action).copied()
    }

    /// Bound actions in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (GameAction, KeyCode)> + '_ {
        GameAction::ALL
            .into_iter()
            .filter_map(|action| self.key_for(action).map(|key| (action, key)))
    }
}

/// Input bindings of a controllable entity.
#[derive(Component, Clone, Debug, Default)]
pub struct PlayerControlled {
    pub bindings: Bindings,
}

impl PlayerControlled {
    pub fn new(bindings: Bindings) -> Self {
        Self { bindings }
    }
}

/// Tag for the player entity. Its body gets the extra feet fixtures and the
/// foot sensor, and its contacts with [`MapTrigger`](super::maptrigger::MapTrigger)
/// entities fire triggers.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;

/// Marker: entity ignores input entirely.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct DisableInput;

/// Marker: entity is dead; input is suppressed but the body stays simulated.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Dead;
