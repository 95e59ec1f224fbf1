//! Per-frame keyboard input resource.
//!
//! The host feeds raw key transitions into [`InputState`] with
//! [`press`](InputState::press) and [`release`](InputState::release).
//! [`update_input_state`](crate::systems::input::update_input_state) latches
//! them once per tick, so every system in the tick sees the same snapshot.
//!
//! Systems query keys through the [`InputSource`] trait.
use std::str::FromStr;

use bevy_ecs::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// Raw input codes understood by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    E,
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
}

impl FromStr for KeyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "w" => KeyCode::W,
            "a" => KeyCode::A,
            "s" => KeyCode::S,
            "d" => KeyCode::D,
            "e" => KeyCode::E,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "space" => KeyCode::Space,
            "enter" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            other => return Err(format!("unknown key: {other}")),
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Boolean key state latched for one tick.
pub struct BoolState {
    /// Whether the key is currently held.
    pub active: bool,
    /// Whether the key went down this tick.
    pub just_pressed: bool,
    /// Whether the key went up this tick.
    pub just_released: bool,
}

/// Read-only view of input sources.
pub trait InputSource {
    /// Whether `key` is held this tick.
    fn is_active(&self, key: KeyCode) -> bool;
}

/// Resource capturing the per-tick keyboard state.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    states: FxHashMap<KeyCode, BoolState>,
    held: FxHashSet<KeyCode>,
}

impl InputState {
    /// Record that `key` went down. Visible after the next latch.
    pub fn press(&mut self, key: KeyCode) {
        self.held.insert(key);
    }

    /// Record that `key` went up. Visible after the next latch.
    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Latch raw key transitions into per-tick states.
    pub fn latch(&mut self) {
        for key in self.held.iter().copied() {
            self.states.entry(key).or_default();
        }
        for (key, state) in self.states.iter_mut() {
            let down = self.held.contains(key);
            state.just_pressed = down && !state.active;
            state.just_released = !down && state.active;
            state.active = down;
        }
    }

    pub fn state(&self, key: KeyCode) -> BoolState {
        self.states.get(&key).copied().unwrap_or_default()
    }

    /// Keys that changed this tick, with `true` for presses.
    pub fn edges(&self) -> Vec<(KeyCode, bool)> {
        let mut edges: Vec<(KeyCode, bool)> = self
            .states
            .iter()
            .filter_map(|(key, state)| {
                if state.just_pressed {
                    Some((*key, true))
                } else if state.just_released {
                    Some((*key, false))
                } else {
                    None
                }
            })
            .collect();
        edges.sort_by_key(|(key, _)| *key as u8);
        edges
    }
}

impl InputSource for InputState {
    fn is_active(&self, key: KeyCode) -> bool {
        self.state(key).active
    }
}
