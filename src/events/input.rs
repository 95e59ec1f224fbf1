//! Key transition events.
//!
//! [`update_input_state`](crate::systems::input::update_input_state) triggers
//! an [`InputEvent`] for every key that went down or up this tick, after
//! latching [`InputState`](crate::resources::input::InputState).
//!
//! Systems can subscribe to these events to react to input without directly
//! reading the `InputState` resource.

use bevy_ecs::prelude::*;

use crate::resources::input::KeyCode;

/// Event emitted when a key is pressed or released.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: KeyCode,
    /// Whether the key was pressed (true) or released (false).
    pub pressed: bool,
}
