//! Input systems.
//!
//! - [`update_input_state`] latches the raw key transitions fed by the host
//!   into [`InputState`] once per tick.
//! - An [`InputEvent`] is triggered for every key pressed or released this
//!   tick.
use bevy_ecs::prelude::*;

use crate::events::input::InputEvent;
use crate::resources::input::InputState;

/// Latch the `InputState` resource and emit transition events.
pub fn update_input_state(mut input: ResMut<InputState>, mut commands: Commands) {
    input.latch();
    for (key, pressed) in input.edges() {
        commands.trigger(InputEvent { key, pressed });
    }
}
