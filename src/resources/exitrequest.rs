//! Process exit request.
//!
//! Set by the Quit action; the host loop polls it after each tick and stops.
use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExitRequest {
    pub requested: bool,
}

impl ExitRequest {
    pub fn request(&mut self) {
        self.requested = true;
    }
}
