//! ECS components for entities.
//!
//! Submodules overview:
//! - [`maptrigger`] – trigger areas placed in levels and their payload
//! - [`minigame`] – owner of a running minigame instance
//! - [`physicsbody`] – rigid body declaration and its realized handles
//! - [`playercontrolled`] – action bindings and player markers
//! - [`transform`] – world-space position written back from physics

pub mod maptrigger;
pub mod minigame;
pub mod physicsbody;
pub mod playercontrolled;
pub mod transform;
