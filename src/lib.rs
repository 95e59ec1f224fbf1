//! Emberleap simulation core.
//!
//! This crate exposes the ECS components, resources, systems, and events of a
//! 2D platformer simulation: rigid-body physics kept in sync with the entity
//! population, contact fan-out, foot-contact ground detection, input-driven
//! movement, and map triggers that launch minigames.
//!
//! Rendering, audio and level loading live in the host. The host feeds
//! [`resources::input::InputState`], runs [`game::run_tick`] once per frame,
//! reads `Transform`s back, and stops when
//! [`resources::exitrequest::ExitRequest`] is set.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod minigames;
pub mod resources;
pub mod systems;
pub mod triggers;
