//! Simulation systems.
//!
//! Submodules overview
//! - [`contacts`] – forward physics contacts to listeners, ground tracking
//! - [`input`] – latch host input into [`crate::resources::input::InputState`]
//! - [`inputaction`] – translate held actions into impulses and exit requests
//! - [`minigame`] – advance running minigames
//! - [`physics`] – body lifecycle, fixed physics step, transform sync
//! - [`time`] – update simulation time and delta
//! - [`triggers`] – queue trigger contacts and run their handlers

pub mod contacts;
pub mod input;
pub mod inputaction;
pub mod minigame;
pub mod physics;
pub mod time;
pub mod triggers;
