//! Event types and observers used by the simulation.
//!
//! Submodules:
//! - [`contact`] – contacts resolved from the physics step
//! - [`input`] – key press/release notifications
//! - [`lifecycle`] – physics-tag add/remove observers and their queue
//! - [`trigger`] – notification that a trigger handler ran
pub mod contact;
pub mod input;
pub mod lifecycle;
pub mod trigger;
