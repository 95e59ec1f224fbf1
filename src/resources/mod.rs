//! ECS resources made available to systems.
//!
//! Overview
//! - `contacts` – fan-out of physics contacts to registered listeners
//! - `exitrequest` – set when the player asks to quit
//! - `gameconfig` – settings loaded from `config.ini`
//! - `groundcontacts` – per-entity foot contact counters
//! - `input` – per-tick keyboard state fed by the host
//! - `maploader` – read-only view of the host's level loader
//! - `physicsworld` – rapier world and entity bookkeeping
//! - `worldtime` – simulation time and delta
pub mod contacts;
pub mod exitrequest;
pub mod gameconfig;
pub mod groundcontacts;
pub mod input;
pub mod maploader;
pub mod physicsworld;
pub mod worldtime;
