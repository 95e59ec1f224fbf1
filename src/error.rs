//! Error types surfaced by trigger dispatch and minigame resolution.
//!
//! Invariant violations inside the physics synchronization (an entity whose
//! body was never realized) are not represented here: they panic.

use thiserror::Error;

use crate::components::maptrigger::TriggerKind;

/// Failure while resolving or resetting a minigame.
#[derive(Debug, Error)]
pub enum MinigameError {
    #[error("unknown minigame type: {0}")]
    UnknownMinigameType(String),

    #[error("invalid minigame property `{key}`: {reason}")]
    InvalidProperty { key: String, reason: String },
}

/// Failure while dispatching a trigger to its handler.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("unknown trigger type: {0}")]
    UnknownTriggerType(String),

    #[error("no handler registered for trigger type {0:?}")]
    NoHandler(TriggerKind),

    #[error("trigger property `{0}` is missing or not a string")]
    MissingProperty(&'static str),

    #[error(transparent)]
    Minigame(#[from] MinigameError),
}
