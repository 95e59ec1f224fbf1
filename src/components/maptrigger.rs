//! Map trigger component.
//!
//! A [`MapTrigger`] marks an entity whose only purpose is to fire a handler
//! when the player overlaps it. Its physics body is always realized as a
//! sensor so it never obstructs movement.
//!
//! The `properties` payload is free-form data copied from the level file; the
//! handler selected by [`TriggerKind`] decides which keys it reads.

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::Component;
use serde::Deserialize;

use crate::error::TriggerError;

/// Free-form trigger payload (string keys to typed JSON values).
pub type TriggerProperties = serde_json::Map<String, serde_json::Value>;

/// Discriminator used to select a trigger handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Minigame,
    Tutorial,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Minigame => "minigame",
            TriggerKind::Tutorial => "tutorial",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = TriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minigame" => Ok(TriggerKind::Minigame),
            "tutorial" => Ok(TriggerKind::Tutorial),
            other => Err(TriggerError::UnknownTriggerType(other.to_string())),
        }
    }
}

/// Sub-type of a tutorial trigger, read from the `tutorial_type` property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TutorialType {
    Start,
    End,
}

#[derive(Component, Clone, Debug, PartialEq)]
pub struct MapTrigger {
    pub kind: TriggerKind,
    pub properties: TriggerProperties,
}

impl MapTrigger {
    pub fn new(kind: TriggerKind, properties: TriggerProperties) -> Self {
        Self { kind, properties }
    }

    /// Build a trigger from a level-file type name.
    pub fn from_type_name(name: &str, properties: TriggerProperties) -> Result<Self, TriggerError> {
        Ok(Self::new(name.parse()?, properties))
    }

    /// Get a string property.
    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}
