//! Memory (card matching) minigame.
//!
//! A round deals `pairs` pairs of face-down cards in shuffled order. The
//! player flips two cards at a time; equal values stay face up, different
//! values turn back. The round ends when every pair is matched, or when the
//! optional time limit runs out.
//!
//! Trigger properties:
//!
//! | key          | type   | default |
//! |--------------|--------|---------|
//! | `pairs`      | number | 6       |
//! | `seed`       | number | random  |
//! | `time_limit` | number | none    |
use bevy_ecs::prelude::World;
use log::debug;
use serde::Deserialize;

use super::Minigame;
use crate::components::maptrigger::TriggerProperties;
use crate::error::MinigameError;
use crate::resources::maploader::MapLoader;

pub const MEMORY_MINIGAME: &str = "memory";

const DEFAULT_PAIRS: usize = 6;
const MAX_PAIRS: usize = 32;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct MemorySettings {
    pairs: usize,
    seed: Option<u64>,
    time_limit: Option<f32>,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_PAIRS,
            seed: None,
            time_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub value: usize,
    pub matched: bool,
}

/// Result of flipping one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Out of range, already matched, already face up, or round over.
    Ignored,
    /// First card of a pair is now face up.
    Revealed,
    Matched,
    /// Both cards turned back face down.
    Mismatched,
}

#[derive(Debug, Default)]
pub struct MemoryMinigame {
    cards: Vec<Card>,
    face_up: Option<usize>,
    matched_pairs: usize,
    moves: u32,
    elapsed: f32,
    time_limit: Option<f32>,
    map: Option<String>,
    ready: bool,
}

impl MemoryMinigame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory registered with the [`MinigameManager`](super::MinigameManager).
    pub fn boxed() -> Box<dyn Minigame> {
        Box::new(Self::new())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Map that was loaded when the round started.
    pub fn map(&self) -> Option<&str> {
        self.map.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.ready && self.matched_pairs == self.pairs()
    }

    pub fn timed_out(&self) -> bool {
        self.time_limit.is_some_and(|limit| self.elapsed >= limit)
    }

    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if !self.is_active() || index >= self.cards.len() || self.cards[index].matched {
            return FlipOutcome::Ignored;
        }
        match self.face_up.take() {
            None => {
                self.face_up = Some(index);
                FlipOutcome::Revealed
            }
            Some(first) if first == index => {
                self.face_up = Some(first);
                FlipOutcome::Ignored
            }
            Some(first) => {
                self.moves += 1;
                if self.cards[first].value == self.cards[index].value {
                    self.cards[first].matched = true;
                    self.cards[index].matched = true;
                    self.matched_pairs += 1;
                    FlipOutcome::Matched
                } else {
                    FlipOutcome::Mismatched
                }
            }
        }
    }
}

impl Minigame for MemoryMinigame {
    fn name(&self) -> &str {
        MEMORY_MINIGAME
    }

    fn reset(
        &mut self,
        properties: &TriggerProperties,
        _world: &mut World,
        map_loader: &dyn MapLoader,
    ) -> Result<(), MinigameError> {
        let settings: MemorySettings =
            serde_json::from_value(serde_json::Value::Object(properties.clone())).map_err(|e| {
                MinigameError::InvalidProperty {
                    key: MEMORY_MINIGAME.to_string(),
                    reason: e.to_string(),
                }
            })?;
        if settings.pairs == 0 || settings.pairs > MAX_PAIRS {
            return Err(MinigameError::InvalidProperty {
                key: "pairs".to_string(),
                reason: format!("must be between 1 and {}", MAX_PAIRS),
            });
        }

        let mut rng = match settings.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let mut cards: Vec<Card> = (0..settings.pairs)
            .flat_map(|value| [value, value])
            .map(|value| Card {
                value,
                matched: false,
            })
            .collect();
        rng.shuffle(&mut cards);

        *self = Self {
            cards,
            time_limit: settings.time_limit,
            map: map_loader.current_map().map(str::to_string),
            ready: true,
            ..Self::default()
        };
        debug!(
            "memory minigame reset with {} pairs on map {:?}",
            settings.pairs, self.map
        );
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn is_active(&self) -> bool {
        self.ready && self.matched_pairs < self.pairs() && !self.timed_out()
    }

    fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }
}
