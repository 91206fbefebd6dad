use serde::{Deserialize, Serialize};

use crate::*;

/// Running match and turn counters of the current board.
///
/// Every settled pair is a turn; matched pairs also count as a match.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    matches: u32,
    turns: u32,
}

impl GameStats {
    pub const fn new(matches: u32, turns: u32) -> Self {
        Self { matches, turns }
    }

    pub const fn matches(&self) -> u32 {
        self.matches
    }

    pub const fn turns(&self) -> u32 {
        self.turns
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::CardMatchResolved { .. } => {
                self.matches = self.matches.saturating_add(1);
                self.turns = self.turns.saturating_add(1);
            }
            GameEvent::CardMismatchResolved { .. } => {
                self.turns = self.turns.saturating_add(1);
            }
            _ => {}
        }
    }
}
