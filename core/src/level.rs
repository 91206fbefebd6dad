use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Persisted as its numeric code: `Easy = 0`, `Medium = 1`, `Hard = 2`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn code(self) -> u8 {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }

    pub const fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Easy),
            1 => Ok(Self::Medium),
            2 => Ok(Self::Hard),
            other => Err(GameError::InvalidDifficulty(other)),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.code()
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = GameError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
    }
}

/// Board shape and pacing of one difficulty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPreset {
    pub difficulty: Difficulty,
    pub grid_size: Coord2,
    /// How long every card stays face-up when a fresh board is shown.
    pub preview_face_up_duration: Duration,
    pub mismatch_flip_back_delay: Duration,
    pub match_hide_delay: Duration,
}

impl LevelPreset {
    pub const fn easy() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            grid_size: (4, 3),
            preview_face_up_duration: Duration::from_millis(1500),
            mismatch_flip_back_delay: Duration::from_millis(600),
            match_hide_delay: Duration::from_millis(1500),
        }
    }

    pub const fn medium() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            grid_size: (4, 4),
            preview_face_up_duration: Duration::from_millis(1500),
            mismatch_flip_back_delay: Duration::from_millis(600),
            match_hide_delay: Duration::from_millis(1500),
        }
    }

    pub const fn hard() -> Self {
        Self {
            difficulty: Difficulty::Hard,
            grid_size: (6, 5),
            preview_face_up_duration: Duration::from_millis(1000),
            mismatch_flip_back_delay: Duration::from_millis(500),
            match_hide_delay: Duration::from_millis(1500),
        }
    }

    pub const fn match_timings(&self) -> MatchTimings {
        MatchTimings::new(self.mismatch_flip_back_delay, self.match_hide_delay)
    }

    /// Same preset without the opening preview.
    #[must_use]
    pub const fn without_preview(mut self) -> Self {
        self.preview_face_up_duration = Duration::ZERO;
        self
    }
}

/// One preset per difficulty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub easy: LevelPreset,
    pub medium: LevelPreset,
    pub hard: LevelPreset,
}

impl LevelConfig {
    pub const fn preset(&self, difficulty: Difficulty) -> LevelPreset {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    #[must_use]
    pub fn without_preview(self) -> Self {
        Self {
            easy: self.easy.without_preview(),
            medium: self.medium.without_preview(),
            hard: self.hard.without_preview(),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            easy: LevelPreset::easy(),
            medium: LevelPreset::medium(),
            hard: LevelPreset::hard(),
        }
    }
}

/// Board-wide settings that do not change between difficulties.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSettings {
    /// Number of distinct card faces available, which caps the pair count.
    pub pair_supply: CellCount,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self { pair_supply: 18 }
    }
}
