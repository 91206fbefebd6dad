use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible state of a single card.
///
/// Persisted as its numeric code: `FaceDown = 0`, `FaceUp = 1`, `Matched = 2`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CardState {
    #[default]
    FaceDown,
    FaceUp,
    Matched,
}

impl CardState {
    pub const fn code(self) -> u8 {
        match self {
            Self::FaceDown => 0,
            Self::FaceUp => 1,
            Self::Matched => 2,
        }
    }

    pub const fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::FaceDown),
            1 => Ok(Self::FaceUp),
            2 => Ok(Self::Matched),
            other => Err(GameError::InvalidCardState(other)),
        }
    }

    pub const fn can_flip(self) -> bool {
        matches!(self, Self::FaceDown)
    }

    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::FaceUp)
    }

    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }

    /// A resumed board never starts mid-reveal.
    pub const fn normalized(self) -> Self {
        match self {
            Self::FaceUp => Self::FaceDown,
            other => other,
        }
    }
}

impl From<CardState> for u8 {
    fn from(state: CardState) -> Self {
        state.code()
    }
}

impl TryFrom<u8> for CardState {
    type Error = GameError;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    index: CardIndex,
    pair_id: PairId,
    state: CardState,
}

impl Card {
    pub const fn new(index: CardIndex, pair_id: PairId) -> Self {
        Self::with_state(index, pair_id, CardState::FaceDown)
    }

    pub const fn with_state(index: CardIndex, pair_id: PairId, state: CardState) -> Self {
        Self {
            index,
            pair_id,
            state,
        }
    }

    pub const fn index(&self) -> CardIndex {
        self.index
    }

    pub const fn pair_id(&self) -> PairId {
        self.pair_id
    }

    pub const fn state(&self) -> CardState {
        self.state
    }

    pub const fn can_flip(&self) -> bool {
        self.state.can_flip()
    }

    /// Applies `state`, refusing any transition out of `Matched`.
    pub fn set_state(&mut self, state: CardState) -> bool {
        if self.state.is_matched() && !state.is_matched() {
            log::warn!(
                "Refused to move matched card {} back to {:?}",
                self.index,
                state
            );
            return false;
        }
        if self.state != state {
            log::trace!("card {}: {:?} -> {:?}", self.index, self.state, state);
        }
        self.state = state;
        true
    }
}
