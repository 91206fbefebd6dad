use crate::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Revealed => true,
        }
    }
}

/// Accepts or drops player reveal requests.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputGate {
    enabled: bool,
}

impl Default for InputGate {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::debug!("input {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    /// Turns a face-down card up and announces the flip.
    ///
    /// Disabled input, out of range indices, cards that are not face-down and
    /// cards still animating are all ignored.
    pub fn request_reveal(
        &self,
        index: CardIndex,
        board: &mut Board,
        presenter: &mut dyn CardPresenter,
        bus: &mut EventBus,
    ) -> RevealOutcome {
        if !self.enabled {
            log::trace!("reveal {} ignored, input disabled", index);
            return RevealOutcome::NoChange;
        }

        let Some(card) = board.card(index) else {
            log::trace!("reveal {} ignored, out of range", index);
            return RevealOutcome::NoChange;
        };

        if !card.can_flip() || presenter.is_animating(index) {
            log::trace!("reveal {} ignored, card is {:?}", index, card.state());
            return RevealOutcome::NoChange;
        }

        board.set_state(index, CardState::FaceUp);
        presenter.show(index, true);
        bus.publish(GameEvent::CardFlipStarted {
            index,
            face_up: true,
        });
        RevealOutcome::Revealed
    }
}
