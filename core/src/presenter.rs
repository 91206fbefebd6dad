use crate::*;

/// Presentation side of a card: flips, hides and reports running animations.
///
/// Nothing here feeds back into the game state except [`is_animating`], which
/// the input gate consults before accepting a reveal.
///
/// [`is_animating`]: CardPresenter::is_animating
pub trait CardPresenter {
    /// Starts a flip towards `face_up`.
    fn show(&mut self, index: CardIndex, face_up: bool);

    /// Hides a card that has been matched.
    fn hide_matched(&mut self, index: CardIndex);

    fn is_animating(&self, _index: CardIndex) -> bool {
        false
    }

    /// Drops every visual and lays out a board from scratch.
    fn reset(&mut self, _board: &Board) {}
}

/// Presenter for headless play.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NullPresenter;

impl CardPresenter for NullPresenter {
    fn show(&mut self, _index: CardIndex, _face_up: bool) {}

    fn hide_matched(&mut self, _index: CardIndex) {}
}
