use std::fmt::Write as _;

use pairup_core::{Board, CardIndex, CardPresenter, CardState, GameSession, PairId, SaveStore};

/// Remembers which matched cards have been cleared off the table.
#[derive(Clone, Debug, Default)]
pub struct TextPresenter {
    hidden: Vec<bool>,
}

impl TextPresenter {
    pub fn is_hidden(&self, index: CardIndex) -> bool {
        self.hidden.get(index).copied().unwrap_or(false)
    }
}

impl CardPresenter for TextPresenter {
    fn show(&mut self, index: CardIndex, _face_up: bool) {
        log::trace!("show {}", index);
    }

    fn hide_matched(&mut self, index: CardIndex) {
        if let Some(hidden) = self.hidden.get_mut(index) {
            *hidden = true;
        }
    }

    fn reset(&mut self, board: &Board) {
        self.hidden = board
            .cards()
            .map(|card| card.state().is_matched())
            .collect();
    }
}

/// `A`..`Z`, then `a`..`z`, then plain numbers.
pub fn glyph(pair_id: PairId) -> String {
    match pair_id {
        0..=25 => char::from(b'A' + pair_id as u8).to_string(),
        26..=51 => char::from(b'a' + (pair_id - 26) as u8).to_string(),
        other => other.to_string(),
    }
}

/// Status line followed by the grid, one text row per board row.
pub fn render<S: SaveStore>(session: &GameSession<S, TextPresenter>) -> String {
    let mut out = String::new();
    let Some(board) = session.board() else {
        return out;
    };
    let (columns, rows) = board.size();
    let stats = session.stats();

    let _ = writeln!(
        out,
        "{} {}x{}  matches {}  turns {}",
        session.difficulty().name(),
        columns,
        rows,
        stats.matches(),
        stats.turns()
    );

    out.push_str("   ");
    for column in 0..columns {
        let _ = write!(out, "{:>4}", column);
    }
    out.push('\n');

    for row in 0..rows {
        let _ = write!(out, "{:>3}", row);
        for card in board.row(row) {
            let cell = match card.state() {
                CardState::FaceDown => "##".to_string(),
                CardState::FaceUp => glyph(card.pair_id()),
                CardState::Matched if session.presenter().is_hidden(card.index()) => String::new(),
                CardState::Matched => format!("({})", glyph(card.pair_id())),
            };
            let _ = write!(out, "{:>4}", cell);
        }
        out.push('\n');
    }

    out
}
