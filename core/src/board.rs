use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;

/// Rectangular grid of cards, stored row-major so that a card's index is its
/// position in reading order.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    size: Coord2,
    cards: Array2<Card>,
}

impl Board {
    /// Builds a fresh face-down board with a generated pair layout.
    ///
    /// The requested size goes through [`ensure_playable_grid`] first, so the
    /// resulting board may be smaller or larger than asked for.
    pub fn build<G: PairGenerator>(
        requested: Coord2,
        pair_supply: CellCount,
        generator: G,
    ) -> Self {
        let size = ensure_playable_grid(requested, pair_supply);
        let cell_count = total_cells(size);

        let mut pair_ids = generator.generate(cell_count);
        if pair_ids.len() != usize::from(cell_count) || !is_balanced(&pair_ids) {
            log::error!(
                "Generated layout of {} ids rejected for {} cells, using ordered pairs",
                pair_ids.len(),
                cell_count
            );
            pair_ids = ordered_pairs(cell_count);
        }

        let cards = pair_ids
            .into_iter()
            .enumerate()
            .map(|(index, pair_id)| Card::new(index, pair_id))
            .collect();
        let shape = (usize::from(size.1), usize::from(size.0));
        let cards = Array2::from_shape_vec(shape, cards).expect("layout length checked above");

        log::info!("Built {}x{} board", size.0, size.1);
        Self { size, cards }
    }

    /// Rebuilds a board with an explicit layout, e.g. from a snapshot.
    ///
    /// A face-up state in `card_states` is restored as face-down.
    pub fn from_layout(
        size: Coord2,
        pair_ids: &[PairId],
        card_states: &[CardState],
    ) -> Result<Self> {
        let cell_count = usize::from(total_cells(size));
        if pair_ids.len() != cell_count || card_states.len() != cell_count {
            return Err(GameError::LayoutMismatch);
        }

        let mut cards = Vec::with_capacity(cell_count);
        for (index, (&pair_id, state)) in pair_ids.iter().zip(card_states).enumerate() {
            cards.push(Card::with_state(index, pair_id, state.normalized()));
        }

        Self::from_cards(size, cards)
    }

    fn from_cards(size: Coord2, cards: Vec<Card>) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 || total_cells(size) % 2 != 0 {
            return Err(GameError::InvalidDimensions);
        }
        let shape = (usize::from(size.1), usize::from(size.0));
        let cards = Array2::from_shape_vec(shape, cards).map_err(|_| GameError::LayoutMismatch)?;
        Ok(Self { size, cards })
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        total_cells(self.size)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, index: CardIndex) -> Option<&Card> {
        let coords = index_to_coords(index, self.size)?;
        self.cards.get(coords.to_nd_index())
    }

    pub fn state_at(&self, index: CardIndex) -> Option<CardState> {
        self.card(index).map(Card::state)
    }

    pub fn pair_id_at(&self, index: CardIndex) -> Option<PairId> {
        self.card(index).map(Card::pair_id)
    }

    /// Sets the state of one card; `false` when out of range or refused.
    pub fn set_state(&mut self, index: CardIndex, state: CardState) -> bool {
        let Some(coords) = index_to_coords(index, self.size) else {
            return false;
        };
        self.cards
            .get_mut(coords.to_nd_index())
            .is_some_and(|card| card.set_state(state))
    }

    /// Cards in row-major order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Cards of a single row, left to right.
    pub fn row(&self, row: Coord) -> impl Iterator<Item = &Card> {
        self.cards.row(usize::from(row)).into_iter()
    }

    pub fn pair_ids(&self) -> Vec<PairId> {
        self.cards().map(Card::pair_id).collect()
    }

    pub fn card_states(&self) -> Vec<CardState> {
        self.cards().map(Card::state).collect()
    }

    pub fn matched_count(&self) -> CellCount {
        self.cards()
            .filter(|card| card.state().is_matched())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn is_solved(&self) -> bool {
        self.matched_count() == self.total_cells()
    }
}

/// Adjusts a requested grid so that it can be filled with pairs.
///
/// Dimensions are clamped to at least one. An odd cell count grows the smaller
/// dimension (columns on a tie). When the pairs needed exceed `pair_supply`, or
/// the count is odd again, the larger dimension shrinks (columns on a tie),
/// never below two cells.
pub fn ensure_playable_grid(requested: Coord2, pair_supply: CellCount) -> Coord2 {
    fn grow(value: Coord) -> Coord {
        value.checked_add(1).unwrap_or(value - 1)
    }

    let mut columns = requested.0.max(1);
    let mut rows = requested.1.max(1);
    let max_pairs = pair_supply.max(1);

    if mult(columns, rows) % 2 != 0 {
        if columns <= rows {
            columns = grow(columns);
        } else {
            rows = grow(rows);
        }
    }

    loop {
        let cells = mult(columns, rows);
        if cells <= 2 || (cells % 2 == 0 && cells / 2 <= max_pairs) {
            break;
        }
        if columns >= rows {
            columns -= 1;
        } else {
            rows -= 1;
        }
    }

    let adjusted = (columns, rows);
    if adjusted != requested {
        log::warn!(
            "Board size {}x{} adjusted to {}x{} (pairs: {}, supply: {})",
            requested.0,
            requested.1,
            columns,
            rows,
            mult(columns, rows) / 2,
            pair_supply
        );
    }
    adjusted
}
