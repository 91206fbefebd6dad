/// Single board dimension, used for column and row counts.
pub type Coord = u8;

/// Count type used for cell and pair totals.
pub type CellCount = u16;

/// Grid size `(columns, rows)`.
pub type Coord2 = (Coord, Coord);

/// Row-major position of a card on the board.
pub type CardIndex = usize;

/// Value shared by exactly two cards of a board.
pub type PairId = u16;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    /// `(column, row)` to the `[row, column]` index of a row-major array.
    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Total cell count of a `(columns, rows)` grid.
pub const fn total_cells(size: Coord2) -> CellCount {
    mult(size.0, size.1)
}

/// Position `(column, row)` of a row-major index, when it falls inside `size`.
pub fn index_to_coords(index: CardIndex, size: Coord2) -> Option<Coord2> {
    let columns = usize::from(size.0);
    if columns == 0 || index >= usize::from(total_cells(size)) {
        return None;
    }
    let column = (index % columns).try_into().ok()?;
    let row = (index / columns).try_into().ok()?;
    Some((column, row))
}

/// Row-major index of `(column, row)`, when it falls inside `size`.
pub fn coords_to_index(coords: Coord2, size: Coord2) -> Option<CardIndex> {
    if coords.0 >= size.0 || coords.1 >= size.1 {
        return None;
    }
    Some(usize::from(coords.1) * usize::from(size.0) + usize::from(coords.0))
}
