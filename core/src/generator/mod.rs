use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

/// Produces the row-major pair-id layout of a fresh board.
pub trait PairGenerator {
    fn generate(self, cell_count: CellCount) -> Vec<PairId>;
}

/// Unshuffled layout `[0, 0, 1, 1, ...]`, the starting point of every shuffle.
pub fn ordered_pairs(cell_count: CellCount) -> Vec<PairId> {
    (0..cell_count / 2).flat_map(|id| [id, id]).collect()
}

/// Checks that each id in `pair_ids` appears exactly twice.
pub fn is_balanced(pair_ids: &[PairId]) -> bool {
    use alloc::collections::BTreeMap;

    if pair_ids.len() % 2 != 0 {
        return false;
    }
    let mut counts: BTreeMap<PairId, u8> = BTreeMap::new();
    for &id in pair_ids {
        let count = counts.entry(id).or_insert(0);
        *count = count.saturating_add(1);
    }
    counts.values().all(|&count| count == 2)
}
