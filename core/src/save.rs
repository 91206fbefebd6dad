use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Resumable record of a board and its counters.
///
/// Serialized with camelCase keys and numeric card states, so equal inputs
/// always produce the same bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub difficulty: Difficulty,
    pub grid_x: Coord,
    pub grid_y: Coord,
    pub pair_ids: Vec<PairId>,
    pub card_states: Vec<CardState>,
    pub matches: u32,
    pub turns: u32,
}

impl Snapshot {
    pub const VERSION: u32 = 1;

    pub fn capture(board: &Board, difficulty: Difficulty, stats: GameStats) -> Self {
        let (grid_x, grid_y) = board.size();
        Self {
            version: Self::VERSION,
            difficulty,
            grid_x,
            grid_y,
            pair_ids: board.pair_ids(),
            card_states: board.card_states(),
            matches: stats.matches(),
            turns: stats.turns(),
        }
    }

    pub fn grid_size(&self) -> Coord2 {
        (self.grid_x, self.grid_y)
    }

    pub fn stats(&self) -> GameStats {
        GameStats::new(self.matches, self.turns)
    }

    /// Checks everything a board rebuild relies on.
    pub fn validate(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(GameError::UnsupportedVersion(self.version));
        }

        let size = self.grid_size();
        if size.0 == 0 || size.1 == 0 || total_cells(size) % 2 != 0 {
            return Err(GameError::InvalidDimensions);
        }

        let cell_count = usize::from(total_cells(size));
        if self.pair_ids.len() != cell_count || self.card_states.len() != cell_count {
            return Err(GameError::LayoutMismatch);
        }

        if !is_balanced(&self.pair_ids) {
            return Err(GameError::UnbalancedPairs);
        }

        Ok(())
    }

    /// Turns every face-up card back down.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for state in self.card_states.iter_mut() {
            *state = state.normalized();
        }
        self
    }

    pub fn to_board(&self) -> Result<Board> {
        self.validate()?;
        Board::from_layout(self.grid_size(), &self.pair_ids, &self.card_states)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Single-slot storage for the last snapshot; the newest save wins.
///
/// Implementations log their own failures, the game never stops over them.
pub trait SaveStore {
    fn save(&mut self, snapshot: &Snapshot);
    fn load(&self) -> Option<Snapshot>;
    fn clear(&mut self);
}

/// In-memory slot holding the serialized record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    slot: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw record, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
            saves: 0,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) {
        match snapshot.to_json() {
            Ok(json) => {
                self.slot = Some(json);
                self.saves += 1;
            }
            Err(err) => log::error!("Could not serialize snapshot: {}", err),
        }
    }

    fn load(&self) -> Option<Snapshot> {
        let raw = self.slot.as_deref()?;
        match Snapshot::from_json(raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                log::warn!("Discarding unreadable snapshot: {}", err);
                None
            }
        }
    }

    fn clear(&mut self) {
        self.slot = None;
    }
}

/// Writes a snapshot after every settled pair and reads it back on resume.
#[derive(Clone, Debug, Default)]
pub struct SaveCoordinator<S> {
    store: S,
    restoring: bool,
}

impl<S: SaveStore> SaveCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            restoring: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Suppresses saving while a snapshot is being applied.
    pub fn begin_restore(&mut self) {
        self.restoring = true;
    }

    pub fn end_restore(&mut self) {
        self.restoring = false;
    }

    pub fn handle_event(
        &mut self,
        event: &GameEvent,
        board: &Board,
        difficulty: Difficulty,
        stats: GameStats,
    ) -> bool {
        match event {
            GameEvent::CardMatchResolved { .. } | GameEvent::CardMismatchResolved { .. } => {
                self.save_now(board, difficulty, stats)
            }
            _ => false,
        }
    }

    pub fn save_now(&mut self, board: &Board, difficulty: Difficulty, stats: GameStats) -> bool {
        if self.restoring || board.is_empty() {
            return false;
        }

        let snapshot = Snapshot::capture(board, difficulty, stats);
        log::debug!(
            "Saving {}x{} board, {} matches in {} turns",
            snapshot.grid_x,
            snapshot.grid_y,
            snapshot.matches,
            snapshot.turns
        );
        self.store.save(&snapshot);
        true
    }

    /// Last stored snapshot, validated and normalized; `None` when missing or
    /// malformed.
    pub fn load(&self) -> Option<Snapshot> {
        let snapshot = self.store.load()?;
        if let Err(err) = snapshot.validate() {
            log::warn!("Discarding malformed snapshot: {}", err);
            return None;
        }
        Some(snapshot.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardState::*;
    use alloc::vec;

    fn snapshot(card_states: Vec<CardState>) -> Snapshot {
        Snapshot {
            version: Snapshot::VERSION,
            difficulty: Difficulty::Medium,
            grid_x: 2,
            grid_y: 2,
            pair_ids: vec![0, 0, 1, 1],
            card_states,
            matches: 1,
            turns: 3,
        }
    }

    #[test]
    fn json_uses_camel_case_and_numeric_states() {
        let json = snapshot(vec![FaceUp, FaceDown, Matched, Matched])
            .to_json()
            .unwrap();

        assert_eq!(
            json,
            r#"{"version":1,"difficulty":1,"gridX":2,"gridY":2,"pairIds":[0,0,1,1],"cardStates":[1,0,2,2],"matches":1,"turns":3}"#
        );
    }

    #[test]
    fn unknown_state_code_fails_to_parse() {
        let json = r#"{"version":1,"difficulty":0,"gridX":2,"gridY":1,"pairIds":[0,0],"cardStates":[0,5],"matches":0,"turns":0}"#;

        assert!(Snapshot::from_json(json).is_err());
    }

    #[test]
    fn validate_catches_malformed_records() {
        let mut short = snapshot(vec![FaceDown; 3]);
        assert_eq!(short.validate(), Err(GameError::LayoutMismatch));

        short.card_states.push(FaceDown);
        short.pair_ids = vec![0, 0, 0, 1];
        assert_eq!(short.validate(), Err(GameError::UnbalancedPairs));

        let mut versioned = snapshot(vec![FaceDown; 4]);
        versioned.version = 9;
        assert_eq!(versioned.validate(), Err(GameError::UnsupportedVersion(9)));

        let mut flat = snapshot(vec![FaceDown; 4]);
        flat.grid_y = 0;
        assert_eq!(flat.validate(), Err(GameError::InvalidDimensions));
    }

    #[test]
    fn coordinator_saves_on_settled_pairs_only() {
        let board = snapshot(vec![FaceDown; 4]).to_board().unwrap();
        let mut saver = SaveCoordinator::new(MemoryStore::new());
        let flip = GameEvent::CardFlipStarted {
            index: 0,
            face_up: true,
        };
        let mismatch = GameEvent::CardMismatchResolved {
            first_index: 0,
            second_index: 2,
        };

        assert!(!saver.handle_event(&flip, &board, Difficulty::Easy, GameStats::default()));
        assert!(saver.handle_event(&mismatch, &board, Difficulty::Easy, GameStats::new(0, 1)));
        assert_eq!(saver.store().save_count(), 1);
        assert_eq!(saver.load().map(|s| s.turns), Some(1));
    }

    #[test]
    fn coordinator_skips_saving_while_restoring() {
        let board = snapshot(vec![FaceDown; 4]).to_board().unwrap();
        let mut saver = SaveCoordinator::new(MemoryStore::new());

        saver.begin_restore();
        assert!(!saver.save_now(&board, Difficulty::Easy, GameStats::default()));
        saver.end_restore();
        assert!(saver.save_now(&board, Difficulty::Easy, GameStats::default()));
    }

    #[test]
    fn coordinator_load_normalizes_and_drops_garbage() {
        let mut store = MemoryStore::new();
        store.save(&snapshot(vec![FaceUp, FaceDown, Matched, Matched]));
        let saver = SaveCoordinator::new(store);

        let loaded = saver.load().unwrap();
        assert_eq!(loaded.card_states, [FaceDown, FaceDown, Matched, Matched]);

        let garbage = SaveCoordinator::new(MemoryStore::with_raw("{not json"));
        assert_eq!(garbage.load(), None);

        let empty = SaveCoordinator::new(MemoryStore::new());
        assert_eq!(empty.load(), None);
    }

    #[test]
    fn clear_empties_the_slot() {
        let mut store = MemoryStore::new();
        store.save(&snapshot(vec![FaceDown; 4]));
        store.clear();

        assert_eq!(store.raw(), None);
        assert_eq!(store.load(), None);
    }
}
