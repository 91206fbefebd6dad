use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pairup_core::CardState::*;
use pairup_core::*;

const TWO_BY_TWO: [PairId; 4] = [0, 0, 1, 1];

fn stored(
    pair_ids: &[PairId],
    card_states: Vec<CardState>,
    matches: u32,
    turns: u32,
) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.save(&Snapshot {
        version: Snapshot::VERSION,
        difficulty: Difficulty::Easy,
        grid_x: 2,
        grid_y: (pair_ids.len() / 2) as Coord,
        pair_ids: pair_ids.to_vec(),
        card_states,
        matches,
        turns,
    });
    store
}

fn resumed(store: MemoryStore) -> (GameSession, Rc<RefCell<Vec<GameEvent>>>) {
    let mut session = GameSession::new(store, NullPresenter, 0);
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    session.subscribe(move |event| sink.borrow_mut().push(*event));
    assert!(session.start());
    (session, log)
}

fn settled(log: &Rc<RefCell<Vec<GameEvent>>>) -> Vec<GameEvent> {
    log.borrow()
        .iter()
        .copied()
        .filter(|event| {
            matches!(
                event,
                GameEvent::CardMatchResolved { .. }
                    | GameEvent::CardMismatchResolved { .. }
                    | GameEvent::GameCompleted
            )
        })
        .collect()
}

#[test]
fn mismatch_settles_after_delay() {
    let (mut session, log) = resumed(stored(&TWO_BY_TWO, vec![FaceDown; 4], 0, 0));

    session.command(Command::Reveal(0));
    session.command(Command::Reveal(2));
    assert!(settled(&log).is_empty());

    session.advance(Duration::from_millis(600));

    assert_eq!(
        settled(&log),
        [GameEvent::CardMismatchResolved {
            first_index: 0,
            second_index: 2
        }]
    );
    let board = session.board().unwrap();
    assert_eq!(board.card_states(), [FaceDown; 4]);
    assert_eq!(board.matched_count(), 0);
    assert_eq!(session.stats(), GameStats::new(0, 1));
}

#[test]
fn full_game_completes_exactly_once() {
    let (mut session, log) = resumed(stored(&TWO_BY_TWO, vec![FaceDown; 4], 0, 0));

    session.command(Command::Reveal(0));
    session.command(Command::Reveal(1));
    assert_eq!(
        settled(&log),
        [GameEvent::CardMatchResolved {
            first_index: 0,
            second_index: 1,
            pair_id: 0
        }]
    );
    assert_eq!(session.board().unwrap().matched_count(), 2);
    assert!(!session.is_completed());

    session.command(Command::Reveal(3));
    session.command(Command::Reveal(2));
    session.advance(Duration::from_secs(5));

    assert_eq!(
        settled(&log),
        [
            GameEvent::CardMatchResolved {
                first_index: 0,
                second_index: 1,
                pair_id: 0
            },
            GameEvent::CardMatchResolved {
                first_index: 3,
                second_index: 2,
                pair_id: 1
            },
            GameEvent::GameCompleted,
        ]
    );
    assert_eq!(session.phase(), GamePhase::Completed);
    assert!(!session.command(Command::Reveal(0)));
}

#[test]
fn snapshot_round_trip_turns_face_up_cards_down() {
    let store = stored(&TWO_BY_TWO, vec![FaceUp, FaceDown, Matched, Matched], 1, 2);
    let (session, log) = resumed(store);

    let board = session.board().unwrap();
    assert_eq!(board.card_states(), [FaceDown, FaceDown, Matched, Matched]);
    assert_eq!(board.pair_ids(), TWO_BY_TWO);
    assert_eq!(board.matched_count(), 2);
    assert!(!session.is_completed());
    assert!(settled(&log).is_empty());
}

#[test]
fn rebuild_cancels_pending_flip_back() {
    let (mut session, log) = resumed(stored(&TWO_BY_TWO, vec![FaceDown; 4], 0, 0));
    session.command(Command::Reveal(0));
    session.command(Command::Reveal(2));

    // a fresh board bumps the generation before the flip-back is due
    session.command(Command::Play);
    let states = session.board().unwrap().card_states();
    session.advance(Duration::from_millis(600));

    assert!(settled(&log).is_empty());
    assert_eq!(session.board().unwrap().card_states(), states);
}

#[test]
fn restore_cancels_pending_flip_back() {
    let (mut session, log) = resumed(stored(&TWO_BY_TWO, vec![FaceDown; 4], 0, 0));
    session.command(Command::Reveal(0));
    session.command(Command::Reveal(2));

    // the slot now holds a later game; reloading it must drop the flip-back
    let later = vec![FaceDown, FaceDown, Matched, Matched];
    *session.store_mut() = stored(&TWO_BY_TWO, later, 1, 2);
    assert!(session.load_snapshot());
    session.command(Command::Reveal(0));
    session.advance(Duration::from_millis(600));

    assert_eq!(
        session.board().unwrap().card_states(),
        [FaceUp, FaceDown, Matched, Matched]
    );
    assert!(settled(&log).is_empty());
    assert_eq!(session.stats(), GameStats::new(1, 2));
}

#[test]
fn every_settled_pair_is_saved() {
    let (mut session, _log) = resumed(stored(&TWO_BY_TWO, vec![FaceDown; 4], 0, 0));

    session.command(Command::Reveal(0));
    session.command(Command::Reveal(2));
    session.advance(Duration::from_millis(600));
    session.command(Command::Reveal(0));
    session.command(Command::Reveal(1));

    let snapshot = session.store().load().unwrap();
    assert_eq!(session.store().save_count(), 3);
    assert_eq!(snapshot.card_states, [Matched, Matched, FaceDown, FaceDown]);
    assert_eq!((snapshot.matches, snapshot.turns), (1, 2));
}

#[test]
fn fresh_boards_follow_the_selected_preset() {
    let mut session = GameSession::new(MemoryStore::new(), NullPresenter, 42)
        .with_levels(LevelConfig::default().without_preview());
    assert!(!session.start());

    for (difficulty, size) in [
        (Difficulty::Easy, (4, 3)),
        (Difficulty::Medium, (4, 4)),
        (Difficulty::Hard, (6, 5)),
    ] {
        session.command(Command::SelectDifficulty(difficulty));
        session.command(Command::Next);

        let board = session.board().unwrap();
        assert_eq!(board.size(), size);
        assert!(is_balanced(&board.pair_ids()));
        assert!(board.cards().all(|card| card.state() == FaceDown));
    }
}

#[test]
fn small_pair_supply_shrinks_the_grid() {
    let mut session = GameSession::new(MemoryStore::new(), NullPresenter, 42)
        .with_levels(LevelConfig::default().without_preview())
        .with_settings(BoardSettings { pair_supply: 3 });
    session.command(Command::Play);

    let board = session.board().unwrap();
    assert_eq!(board.size(), (2, 3));
    assert_eq!(board.len(), 6);
}
