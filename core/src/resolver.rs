use alloc::collections::BTreeSet;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Delays applied after a pair has been compared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTimings {
    pub mismatch_flip_back_delay: Duration,
    pub match_hide_delay: Duration,
}

impl MatchTimings {
    pub const fn new(mismatch_flip_back_delay: Duration, match_hide_delay: Duration) -> Self {
        Self {
            mismatch_flip_back_delay,
            match_hide_delay,
        }
    }

    pub const fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for MatchTimings {
    fn default() -> Self {
        Self::new(Duration::from_millis(600), Duration::from_millis(1500))
    }
}

/// Everything the resolver touches while handling an event or a timer.
pub struct ResolveContext<'a> {
    pub board: &'a mut Board,
    pub presenter: &'a mut dyn CardPresenter,
    pub bus: &'a mut EventBus,
    pub scheduler: &'a mut dyn Scheduler,
}

/// Pairs revealed cards and settles each pair as a match or a mismatch.
///
/// Revealed cards are tracked in reveal order. Whenever two of them are still
/// face-up and not already being settled, the two most recent ones are
/// compared. A match is applied at once and only its hiding is delayed; a
/// mismatch is flipped back after a delay. Delayed work carries the
/// [`Generation`] it was scheduled under and does nothing once
/// [`MatchResolver::initialize`] has moved on to a new board.
#[derive(Clone, Debug)]
pub struct MatchResolver {
    timings: MatchTimings,
    generation: Generation,
    enabled: bool,
    revealed_order: SmallVec<[CardIndex; 4]>,
    resolving: BTreeSet<CardIndex>,
}

impl Default for MatchResolver {
    fn default() -> Self {
        Self::new(MatchTimings::default())
    }
}

impl MatchResolver {
    pub fn new(timings: MatchTimings) -> Self {
        Self {
            timings,
            generation: Generation::default(),
            enabled: true,
            revealed_order: SmallVec::new(),
            resolving: BTreeSet::new(),
        }
    }

    /// Rebinds to a new board, invalidating all delayed work of the old one.
    pub fn initialize(&mut self, timings: MatchTimings) {
        self.timings = timings;
        self.revealed_order.clear();
        self.resolving.clear();
        self.generation = self.generation.next();
        log::debug!("resolver initialized, generation {}", self.generation.get());
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn timings(&self) -> MatchTimings {
        self.timings
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Revealed cards not yet paired, oldest first.
    pub fn revealed(&self) -> &[CardIndex] {
        &self.revealed_order
    }

    pub fn is_resolving(&self, index: CardIndex) -> bool {
        self.resolving.contains(&index)
    }

    pub fn handle_event(&mut self, event: &GameEvent, ctx: &mut ResolveContext<'_>) {
        if let GameEvent::CardFlipStarted {
            index,
            face_up: true,
        } = *event
        {
            self.on_card_revealed(index, ctx);
        }
    }

    pub fn on_card_revealed(&mut self, index: CardIndex, ctx: &mut ResolveContext<'_>) {
        if !self.enabled {
            return;
        }

        match ctx.board.state_at(index) {
            None => {
                log::trace!("dropping reveal of out of range card {}", index);
                return;
            }
            Some(CardState::FaceUp) => {}
            Some(_) => return,
        }

        if !self.revealed_order.contains(&index) {
            self.revealed_order.push(index);
        }

        self.resolve_pairs(ctx);
    }

    /// Settles pairs until fewer than two revealed cards are free.
    pub fn resolve_pairs(&mut self, ctx: &mut ResolveContext<'_>) {
        let board = &*ctx.board;
        self.revealed_order
            .retain(|index| board.state_at(*index) == Some(CardState::FaceUp));

        while let Some((first, second)) = self.next_pair(ctx.board) {
            self.resolving.insert(first);
            self.resolving.insert(second);
            self.revealed_order
                .retain(|index| *index != first && *index != second);

            let (Some(first_id), Some(second_id)) =
                (ctx.board.pair_id_at(first), ctx.board.pair_id_at(second))
            else {
                break;
            };

            if first_id == second_id {
                ctx.board.set_state(first, CardState::Matched);
                ctx.board.set_state(second, CardState::Matched);
                log::debug!("match {} & {} (pair {})", first, second, first_id);
                ctx.bus.publish(GameEvent::CardMatchResolved {
                    first_index: first,
                    second_index: second,
                    pair_id: first_id,
                });
                self.schedule(
                    ctx,
                    self.timings.match_hide_delay,
                    Transition::HideMatched { first, second },
                );
            } else {
                log::debug!("mismatch {} & {}", first, second);
                self.schedule(
                    ctx,
                    self.timings.mismatch_flip_back_delay,
                    Transition::FlipBack { first, second },
                );
            }
        }
    }

    /// Applies a delayed transition; `false` when it was stale or not ours.
    pub fn fire(&mut self, scheduled: ScheduledTransition, ctx: &mut ResolveContext<'_>) -> bool {
        if !scheduled.is_current(self.generation) {
            log::debug!(
                "dropping {:?} from generation {}, now at {}",
                scheduled.transition,
                scheduled.generation.get(),
                self.generation.get()
            );
            return false;
        }

        match scheduled.transition {
            Transition::HideMatched { first, second } => {
                for index in [first, second] {
                    if ctx.board.card(index).is_some() {
                        ctx.presenter.hide_matched(index);
                    }
                }
                self.release(first, second);
                true
            }
            Transition::FlipBack { first, second } => {
                for index in [first, second] {
                    if ctx.board.state_at(index) == Some(CardState::FaceUp) {
                        ctx.board.set_state(index, CardState::FaceDown);
                        ctx.bus.publish(GameEvent::CardFlipStarted {
                            index,
                            face_up: false,
                        });
                        ctx.presenter.show(index, false);
                    }
                }
                ctx.bus.publish(GameEvent::CardMismatchResolved {
                    first_index: first,
                    second_index: second,
                });
                self.release(first, second);
                self.resolve_pairs(ctx);
                true
            }
            Transition::EndPreview => false,
        }
    }

    /// The two most recently revealed free cards, older one first.
    fn next_pair(&self, board: &Board) -> Option<(CardIndex, CardIndex)> {
        let mut free = self.revealed_order.iter().rev().copied().filter(|index| {
            board.state_at(*index) == Some(CardState::FaceUp) && !self.resolving.contains(index)
        });
        let newer = free.next()?;
        let older = free.next()?;
        Some((older, newer))
    }

    fn schedule(&self, ctx: &mut ResolveContext<'_>, delay: Duration, transition: Transition) {
        ctx.scheduler
            .schedule(delay, ScheduledTransition::new(self.generation, transition));
    }

    fn release(&mut self, first: CardIndex, second: CardIndex) {
        self.resolving.remove(&first);
        self.resolving.remove(&second);
    }
}
