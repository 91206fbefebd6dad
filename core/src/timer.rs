use alloc::collections::BinaryHeap;
use core::cmp::{Ordering, Reverse};
use core::time::Duration;

use crate::*;

/// Token identifying one board instance; bumped on every rebuild or restore.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Follow-up work that runs some time after it was decided.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Turn a mismatched pair face-down again.
    FlipBack { first: CardIndex, second: CardIndex },
    /// Hide a matched pair from view.
    HideMatched { first: CardIndex, second: CardIndex },
    /// Close the face-up preview shown on a fresh board.
    EndPreview,
}

/// A transition tagged with the generation it was scheduled under.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTransition {
    pub generation: Generation,
    pub transition: Transition,
}

impl ScheduledTransition {
    pub const fn new(generation: Generation, transition: Transition) -> Self {
        Self {
            generation,
            transition,
        }
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }
}

/// Runs scheduled transitions after a delay.
///
/// Nothing is ever cancelled through a scheduler: a transition whose
/// generation is outdated by the time it fires is simply ignored.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, scheduled: ScheduledTransition);
}

#[derive(Clone, Debug)]
struct TimerEntry {
    due: Duration,
    seq: u64,
    scheduled: ScheduledTransition,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Scheduler driven by a logical clock that the host advances.
///
/// Transitions come out in due-time order; ties keep scheduling order.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    entries: BinaryHeap<Reverse<TimerEntry>>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.now = self.now.saturating_add(elapsed);
    }

    /// Removes the earliest transition that is due, if any.
    pub fn pop_due(&mut self) -> Option<ScheduledTransition> {
        let Reverse(head) = self.entries.peek()?;
        if head.due > self.now {
            return None;
        }
        self.entries.pop().map(|Reverse(entry)| entry.scheduled)
    }

    /// How long until the next transition of `generation` is due. Stale
    /// entries still waiting in the queue are not counted.
    pub fn time_to_next(&self, generation: Generation) -> Option<Duration> {
        self.entries
            .iter()
            .filter(|Reverse(entry)| entry.scheduled.is_current(generation))
            .map(|Reverse(entry)| entry.due.saturating_sub(self.now))
            .min()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration, scheduled: ScheduledTransition) {
        let due = self.now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        log::trace!("schedule {:?} at {:?}", scheduled, due);
        self.entries.push(Reverse(TimerEntry {
            due,
            seq,
            scheduled,
        }));
    }
}
