use crate::*;

/// Latched check that the whole board has been matched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CompletionCheck {
    completed: bool,
}

impl CompletionCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Arms the check again for a new or restored board.
    pub fn reset(&mut self) {
        self.completed = false;
    }

    pub fn handle_event(
        &mut self,
        event: &GameEvent,
        board: &Board,
        input: &mut InputGate,
        bus: &mut EventBus,
    ) -> bool {
        match event {
            GameEvent::CardMatchResolved { .. } => self.check_now(board, input, bus),
            _ => false,
        }
    }

    /// Publishes [`GameEvent::GameCompleted`] the first time every card of
    /// `board` is matched; `true` only on that call.
    pub fn check_now(&mut self, board: &Board, input: &mut InputGate, bus: &mut EventBus) -> bool {
        if self.completed || board.is_empty() {
            return false;
        }

        if !board.is_solved() {
            return false;
        }

        self.completed = true;
        input.set_enabled(false);
        log::info!("Board of {} cards completed", board.total_cells());
        bus.publish(GameEvent::GameCompleted);
        true
    }
}
