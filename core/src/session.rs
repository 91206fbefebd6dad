use core::time::Duration;

use crate::*;

/// Player and menu requests a host forwards to the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SelectDifficulty(Difficulty),
    Play,
    Next,
    Home,
    Reveal(CardIndex),
}

/// Owns one game: board, components, timers, storage and the event bus.
///
/// All state changes happen inside [`GameSession::command`],
/// [`GameSession::advance`] and the lifecycle calls. Each of them drains the
/// event queue before returning, routing every event through the resolver,
/// stats, completion check and save coordinator before external subscribers
/// see it.
pub struct GameSession<S: SaveStore = MemoryStore, P: CardPresenter = NullPresenter> {
    levels: LevelConfig,
    settings: BoardSettings,
    difficulty: Difficulty,
    phase: GamePhase,
    board: Option<Board>,
    input: InputGate,
    resolver: MatchResolver,
    timers: TimerQueue,
    stats: GameStats,
    completion: CompletionCheck,
    saver: SaveCoordinator<S>,
    presenter: P,
    bus: EventBus,
    seed: u64,
    previewing: bool,
    in_menu: bool,
}

impl<S: SaveStore, P: CardPresenter> GameSession<S, P> {
    /// Creates a session in the `Boot` phase, sitting in the menu.
    ///
    /// The `None -> Boot` change is queued and reaches subscribers on the
    /// first call that drains events.
    pub fn new(store: S, presenter: P, seed: u64) -> Self {
        let mut session = Self {
            levels: LevelConfig::default(),
            settings: BoardSettings::default(),
            difficulty: Difficulty::default(),
            phase: GamePhase::None,
            board: None,
            input: InputGate::new(),
            resolver: MatchResolver::default(),
            timers: TimerQueue::new(),
            stats: GameStats::default(),
            completion: CompletionCheck::new(),
            saver: SaveCoordinator::new(store),
            presenter,
            bus: EventBus::new(),
            seed,
            previewing: false,
            in_menu: true,
        };
        session.input.set_enabled(false);
        session.set_phase(GamePhase::Boot);
        session
    }

    #[must_use]
    pub fn with_levels(mut self, levels: LevelConfig) -> Self {
        self.levels = levels;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: BoardSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Resumes the stored game if there is a usable one.
    ///
    /// Returns `false` and stays in the menu otherwise.
    pub fn start(&mut self) -> bool {
        let resumed = self.load_snapshot();
        if !resumed {
            log::info!("No game to resume, waiting in menu");
        }
        self.pump();
        resumed
    }

    /// Executes one command; `true` when something visible changed.
    pub fn command(&mut self, command: Command) -> bool {
        log::trace!("command {:?}", command);
        let updated = match command {
            Command::SelectDifficulty(difficulty) => {
                if self.difficulty != difficulty {
                    log::info!("Difficulty set to {}", difficulty.name());
                }
                self.difficulty = difficulty;
                false
            }
            Command::Play | Command::Next => {
                self.start_board();
                true
            }
            Command::Home => {
                self.in_menu = true;
                self.input.set_enabled(false);
                true
            }
            Command::Reveal(index) => self.reveal(index),
        };

        self.pump();
        self.run_due();
        updated
    }

    pub fn reveal(&mut self, index: CardIndex) -> bool {
        let Some(board) = self.board.as_mut() else {
            return false;
        };
        let outcome = self
            .input
            .request_reveal(index, board, &mut self.presenter, &mut self.bus);
        self.pump();
        self.run_due();
        outcome.has_update()
    }

    /// Moves the logical clock forward and fires every transition now due.
    pub fn advance(&mut self, elapsed: Duration) {
        self.timers.advance(elapsed);
        self.run_due();
    }

    /// Restores the stored game, if any.
    ///
    /// Face-up cards come back face-down, the preview is skipped and
    /// completion is checked again right away.
    pub fn load_snapshot(&mut self) -> bool {
        let Some(snapshot) = self.saver.load() else {
            return false;
        };
        let board = match snapshot.to_board() {
            Ok(board) => board,
            Err(err) => {
                log::warn!("Could not rebuild stored board: {}", err);
                return false;
            }
        };

        self.saver.begin_restore();
        self.difficulty = snapshot.difficulty;
        let timings = self.levels.preset(self.difficulty).match_timings();
        self.install_board(board, timings);
        self.stats = snapshot.stats();
        log::info!(
            "Restored {}x{} {} board, {} matches in {} turns",
            snapshot.grid_x,
            snapshot.grid_y,
            self.difficulty.name(),
            self.stats.matches(),
            self.stats.turns()
        );

        self.set_phase(GamePhase::Playing);
        if let Some(board) = self.board.as_ref() {
            self.completion
                .check_now(board, &mut self.input, &mut self.bus);
        }
        self.pump();
        self.saver.end_restore();
        true
    }

    /// Saves the current board right away.
    pub fn flush(&mut self) -> bool {
        match self.board.as_ref() {
            Some(board) => self.saver.save_now(board, self.difficulty, self.stats),
            None => false,
        }
    }

    /// The host is going to the background.
    pub fn suspend(&mut self) {
        log::debug!("suspend");
        self.flush();
    }

    /// The host is shutting down; saves and drops every subscriber.
    pub fn terminate(&mut self) {
        log::debug!("terminate");
        self.flush();
        self.bus.teardown();
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn levels(&self) -> &LevelConfig {
        &self.levels
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    pub fn resolver(&self) -> &MatchResolver {
        &self.resolver
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input.is_enabled()
    }

    pub fn is_previewing(&self) -> bool {
        self.previewing
    }

    pub fn in_menu(&self) -> bool {
        self.in_menu
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_completed()
    }

    /// Time until the next transition of the current board, if any is waiting.
    pub fn time_to_next(&self) -> Option<Duration> {
        self.timers.time_to_next(self.resolver.generation())
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn store(&self) -> &S {
        self.saver.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.saver.store_mut()
    }

    fn start_board(&mut self) {
        let preset = self.levels.preset(self.difficulty);
        let seed = self.next_seed();
        let board = Board::build(
            preset.grid_size,
            self.settings.pair_supply,
            RandomPairGenerator::new(seed),
        );
        let (columns, rows) = board.size();
        log::info!(
            "New {} board {}x{} (seed {:#x})",
            self.difficulty.name(),
            columns,
            rows,
            seed
        );

        self.install_board(board, preset.match_timings());
        self.stats.reset();
        self.set_phase(GamePhase::Playing);
        self.start_preview(preset.preview_face_up_duration);
    }

    /// Binds every component to `board`, dropping all delayed work of the
    /// previous one.
    fn install_board(&mut self, board: Board, timings: MatchTimings) {
        self.resolver.initialize(timings);
        self.resolver.set_enabled(true);
        self.completion.reset();
        self.input.set_enabled(true);
        self.previewing = false;
        self.in_menu = false;
        self.presenter.reset(&board);
        self.board = Some(board);
    }

    fn start_preview(&mut self, duration: Duration) {
        let Some(board) = self.board.as_mut() else {
            return;
        };

        self.input.set_enabled(false);
        self.resolver.set_enabled(false);
        for index in 0..board.len() {
            if board.state_at(index) == Some(CardState::FaceDown) {
                board.set_state(index, CardState::FaceUp);
                self.presenter.show(index, true);
            }
        }
        self.previewing = true;
        self.timers.schedule(
            duration,
            ScheduledTransition::new(self.resolver.generation(), Transition::EndPreview),
        );
        log::debug!("preview for {:?}", duration);
    }

    fn end_preview(&mut self) {
        let Some(board) = self.board.as_mut() else {
            return;
        };

        for index in 0..board.len() {
            if board.state_at(index) == Some(CardState::FaceUp) {
                board.set_state(index, CardState::FaceDown);
                self.presenter.show(index, false);
            }
        }
        self.previewing = false;
        self.resolver.set_enabled(true);
        self.input
            .set_enabled(!self.in_menu && !self.completion.is_completed());
        log::debug!("preview over");
    }

    fn run_due(&mut self) {
        while let Some(scheduled) = self.timers.pop_due() {
            log::debug!("firing {:?}", scheduled.transition);
            match scheduled.transition {
                Transition::EndPreview => {
                    if scheduled.is_current(self.resolver.generation()) && self.previewing {
                        self.end_preview();
                    } else {
                        log::debug!("dropping stale preview end");
                    }
                }
                _ => {
                    if let Some(board) = self.board.as_mut() {
                        let mut ctx = ResolveContext {
                            board,
                            presenter: &mut self.presenter,
                            bus: &mut self.bus,
                            scheduler: &mut self.timers,
                        };
                        self.resolver.fire(scheduled, &mut ctx);
                    }
                }
            }
            self.pump();
        }
    }

    /// Drains the event queue, internal handlers first.
    fn pump(&mut self) {
        while let Some(event) = self.bus.next_pending() {
            self.route(&event);
            self.bus.deliver(&event);
        }
    }

    fn route(&mut self, event: &GameEvent) {
        if let Some(board) = self.board.as_mut() {
            let mut ctx = ResolveContext {
                board: &mut *board,
                presenter: &mut self.presenter,
                bus: &mut self.bus,
                scheduler: &mut self.timers,
            };
            self.resolver.handle_event(event, &mut ctx);
            self.stats.handle_event(event);
            self.completion
                .handle_event(event, board, &mut self.input, &mut self.bus);
            self.saver
                .handle_event(event, board, self.difficulty, self.stats);
        }

        if *event == GameEvent::GameCompleted {
            self.set_phase(GamePhase::Completed);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.bus.publish(GameEvent::PhaseChanged {
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
    }

    fn next_seed(&mut self) -> u64 {
        let seed = self.seed;
        self.seed = self.seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        seed
    }
}

impl<S: SaveStore + core::fmt::Debug, P: CardPresenter + core::fmt::Debug> core::fmt::Debug
    for GameSession<S, P>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameSession")
            .field("difficulty", &self.difficulty)
            .field("phase", &self.phase)
            .field("board", &self.board)
            .field("stats", &self.stats)
            .field("previewing", &self.previewing)
            .field("in_menu", &self.in_menu)
            .field("bus", &self.bus)
            .field("store", self.saver.store())
            .field("presenter", &self.presenter)
            .finish_non_exhaustive()
    }
}
