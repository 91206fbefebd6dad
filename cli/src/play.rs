use std::io::{BufRead, Write};
use std::time::Duration;

use pairup_core::{Command, Difficulty, GamePhase, GameSession, SaveStore, coords_to_index};
use web_time::Instant;

use crate::render::{TextPresenter, render};

/// One line typed by the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// Card by column and row, converted once the board size is known.
    At(u8, u8),
    Save,
    Help,
    Quit,
}

impl Input {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let first = words.next()?;
        let second = words.next();
        if words.next().is_some() {
            return None;
        }

        let input = match (first.to_ascii_lowercase().as_str(), second) {
            ("play" | "p", None) => Self::Command(Command::Play),
            ("next" | "n", None) => Self::Command(Command::Next),
            ("home" | "menu", None) => Self::Command(Command::Home),
            ("easy", None) => Self::Command(Command::SelectDifficulty(Difficulty::Easy)),
            ("medium", None) => Self::Command(Command::SelectDifficulty(Difficulty::Medium)),
            ("hard", None) => Self::Command(Command::SelectDifficulty(Difficulty::Hard)),
            ("save", None) => Self::Save,
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit" | "q", None) => Self::Quit,
            (index, None) => Self::Command(Command::Reveal(index.parse().ok()?)),
            (column, Some(row)) => Self::At(column.parse().ok()?, row.parse().ok()?),
        };
        Some(input)
    }
}

const HELP: &str = "\
commands:
  play | next        deal a new board
  home               back to the menu
  easy|medium|hard   pick the difficulty for the next board
  <index>            turn a card by its index
  <column> <row>     turn a card by position
  save               save now
  quit               save and leave
";

/// Measures wall-clock time between two calls.
struct Clock {
    last: Instant,
}

impl Clock {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        elapsed
    }
}

/// Runs the read-eval-print loop until `quit` or the end of `input`.
pub fn play<S, R, W>(
    session: &mut GameSession<S, TextPresenter>,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: SaveStore,
    R: BufRead,
    W: Write,
{
    let mut clock = Clock::new();

    if session.start() {
        writeln!(out, "Resuming your last game.")?;
        show(session, out)?;
    } else {
        writeln!(out, "pairup: type `play` to start, `help` for commands.")?;
    }

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        session.advance(clock.tick());

        let Some(parsed) = Input::parse(&line) else {
            if !line.trim().is_empty() {
                writeln!(out, "unknown command {:?}, try `help`", line.trim())?;
            }
            continue;
        };

        let command = match parsed {
            Input::Quit => break,
            Input::Help => {
                out.write_all(HELP.as_bytes())?;
                continue;
            }
            Input::Save => {
                session.suspend();
                writeln!(out, "saved")?;
                continue;
            }
            Input::At(column, row) => {
                let Some(index) = session
                    .board()
                    .and_then(|board| coords_to_index((column, row), board.size()))
                else {
                    writeln!(out, "no card at {} {}", column, row)?;
                    continue;
                };
                Command::Reveal(index)
            }
            Input::Command(command) => command,
        };

        let was_completed = session.phase() == GamePhase::Completed;
        if let Command::SelectDifficulty(difficulty) = command {
            session.command(command);
            writeln!(out, "next board: {}", difficulty.name())?;
            continue;
        }
        if !session.command(command) {
            continue;
        }
        if session.in_menu() {
            writeln!(out, "menu: `play`, `easy|medium|hard`, `quit`")?;
            continue;
        }
        show(session, out)?;
        settle(session, &mut clock, out)?;

        if !was_completed && session.phase() == GamePhase::Completed {
            writeln!(
                out,
                "Board cleared in {} turns! `next` for another one.",
                session.stats().turns()
            )?;
        }
    }

    session.terminate();
    writeln!(out)?;
    Ok(())
}

fn show<S: SaveStore, W: Write>(
    session: &GameSession<S, TextPresenter>,
    out: &mut W,
) -> anyhow::Result<()> {
    out.write_all(render(session).as_bytes())?;
    Ok(())
}

/// Waits out the preview and any face-up pair before the next prompt.
fn settle<S: SaveStore, W: Write>(
    session: &mut GameSession<S, TextPresenter>,
    clock: &mut Clock,
    out: &mut W,
) -> anyhow::Result<()> {
    while needs_wait(session) {
        let Some(wait) = session.time_to_next() else {
            break;
        };
        out.flush()?;
        std::thread::sleep(wait);
        session.advance(clock.tick());
        show(session, out)?;
    }
    Ok(())
}

fn needs_wait<S: SaveStore>(session: &GameSession<S, TextPresenter>) -> bool {
    if session.is_previewing() {
        return true;
    }
    let Some(board) = session.board() else {
        return false;
    };
    board
        .cards()
        .any(|card| card.state().is_face_up() && session.resolver().is_resolving(card.index()))
}
