use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pairup_core::{
    Command, Difficulty, GameSession, LevelConfig, LevelPreset, MatchTimings, SaveStore,
};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::render::TextPresenter;
use crate::store::FileStore;

mod play;
mod render;
mod store;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Find the pairs, one flip at a time", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::WarnLevel>,

    /// Difficulty of the boards dealt with `play`
    #[arg(short, long, value_enum)]
    difficulty: Option<Level>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where the game is saved between runs
    #[arg(long, default_value = "pairup-save.json")]
    save_file: PathBuf,

    /// Forget the saved game before starting
    #[arg(long)]
    reset: bool,

    /// Deal boards face-down without showing them first
    #[arg(long)]
    no_preview: bool,

    /// Settle pairs without waiting, for scripted play
    #[arg(long, hide = true)]
    no_delays: bool,
}

impl Args {
    fn levels(&self) -> LevelConfig {
        let mut levels = LevelConfig::default();
        if self.no_preview {
            levels = levels.without_preview();
        }
        if self.no_delays {
            let instant = |preset: LevelPreset| {
                let MatchTimings {
                    mismatch_flip_back_delay,
                    match_hide_delay,
                } = MatchTimings::immediate();
                LevelPreset {
                    mismatch_flip_back_delay,
                    match_hide_delay,
                    ..preset.without_preview()
                }
            };
            levels = LevelConfig {
                easy: instant(levels.easy),
                medium: instant(levels.medium),
                hard: instant(levels.hard),
            };
        }
        levels
    }
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn init_logger(args: &Args) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Error initializing logger: {}", err))
}

fn new_session<S: SaveStore>(args: &Args, mut store: S) -> GameSession<S, TextPresenter> {
    if args.reset {
        store.clear();
    }
    let seed = args.seed.unwrap_or_else(random_seed);
    log::debug!("seed: {}", seed);

    let mut session =
        GameSession::new(store, TextPresenter::default(), seed).with_levels(args.levels());
    if let Some(level) = args.difficulty {
        session.command(Command::SelectDifficulty(level.into()));
    }
    session
}

fn run<I, R, W>(args: I, input: &mut R, out: &mut W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = OsString>,
    R: BufRead,
    W: Write,
{
    let args = Args::try_parse_from(args)?;
    if let Err(err) = init_logger(&args) {
        // a second run in the same process keeps the first logger
        log::debug!("{}", err);
    }

    let store = FileStore::new(&args.save_file);
    let mut session = new_session(&args, store);
    play::play(&mut session, input, out)
}

fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    run(std::env::args_os(), &mut input, &mut stdout)
}
