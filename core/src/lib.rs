#![no_std]

extern crate alloc;

pub use board::*;
pub use card::*;
pub use completion::*;
pub use error::*;
pub use events::*;
pub use generator::*;
pub use input::*;
pub use level::*;
pub use presenter::*;
pub use resolver::*;
pub use save::*;
pub use session::*;
pub use stats::*;
pub use timer::*;
pub use types::*;

mod board;
mod card;
mod completion;
mod error;
mod events;
mod generator;
mod input;
mod level;
mod presenter;
mod resolver;
mod save;
mod session;
mod stats;
mod timer;
mod types;
