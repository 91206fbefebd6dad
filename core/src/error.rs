use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Grid dimensions must be non-zero with an even cell count")]
    InvalidDimensions,
    #[error("Layout length does not match the board size")]
    LayoutMismatch,
    #[error("Every pair id must appear on exactly two cards")]
    UnbalancedPairs,
    #[error("Unknown card state code {0}")]
    InvalidCardState(u8),
    #[error("Unknown difficulty code {0}")]
    InvalidDifficulty(u8),
    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

pub type Result<T> = core::result::Result<T, GameError>;
