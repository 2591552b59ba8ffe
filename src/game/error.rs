use thiserror::Error;

/// Errors raised by the game engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Board geometry or reward settings cannot host a valid episode
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    /// Every cell is covered by the snake, food cannot be placed
    #[error("no free cell left for food")]
    NoFreeCell,

    /// Discrete action index outside `0..3`
    #[error("invalid action index: {0}")]
    InvalidAction(usize),
}
