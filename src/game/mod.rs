//! Core simulation for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Movement, collisions, food placement, episode termination and reward shaping
//! all live here and are driven one tick at a time through [`GameEngine::step`].

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod reward;
pub mod state;

// Re-export commonly used types
pub use action::{Action, CLOCKWISE, Direction};
pub use config::{GameConfig, INITIAL_SNAKE_LENGTH, RewardConfig};
pub use engine::{GameEngine, MAX_FOOD_ATTEMPTS, StepInfo, StepResult};
pub use error::GameError;
pub use history::PositionHistory;
pub use reward::{RewardBreakdown, shape_reward};
pub use state::{EpisodeStatus, GameState, Position, Snake, TerminationReason};
