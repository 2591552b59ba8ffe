//! Renderer collaborator contract
//!
//! Renderers only ever see a borrowed [`GameView`], so they cannot change the
//! simulation. Hosts call them once per tick after [`crate::game::GameEngine::step`].

pub mod renderer;

use anyhow::Result;
use std::collections::VecDeque;

use crate::game::{Direction, EpisodeStatus, Position};

pub use renderer::TextRenderer;

/// Read-only snapshot of everything a renderer may draw
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    /// Body segments, head first
    pub body: &'a VecDeque<Position>,
    pub food: Position,
    pub score: u32,
    pub direction: Direction,
    pub frame_iteration: u32,
    pub status: EpisodeStatus,
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
}

impl GameView<'_> {
    pub fn head(&self) -> Option<Position> {
        self.body.front().copied()
    }

    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }
}

/// Something that can present the game to a human
pub trait Renderer: Send {
    fn render(&mut self, view: &GameView<'_>) -> Result<()>;
}
