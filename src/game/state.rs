use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::action::Direction;
use super::history::PositionHistory;

/// A position in world coordinates (pixels, multiples of the block size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one block in a direction
    pub fn stepped(&self, direction: Direction, block_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * block_size, dy * block_size)
    }

    /// |dx| + |dy|
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    pub body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose body trails behind `head`, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize, block_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.moved_by(-dx * block_size * i, -dy * block_size * i))
            .collect();

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments<I>(segments: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        Self {
            body: segments.into_iter().collect(),
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body.iter().skip(1).any(|&p| p == pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Snake left the board
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Tick counter exceeded the adaptive step budget
    StepLimit,
    /// Snake covers every cell, no room left for food
    BoardFull,
}

/// Lifecycle of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeStatus {
    Running,
    Terminated(TerminationReason),
    /// The host raised the quit signal
    Aborted,
}

impl EpisodeStatus {
    pub fn is_running(self) -> bool {
        self == EpisodeStatus::Running
    }
}

/// Complete episode state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    /// Ticks since the last reset
    pub frame_iteration: u32,
    /// Manhattan distance from head to food after the previous tick
    pub prev_distance: i32,
    /// Consecutive ticks that did not bring the head closer to food
    pub moves_without_progress: u32,
    /// Recent head positions for loop detection
    pub history: PositionHistory,
    pub status: EpisodeStatus,
}

impl GameState {
    /// Create a fresh running state
    pub fn new(snake: Snake, food: Position, history_window: usize) -> Self {
        let prev_distance = snake.head().manhattan_distance(&food);
        Self {
            snake,
            food,
            score: 0,
            frame_iteration: 0,
            prev_distance,
            moves_without_progress: 0,
            history: PositionHistory::new(history_window),
            status: EpisodeStatus::Running,
        }
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Manhattan distance from the current head to the food
    pub fn distance_to_food(&self) -> i32 {
        self.head().manhattan_distance(&self.food)
    }
}
