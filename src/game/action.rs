use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

/// Directions in clockwise order, used for relative turning
pub const CLOCKWISE: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

impl Direction {
    /// Position of this direction in [`CLOCKWISE`]
    pub fn index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Direction that results from applying a relative turn
    pub fn turned(self, action: Action) -> Direction {
        let idx = self.index();
        let next = match action {
            Action::Straight => idx,
            Action::TurnRight => (idx + 1) % 4,
            Action::TurnLeft => (idx + 3) % 4,
        };
        CLOCKWISE[next]
    }

    /// Returns the unit delta (dx, dy) for moving in this direction.
    /// Screen coordinates: y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Relative action supplied by the agent each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Keep the current heading
    Straight,
    /// Turn 90 degrees clockwise
    TurnRight,
    /// Turn 90 degrees counter-clockwise
    TurnLeft,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Straight, Action::TurnRight, Action::TurnLeft];

    /// Decode a one-hot action vector.
    ///
    /// `[1, 0, 0]` is straight and `[0, 1, 0]` is a right turn. Every other
    /// vector is read as a left turn.
    pub fn from_one_hot(one_hot: [u8; 3]) -> Self {
        match one_hot {
            [1, 0, 0] => Action::Straight,
            [0, 1, 0] => Action::TurnRight,
            _ => Action::TurnLeft,
        }
    }

    /// Encode as a one-hot vector
    pub fn one_hot(self) -> [u8; 3] {
        let mut v = [0; 3];
        v[self.index()] = 1;
        v
    }

    /// Discrete action index: 0 straight, 1 right, 2 left
    pub fn index(self) -> usize {
        match self {
            Action::Straight => 0,
            Action::TurnRight => 1,
            Action::TurnLeft => 2,
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = GameError;

    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        Action::ALL
            .get(idx)
            .copied()
            .ok_or(GameError::InvalidAction(idx))
    }
}
