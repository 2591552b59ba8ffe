use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::GameError;

/// Number of segments the snake spawns with
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Reward shaping constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Subtracted every tick
    pub step_penalty: f32,
    /// Added when the head gets closer to the food
    pub progress_reward: f32,
    /// Subtracted when the head does not get closer to the food
    pub regress_penalty: f32,
    /// Subtracted when the head revisits a recent position
    pub circular_penalty: f32,
    /// Number of recent head positions kept for loop detection
    pub history_window: usize,
    /// Non-progressing moves tolerated before the stagnation penalty kicks in
    pub stagnation_threshold: u32,
    /// Stagnation penalty per non-progressing move once past the threshold
    pub stagnation_rate: f32,
    /// Subtracted on collision or step budget exhaustion
    pub death_penalty: f32,
    /// Added for eating food
    pub food_reward: f32,
    /// Eating before this many ticks earns `horizon - ticks` extra
    pub efficiency_horizon: u32,
    /// Scale of the closeness bonus on ordinary ticks
    pub closeness_scale: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step_penalty: 0.5,
            progress_reward: 1.0,
            regress_penalty: 1.0,
            circular_penalty: 5.0,
            history_window: 8,
            stagnation_threshold: 10,
            stagnation_rate: 0.5,
            death_penalty: 20.0,
            food_reward: 30.0,
            efficiency_horizon: 100,
            closeness_scale: 2.0,
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the world in pixels
    pub width: i32,
    /// Height of the world in pixels
    pub height: i32,
    /// Edge length of one grid cell in pixels
    pub block_size: i32,
    /// Ticks per second when a renderer paces the game
    pub speed: u32,
    /// Step budget granted per body segment
    pub step_budget_per_segment: u32,
    /// Seed for food placement, `None` draws from entropy
    pub seed: Option<u64>,
    /// Reward shaping constants
    pub rewards: RewardConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            block_size: 20,
            speed: 30,
            step_budget_per_segment: 100,
            seed: None,
            rewards: RewardConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom world size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a small board for testing (8x6 cells)
    pub fn small() -> Self {
        Self::new(160, 120)
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Number of cells across the board
    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    /// Number of cells down the board
    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Total number of cells, `W * H / BLOCK^2`
    pub fn cell_count(&self) -> usize {
        (self.columns() as usize) * (self.rows() as usize)
    }

    /// Check that the geometry can host an episode
    pub fn validate(&self) -> Result<(), GameError> {
        let b = self.block_size;
        if b <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "block_size must be positive, got {b}"
            )));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "world must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width % b != 0 || self.height % b != 0 {
            return Err(GameError::InvalidConfig(format!(
                "world {}x{} is not a multiple of block_size {b}",
                self.width, self.height
            )));
        }

        // The tail spawns two blocks left of the centre column
        let center_x = (self.width / 2) / b * b;
        let span = (INITIAL_SNAKE_LENGTH as i32 - 1) * b;
        if center_x - span < 0 {
            return Err(GameError::InvalidConfig(format!(
                "width {} is too narrow for a {INITIAL_SNAKE_LENGTH}-segment snake",
                self.width
            )));
        }
        // Room for the first food and one more after it is eaten
        let min_cells = INITIAL_SNAKE_LENGTH + 2;
        if self.cell_count() < min_cells {
            return Err(GameError::InvalidConfig(format!(
                "board has {} cells, need at least {min_cells}",
                self.cell_count()
            )));
        }
        if self.rewards.history_window == 0 {
            return Err(GameError::InvalidConfig(
                "rewards.history_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
