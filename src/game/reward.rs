//! Shaped reward for a single tick
//!
//! The reward is a sum of independent terms. Each term is kept in a
//! [`RewardBreakdown`] so callers can log or inspect what drove a reward.

use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::state::GameState;

/// Individual reward terms for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    /// Flat per-tick penalty
    pub step: f32,
    /// Bonus for approaching food, or penalty for not approaching it
    pub progress: f32,
    /// Penalty for revisiting a recent head position
    pub circular: f32,
    /// Penalty growing with consecutive non-progressing moves
    pub stagnation: f32,
    /// Death penalty
    pub terminal: f32,
    /// Food reward
    pub food: f32,
    /// Bonus for eating early in the episode
    pub efficiency: f32,
    /// Bonus for being close to food on ordinary ticks
    pub closeness: f32,
}

impl RewardBreakdown {
    pub fn total(&self) -> f32 {
        self.step
            + self.progress
            + self.circular
            + self.stagnation
            + self.terminal
            + self.food
            + self.efficiency
            + self.closeness
    }
}

/// Compute the reward for the tick that just happened.
///
/// Must be called after the head has moved and the body/food were updated.
/// Updates `prev_distance`, `moves_without_progress` and the head history.
pub fn shape_reward(
    state: &mut GameState,
    config: &GameConfig,
    done: bool,
    ate_food: bool,
) -> RewardBreakdown {
    let r = &config.rewards;
    let mut breakdown = RewardBreakdown {
        step: -r.step_penalty,
        ..Default::default()
    };

    let current_distance = state.distance_to_food();
    if current_distance < state.prev_distance {
        breakdown.progress = r.progress_reward;
        state.moves_without_progress = 0;
    } else {
        breakdown.progress = -r.regress_penalty;
        state.moves_without_progress += 1;
    }
    state.prev_distance = current_distance;

    if state.history.record_and_check_loop(state.snake.head()) {
        breakdown.circular = -r.circular_penalty;
    }

    if state.moves_without_progress > r.stagnation_threshold {
        breakdown.stagnation = -(state.moves_without_progress as f32) * r.stagnation_rate;
    }

    if done {
        breakdown.terminal = -r.death_penalty;
    } else if ate_food {
        breakdown.food = r.food_reward;
        state.moves_without_progress = 0;
        breakdown.efficiency = r.efficiency_horizon.saturating_sub(state.frame_iteration) as f32;
    } else {
        let max_distance = (config.width + config.height) as f32;
        let distance_fraction = current_distance as f32 / max_distance;
        breakdown.closeness = (1.0 - distance_fraction) * r.closeness_scale;
    }

    breakdown
}
