//! Episode statistics for rollouts
//!
//! Tracks episode rewards, lengths, scores and how episodes ended, using
//! rolling windows for smoothed statistics.

use serde::Serialize;
use std::collections::VecDeque;

use crate::game::{EpisodeStatus, TerminationReason};

/// Episode statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use snake_rl::metrics::EpisodeStats;
/// use snake_rl::game::{EpisodeStatus, TerminationReason};
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record_episode(15.5, 150, 5, EpisodeStatus::Terminated(TerminationReason::Wall));
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.best_score(), 5);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in ticks (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Episode scores (rolling window)
    episode_scores: VecDeque<u32>,

    /// How episodes ended, over the whole run
    outcomes: OutcomeCounts,

    total_episodes: usize,
    total_steps: usize,
    best_score: u32,
    window_size: usize,
}

/// Number of episodes per way of ending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub wall: usize,
    pub self_collision: usize,
    pub step_limit: usize,
    pub board_full: usize,
    pub aborted: usize,
}

impl OutcomeCounts {
    fn record(&mut self, status: EpisodeStatus) {
        match status {
            EpisodeStatus::Running => {}
            EpisodeStatus::Aborted => self.aborted += 1,
            EpisodeStatus::Terminated(TerminationReason::Wall) => self.wall += 1,
            EpisodeStatus::Terminated(TerminationReason::SelfCollision) => {
                self.self_collision += 1
            }
            EpisodeStatus::Terminated(TerminationReason::StepLimit) => self.step_limit += 1,
            EpisodeStatus::Terminated(TerminationReason::BoardFull) => self.board_full += 1,
        }
    }
}

/// Serializable end-of-run summary
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub total_episodes: usize,
    pub total_steps: usize,
    pub best_score: u32,
    pub mean_reward: f32,
    pub mean_score: f32,
    pub mean_length: f32,
    pub outcomes: OutcomeCounts,
}

impl EpisodeStats {
    /// Create a new tracker keeping `window_size` recent episodes for averages
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            outcomes: OutcomeCounts::default(),
            total_episodes: 0,
            total_steps: 0,
            best_score: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    ///
    /// # Arguments
    ///
    /// * `reward` - Total reward accumulated during the episode
    /// * `length` - Number of ticks taken in the episode
    /// * `score` - Food eaten
    /// * `status` - How the episode ended
    pub fn record_episode(
        &mut self,
        reward: f32,
        length: usize,
        score: u32,
        status: EpisodeStatus,
    ) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        self.outcomes.record(status);
        self.total_episodes += 1;
        self.total_steps += length;
        self.best_score = self.best_score.max(score);
    }

    /// Mean episode reward over the rolling window, 0.0 when empty
    pub fn mean_episode_reward(&self) -> f32 {
        if self.episode_rewards.is_empty() {
            0.0
        } else {
            self.episode_rewards.iter().sum::<f32>() / self.episode_rewards.len() as f32
        }
    }

    pub fn mean_episode_length(&self) -> f32 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_lengths.len() as f32
        }
    }

    pub fn mean_episode_score(&self) -> f32 {
        let sum: u32 = self.episode_scores.iter().sum();
        if self.episode_scores.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_scores.len() as f32
        }
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Highest score over the whole run, not just the window
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn outcomes(&self) -> OutcomeCounts {
        self.outcomes
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_episodes: self.total_episodes,
            total_steps: self.total_steps,
            best_score: self.best_score,
            mean_reward: self.mean_episode_reward(),
            mean_score: self.mean_episode_score(),
            mean_length: self.mean_episode_length(),
            outcomes: self.outcomes,
        }
    }

    /// Format a one-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
        )
    }

    /// Push to a deque, evicting the oldest value past the window size
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
