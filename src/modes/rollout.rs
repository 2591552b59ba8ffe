//! Rollout mode
//!
//! Runs a number of episodes with a baseline policy, optionally rendering
//! every tick, and collects episode statistics. This is how the binary
//! exercises the environment end to end.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

use crate::game::{GameConfig, GameEngine};
use crate::input::QuitSignal;
use crate::metrics::{EpisodeStats, StatsSummary};
use crate::policy::Policy;
use crate::render::Renderer;

/// Configuration for rollout mode
#[derive(Debug, Clone)]
pub struct RolloutConfig {
    /// Number of episodes to play
    pub num_episodes: usize,

    /// Log rolling statistics every N episodes
    pub log_frequency: usize,

    /// Sleep `1 / speed` seconds after each rendered tick
    pub pace_rendering: bool,

    /// Game configuration (board size, rewards, seed)
    pub game_config: GameConfig,
}

impl RolloutConfig {
    pub fn new(num_episodes: usize, game_config: GameConfig) -> Self {
        Self {
            num_episodes,
            log_frequency: 10,
            pace_rendering: false,
            game_config,
        }
    }
}

/// Outcome of a single episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    pub reward: f32,
    pub steps: usize,
    pub score: u32,
}

/// Plays episodes with a policy and tracks statistics
pub struct RolloutMode {
    engine: GameEngine,
    policy: Box<dyn Policy>,
    renderer: Option<Box<dyn Renderer>>,
    stats: EpisodeStats,
    config: RolloutConfig,
}

impl RolloutMode {
    /// Build the engine from `config.game_config` and share `quit` with it
    pub fn new(config: RolloutConfig, policy: Box<dyn Policy>, quit: QuitSignal) -> Result<Self> {
        let engine = GameEngine::new(config.game_config.clone())
            .context("Failed to create game engine")?
            .with_quit_signal(quit);

        Ok(Self {
            engine,
            policy,
            renderer: None,
            stats: EpisodeStats::new(100),
            config,
        })
    }

    /// Draw every tick with `renderer`
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Play all configured episodes, stopping early if the quit signal is raised
    pub fn run(&mut self) -> Result<StatsSummary> {
        info!(
            policy = self.policy.name(),
            episodes = self.config.num_episodes,
            width = self.config.game_config.width,
            height = self.config.game_config.height,
            "starting rollout"
        );

        for episode in 0..self.config.num_episodes {
            let report = self.run_episode()?;
            let status = self.engine.state().status;
            self.stats
                .record_episode(report.reward, report.steps, report.score, status);

            info!(
                episode = episode + 1,
                score = report.score,
                steps = report.steps,
                reward = report.reward,
                outcome = ?status,
                "episode finished"
            );

            if (episode + 1) % self.config.log_frequency.max(1) == 0 {
                info!("{}", self.stats.format_summary());
            }

            if self.engine.quit_signal().is_raised() {
                info!("quit requested, stopping rollout");
                break;
            }
        }

        info!("{}", self.stats.format_summary());
        Ok(self.stats.summary())
    }

    /// Play one episode from reset to termination
    pub fn run_episode(&mut self) -> Result<EpisodeReport> {
        self.engine.reset().context("Failed to reset episode")?;
        self.render()?;

        let mut report = EpisodeReport {
            reward: 0.0,
            steps: 0,
            score: 0,
        };

        loop {
            let action = self.policy.choose_action(&self.engine);
            let result = self.engine.step(action).context("Failed to step episode")?;
            if result.info.aborted {
                debug!("episode aborted before completing a tick");
                break;
            }

            report.reward += result.reward;
            report.steps += 1;
            report.score = result.score;

            self.render()?;

            if result.done {
                break;
            }
        }

        Ok(report)
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    fn render(&mut self) -> Result<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        renderer.render(&self.engine.view())?;

        let speed = self.config.game_config.speed;
        if self.config.pace_rendering && speed > 0 {
            std::thread::sleep(Duration::from_secs_f64(1.0 / speed as f64));
        }
        Ok(())
    }
}
