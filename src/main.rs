use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_rl::game::GameConfig;
use snake_rl::input::QuitSignal;
use snake_rl::modes::{RolloutConfig, RolloutMode};
use snake_rl::policy::{GreedyPolicy, Policy, RandomPolicy};
use snake_rl::render::TextRenderer;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "snake_rl")]
#[command(version, about = "Run Snake RL environment episodes with a baseline policy")]
struct Cli {
    /// Number of episodes to play
    #[arg(long, default_value = "10")]
    episodes: usize,

    /// Policy that drives the snake
    #[arg(long, default_value = "greedy")]
    policy: PolicyKind,

    /// JSON game configuration; command-line size options override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// World width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// World height in pixels
    #[arg(long)]
    height: Option<i32>,

    /// Grid cell size in pixels
    #[arg(long)]
    block_size: Option<i32>,

    /// Seed for food placement and the random policy
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the board to stdout every tick, paced at the configured speed
    #[arg(long)]
    render: bool,

    /// Log rolling statistics every N episodes
    #[arg(long, default_value = "10")]
    log_every: usize,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, ValueEnum)]
enum PolicyKind {
    /// Uniformly random relative turns
    Random,
    /// Move toward food, avoiding immediate collisions
    Greedy,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }

    fn policy(&self) -> Box<dyn Policy> {
        match self.policy {
            PolicyKind::Random => Box::new(RandomPolicy::new(self.seed.unwrap_or(0))),
            PolicyKind::Greedy => Box::new(GreedyPolicy::new()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snake_rl=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let game_config = cli.game_config()?;

    let mut rollout_config = RolloutConfig::new(cli.episodes, game_config);
    rollout_config.log_frequency = cli.log_every;
    rollout_config.pace_rendering = cli.render;

    // Ctrl+C ends the current episode instead of killing the process
    let quit = QuitSignal::new();
    let listener = quit.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            listener.raise();
        }
    });

    let mut mode = RolloutMode::new(rollout_config, cli.policy(), quit)?;
    if cli.render {
        mode = mode.with_renderer(Box::new(TextRenderer::new(std::io::stdout())));
    }

    let summary = tokio::task::spawn_blocking(move || mode.run())
        .await
        .context("Rollout task panicked")??;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    }

    Ok(())
}
