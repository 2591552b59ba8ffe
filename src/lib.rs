//! Snake RL - a deterministic Snake environment for reinforcement learning
//!
//! This library provides:
//! - Core simulation and shaped rewards (game module)
//! - Collaborator contracts for renderers and quit signals (render, input modules)
//! - Baseline policies and rollout statistics used by the CLI (policy, metrics, modes)
//!
//! ```rust
//! use snake_rl::game::{Action, GameConfig, GameEngine};
//!
//! let mut engine = GameEngine::new(GameConfig::default().with_seed(7))?;
//! let (reward, done, score) = engine.step(Action::Straight)?.as_tuple();
//! assert!(!done);
//! assert!(score <= 1);
//! assert!(reward.is_finite());
//! # Ok::<(), snake_rl::game::GameError>(())
//! ```

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod policy;
pub mod render;
