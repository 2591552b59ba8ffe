pub mod rollout;

pub use rollout::{EpisodeReport, RolloutConfig, RolloutMode};
