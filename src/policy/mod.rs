//! Baseline action sources
//!
//! The learning agent lives outside this crate. These policies exist so the
//! CLI (and tests) can drive episodes without one.

mod base;
mod greedy;
mod random;

pub use base::Policy;
pub use greedy::GreedyPolicy;
pub use random::RandomPolicy;
