use rand::prelude::*;

use super::base::Policy;
use crate::game::{Action, GameEngine};

pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_action(&mut self, _engine: &GameEngine) -> Action {
        Action::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Straight)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
