use super::base::Policy;
use crate::game::{Action, GameEngine, Position};

/// Heads for the food by Manhattan distance, refusing moves that collide
/// on the very next tick. Ties go to the earlier action in
/// `[Straight, TurnRight, TurnLeft]`.
#[derive(Debug, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }

    fn next_head(engine: &GameEngine, action: Action) -> Position {
        let state = engine.state();
        let direction = state.direction().turned(action);
        state.head().stepped(direction, engine.config().block_size)
    }
}

impl Policy for GreedyPolicy {
    fn choose_action(&mut self, engine: &GameEngine) -> Action {
        let food = engine.state().food;

        Action::ALL
            .into_iter()
            .map(|action| (action, Self::next_head(engine, action)))
            .filter(|(_, head)| !engine.is_collision(Some(*head)))
            .min_by_key(|(_, head)| head.manhattan_distance(&food))
            .map(|(action, _)| action)
            .unwrap_or(Action::Straight)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
