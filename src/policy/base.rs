use crate::game::{Action, GameEngine};

/// Policy chooses the next relative action for the current state.
///
/// Object-safe so it can be used as `Box<dyn Policy>`, and `Send` so a
/// rollout can move to a blocking worker thread.
pub trait Policy: Send {
    fn choose_action(&mut self, engine: &GameEngine) -> Action;

    /// Short name for logs
    fn name(&self) -> &'static str;
}
