use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, trace};

use super::{
    action::{Action, Direction},
    config::{GameConfig, INITIAL_SNAKE_LENGTH},
    error::GameError,
    reward::{RewardBreakdown, shape_reward},
    state::{EpisodeStatus, GameState, Position, Snake, TerminationReason},
};
use crate::input::QuitSignal;
use crate::render::GameView;

/// Random draws tried before falling back to scanning for free cells
pub const MAX_FOOD_ATTEMPTS: usize = 64;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the episode ended, if it ended this step
    pub termination: Option<TerminationReason>,
    /// Whether the step was cut short by the quit signal
    pub aborted: bool,
    /// Reward terms that make up `StepResult::reward`
    pub rewards: RewardBreakdown,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Shaped reward for this step
    pub reward: f32,
    /// Whether the episode is over
    pub done: bool,
    /// Food eaten since the last reset
    pub score: u32,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    /// The classic `(reward, done, score)` triple
    pub fn as_tuple(&self) -> (f32, bool, u32) {
        (self.reward, self.done, self.score)
    }
}

/// The game engine that owns the world and advances it one tick at a time
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
    quit: QuitSignal,
}

impl GameEngine {
    /// Validate the configuration and start the first episode
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = Self::initial_state(&config, &mut rng)?;

        Ok(Self {
            config,
            rng,
            state,
            quit: QuitSignal::new(),
        })
    }

    /// Share an externally owned quit flag with the engine
    pub fn with_quit_signal(mut self, quit: QuitSignal) -> Self {
        self.quit = quit;
        self
    }

    /// Reset the world to the start of a new episode
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.state = Self::initial_state(&self.config, &mut self.rng)?;
        debug!(
            head = ?self.state.head(),
            food = ?self.state.food,
            "episode reset"
        );
        Ok(())
    }

    /// Advance the world by one tick
    ///
    /// Once the episode is over (terminated or aborted) further calls leave the
    /// state untouched and return a zero reward with `done` set, until
    /// [`GameEngine::reset`] is called.
    pub fn step(&mut self, action: Action) -> Result<StepResult, GameError> {
        if self.state.status.is_running() && self.quit.is_raised() {
            debug!(frame = self.state.frame_iteration, "quit signal raised, aborting episode");
            self.state.status = EpisodeStatus::Aborted;
        }
        if !self.state.status.is_running() {
            return Ok(self.inert_result());
        }

        self.state.frame_iteration += 1;

        let new_head = self.move_head(action);
        self.state.snake.push_head(new_head);

        let mut termination = self.collision_kind(new_head).or_else(|| {
            (self.state.frame_iteration as usize > self.max_steps())
                .then_some(TerminationReason::StepLimit)
        });
        let died = termination.is_some();

        let ate_food = new_head == self.state.food;
        if ate_food {
            self.state.score += 1;
            match Self::place_food(&self.config, &mut self.rng, &self.state.snake) {
                Some(food) => self.state.food = food,
                None => {
                    // Food stays on the cell just eaten; the episode is over
                    debug!(score = self.state.score, "snake covers the board");
                    termination = termination.or(Some(TerminationReason::BoardFull));
                }
            }
        } else {
            self.state.snake.pop_tail();
        }
        let done = termination.is_some();

        let rewards = shape_reward(&mut self.state, &self.config, died, ate_food);
        let reward = rewards.total();

        if let Some(reason) = termination {
            self.state.status = EpisodeStatus::Terminated(reason);
        }

        trace!(
            frame = self.state.frame_iteration,
            ?action,
            head = ?new_head,
            reward,
            done,
            "step"
        );

        Ok(StepResult {
            reward,
            done,
            score: self.state.score,
            info: StepInfo {
                ate_food,
                termination,
                aborted: false,
                rewards,
            },
        })
    }

    /// Whether `point` (the head when `None`) is off the board or on the body.
    ///
    /// The head segment itself is never counted as a body hit.
    pub fn is_collision(&self, point: Option<Position>) -> bool {
        self.collision_kind(point.unwrap_or_else(|| self.state.head()))
            .is_some()
    }

    /// Tick budget for the current snake length: `min(k * len, cells)`
    pub fn max_steps(&self) -> usize {
        let by_length = self.config.step_budget_per_segment as usize * self.state.snake.len();
        by_length.min(self.config.cell_count())
    }

    pub fn is_running(&self) -> bool {
        self.state.status.is_running()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for scripted test scenarios (placing food, posing the snake)
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn quit_signal(&self) -> &QuitSignal {
        &self.quit
    }

    /// Read-only snapshot for renderers
    pub fn view(&self) -> GameView<'_> {
        GameView {
            body: &self.state.snake.body,
            food: self.state.food,
            score: self.state.score,
            direction: self.state.snake.direction,
            frame_iteration: self.state.frame_iteration,
            status: self.state.status,
            width: self.config.width,
            height: self.config.height,
            block_size: self.config.block_size,
        }
    }

    fn initial_state(config: &GameConfig, rng: &mut StdRng) -> Result<GameState, GameError> {
        let b = config.block_size;
        let head = Position::new((config.width / 2) / b * b, (config.height / 2) / b * b);
        let snake = Snake::new(head, Direction::Right, INITIAL_SNAKE_LENGTH, b);
        let food = Self::place_food(config, rng, &snake).ok_or(GameError::NoFreeCell)?;

        Ok(GameState::new(snake, food, config.rewards.history_window))
    }

    /// Turn according to `action` and return the head one block further on
    fn move_head(&mut self, action: Action) -> Position {
        let direction = self.state.snake.direction.turned(action);
        self.state.snake.direction = direction;
        self.state.head().stepped(direction, self.config.block_size)
    }

    fn collision_kind(&self, pos: Position) -> Option<TerminationReason> {
        let max_x = self.config.width - self.config.block_size;
        let max_y = self.config.height - self.config.block_size;
        if pos.x < 0 || pos.x > max_x || pos.y < 0 || pos.y > max_y {
            return Some(TerminationReason::Wall);
        }
        if self.state.snake.collides_with_body(pos) {
            return Some(TerminationReason::SelfCollision);
        }
        None
    }

    /// Pick a random grid cell not covered by the snake, `None` once the
    /// snake covers the whole board
    fn place_food(config: &GameConfig, rng: &mut StdRng, snake: &Snake) -> Option<Position> {
        let b = config.block_size;
        let (columns, rows) = (config.columns(), config.rows());

        for _ in 0..MAX_FOOD_ATTEMPTS {
            let pos = Position::new(rng.gen_range(0..columns) * b, rng.gen_range(0..rows) * b);
            if !snake.contains(pos) {
                return Some(pos);
            }
        }

        debug!(
            snake_len = snake.len(),
            "random food placement exhausted, scanning free cells"
        );
        let occupied: HashSet<Position> = snake.body.iter().copied().collect();
        let free: Vec<Position> = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| Position::new(col * b, row * b)))
            .filter(|pos| !occupied.contains(pos))
            .collect();

        free.choose(rng).copied()
    }

    fn inert_result(&self) -> StepResult {
        StepResult {
            reward: 0.0,
            done: true,
            score: self.state.score,
            info: StepInfo {
                ate_food: false,
                termination: None,
                aborted: self.state.status == EpisodeStatus::Aborted,
                rewards: RewardBreakdown::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::new(config.with_seed(42)).unwrap()
    }

    /// Put food somewhere the snake will not reach in the next few ticks
    fn park_food(engine: &mut GameEngine, pos: Position) {
        engine.state_mut().food = pos;
        engine.state_mut().prev_distance = engine.state().distance_to_food();
    }

    #[test]
    fn test_reset() {
        let engine = engine(GameConfig::default());
        let state = engine.state();

        assert!(state.status.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.frame_iteration, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.head(), Position::new(320, 240));
        assert_eq!(state.snake.body[1], Position::new(300, 240));
        assert_eq!(state.snake.body[2], Position::new(280, 240));
        assert_eq!(state.prev_distance, state.distance_to_food());
        assert!(state.history.is_empty());
        assert!(!state.snake.contains(state.food));
    }

    #[test]
    fn test_reset_snaps_center_to_grid() {
        // 300 / 2 = 150 is not on the 20px grid
        let engine = engine(GameConfig::new(300, 220));
        let head = engine.state().head();
        assert_eq!(head, Position::new(140, 100));
    }

    #[test]
    fn test_reset_starts_new_episode() {
        let mut engine = engine(GameConfig::default());
        for _ in 0..5 {
            engine.step(Action::Straight).unwrap();
        }
        engine.reset().unwrap();

        let state = engine.state();
        assert_eq!(state.frame_iteration, 0);
        assert_eq!(state.moves_without_progress, 0);
        assert!(state.history.is_empty());
        assert_eq!(state.head(), Position::new(320, 240));
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        assert!(matches!(
            GameEngine::new(GameConfig::new(641, 480)),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_boundary_collision() {
        let engine = engine(GameConfig::default());

        assert!(engine.is_collision(Some(Position::new(640, 100))));
        assert!(!engine.is_collision(Some(Position::new(620, 100))));
        assert!(engine.is_collision(Some(Position::new(-20, 100))));
        assert!(!engine.is_collision(Some(Position::new(0, 100))));
        assert!(engine.is_collision(Some(Position::new(100, 480))));
        assert!(!engine.is_collision(Some(Position::new(100, 460))));
        assert!(engine.is_collision(Some(Position::new(100, -20))));
        assert!(!engine.is_collision(None));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::default());
        engine.state_mut().snake = Snake::from_segments(
            [
                Position::new(100, 100),
                Position::new(80, 100),
                Position::new(60, 100),
            ],
            Direction::Right,
        );

        assert!(engine.is_collision(Some(Position::new(80, 100))));
        assert!(!engine.is_collision(Some(Position::new(100, 100))));
    }

    #[test]
    fn test_straight_moves_one_block() {
        let mut engine = engine(GameConfig::default());
        park_food(&mut engine, Position::new(0, 0));

        let result = engine.step(Action::Straight).unwrap();

        assert!(!result.done);
        assert!(!result.info.ate_food);
        assert_eq!(engine.state().frame_iteration, 1);
        assert_eq!(engine.state().head(), Position::new(340, 240));
        assert_eq!(engine.state().snake.len(), 3);
    }

    #[test]
    fn test_turns_are_relative() {
        let mut engine = engine(GameConfig::default());
        park_food(&mut engine, Position::new(0, 0));

        engine.step(Action::TurnRight).unwrap();
        assert_eq!(engine.state().direction(), Direction::Down);
        assert_eq!(engine.state().head(), Position::new(320, 260));

        engine.step(Action::TurnLeft).unwrap();
        assert_eq!(engine.state().direction(), Direction::Right);
        assert_eq!(engine.state().head(), Position::new(340, 260));

        engine.step(Action::TurnLeft).unwrap();
        assert_eq!(engine.state().direction(), Direction::Up);
        assert_eq!(engine.state().head(), Position::new(340, 240));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameConfig::default());
        engine.state_mut().food = Position::new(340, 240);

        let result = engine.step(Action::Straight).unwrap();

        assert!(result.info.ate_food);
        assert_eq!(result.score, 1);
        assert_eq!(engine.state().snake.len(), 4);
        assert!(!engine.state().snake.contains(engine.state().food));
        assert_eq!(result.info.rewards.food, 30.0);
        assert_eq!(result.info.rewards.efficiency, 99.0);
        assert_eq!(result.info.rewards.terminal, 0.0);
        assert_eq!(result.info.rewards.closeness, 0.0);
    }

    #[test]
    fn test_progress_after_eating_uses_new_food() {
        // Five cells in a row, snake on x = 40..0, so once (60,0) is eaten
        // the only cell left for food is (80,0)
        let mut engine = engine(GameConfig::new(100, 20));
        park_food(&mut engine, Position::new(60, 0));
        assert_eq!(engine.state().prev_distance, 20);

        let result = engine.step(Action::Straight).unwrap();

        let state = engine.state();
        assert!(result.info.ate_food);
        assert_eq!(state.food, Position::new(80, 0));
        assert_eq!(state.prev_distance, state.head().manhattan_distance(&state.food));
        assert_eq!(state.prev_distance, 20);
        // Distance to the new food did not shrink, so this is a regress tick
        assert_eq!(result.info.rewards.progress, -1.0);
        assert!((result.reward - 127.5).abs() < 1e-5);
    }

    #[test]
    fn test_length_constant_without_food() {
        let mut engine = engine(GameConfig::default());
        park_food(&mut engine, Position::new(0, 0));

        for action in [Action::TurnLeft, Action::Straight, Action::TurnLeft] {
            let result = engine.step(action).unwrap();
            assert_eq!(result.score, 0);
            assert_eq!(engine.state().snake.len(), 3);
        }
    }

    #[test]
    fn test_wall_collision_is_terminal() {
        let mut engine = engine(GameConfig::default());
        park_food(&mut engine, Position::new(0, 460));
        engine.state_mut().snake = Snake::from_segments(
            [
                Position::new(620, 100),
                Position::new(600, 100),
                Position::new(580, 100),
            ],
            Direction::Right,
        );

        let result = engine.step(Action::Straight).unwrap();

        assert!(result.done);
        assert_eq!(result.info.termination, Some(TerminationReason::Wall));
        assert_eq!(result.info.rewards.terminal, -20.0);
        assert_eq!(
            engine.state().status,
            EpisodeStatus::Terminated(TerminationReason::Wall)
        );
    }

    #[test]
    fn test_self_collision_is_terminal() {
        let mut engine = engine(GameConfig::default());
        park_food(&mut engine, Position::new(0, 0));
        // Head at (100,100) heading right, body curls round below it
        engine.state_mut().snake = Snake::from_segments(
            [
                Position::new(100, 100),
                Position::new(100, 120),
                Position::new(120, 120),
                Position::new(140, 120),
                Position::new(140, 100),
            ],
            Direction::Up,
        );

        // Right turn from Up heads right into (120,100), still free
        let first = engine.step(Action::TurnRight).unwrap();
        assert!(!first.done);
        // Right again points down into (120,120), which is body
        let second = engine.step(Action::TurnRight).unwrap();

        assert!(second.done);
        assert_eq!(
            second.info.termination,
            Some(TerminationReason::SelfCollision)
        );
    }

    #[test]
    fn test_step_limit_terminates() {
        let mut engine = engine(GameConfig::default());
        park_food(&mut engine, Position::new(0, 0));
        assert_eq!(engine.max_steps(), 300);

        // The budget is checked while the new head is attached, so a
        // three-segment snake gets 100 * 4 ticks
        engine.state_mut().frame_iteration = 399;
        let at_budget = engine.step(Action::TurnRight).unwrap();
        assert!(!at_budget.done);

        let over_budget = engine.step(Action::TurnLeft).unwrap();
        assert!(over_budget.done);
        assert_eq!(
            over_budget.info.termination,
            Some(TerminationReason::StepLimit)
        );
    }

    #[test]
    fn test_step_limit_capped_by_board_size() {
        // 8x6 = 48 cells, less than 100 * 3
        let engine = engine(GameConfig::small());
        assert_eq!(engine.max_steps(), 48);
    }

    #[test]
    fn test_step_after_termination_is_inert() {
        let mut engine = engine(GameConfig::default());
        park_food(&mut engine, Position::new(0, 0));
        engine.state_mut().snake.body[0] = Position::new(620, 240);
        engine.state_mut().snake.body[1] = Position::new(600, 240);
        engine.state_mut().snake.body[2] = Position::new(580, 240);
        assert!(engine.step(Action::Straight).unwrap().done);

        let before = engine.state().clone();
        let result = engine.step(Action::Straight).unwrap();

        assert!(result.done);
        assert_eq!(result.reward, 0.0);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_quit_signal_aborts_episode() {
        let quit = QuitSignal::new();
        let mut engine = engine(GameConfig::default()).with_quit_signal(quit.clone());
        park_food(&mut engine, Position::new(0, 0));

        assert!(!engine.step(Action::Straight).unwrap().done);

        quit.raise();
        let head = engine.state().head();
        let result = engine.step(Action::Straight).unwrap();

        assert!(result.done);
        assert!(result.info.aborted);
        assert_eq!(result.reward, 0.0);
        assert_eq!(engine.state().status, EpisodeStatus::Aborted);
        assert_eq!(engine.state().head(), head);
        assert!(engine.quit_signal().is_raised());
    }

    #[test]
    fn test_food_never_on_snake() {
        let mut engine = engine(GameConfig::small());
        for _ in 0..500 {
            let pos = GameEngine::place_food(&engine.config, &mut engine.rng, &engine.state.snake)
                .unwrap();
            assert!(!engine.state().snake.contains(pos));
            assert_eq!(pos.x % 20, 0);
            assert_eq!(pos.y % 20, 0);
            assert!((0..=140).contains(&pos.x));
            assert!((0..=100).contains(&pos.y));
        }
    }

    #[test]
    fn test_food_placement_finds_last_free_cell() {
        let config = GameConfig::new(80, 20).with_seed(1);
        let mut rng = StdRng::seed_from_u64(3);
        let snake = Snake::from_segments(
            [
                Position::new(0, 0),
                Position::new(20, 0),
                Position::new(40, 0),
            ],
            Direction::Left,
        );

        let food = GameEngine::place_food(&config, &mut rng, &snake);
        assert_eq!(food, Some(Position::new(60, 0)));

        let full = Snake::from_segments(
            [
                Position::new(60, 0),
                Position::new(40, 0),
                Position::new(20, 0),
                Position::new(0, 0),
            ],
            Direction::Right,
        );
        assert_eq!(GameEngine::place_food(&config, &mut rng, &full), None);
    }

    #[test]
    fn test_filling_the_board_ends_episode() {
        let mut engine = engine(GameConfig::new(100, 20));
        park_food(&mut engine, Position::new(60, 0));

        let first = engine.step(Action::Straight).unwrap();
        assert!(first.info.ate_food);
        assert!(!first.done);

        let last = engine.step(Action::Straight).unwrap();

        assert!(last.done);
        assert!(last.info.ate_food);
        assert_eq!(last.score, 2);
        assert_eq!(last.info.termination, Some(TerminationReason::BoardFull));
        assert_eq!(last.info.rewards.terminal, 0.0);
        assert_eq!(last.info.rewards.food, 30.0);

        let state = engine.state();
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.frame_iteration, 2);
        assert_eq!(state.prev_distance, 0);
        assert_eq!(state.history.len(), 2);
        assert_eq!(
            state.status,
            EpisodeStatus::Terminated(TerminationReason::BoardFull)
        );

        let after = engine.step(Action::Straight).unwrap();
        assert!(after.done);
        assert_eq!(after.reward, 0.0);
        assert_eq!(engine.state().snake.len(), 5);
    }

    #[test]
    fn test_seeded_engines_are_reproducible() {
        let actions = [
            Action::Straight,
            Action::TurnLeft,
            Action::Straight,
            Action::TurnRight,
            Action::TurnRight,
            Action::Straight,
        ];
        let mut a = engine(GameConfig::small());
        let mut b = engine(GameConfig::small());

        for action in actions {
            let ra = a.step(action).unwrap();
            let rb = b.step(action).unwrap();
            assert_eq!(ra, rb);
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_view_reflects_state() {
        let engine = engine(GameConfig::default());
        let view = engine.view();

        assert_eq!(view.body.len(), 3);
        assert_eq!(view.food, engine.state().food);
        assert_eq!(view.score, 0);
        assert_eq!(view.width, 640);
    }

    #[test]
    fn test_step_result_tuple() {
        let mut engine = engine(GameConfig::default());
        park_food(&mut engine, Position::new(0, 0));
        let result = engine.step(Action::Straight).unwrap();
        let (reward, done, score) = result.as_tuple();
        assert_eq!(reward, result.reward);
        assert!(!done);
        assert_eq!(score, 0);
    }
}
