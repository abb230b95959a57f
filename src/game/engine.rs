use super::{
    config::GameConfig,
    direction::Direction,
    state::{GameOverReason, GameState, Position, SessionState, Snake},
};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Random draws tried before food placement scans for free cells
const MAX_FOOD_ATTEMPTS: usize = 64;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Whether the snake ate food this tick
    pub grew: bool,
    /// Whether this tick ended the session
    pub game_over: bool,
    /// Why the session ended, when it did
    pub reason: Option<GameOverReason>,
}

impl StepResult {
    fn over(reason: GameOverReason, grew: bool) -> Self {
        Self {
            grew,
            game_over: true,
            reason: Some(reason),
        }
    }
}

/// The grid engine: owns the game state and applies all game rules.
///
/// Nothing here knows about time. A driver (terminal interval, simulated
/// [`Ticker`](super::Ticker), replay) calls [`advance`](Self::advance) once
/// per tick while the session is running.
pub struct GridEngine<R = StdRng> {
    config: GameConfig,
    rng: R,
    state: GameState,
}

impl GridEngine<StdRng> {
    /// Create an engine seeded from the OS
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine with a reproducible food sequence
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GridEngine<R> {
    /// Create an engine with the given RNG, already reset
    pub fn with_rng(config: GameConfig, mut rng: R) -> Self {
        let state = initial_state(&config, &mut rng);
        Self { config, rng, state }
    }

    /// Replace the whole state, e.g. to set up a scenario
    pub fn with_state(config: GameConfig, rng: R, state: GameState) -> Self {
        Self { config, rng, state }
    }

    /// Reset the game to its initial idle state
    pub fn reset(&mut self) {
        self.state = initial_state(&self.config, &mut self.rng);
    }

    /// Stage a direction for the next tick.
    ///
    /// Ignored when it would reverse the direction the last tick moved in,
    /// and ignored once the session is over. From `Idle` this starts the
    /// game. Returns whether the direction was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.session == SessionState::Over {
            return false;
        }

        if let Some(committed) = self.state.committed {
            if committed.is_opposite(direction) {
                return false;
            }
        }

        self.state.staged = Some(direction);

        if self.state.session == SessionState::Idle {
            self.state.session = SessionState::Running;
        }

        true
    }

    /// Start an idle game, moving right unless a direction was already set
    pub fn start(&mut self) -> bool {
        if self.state.session != SessionState::Idle {
            return false;
        }
        self.state.staged.get_or_insert(Direction::Right);
        self.state.session = SessionState::Running;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state.session != SessionState::Running {
            return false;
        }
        self.state.session = SessionState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state.session != SessionState::Paused {
            return false;
        }
        self.state.session = SessionState::Running;
        true
    }

    /// Flip between running and paused; no-op in any other state
    pub fn toggle_pause(&mut self) -> bool {
        match self.state.session {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            SessionState::Idle | SessionState::Over => false,
        }
    }

    /// Execute one tick of the game
    pub fn advance(&mut self) -> StepResult {
        if self.state.session != SessionState::Running {
            return StepResult::default();
        }

        let Some(direction) = self.state.staged else {
            return StepResult::default();
        };

        let new_head = self.state.snake.head().moved_in_direction(direction);
        self.state.committed = Some(direction);
        self.state.ticks += 1;

        // Walls are checked before the body
        if !self.state.is_in_bounds(new_head) {
            return self.end(GameOverReason::Wall, false);
        }

        if self.state.snake.contains(new_head) {
            return self.end(GameOverReason::SelfCollision, false);
        }

        self.state.snake.push_head(new_head);

        let grew = new_head == self.state.food;
        if grew {
            self.state.score += self.config.points_per_food;
            self.state.speed_tier = self.config.speed_tier_for(self.state.score);

            match place_food(&self.config, &self.state.snake, &mut self.rng) {
                Some(food) => self.state.food = food,
                None => return self.end(GameOverReason::BoardFull, true),
            }
        } else {
            self.state.snake.pop_tail();
        }

        StepResult {
            grew,
            game_over: false,
            reason: None,
        }
    }

    fn end(&mut self, reason: GameOverReason, grew: bool) -> StepResult {
        self.state.session = SessionState::Over;
        self.state.game_over_reason = Some(reason);
        StepResult::over(reason, grew)
    }

    /// Tick period for the current speed tier
    pub fn tick_period(&self) -> Duration {
        self.config.tick_period(self.state.speed_tier)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

fn initial_state<R: Rng>(config: &GameConfig, rng: &mut R) -> GameState {
    let snake = Snake::new(config.start_position());

    let food = config.default_food();
    if !snake.contains(food) {
        return GameState::new(snake, food, config.tile_count);
    }

    match place_food(config, &snake, rng) {
        Some(food) => GameState::new(snake, food, config.tile_count),
        None => {
            // No free cell from the start: a grid of one tile
            debug!("no room for food on a {0}x{0} grid", config.tile_count);
            let mut state = GameState::new(snake, food, config.tile_count);
            state.session = SessionState::Over;
            state.game_over_reason = Some(GameOverReason::BoardFull);
            state
        }
    }
}

/// Pick a uniformly random cell not covered by the snake.
///
/// Rejection sampling first; if that keeps hitting the body, fall back to
/// choosing among the free cells directly. `None` means the board is full.
fn place_food<R: Rng>(config: &GameConfig, snake: &Snake, rng: &mut R) -> Option<Position> {
    let n = config.tile_count as i32;
    if snake.len() >= config.tile_count * config.tile_count {
        return None;
    }

    for _ in 0..MAX_FOOD_ATTEMPTS {
        let pos = Position::new(rng.gen_range(0..n), rng.gen_range(0..n));
        if !snake.contains(pos) {
            return Some(pos);
        }
    }

    debug!(
        "food sampling missed {} times with snake length {}, scanning free cells",
        MAX_FOOD_ATTEMPTS,
        snake.len()
    );

    let free: Vec<Position> = (0..n)
        .flat_map(|y| (0..n).map(move |x| Position::new(x, y)))
        .filter(|pos| !snake.contains(*pos))
        .collect();
    free.choose(rng).copied()
}
