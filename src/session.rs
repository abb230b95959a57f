//! One playing session: engine, input, clock and collaborators wired together.
//!
//! The session owns the [`GridEngine`] and reacts to its state transitions:
//! it starts and stops the [`Ticker`], pushes snapshots to the presenter,
//! and records a new high score when a game ends.

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;

use crate::game::{
    GameConfig, GameOverReason, GameState, GridEngine, SessionState, StepResult, Ticker,
};
use crate::input::{InputController, Intent};
use crate::metrics::GameMetrics;
use crate::persistence::{HighScoreStore, HIGH_SCORE_KEY};
use crate::sinks::{Presenter, RenderFrame, ScoreBoard};

pub const START_TITLE: &str = "Snake Game";
pub const START_MESSAGE: &str = "Press SPACE to start or use arrow keys to move";
pub const PAUSE_TITLE: &str = "Game Paused";
pub const PAUSE_MESSAGE: &str = "Press SPACE to resume";

pub struct Session<P, H, R = StdRng> {
    engine: GridEngine<R>,
    controller: InputController,
    ticker: Ticker,
    presenter: P,
    store: H,
    high_score: u32,
    /// False when the stored score could not be read; the store is then
    /// never written so an unknown record is not overwritten
    store_readable: bool,
    metrics: GameMetrics,
}

impl<P: Presenter, H: HighScoreStore> Session<P, H, StdRng> {
    pub fn new(config: GameConfig, presenter: P, store: H) -> Self {
        Self::with_engine(GridEngine::new(config), presenter, store)
    }
}

impl<P: Presenter, H: HighScoreStore, R: Rng> Session<P, H, R> {
    /// Build a session around an existing engine.
    ///
    /// The engine is used as-is, so a prepared scenario survives. The high
    /// score is read once here; a store that fails to read counts as 0.
    pub fn with_engine(engine: GridEngine<R>, presenter: P, store: H) -> Self {
        let (high_score, store_readable) = match store.get(HIGH_SCORE_KEY) {
            Ok(score) => (score.unwrap_or(0), true),
            Err(err) => {
                warn!("Could not read high score, starting from 0: {:#}", err);
                (0, false)
            }
        };

        let ticker = Ticker::new(engine.tick_period());

        let mut session = Self {
            engine,
            controller: InputController::new(),
            ticker,
            presenter,
            store,
            high_score,
            store_readable,
            metrics: GameMetrics::new(),
        };
        session.show_start_screen();
        session
    }

    /// Feed one input command through the controller
    pub fn handle(&mut self, intent: Intent) -> bool {
        let before = self.engine.state().session;
        let changed = self.controller.apply(&mut self.engine, intent);
        self.on_transition(before);
        changed
    }

    /// Run exactly one tick if the game is running
    pub fn tick(&mut self) -> StepResult {
        if !self.engine.state().is_running() {
            return StepResult::default();
        }

        let result = self.engine.advance();
        self.metrics.on_tick();
        self.publish_frame();

        if result.grew {
            self.publish_score();
            let period = self.engine.tick_period();
            if period != self.ticker.period() {
                debug!(
                    "Speed tier {} reached, tick period now {:?}",
                    self.engine.state().speed_tier,
                    period
                );
            }
            self.ticker.set_period(period);
        }

        if result.game_over {
            self.finish_game();
        }

        result
    }

    /// Advance simulated time by `dt`, running every tick that falls due.
    ///
    /// Returns how many ticks ran.
    pub fn update(&mut self, dt: Duration) -> usize {
        self.ticker.feed(dt);

        let mut ticks = 0;
        while self.ticker.take_due() {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Throw the current game away and wait for a new start
    pub fn restart(&mut self) {
        self.engine.reset();
        self.ticker.stop();
        self.controller.cancel_swipe();
        self.metrics.on_reset();
        info!("Game reset");
        self.show_start_screen();
    }

    fn on_transition(&mut self, before: SessionState) {
        let after = self.engine.state().session;

        match (before, after) {
            (SessionState::Idle, SessionState::Running) => {
                info!("Game started heading {:?}", self.engine.state().staged);
                self.metrics.on_game_start();
                self.presenter.hide_overlay();
                self.ticker.start(self.engine.tick_period());
            }
            (SessionState::Paused, SessionState::Running) => {
                info!("Game resumed");
                self.metrics.on_resume();
                self.presenter.hide_overlay();
                self.ticker.start(self.engine.tick_period());
            }
            (SessionState::Running, SessionState::Paused) => {
                info!("Game paused");
                self.metrics.on_pause();
                self.ticker.stop();
                self.presenter.show_overlay(PAUSE_TITLE, PAUSE_MESSAGE);
            }
            _ => {}
        }
    }

    fn finish_game(&mut self) {
        // No tick may run after the game is over
        self.ticker.stop();
        self.metrics.on_game_over();

        let state = self.engine.state();
        let score = state.score;
        let reason = state.game_over_reason;
        let ticks = state.ticks;
        let previous_best = self.high_score;

        info!(
            "Game over ({:?}) with score {} after {} ticks",
            reason, score, ticks
        );

        let new_record = score > previous_best;
        if new_record {
            self.high_score = score;
            if !self.store_readable {
                warn!("High score store unreadable, not saving {}", score);
            } else {
                match self.store.set(HIGH_SCORE_KEY, score) {
                    Ok(()) => info!("New high score {} (previous {})", score, previous_best),
                    Err(err) => error!("Failed to save high score {}: {:#}", score, err),
                }
            }
            self.publish_score();
        }

        let (title, message) = match reason {
            Some(GameOverReason::BoardFull) => (
                "Board Cleared!",
                format!("Score: {} | High Score: {}", score, self.high_score),
            ),
            _ if new_record => (
                "New High Score!",
                format!("Score: {} | Previous Best: {}", score, previous_best),
            ),
            _ => (
                "Game Over",
                format!("Score: {} | High Score: {}", score, self.high_score),
            ),
        };
        self.presenter.show_overlay(title, &message);
    }

    fn show_start_screen(&mut self) {
        self.publish_frame();
        self.publish_score();
        self.presenter.show_overlay(START_TITLE, START_MESSAGE);
    }

    fn publish_frame(&mut self) {
        let state = self.engine.state();
        let config = self.engine.config();
        self.presenter.render(RenderFrame {
            snake: state.snake.segments(),
            food: state.food,
            grid_size: config.tile_size,
            tile_count: state.tile_count,
        });
    }

    fn publish_score(&mut self) {
        let board = self.score_board();
        self.presenter.update_score(board);
    }

    pub fn score_board(&self) -> ScoreBoard {
        let state = self.engine.state();
        ScoreBoard {
            score: state.score,
            high_score: self.high_score,
            speed_tier: state.speed_tier,
        }
    }

    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    pub fn engine(&self) -> &GridEngine<R> {
        &self.engine
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn tick_period(&self) -> Duration {
        self.engine.tick_period()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }
}
