//! Turns device-independent intents into engine calls.
//!
//! Keyboard keys, on-screen buttons and swipes all end up here as an
//! [`Intent`]. The controller never touches presentation; it only calls
//! into the [`GridEngine`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{Direction, GridEngine, SessionState};

/// A single input command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Arrow key or directional button
    Turn(Direction),
    /// Start button
    Start,
    /// Space: start when idle, otherwise toggle pause
    StartOrPause,
    /// Touch or mouse press
    SwipeBegin { x: i32, y: i32 },
    /// Touch or mouse release
    SwipeEnd { x: i32, y: i32 },
}

/// Map a swipe delta onto a cardinal direction.
///
/// The dominant axis wins; ties (including a zero-length swipe) go to the
/// vertical axis, and a non-positive vertical delta reads as up.
pub fn swipe_direction(dx: i32, dy: i32) -> Direction {
    if dx.unsigned_abs() > dy.unsigned_abs() {
        if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

#[derive(Debug, Default)]
pub struct InputController {
    swipe_start: Option<(i32, i32)>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `intent` to the engine. Returns whether the engine changed.
    pub fn apply<R: Rng>(&mut self, engine: &mut GridEngine<R>, intent: Intent) -> bool {
        match intent {
            Intent::Turn(direction) => engine.set_direction(direction),
            Intent::Start => engine.start(),
            Intent::StartOrPause => match engine.state().session {
                SessionState::Idle => engine.start(),
                SessionState::Running | SessionState::Paused => engine.toggle_pause(),
                SessionState::Over => false,
            },
            Intent::SwipeBegin { x, y } => {
                self.swipe_start = Some((x, y));
                false
            }
            Intent::SwipeEnd { x, y } => match self.swipe_start.take() {
                Some((start_x, start_y)) => {
                    engine.set_direction(swipe_direction(
                        x.saturating_sub(start_x),
                        y.saturating_sub(start_y),
                    ))
                }
                None => false,
            },
        }
    }

    /// Forget a half-finished swipe
    pub fn cancel_swipe(&mut self) {
        self.swipe_start = None;
    }
}
