//! Headless replay of a scripted input sequence
//!
//! A script lists timed intents. Replay drives a [`Session`] with simulated
//! time in fixed steps, so the same script and seed always end the same way.
//!
//! # Script format
//!
//! ```json
//! {
//!   "seed": 7,
//!   "step_ms": 10,
//!   "duration_ms": 5000,
//!   "events": [
//!     { "at_ms": 0, "intent": "start_or_pause" },
//!     { "at_ms": 900, "intent": { "turn": "down" } }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::game::ticker::MAX_FEED;
use crate::game::{GameConfig, GameOverReason, GridEngine, SessionState};
use crate::input::Intent;
use crate::persistence::MemoryHighScoreStore;
use crate::session::Session;
use crate::sinks::NullPresenter;

fn default_step_ms() -> u64 {
    10
}

/// One intent fired at a point in simulated time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedIntent {
    pub at_ms: u64,
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Seed for food placement
    #[serde(default)]
    pub seed: u64,
    /// Simulated time per step
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    /// Replay stops here unless the game ends first
    pub duration_ms: u64,
    #[serde(default)]
    pub events: Vec<ScriptedIntent>,
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script from {:?}", path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse replay script {:?}", path))
    }
}

/// How a replay ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub session: SessionState,
    pub reason: Option<GameOverReason>,
    pub score: u32,
    pub speed_tier: u32,
    pub length: usize,
    pub ticks: u64,
    pub elapsed_ms: u64,
}

impl ReplaySummary {
    pub fn format_summary(&self) -> String {
        let outcome = match (self.session, self.reason) {
            (SessionState::Over, Some(reason)) => format!("over ({:?})", reason),
            (state, _) => format!("{:?}", state).to_lowercase(),
        };
        format!(
            "Outcome: {}\nScore: {}\nSpeed tier: {}\nLength: {}\nTicks: {}\nSimulated time: {}ms",
            outcome, self.score, self.speed_tier, self.length, self.ticks, self.elapsed_ms
        )
    }
}

pub struct ReplayMode {
    config: GameConfig,
    script: ReplayScript,
}

impl ReplayMode {
    pub fn new(config: GameConfig, script: ReplayScript) -> Self {
        Self { config, script }
    }

    pub fn run(&self) -> ReplaySummary {
        let engine = GridEngine::seeded(self.config.clone(), self.script.seed);
        let mut session =
            Session::with_engine(engine, NullPresenter, MemoryHighScoreStore::new());

        let mut events = self.script.events.clone();
        events.sort_by_key(|event| event.at_ms);
        let mut events = events.into_iter().peekable();

        let step_ms = self.script.step_ms.max(1);
        let step = Duration::from_millis(step_ms);
        let mut now = 0;

        info!(
            "Replaying {} events over {}ms (seed {})",
            self.script.events.len(),
            self.script.duration_ms,
            self.script.seed
        );

        loop {
            while let Some(event) = events.next_if(|event| event.at_ms <= now) {
                session.handle(event.intent);
            }

            if session.state().is_over() || now >= self.script.duration_ms {
                break;
            }

            // The ticker drops anything past MAX_FEED in one feed
            let mut remaining = step;
            while !remaining.is_zero() {
                let slice = remaining.min(MAX_FEED);
                session.update(slice);
                remaining -= slice;
            }
            now += step_ms;
        }

        let state = session.state();
        let summary = ReplaySummary {
            session: state.session,
            reason: state.game_over_reason,
            score: state.score,
            speed_tier: state.speed_tier,
            length: state.snake.len(),
            ticks: state.ticks,
            elapsed_ms: now,
        };
        info!("Replay finished: {:?}", summary);
        summary
    }
}
