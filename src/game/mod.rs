//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Drivers decide when to call [`GridEngine::advance`]; the engine never looks at a clock.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;
pub mod ticker;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GridEngine, StepResult};
pub use state::{GameOverReason, GameState, Position, SessionState, Snake};
pub use ticker::Ticker;
