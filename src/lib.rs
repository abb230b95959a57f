//! Grid Snake - a terminal Snake game built around a headless engine
//!
//! This library provides:
//! - Core game logic with no I/O (game module)
//! - Device-independent input handling (input module)
//! - Session orchestration over injected sinks and a high-score store (session module)
//! - TUI rendering (render module)
//! - Interactive and scripted execution modes (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
pub mod session;
pub mod sinks;
