//! Output collaborators of a [`Session`](crate::session::Session).
//!
//! The session pushes snapshots into these traits; nothing flows back into
//! the engine. The terminal front end implements all of them on
//! [`TerminalView`](crate::render::TerminalView), tests use recorders.

use crate::game::Position;

/// Snapshot handed to the renderer after every tick and on reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFrame<'a> {
    /// Snake segments, head first
    pub snake: &'a [Position],
    pub food: Position,
    /// Size of one tile in pixels
    pub grid_size: u32,
    /// Tiles along each side of the grid
    pub tile_count: usize,
}

/// Score panel contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBoard {
    pub score: u32,
    pub high_score: u32,
    pub speed_tier: u32,
}

pub trait RenderSink {
    fn render(&mut self, frame: RenderFrame<'_>);
}

pub trait ScoreSink {
    fn update_score(&mut self, board: ScoreBoard);
}

pub trait OverlaySink {
    fn show_overlay(&mut self, title: &str, message: &str);
    fn hide_overlay(&mut self);
}

/// Everything a session presents to
pub trait Presenter: RenderSink + ScoreSink + OverlaySink {}

impl<T: RenderSink + ScoreSink + OverlaySink> Presenter for T {}

/// Presenter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl RenderSink for NullPresenter {
    fn render(&mut self, _frame: RenderFrame<'_>) {}
}

impl ScoreSink for NullPresenter {
    fn update_score(&mut self, _board: ScoreBoard) {}
}

impl OverlaySink for NullPresenter {
    fn show_overlay(&mut self, _title: &str, _message: &str) {}
    fn hide_overlay(&mut self) {}
}
