use crate::game::Position;
use crate::sinks::{OverlaySink, RenderFrame, RenderSink, ScoreBoard, ScoreSink};

/// Message box drawn over the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub title: String,
    pub message: String,
}

/// Latest snapshot pushed by the session, read by the [`Renderer`](super::Renderer)
#[derive(Debug, Clone, Default)]
pub struct TerminalView {
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub tile_count: usize,
    pub grid_size: u32,
    pub score: ScoreBoard,
    pub overlay: Option<Overlay>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

impl RenderSink for TerminalView {
    fn render(&mut self, frame: RenderFrame<'_>) {
        self.snake.clear();
        self.snake.extend_from_slice(frame.snake);
        self.food = Some(frame.food);
        self.tile_count = frame.tile_count;
        self.grid_size = frame.grid_size;
    }
}

impl ScoreSink for TerminalView {
    fn update_score(&mut self, board: ScoreBoard) {
        self.score = board;
    }
}

impl OverlaySink for TerminalView {
    fn show_overlay(&mut self, title: &str, message: &str) {
        self.overlay = Some(Overlay {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_keeps_latest_values() {
        let mut view = TerminalView::new();
        let body = [Position::new(3, 3), Position::new(2, 3)];

        view.render(RenderFrame {
            snake: &body,
            food: Position::new(7, 1),
            grid_size: 20,
            tile_count: 10,
        });
        view.update_score(ScoreBoard {
            score: 30,
            high_score: 50,
            speed_tier: 1,
        });
        view.show_overlay("Game Paused", "Press SPACE to resume");

        assert_eq!(view.head(), Some(Position::new(3, 3)));
        assert_eq!(view.snake.len(), 2);
        assert_eq!(view.food, Some(Position::new(7, 1)));
        assert_eq!(view.tile_count, 10);
        assert_eq!(view.score.high_score, 50);
        assert_eq!(view.overlay.as_ref().unwrap().title, "Game Paused");

        view.hide_overlay();
        assert!(view.overlay.is_none());

        view.render(RenderFrame {
            snake: &body[..1],
            food: Position::new(0, 0),
            grid_size: 20,
            tile_count: 10,
        });
        assert_eq!(view.snake, vec![Position::new(3, 3)]);
    }
}
