use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::view::{Overlay, TerminalView};
use crate::game::Position;
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &TerminalView, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with score panel
        let stats = self.render_stats(view, metrics);
        frame.render_widget(stats, chunks[0]);

        // Each tile is two columns wide, plus the border
        let game_area = centered(
            chunks[1],
            grid_width(view.tile_count),
            grid_height(view.tile_count),
        );

        let grid = self.render_grid(view);
        frame.render_widget(grid, game_area);

        if let Some(overlay) = &view.overlay {
            let popup = centered(chunks[1], 52, 7);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_overlay(overlay), popup);
        }

        // Render footer with controls
        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, view: &TerminalView) -> Paragraph<'_> {
        let head = view.head();
        let mut lines = Vec::with_capacity(view.tile_count);

        for y in 0..view.tile_count {
            let mut spans = Vec::with_capacity(view.tile_count);

            for x in 0..view.tile_count {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if view.snake.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if Some(pos) == view.food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled("· ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Green))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, view: &TerminalView, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(view.score.score.to_string(), value),
            Span::raw("    "),
            Span::styled("High Score: ", label),
            Span::styled(view.score.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(view.score.speed_tier.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_overlay<'a>(&self, overlay: &'a Overlay) -> Paragraph<'a> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                overlay.title.as_str(),
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                overlay.message.as_str(),
                Style::default().fg(Color::Gray),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::LightGreen)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / mouse drag to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" start/pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn grid_width(tile_count: usize) -> u16 {
    u16::try_from(tile_count)
        .unwrap_or(u16::MAX)
        .saturating_mul(2)
        .saturating_add(2)
}

fn grid_height(tile_count: usize) -> u16 {
    u16::try_from(tile_count)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::{OverlaySink, RenderFrame, RenderSink, ScoreBoard, ScoreSink};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(view: &TerminalView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 32)).unwrap();
        let renderer = Renderer::new();
        let metrics = GameMetrics::new();
        terminal
            .draw(|frame| renderer.render(frame, view, &metrics))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn sample_view() -> TerminalView {
        let mut view = TerminalView::new();
        let body = [Position::new(2, 2), Position::new(1, 2)];
        view.render(RenderFrame {
            snake: &body,
            food: Position::new(5, 5),
            grid_size: 20,
            tile_count: 10,
        });
        view.update_score(ScoreBoard {
            score: 20,
            high_score: 70,
            speed_tier: 1,
        });
        view
    }

    #[test]
    fn test_draws_board_and_scores() {
        let screen = draw(&sample_view());

        assert!(screen.contains("Score: 20"));
        assert!(screen.contains("High Score: 70"));
        assert!(screen.contains("Speed: 1"));
        assert!(screen.contains('■'));
        assert!(screen.contains('□'));
        assert!(screen.contains('●'));
    }

    #[test]
    fn test_draws_overlay() {
        let mut view = sample_view();
        view.show_overlay("Game Over", "Score: 20 | High Score: 70");

        let screen = draw(&view);
        assert!(screen.contains("Game Over"));
        assert!(screen.contains("Score: 20 | High Score: 70"));
    }

    #[test]
    fn test_grid_size_saturates_for_huge_boards() {
        assert_eq!(grid_width(10), 22);
        assert_eq!(grid_height(10), 12);
        // 65_537 would wrap to 1 with a plain cast
        assert_eq!(grid_width(65_537), u16::MAX);
        assert_eq!(grid_height(65_537), u16::MAX);
    }

    #[test]
    fn test_centered_fits_inside_area() {
        let area = Rect::new(0, 0, 30, 10);
        let rect = centered(area, 50, 4);
        assert_eq!(rect.width, 30);
        assert_eq!(rect.height, 4);
        assert_eq!(rect.y, 3);
    }
}
