use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stderr, Stderr};
use std::time::Duration;
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};

use crate::game::{GameConfig, GridEngine};
use crate::input::{InputAction, InputHandler};
use crate::persistence::HighScoreStore;
use crate::render::{Renderer, TerminalView};
use crate::session::Session;

/// Render at 30 FPS (33ms per frame)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode<H> {
    session: Session<TerminalView, H>,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Live game clock and the period it was built with
    tick_timer: Option<(Interval, Duration)>,
}

impl<H: HighScoreStore> HumanMode<H> {
    pub fn new(config: GameConfig, store: H, seed: Option<u64>) -> Self {
        let engine = match seed {
            Some(seed) => GridEngine::seeded(config, seed),
            None => GridEngine::new(config),
        };

        Self {
            session: Session::with_engine(engine, TerminalView::new(), store),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            tick_timer: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!("Terminal ready, entering game loop");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        if let Err(err) = &result {
            warn!("Game loop ended with error: {:#}", err);
        }
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(&event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = next_tick(&mut self.tick_timer) => {
                    self.session.tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.session.metrics_mut().update();
                    let view = self.session.presenter();
                    let metrics = self.session.metrics();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, view, metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("Quit requested");
                break;
            }

            self.sync_tick_timer();
        }

        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        match self.input_handler.handle_event(event) {
            InputAction::Intent(intent) => {
                self.session.handle(intent);
            }
            InputAction::Restart => self.session.restart(),
            InputAction::Quit => self.should_quit = true,
            InputAction::None => {}
        }
    }

    /// Mirror the session's ticker onto a tokio interval.
    ///
    /// The interval is dropped as soon as the ticker stops (pause, game
    /// over, restart) and rebuilt when the period changes; a rebuilt
    /// interval first fires one full new period from now.
    fn sync_tick_timer(&mut self) {
        let ticker = self.session.ticker();
        if !ticker.is_active() {
            self.tick_timer = None;
            return;
        }

        let period = ticker.period();
        let up_to_date = matches!(&self.tick_timer, Some((_, current)) if *current == period);
        if !up_to_date {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.tick_timer = Some((timer, period));
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Wait for the next game tick, or forever when no game clock is running
async fn next_tick(timer: &mut Option<(Interval, Duration)>) {
    match timer {
        Some((timer, _)) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
