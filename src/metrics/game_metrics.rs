use std::time::{Duration, Instant};

/// Play-time bookkeeping for the current game.
///
/// The clock only runs while the snake moves: pausing and game over
/// freeze it.
#[derive(Debug, Clone)]
pub struct GameMetrics {
    running_since: Option<Instant>,
    banked: Duration,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub ticks: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            banked: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            games_played: 0,
            ticks: 0,
        }
    }

    /// Refresh `elapsed_time` from the running clock
    pub fn update(&mut self) {
        self.elapsed_time = self.banked + self.running_since.map_or(Duration::ZERO, |t| t.elapsed());
    }

    /// Clear per-game counters; the clock stays stopped until `on_game_start`
    pub fn on_reset(&mut self) {
        self.running_since = None;
        self.banked = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.ticks = 0;
    }

    pub fn on_game_start(&mut self) {
        self.on_reset();
        self.running_since = Some(Instant::now());
    }

    pub fn on_pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.banked += since.elapsed();
        }
        self.update();
    }

    pub fn on_resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn on_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn on_game_over(&mut self) {
        self.on_pause();
        self.games_played += 1;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
