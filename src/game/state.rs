use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake body, head first.
///
/// Segments never repeat and the body is never empty; the engine only ever
/// prepends a cell that failed the self-collision check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    /// Create a single-segment snake
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    /// Create a snake from explicit segments, head first.
    ///
    /// Returns `None` for an empty body or one with repeated cells.
    pub fn from_segments(segments: Vec<Position>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        for (i, segment) in segments.iter().enumerate() {
            if segments[i + 1..].contains(segment) {
                return None;
            }
        }
        Some(Self { body: segments })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    /// Check if any segment (head included) occupies `pos`
    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.body.insert(0, pos);
    }

    pub(crate) fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lifecycle of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Reset and waiting for the first command
    #[default]
    Idle,
    Running,
    Paused,
    /// Terminal; only a reset leaves this state
    Over,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Head left the grid
    Wall,
    /// Head ran into the body
    SelfCollision,
    /// Snake covers every cell, so no food can be placed
    BoardFull,
}

/// Complete game state for one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Direction used by the last tick, `None` before the first tick
    pub committed: Option<Direction>,
    /// Direction the next tick will use, `None` before the game starts
    pub staged: Option<Direction>,
    pub tile_count: usize,
    pub score: u32,
    pub speed_tier: u32,
    pub ticks: u64,
    pub session: SessionState,
    pub game_over_reason: Option<GameOverReason>,
}

impl GameState {
    /// Create a fresh idle state
    pub fn new(snake: Snake, food: Position, tile_count: usize) -> Self {
        Self {
            snake,
            food,
            committed: None,
            staged: None,
            tile_count,
            score: 0,
            speed_tier: 1,
            ticks: 0,
            session: SessionState::Idle,
            game_over_reason: None,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let n = self.tile_count as i32;
        pos.x >= 0 && pos.x < n && pos.y >= 0 && pos.y < n
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    pub fn is_running(&self) -> bool {
        self.session == SessionState::Running
    }

    pub fn is_over(&self) -> bool {
        self.session == SessionState::Over
    }
}
