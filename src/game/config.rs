use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::state::Position;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of tiles along each side of the square grid
    pub tile_count: usize,
    /// Size of one tile in pixels, handed to the render sink
    pub tile_size: u32,
    /// Where the single-segment snake starts after a reset
    pub start_x: i32,
    pub start_y: i32,
    /// Where the first food sits after a reset
    pub food_x: i32,
    pub food_y: i32,

    /// Score gained per food eaten
    pub points_per_food: u32,
    /// Score needed to climb one speed tier
    pub points_per_tier: u32,

    /// Tick period at speed tier 1
    pub base_period_ms: u64,
    /// Period reduction per speed tier
    pub period_step_ms: u64,
    /// The period never drops below this
    pub min_period_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 20,
            tile_size: 20,
            start_x: 10,
            start_y: 10,
            food_x: 15,
            food_y: 15,
            points_per_food: 10,
            points_per_tier: 50,
            base_period_ms: 200,
            period_step_ms: 20,
            min_period_ms: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self {
            tile_count: 10,
            start_x: 5,
            start_y: 5,
            food_x: 8,
            food_y: 8,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.start_x, self.start_y)
    }

    pub fn default_food(&self) -> Position {
        Position::new(self.food_x, self.food_y)
    }

    /// Speed tier reached at `score`: `floor(score / points_per_tier) + 1`
    pub fn speed_tier_for(&self, score: u32) -> u32 {
        score / self.points_per_tier + 1
    }

    /// Tick period for a speed tier, floored at `min_period_ms`
    pub fn tick_period(&self, speed_tier: u32) -> Duration {
        let reduction = u64::from(speed_tier.saturating_sub(1)).saturating_mul(self.period_step_ms);
        let ms = self
            .base_period_ms
            .saturating_sub(reduction)
            .max(self.min_period_ms);
        Duration::from_millis(ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_count < 2 {
            return Err(format!(
                "tile_count must be at least 2, got {}",
                self.tile_count
            ));
        }

        if self.tile_count > i32::MAX as usize {
            return Err(format!("tile_count too large, got {}", self.tile_count));
        }

        if self.tile_size == 0 {
            return Err("tile_size must be at least 1".to_string());
        }

        let n = self.tile_count as i32;
        let inside = |x: i32, y: i32| (0..n).contains(&x) && (0..n).contains(&y);

        if !inside(self.start_x, self.start_y) {
            return Err(format!(
                "start position ({}, {}) lies outside a {}x{} grid",
                self.start_x, self.start_y, n, n
            ));
        }

        if !inside(self.food_x, self.food_y) {
            return Err(format!(
                "food position ({}, {}) lies outside a {}x{} grid",
                self.food_x, self.food_y, n, n
            ));
        }

        if self.points_per_food == 0 {
            return Err("points_per_food must be at least 1".to_string());
        }

        if self.points_per_tier == 0 {
            return Err("points_per_tier must be at least 1".to_string());
        }

        if self.min_period_ms == 0 {
            return Err("min_period_ms must be at least 1".to_string());
        }

        if self.min_period_ms > self.base_period_ms {
            return Err(format!(
                "min_period_ms ({}) cannot exceed base_period_ms ({})",
                self.min_period_ms, self.base_period_ms
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.tile_count, 20);
        assert_eq!(config.start_position(), Position::new(10, 10));
        assert_eq!(config.default_food(), Position::new(15, 15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(30);
        assert_eq!(config.tile_count, 30);
        assert_eq!(config.points_per_food, 10);
        assert!(GameConfig::small().validate().is_ok());
    }

    #[test]
    fn test_speed_tier_formula() {
        let config = GameConfig::default();
        assert_eq!(config.speed_tier_for(0), 1);
        assert_eq!(config.speed_tier_for(40), 1);
        assert_eq!(config.speed_tier_for(50), 2);
        assert_eq!(config.speed_tier_for(90), 2);
        assert_eq!(config.speed_tier_for(100), 3);
    }

    #[test]
    fn test_tick_period_is_floored() {
        let config = GameConfig::default();
        assert_eq!(config.tick_period(1), Duration::from_millis(200));
        assert_eq!(config.tick_period(2), Duration::from_millis(180));
        assert_eq!(config.tick_period(8), Duration::from_millis(60));
        assert_eq!(config.tick_period(9), Duration::from_millis(50));
        assert_eq!(config.tick_period(10), Duration::from_millis(50));
        assert_eq!(config.tick_period(u32::MAX), Duration::from_millis(50));
    }

    #[test]
    fn test_validation_start_outside_grid() {
        let config = GameConfig {
            tile_count: 10,
            ..Default::default()
        };
        // default start (10, 10) is off a 10x10 grid
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut config = GameConfig::default();
        config.tile_count = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.points_per_tier = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.min_period_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_single_tile_grid() {
        let config = GameConfig {
            tile_count: 1,
            start_x: 0,
            start_y: 0,
            food_x: 0,
            food_y: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(GameConfig { tile_count: 2, ..config }.validate().is_ok());
    }

    #[test]
    fn test_validation_min_period_above_base() {
        let mut config = GameConfig::default();
        config.min_period_ms = 300;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "tile_count": 30, "min_period_ms": 80 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.tile_count, 30);
        assert_eq!(config.min_period_ms, 80);
        assert_eq!(config.base_period_ms, 200);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(GameConfig::load(&dir.path().join("absent.json")).is_err());
    }
}
