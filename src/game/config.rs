use std::time::Duration;

use anyhow::{Result, ensure};

use super::snake::Grid;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Width of the playfield in pixels
    pub window_width: u32,
    /// Height of the playfield in pixels
    pub window_height: u32,
    /// Side of one grid cell in pixels
    pub block_size: u32,
    /// Fixed simulation rate; one cell of movement per tick
    pub ticks_per_second: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 400,
            window_height: 300,
            block_size: 20,
            ticks_per_second: 10,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom window size
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Default::default()
        }
    }

    /// Grid dimensions derived from window size and block size
    pub fn grid(&self) -> Grid {
        let block = self.block_size.max(1);
        Grid::new(
            (self.window_width / block) as i32,
            (self.window_height / block) as i32,
        )
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.block_size >= 2,
            "block size must be at least 2 pixels, got {}",
            self.block_size
        );
        ensure!(
            self.window_width >= self.block_size && self.window_height >= self.block_size,
            "window {}x{} is smaller than one {}px block",
            self.window_width,
            self.window_height,
            self.block_size
        );
        ensure!(
            (self.window_width / self.block_size) <= i32::MAX as u32
                && (self.window_height / self.block_size) <= i32::MAX as u32,
            "grid is too large"
        );
        ensure!(
            (1..=1000).contains(&self.ticks_per_second),
            "tick rate must be between 1 and 1000, got {}",
            self.ticks_per_second
        );
        Ok(())
    }
}
