//! Grid Snake - a fixed-tick Snake game for the terminal
//!
//! This library provides:
//! - Core simulation: snake movement, growth, collision, and the session tick (game module)
//! - Key mapping (input module)
//! - Canvas rendering with ratatui (render module)
//! - The interactive terminal driver (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
