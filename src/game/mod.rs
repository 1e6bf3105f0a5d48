//! Core game logic for Snake
//!
//! Pure simulation with no terminal or rendering dependencies. The driver in
//! `modes` feeds it input and draws whatever `Session::snapshot` returns.

pub mod config;
pub mod direction;
pub mod session;
pub mod snake;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use session::{Session, Snapshot, TickOutcome};
pub use snake::{Collision, Grid, Position, Snake};
