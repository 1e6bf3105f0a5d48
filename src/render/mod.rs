pub mod renderer;

pub use renderer::{BlockRect, Renderer};
