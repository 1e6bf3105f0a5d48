use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Paragraph,
        canvas::{Canvas, Painter, Shape},
    },
};

use crate::game::{GameConfig, Position, Snapshot};

const HEAD_COLOR: Color = Color::Cyan;
const BODY_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::Red;

/// Pixel-space square for one grid cell, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRect {
    pub x: i64,
    pub y: i64,
    pub side: i64,
}

impl BlockRect {
    /// `pixel = cell * block_size`, drawn one pixel short to leave a gutter
    pub fn for_cell(pos: Position, block_size: u32) -> Self {
        let block = i64::from(block_size);
        Self {
            x: i64::from(pos.x) * block,
            y: i64::from(pos.y) * block,
            side: block - 1,
        }
    }
}

/// A filled block on the canvas. The canvas origin is bottom-left, so rows
/// are flipped against the window height.
struct FilledBlock {
    rect: BlockRect,
    window_width: f64,
    window_height: f64,
    color: Color,
}

impl FilledBlock {
    /// Canvas coordinates of the centre of pixel `(px, py)`, kept on the canvas
    fn canvas_point(&self, px: i64, py: i64) -> (f64, f64) {
        let x = (px as f64 + 0.5).clamp(0.0, self.window_width);
        let y = (self.window_height - (py as f64 + 0.5)).clamp(0.0, self.window_height);
        (x, y)
    }
}

impl Shape for FilledBlock {
    /// Paints the canvas cells between the block's two corner pixels, so the
    /// cost follows the terminal size rather than the block size.
    fn draw(&self, painter: &mut Painter) {
        if self.rect.side <= 0 {
            return;
        }
        let last = self.rect.side - 1;
        let (left, top) = self.canvas_point(self.rect.x, self.rect.y);
        let (right, bottom) = self.canvas_point(self.rect.x + last, self.rect.y + last);
        let (Some((col_a, row_a)), Some((col_b, row_b))) =
            (painter.get_point(left, top), painter.get_point(right, bottom))
        else {
            return;
        };

        for row in row_a.min(row_b)..=row_a.max(row_b) {
            for col in col_a.min(col_b)..=col_a.max(col_b) {
                painter.paint(col, row, self.color);
            }
        }
    }
}

pub struct Renderer {
    window_width: f64,
    window_height: f64,
    block_size: u32,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            window_width: f64::from(config.window_width),
            window_height: f64::from(config.window_height),
            block_size: config.block_size,
        }
    }

    pub fn render(&self, frame: &mut Frame, snapshot: Snapshot<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Playfield
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        let blocks = self.blocks(snapshot);
        let playfield = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .marker(Marker::HalfBlock)
            .x_bounds([0.0, self.window_width])
            .y_bounds([0.0, self.window_height])
            .paint(|ctx| {
                for block in &blocks {
                    ctx.draw(block);
                }
            });
        frame.render_widget(playfield, chunks[0]);

        frame.render_widget(self.render_controls(), chunks[1]);
    }

    /// Body first, head over it, food last
    fn blocks(&self, snapshot: Snapshot<'_>) -> Vec<FilledBlock> {
        let block = |pos: Position, color: Color| FilledBlock {
            rect: BlockRect::for_cell(pos, self.block_size),
            window_width: self.window_width,
            window_height: self.window_height,
            color,
        };

        let mut blocks: Vec<FilledBlock> = snapshot
            .segments
            .iter()
            .skip(1)
            .map(|&pos| block(pos, BODY_COLOR))
            .collect();
        if let Some(&head) = snapshot.segments.first() {
            blocks.push(block(head, HEAD_COLOR));
        }
        blocks.push(block(snapshot.food, FOOD_COLOR));
        blocks
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
