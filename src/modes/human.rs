use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{GameConfig, Session};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

type Tui = Terminal<CrosstermBackend<Stderr>>;

pub struct HumanMode {
    config: GameConfig,
    session: Session,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        Ok(Self {
            session: Session::new(&config)?,
            renderer: Renderer::new(&config),
            input_handler: InputHandler::new(),
            should_quit: false,
            config,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = open_terminal()?;
        let result = self.run_game_loop(&mut terminal).await;

        // A loop error wins over a restore error; the latter still gets logged
        match (result, restore_terminal(&mut terminal)) {
            (Err(err), Err(restore_err)) => {
                error!("terminal restore failed: {restore_err:#}");
                Err(err)
            }
            (result, restore) => result.and(restore),
        }
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        // One tick = one move and one redraw
        let mut tick_timer = interval(self.config.tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let grid = self.session.grid();
        info!(
            "session started on a {}x{} grid at {} ticks/s",
            grid.width, grid.height, self.config.ticks_per_second
        );

        loop {
            tokio::select! {
                // Input is only buffered here; the tick applies it
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.session.tick();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.session.snapshot());
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            "session closed after {} ticks and {} resets",
            self.session.ticks(),
            self.session.resets()
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => self.session.request_heading(direction),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }
}

/// Raw mode plus alternate screen on stderr. Raw mode is undone again if a
/// later step fails.
fn open_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let terminal = enter_alternate_screen();
    if terminal.is_err() {
        let _ = disable_raw_mode();
    }
    terminal
}

fn enter_alternate_screen() -> Result<Tui> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stderr)).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Every step is attempted; the first failure is returned.
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen");
    let cursor = terminal.show_cursor().context("Failed to show cursor");
    raw.and(screen).and(cursor)
}
