use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Fixed-tick Snake on a grid, in your terminal")]
struct Cli {
    /// Playfield width in pixels
    #[arg(long, default_value = "400")]
    width: u32,

    /// Playfield height in pixels
    #[arg(long, default_value = "300")]
    height: u32,

    /// Pixels per grid cell
    #[arg(long, default_value = "20")]
    block_size: u32,

    /// Simulation ticks per second
    #[arg(long, default_value = "10")]
    tps: u32,

    /// Where to write the log; the terminal belongs to the game
    #[arg(long, default_value = "grid_snake.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            window_width: self.width,
            window_height: self.height,
            block_size: self.block_size,
            ticks_per_second: self.tps,
        }
    }
}

fn init_logging(path: &Path, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    WriteLogger::init(level, Config::default(), file).context("Failed to initialize logger")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.game_config();
    config.validate().context("Invalid game configuration")?;

    init_logging(&cli.log_file, cli.verbose)?;
    info!("starting with {:?}", config);

    let mut human_mode = HumanMode::new(config)?;
    human_mode.run().await?;

    info!("exiting");
    Ok(())
}
