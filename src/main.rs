use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::game::GameConfig;
use grid_snake::modes::{HumanMode, ReplayMode, ReplayScript};
use grid_snake::persistence::FileHighScoreStore;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Tiles along each side of the grid (overrides the config file)
    #[arg(long)]
    tile_count: Option<usize>,

    /// JSON game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Log file (the terminal is taken by the game)
    #[arg(long, default_value = "grid_snake.log")]
    log_file: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Replay script (replay mode only)
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard or mouse controls
    Human,
    /// Run a scripted input sequence headless and print the outcome
    Replay,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    info!("Starting grid_snake {}", env!("CARGO_PKG_VERSION"));

    // Config file first, then command line overrides
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(tile_count) = cli.tile_count {
        config.tile_count = tile_count;
    }
    config
        .validate()
        .map_err(|err| anyhow!("Invalid game configuration: {}", err))?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            let path = cli
                .high_score_file
                .unwrap_or_else(FileHighScoreStore::default_path);
            info!("High scores kept in {:?}", path);

            let mut human_mode = HumanMode::new(config, FileHighScoreStore::new(path), cli.seed);
            human_mode.run().await?;
        }
        Mode::Replay => {
            let path = cli
                .script
                .ok_or_else(|| anyhow!("--script is required in replay mode"))?;
            let mut script = ReplayScript::load(&path)?;
            if let Some(seed) = cli.seed {
                script.seed = seed;
            }

            let summary = ReplayMode::new(config, script).run();
            println!("{}", summary.format_summary());
        }
    }

    Ok(())
}
