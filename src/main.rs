use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vidsync::config::AppConfig;
use vidsync::error::Error;
use vidsync::gui::{MainWindow, WindowSettings};
use vidsync::player;
use vidsync::sync::{PlaybackEvent, SyncController};

/// Vidsync - music videos for whatever you're currently playing 🎬
#[derive(Parser, Debug)]
#[command(name = "vidsync", version, about)]
struct Args {
    /// Player backend to use: vlc or mpv (case-insensitive)
    #[arg(long, short = 'p')]
    player: Option<String>,

    /// Window width in pixels (default: 800)
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels (default: 600)
    #[arg(long)]
    height: Option<u32>,

    /// Open maximized to the full display
    #[arg(long, short = 'f')]
    fullscreen: bool,

    /// Use an alternative config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Media to load immediately instead of waiting for the first update
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    init_tracing(args.debug || config.debug);

    // Backend Selection 🎛️ (CLI wins over config)
    let selector = args.player.as_deref().unwrap_or(&config.player);
    let backend = match player::initialize_player(selector, &config) {
        Ok(backend) => backend,
        Err(e @ Error::BackendNotFound) => {
            // A bad selector is a user mistake, not a crash: say so and
            // exit cleanly.
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(e) => {
            return Err(e).context("failed to initialize the player backend");
        }
    };
    tracing::info!(backend = backend.name(), "player backend ready");

    let settings = WindowSettings {
        width: args.width.or(config.width),
        height: args.height.or(config.height),
        fullscreen: args.fullscreen || config.fullscreen,
    };
    let mut window =
        MainWindow::new(backend, &settings).context("failed to open the player window")?;

    // The now-playing collaborator runs on its own task and reports through
    // this channel; the tick callback below only ever drains results, so
    // the window stays responsive no matter how slow the network is.
    let (events_tx, mut controller) = SyncController::channel(16);
    if let Some(url) = args.url {
        events_tx
            .send(PlaybackEvent::SetSource { url, position_ms: 0 })
            .await
            .context("event channel closed before startup finished")?;
    }
    let _events_tx = events_tx;

    window
        .start_event_loop(move |backend| {
            controller.tick(backend);
        }, config.poll_interval_ms)
        .await?;

    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init();
}
