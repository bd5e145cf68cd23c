mod app;
mod camera;
mod components;
mod config;
mod engine;
mod error;
mod lighting;
mod renderer;
mod scene;
mod systems;
mod ui;

use std::path::PathBuf;

use app::LightingApp;
use clap::Parser;
use config::DemoConfig;
use engine::window::GameWindow;
use error::RenderError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lumen", about = "Forward lighting demo with point-light shadows")]
struct Args {
    /// RON config file; missing file means defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Start with the shapes orbiting
    #[arg(long)]
    rotate: bool,
    /// Print the effective config as RON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), RenderError> {
    let mut config = DemoConfig::load_or_default(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.window.width = width.max(1);
    }
    if let Some(height) = args.height {
        config.window.height = height.max(1);
    }
    if args.rotate {
        config.rotate_shapes = true;
    }

    if args.dump_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let sdl = sdl2::init().map_err(RenderError::Init)?;
    let mut window = GameWindow::new(&sdl, &config.window)?;
    let mut app = LightingApp::new(&config, &window)?;
    app.run(&sdl, &mut window)
}
