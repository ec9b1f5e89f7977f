#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Shamble simulation.

mod headless;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shamble_engine::{Simulation, SimulationConfig};
use shamble_rendering::{Color, Presentation, RenderingBackend};
use shamble_rendering_macroquad::{default_manifest_path, MacroquadBackend};
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the binary.
#[derive(Debug, Parser)]
#[command(name = "shamble", about = "Turn-based survival on a generated city grid")]
struct CliArgs {
    /// TOML file with simulation settings; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for map generation and enemy behaviour.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of enemies to spawn.
    #[arg(long)]
    enemies: Option<u32>,
    /// Map width in cells.
    #[arg(long)]
    width: Option<u32>,
    /// Map height in cells.
    #[arg(long)]
    height: Option<u32>,
    /// Vertical sync mode requested from the platform.
    #[arg(long, value_enum)]
    vsync: Option<VsyncMode>,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Play a scripted run without opening a window and print a summary.
    #[arg(long)]
    headless: bool,
    /// Rounds to play in headless mode.
    #[arg(long, default_value_t = 10)]
    rounds: u64,
    /// Texture manifest to load in windowed mode.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VsyncMode {
    On,
    Off,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    if args.headless {
        let summary = headless::run(config, args.rounds)?;
        let report = toml::to_string(&summary).context("failed to format run summary")?;
        print!("{report}");
        return Ok(());
    }

    let presentation = Presentation::new(
        "Shamble",
        Color::BLACK,
        config.viewport_width,
        config.viewport_height,
    )?;
    let simulation = Simulation::new(config).context("failed to set up the simulation")?;

    let mut backend = MacroquadBackend::new().with_show_fps(args.show_fps);
    if let Some(mode) = args.vsync {
        backend = backend.with_vsync(mode == VsyncMode::On);
    }
    match args.manifest {
        Some(manifest) => backend = backend.with_manifest_path(Some(manifest)),
        None if !default_manifest_path().exists() => {
            tracing::warn!(
                path = %default_manifest_path().display(),
                "texture manifest not found, drawing flat colors"
            );
            backend = backend.with_manifest_path(None);
        }
        None => {}
    }

    backend.run(presentation, simulation)
}

fn load_config(args: &CliArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config at {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(enemies) = args.enemies {
        config.enemy_count = enemies;
    }
    if let Some(width) = args.width {
        config.map_width = width;
    }
    if let Some(height) = args.height {
        config.map_height = height;
    }

    config.validate().context("invalid simulation config")?;
    Ok(config)
}
