// src/main.rs
//! Earthquake Map - USGS earthquakes and tectonic plates on an egui map

use clap::{Parser, Subcommand};
use log::{error, warn};
use quake_map::{
    display::{self, terminal::TerminalDisplay},
    export::{ExportFormat, MarkerExporter},
    MapConfig, MapSession, Result,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quake-map", version, about = "Earthquake and tectonic plate map")]
struct Cli {
    /// Earthquake GeoJSON feed URL
    #[arg(long, global = true)]
    quake_url: Option<String>,

    /// Tectonic plate boundary GeoJSON URL
    #[arg(long, global = true)]
    plates_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the map window (default)
    Map,
    /// Print the depth legend and the strongest events
    Summary {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Write the styled markers to a file
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::GeoJson)]
        format: ExportFormat,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = MapConfig::load().unwrap_or_else(|e| {
        warn!("Could not load config, using defaults: {}", e);
        MapConfig::default()
    });
    config.update_feeds(cli.quake_url, cli.plates_url);

    let runtime = tokio::runtime::Runtime::new()?;
    let session = MapSession::new(config, runtime.handle().clone())?;

    match cli.command.unwrap_or(Command::Map) {
        Command::Map => {
            if display::should_use_gui() {
                run_map(&session)
            } else {
                warn!("No graphical session available, printing a summary instead");
                summary(&runtime, &session, 20)
            }
        }
        Command::Summary { limit } => summary(&runtime, &session, limit),
        Command::Export { format, output } => {
            let markers = runtime.block_on(session.load_markers())?;
            MarkerExporter::new(&markers).export_to_file(&output, format)?;
            println!(
                "Wrote {} markers as {} to {}",
                markers.len(),
                format.display_name(),
                output.display()
            );
            Ok(())
        }
    }
}

fn summary(runtime: &tokio::runtime::Runtime, session: &MapSession, limit: usize) -> Result<()> {
    let markers = runtime.block_on(session.load_markers())?;
    TerminalDisplay::new().render(&mut std::io::stdout(), &markers, limit)
}

#[cfg(feature = "gui")]
fn run_map(session: &MapSession) -> Result<()> {
    use log::info;
    use quake_map::{map::TileCache, QuakeMapApp};

    let app = match session.build() {
        Ok(composition) => {
            let tile_cache = TileCache::new(session.config().tile_cache_dir()?)?;
            info!("Opening map window");
            QuakeMapApp::new(composition, tile_cache)
        }
        Err(e) => {
            error!("Failed to load earthquakes: {}", e);
            QuakeMapApp::failed(e.to_string())
        }
    };

    display::gui::run(app)
}

#[cfg(not(feature = "gui"))]
fn run_map(_session: &MapSession) -> Result<()> {
    Err(quake_map::QuakeMapError::Other(
        "the map window requires the 'gui' feature (cargo build --features gui)".to_string(),
    ))
}
