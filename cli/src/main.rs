use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use cli::bootstrap::state::AppState;
use cli::config_loader;
use cli::observability;
use cli::output;

/// Derive per-zoom color palettes from a mosaic of sampled map tiles.
#[derive(Parser)]
#[command(name = "palettegen", version, about)]
struct Args {
    /// Path to the JSON run configuration.
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match config_loader::load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            // logging is not yet configured on this path
            let mut diag = io::stderr();
            writeln!(diag, "Usage: palettegen <config.json>")?;
            writeln!(diag, "{e}")?;
            return Err(e.into());
        }
    };

    observability::tracing::setup_logging(&config)?;

    info!("Starting palette generation");
    info!(
        "Configuration loaded: {} zoom levels, {} colors max per table",
        config.zooms.len(),
        config
            .zooms
            .values()
            .map(|spec| spec.colors)
            .max()
            .unwrap_or(0)
    );

    let state = AppState::new(config)?;

    let palettes = match state.palette_service.generate_palettes().await {
        Ok(palettes) => palettes,
        Err(e) => {
            error!("Palette generation failed: {e}");
            return Err(e.into());
        }
    };

    info!("All {} zoom levels complete", palettes.len());
    output::write_palettes(&mut io::stdout().lock(), &palettes)?;

    Ok(())
}
