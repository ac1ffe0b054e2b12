//! Vignette - a scripted scene runtime
//!
//! Loads a zone, runs its triggers and sequences headlessly, and exits once
//! every script has finished.

mod app;
mod settings;
mod states;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vignette_script::Zone;

use crate::app::App;
use crate::settings::{LogSettings, Settings};

fn init_logging(settings: &LogSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;
    Ok(())
}

fn main() -> Result<()> {
    let loaded = Settings::try_load();
    let settings = match &loaded {
        Ok(Some((settings, _))) => settings.clone(),
        _ => Settings::default(),
    };
    init_logging(&settings.log)?;

    match loaded {
        Ok(Some((_, path))) => info!("Loaded settings from {:?}", path),
        Ok(None) => info!("No settings file found, using defaults"),
        Err(e) => warn!("{:#}, using defaults", e),
    }

    info!("Starting Vignette...");

    let zone_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.run.zone.clone());

    let mut app = App::new(&settings);

    let zone = match Zone::load(&zone_path)
        .with_context(|| format!("Failed to load zone {:?}", zone_path))
    {
        Ok(zone) => zone,
        Err(e) => {
            app.shutdown();
            return Err(e);
        }
    };

    app.start(zone);
    let frames = app.run();
    info!("Ran {} frames", frames);
    app.shutdown();

    Ok(())
}
