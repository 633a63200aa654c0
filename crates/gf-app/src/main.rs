use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gf_core::config::{RunConfig, load_config};
use gf_core::traits::LandmarkProvider;
use gf_face::{LandmarkScript, NoFaces};

pub mod cli;
pub mod pipeline;

/// Config lue quand `--config` est absent.
const DEFAULT_CONFIG: &str = "config/default.toml";

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config)?;
    let config = config.validated().context("Configuration rejetée")?;

    // 4. Source de points faciaux
    let provider: Box<dyn LandmarkProvider> = match cli.landmarks {
        Some(ref path) => Box::new(
            LandmarkScript::load(path)
                .with_context(|| format!("Lecture des landmarks {}", path.display()))?,
        ),
        None => Box::new(NoFaces),
    };
    if config.face.enabled {
        log::info!("Animation faciale active (détecteur : {})", provider.name());
    }

    // 5. Conversion
    let summary = pipeline::run(&cli.input, &cli.out, &config, provider.as_ref())
        .inspect_err(|e| log::error!("{e:#}"))?;
    log::info!(
        "{} frames ({}×{} cellules) écrites dans {}",
        summary.frames,
        summary.grid.0,
        summary.grid.1,
        summary.output.display()
    );
    Ok(())
}

/// `--config` must exist when given; otherwise the default file is optional.
fn resolve_config(explicit: Option<&Path>) -> Result<RunConfig> {
    if let Some(path) = explicit {
        return load_config(path).with_context(|| format!("Config {}", path.display()));
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG);
    if fallback.exists() {
        load_config(&fallback).with_context(|| format!("Config {}", fallback.display()))
    } else {
        log::debug!("Config introuvable : {DEFAULT_CONFIG}. Utilisation des défauts.");
        Ok(RunConfig::default())
    }
}
