//! One conversion run: decode, animate, render, compose, write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gf_ascii::overlay::FaceOverlay;
use gf_ascii::renderer::AsciiRenderer;
use gf_core::config::{OutputMode, RunConfig};
use gf_core::error::CoreResult;
use gf_core::frame::{AsciiGrid, Frame};
use gf_core::traits::{FrameSource, LandmarkProvider};
use gf_export::composer::{Composition, compose};
use gf_export::rasterizer::Rasterizer;
use gf_face::{animation_state, warp};
use rayon::prelude::*;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames written.
    pub frames: usize,
    /// Character grid size shared by every frame.
    pub grid: (u16, u16),
    /// Destination file.
    pub output: PathBuf,
}

/// Load the glyph font when the output needs one.
///
/// Text output never touches the font file.
///
/// # Errors
/// Returns [`gf_core::CoreError::Asset`] if the font is missing or invalid.
pub fn load_rasterizer(config: &RunConfig) -> CoreResult<Option<Rasterizer>> {
    match config.output_mode {
        OutputMode::Text => Ok(None),
        OutputMode::Gif => {
            Rasterizer::from_file(&config.font_path, config.font_size, &config.charset).map(Some)
        }
    }
}

/// Warped landmarks for one frame, `None` when nothing animates.
fn face_overlay(
    frame: &Frame,
    total_frames: usize,
    provider: &dyn LandmarkProvider,
    config: &RunConfig,
) -> Option<FaceOverlay> {
    if !config.face.enabled {
        return None;
    }
    let sets = provider.detect(frame);
    if sets.is_empty() {
        log::trace!("Frame {} : aucun visage ({})", frame.index(), provider.name());
        return None;
    }
    let state = animation_state(frame.index(), total_frames, &config.face);
    let sets = sets
        .iter()
        .map(|set| warp(set, &state, &config.face))
        .collect();
    Some(FaceOverlay { sets, state })
}

/// Render every frame to a grid, in parallel, keeping input order.
///
/// # Errors
/// The first frame that fails to render aborts the whole batch.
pub fn render_frames(
    frames: &[Frame],
    renderer: &AsciiRenderer,
    provider: &dyn LandmarkProvider,
    config: &RunConfig,
) -> CoreResult<Vec<AsciiGrid>> {
    let total = frames.len();
    frames
        .par_iter()
        .map(|frame| {
            let overlay = face_overlay(frame, total, provider, config);
            renderer.render(frame, overlay.as_ref())
        })
        .collect()
}

/// Convert a whole source into its output composition.
///
/// `rasterizer` must be present in GIF mode (see [`load_rasterizer`]).
///
/// # Errors
/// Propagates validation, render and composition failures.
pub fn convert(
    source: &mut dyn FrameSource,
    provider: &dyn LandmarkProvider,
    config: &RunConfig,
    rasterizer: Option<&Rasterizer>,
) -> CoreResult<(Composition, (u16, u16))> {
    config.validate()?;
    let renderer = AsciiRenderer::new(config, source.native_size())?;

    let frames: Vec<Frame> = std::iter::from_fn(|| source.next_frame()).collect();
    log::info!(
        "{} frames à convertir en grille {}×{}",
        frames.len(),
        renderer.grid_size().0,
        renderer.grid_size().1
    );

    let grids = render_frames(&frames, &renderer, provider, config)?;
    let delays: Vec<u32> = frames.iter().map(Frame::delay_ms).collect();
    let composition = compose(&grids, &delays, config, rasterizer)?;
    Ok((composition, renderer.grid_size()))
}

/// Full run from an input path to an output file.
///
/// The font is loaded before any frame is rendered, so a bad font fails fast.
///
/// # Errors
/// Any failure aborts the run; nothing partial is written.
pub fn run(
    input: &Path,
    output: &Path,
    config: &RunConfig,
    provider: &dyn LandmarkProvider,
) -> Result<RunSummary> {
    config.validate().context("Configuration rejetée")?;
    let rasterizer = load_rasterizer(config).context("Chargement de la police")?;
    let mut source = gf_source::open_source(input)
        .with_context(|| format!("Ouverture de {}", input.display()))?;

    let (composition, grid) = convert(source.as_mut(), provider, config, rasterizer.as_ref())
        .context("Conversion")?;
    let frames = source.frame_count();
    composition
        .write_to(output)
        .with_context(|| format!("Écriture de {}", output.display()))?;

    Ok(RunSummary {
        frames,
        grid,
        output: output.to_path_buf(),
    })
}
