//! Reassemble rendered grids into the final output sequence.

use std::path::Path;

use gf_core::config::{OutputMode, RunConfig};
use gf_core::error::{CoreError, CoreResult};
use gf_core::frame::AsciiGrid;
use rayon::prelude::*;

use crate::gif::{to_gif_frame, write_gif};
use crate::rasterizer::Rasterizer;
use crate::text::compose_text;

/// Composed output, ready to be written.
pub enum Composition {
    /// GIF frames carrying their output delays.
    Gif(Vec<image::Frame>),
    /// Whole text document.
    Text(String),
}

impl Composition {
    /// Écrit la composition sur disque.
    ///
    /// # Errors
    /// Retourne [`CoreError::Encode`] si l'écriture échoue.
    pub fn write_to(self, path: &Path) -> CoreResult<()> {
        match self {
            Self::Gif(frames) => write_gif(path, frames),
            Self::Text(text) => {
                std::fs::write(path, text)
                    .map_err(|e| CoreError::encode(path.display().to_string(), e))?;
                log::info!("Texte écrit : {}", path.display());
                Ok(())
            }
        }
    }
}

/// Display delay after the speed multiplier, never below 1 ms.
///
/// # Example
/// ```
/// use gf_export::composer::output_delay;
/// assert_eq!(output_delay(100, 2.0), 50);
/// assert_eq!(output_delay(5, 0.5), 10);
/// assert_eq!(output_delay(0, 1.0), 1);
/// assert_eq!(output_delay(1, 4.0), 1);
/// ```
#[must_use]
pub fn output_delay(delay_ms: u32, speed: f32) -> u32 {
    let scaled = (f64::from(delay_ms) / f64::from(speed)).round();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

/// GIF delay in centiseconds after the speed multiplier, never below 1 cs.
///
/// GIF timing has centisecond granularity, so the floor must hold in that
/// unit or the encoder would round short delays down to zero.
///
/// # Example
/// ```
/// use gf_export::composer::gif_delay_cs;
/// assert_eq!(gif_delay_cs(100, 1.0), 10);
/// assert_eq!(gif_delay_cs(100, 4.0), 3);
/// assert_eq!(gif_delay_cs(0, 1.0), 1);
/// assert_eq!(gif_delay_cs(20, 4.0), 1);
/// ```
#[must_use]
pub fn gif_delay_cs(delay_ms: u32, speed: f32) -> u32 {
    let scaled = (f64::from(delay_ms) / 10.0 / f64::from(speed)).round();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled.min(f64::from(u32::MAX / 10)) as u32
    } else {
        1
    }
}

/// Turn grids into the configured output format.
///
/// Order is preserved; `rasterizer` is only used (and required) in GIF mode.
///
/// # Errors
/// - [`CoreError::Render`] when `grids` and `delays_ms` differ in length,
///   when grid sizes differ, or when GIF mode has no rasterizer.
pub fn compose(
    grids: &[AsciiGrid],
    delays_ms: &[u32],
    config: &RunConfig,
    rasterizer: Option<&Rasterizer>,
) -> CoreResult<Composition> {
    if grids.len() != delays_ms.len() {
        return Err(CoreError::Render(format!(
            "{} grilles pour {} délais",
            grids.len(),
            delays_ms.len()
        )));
    }
    if let Some(first) = grids.first()
        && let Some(odd) = grids
            .iter()
            .position(|g| (g.width, g.height) != (first.width, first.height))
    {
        return Err(CoreError::Render(format!(
            "grille {odd} de taille différente de la première"
        )));
    }

    match config.output_mode {
        OutputMode::Text => {
            let delays: Vec<u32> = delays_ms
                .iter()
                .map(|&d| output_delay(d, config.speed))
                .collect();
            Ok(Composition::Text(compose_text(grids, &delays)))
        }
        OutputMode::Gif => {
            let rasterizer = rasterizer.ok_or_else(|| {
                CoreError::Render("aucun rasterizer pour la sortie GIF".to_string())
            })?;
            let delays: Vec<u32> = delays_ms
                .iter()
                .map(|&d| gif_delay_cs(d, config.speed) * 10)
                .collect();
            let frames = grids
                .par_iter()
                .zip(delays.par_iter())
                .map(|(grid, &delay)| to_gif_frame(rasterizer.rasterize(grid)?, delay))
                .collect::<CoreResult<Vec<_>>>()?;
            log::debug!("{} frames GIF composées", frames.len());
            Ok(Composition::Gif(frames))
        }
    }
}

#[cfg(test)]
mod tests {
    use gf_core::frame::AsciiCell;
    use gf_core::traits::FrameSource;
    use gf_source::gif::GifSource;

    use super::*;
    use crate::text::FRAME_DELIMITER;

    fn grid(ch: char, w: u16, h: u16) -> AsciiGrid {
        let mut g = AsciiGrid::new(w, h);
        for c in &mut g.cells {
            *c = AsciiCell {
                ch,
                fg: (255, 255, 255),
                bg: Some((0, 0, 0)),
            };
        }
        g
    }

    fn text_config(speed: f32) -> RunConfig {
        RunConfig {
            output_mode: OutputMode::Text,
            speed,
            ..RunConfig::default()
        }
    }

    #[test]
    fn three_frames_give_three_same_shaped_blocks() {
        let grids = [grid('a', 5, 3), grid('b', 5, 3), grid('c', 5, 3)];
        let Composition::Text(text) =
            compose(&grids, &[100, 100, 100], &text_config(1.0), None).unwrap()
        else {
            panic!("text mode must produce text");
        };

        assert_eq!(text.matches(FRAME_DELIMITER).count(), 3);
        let blocks: Vec<&str> = text.split("Frame ").filter(|b| !b.is_empty()).collect();
        assert_eq!(blocks.len(), 3);
        for (i, block) in blocks.iter().enumerate() {
            let rows: Vec<&str> = block
                .lines()
                .skip(2)
                .filter(|l| !l.is_empty())
                .collect();
            assert_eq!(rows.len(), 3);
            assert!(rows.iter().all(|r| r.chars().count() == 5));
            assert!(block.starts_with(&format!("{} (Delay: 100ms):", i + 1)));
        }
        let order: Vec<char> = blocks
            .iter()
            .map(|b| b.lines().nth(2).and_then(|l| l.chars().next()).unwrap())
            .collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
    }

    #[test]
    fn text_headers_use_scaled_delays() {
        let grids = [grid('x', 1, 1), grid('x', 1, 1)];
        let Composition::Text(text) =
            compose(&grids, &[100, 30], &text_config(2.0), None).unwrap()
        else {
            panic!("text mode must produce text");
        };
        assert!(text.contains("Frame 1 (Delay: 50ms):"));
        assert!(text.contains("Frame 2 (Delay: 15ms):"));
        assert!(!text.contains("Frame 0 "));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = compose(&[grid('x', 1, 1)], &[], &text_config(1.0), None).err();
        assert!(matches!(err, Some(CoreError::Render(_))));
    }

    #[test]
    fn mixed_grid_sizes_are_rejected() {
        let grids = [grid('x', 2, 1), grid('x', 1, 2)];
        assert!(compose(&grids, &[10, 10], &text_config(1.0), None).is_err());
    }

    #[test]
    fn gif_mode_needs_a_rasterizer() {
        let err = compose(&[grid('x', 1, 1)], &[10], &RunConfig::default(), None).err();
        assert!(matches!(err, Some(CoreError::Render(_))));
    }

    #[test]
    fn gif_frames_have_cell_sized_pixels_and_delays() {
        let rasterizer = Rasterizer::with_glyphs(3, 4, &[('#', vec![255; 12])]);
        let config = RunConfig {
            speed: 4.0,
            ..RunConfig::default()
        };
        let grids = [grid('#', 5, 2), grid(' ', 5, 2)];
        let Composition::Gif(frames) =
            compose(&grids, &[100, 2], &config, Some(&rasterizer)).unwrap()
        else {
            panic!("gif mode must produce frames");
        };
        assert_eq!(frames.len(), 2);
        for frame in &frames {
            assert_eq!(frame.buffer().dimensions(), (15, 8));
        }
        let delays: Vec<(u32, u32)> = frames.iter().map(|f| f.delay().numer_denom_ms()).collect();
        // 100 ms / 4 = 2.5 cs → 3 cs; 2 ms / 4 floors at 1 cs
        assert_eq!(delays, vec![(30, 1), (10, 1)]);
        assert_eq!(frames[0].buffer().get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(frames[1].buffer().get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn short_gif_delays_survive_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fast.gif");
        let rasterizer = Rasterizer::with_glyphs(2, 2, &[('#', vec![255; 4])]);
        let config = RunConfig {
            speed: 4.0,
            ..RunConfig::default()
        };
        let grids = [grid('#', 3, 2), grid(' ', 3, 2), grid('#', 3, 2)];
        compose(&grids, &[0, 20, 30], &config, Some(&rasterizer))
            .unwrap()
            .write_to(&path)
            .unwrap();

        let mut src = GifSource::open(&path).unwrap();
        assert_eq!(src.frame_count(), 3);
        let delays: Vec<u32> = std::iter::from_fn(|| src.next_frame())
            .map(|f| f.delay_ms())
            .collect();
        assert!(delays.iter().all(|&d| d >= 10), "{delays:?}");
    }

    #[test]
    fn text_composition_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let composition = compose(&[grid('@', 2, 2)], &[70], &text_config(1.0), None).unwrap();
        composition.write_to(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Frame 1 (Delay: 70ms):\n"));
        assert!(text.contains("@@\n@@\n"));
    }
}
