use gf_core::charset::Ramp;
use gf_core::color::{LUMA_SCALE, Rgb, weighted_luminance};
use gf_core::config::RunConfig;
use gf_core::error::{CoreError, CoreResult};
use gf_core::frame::{AsciiCell, AsciiGrid, Frame};
use rayon::prelude::*;

use crate::overlay::{FaceOverlay, apply_overlay};

/// Character grid size for a frame size under the run's scale policy.
///
/// `floor(width × scale_x / cell_width) × floor(height × scale_y / cell_height)`.
///
/// # Errors
/// Returns [`CoreError::Render`] if either side rounds down to zero or
/// exceeds `u16::MAX`.
///
/// # Example
/// ```
/// use gf_ascii::renderer::grid_dimensions;
/// use gf_core::config::RunConfig;
///
/// let config = RunConfig { scale_x: 0.5, scale_y: 0.5, cell_height: 2, ..RunConfig::default() };
/// assert_eq!(grid_dimensions(80, 40, &config).unwrap(), (40, 10));
/// ```
pub fn grid_dimensions(width: u32, height: u32, config: &RunConfig) -> CoreResult<(u16, u16)> {
    let side = |px: u32, scale: f32, cell: u32| -> CoreResult<u16> {
        let n = (px as f32 * scale / cell.max(1) as f32).floor();
        if n < 1.0 || n > f32::from(u16::MAX) {
            return Err(CoreError::Render(format!(
                "grille dégénérée : {px} px × {scale} / {cell} = {n}"
            )));
        }
        Ok(n as u16)
    };
    Ok((
        side(width, config.scale_x, config.cell_width)?,
        side(height, config.scale_y, config.cell_height)?,
    ))
}

/// Convertit les frames pixel en grilles ASCII à dimensions fixes pour le run.
///
/// # Example
/// ```
/// use gf_ascii::renderer::AsciiRenderer;
/// use gf_core::config::RunConfig;
/// use gf_core::frame::Frame;
///
/// let config = RunConfig::default();
/// let renderer = AsciiRenderer::new(&config, (4, 3)).unwrap();
/// let grid = renderer.render(&Frame::solid(4, 3, (255, 255, 255), 10, 0), None).unwrap();
/// assert!(grid.cells.iter().all(|c| c.ch == '@'));
/// ```
pub struct AsciiRenderer {
    ramp: Ramp,
    config: RunConfig,
    frame_size: (u32, u32),
    grid_size: (u16, u16),
}

impl AsciiRenderer {
    /// Renderer for frames of `frame_size`.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] for an unusable charset and
    /// [`CoreError::Render`] for a degenerate grid.
    pub fn new(config: &RunConfig, frame_size: (u32, u32)) -> CoreResult<Self> {
        let ramp = config.ramp()?;
        let grid_size = grid_dimensions(frame_size.0, frame_size.1, config)?;
        log::debug!(
            "Renderer: {}×{} px → {}×{} cellules, rampe de {} glyphes",
            frame_size.0,
            frame_size.1,
            grid_size.0,
            grid_size.1,
            ramp.len()
        );
        Ok(Self {
            ramp,
            config: config.clone(),
            frame_size,
            grid_size,
        })
    }

    /// Grid size shared by every frame of the run.
    #[must_use]
    pub fn grid_size(&self) -> (u16, u16) {
        self.grid_size
    }

    /// Render one frame, with an optional landmark overlay.
    ///
    /// # Errors
    /// Returns [`CoreError::Render`] if the frame size differs from the
    /// run's frame size.
    pub fn render(&self, frame: &Frame, overlay: Option<&FaceOverlay>) -> CoreResult<AsciiGrid> {
        if (frame.width(), frame.height()) != self.frame_size {
            return Err(CoreError::Render(format!(
                "frame {} en {}×{}, {}×{} attendu",
                frame.index(),
                frame.width(),
                frame.height(),
                self.frame_size.0,
                self.frame_size.1
            )));
        }

        let (gw, gh) = self.grid_size;
        let mut grid = AsciiGrid::new(gw, gh);
        let bg = if self.config.transparent {
            None
        } else {
            Some(self.config.back_color)
        };

        grid.cells
            .par_chunks_mut(usize::from(gw))
            .enumerate()
            .for_each(|(cy, row)| {
                let (y0, y1) = span(cy as u32, u32::from(gh), frame.height());
                for (cx, cell) in row.iter_mut().enumerate() {
                    let (x0, x1) = span(cx as u32, u32::from(gw), frame.width());
                    let (lum, mean) = sample(frame, x0, x1, y0, y1);

                    *cell = AsciiCell {
                        ch: self.ramp.glyph(lum, self.config.invert),
                        fg: if self.config.color_enabled {
                            mean
                        } else {
                            self.config.fill_color
                        },
                        bg,
                    };
                }
            });

        if let Some(overlay) = overlay
            && self.config.face.enabled
            && self.config.face.overlay
        {
            apply_overlay(&mut grid, overlay, self.frame_size, &self.config.face);
        }

        Ok(grid)
    }
}

/// Source pixel range `[start, end)` covered by cell `i` of `cells`.
#[inline(always)]
fn span(i: u32, cells: u32, pixels: u32) -> (u32, u32) {
    let cells = u64::from(cells.max(1));
    let start = (u64::from(i) * u64::from(pixels) / cells) as u32;
    let end = (u64::from(i + 1) * u64::from(pixels) / cells) as u32;
    let start = start.min(pixels.saturating_sub(1));
    (start, end.clamp(start + 1, pixels.max(start + 1)))
}

/// Mean luminance and mean colour over a pixel rectangle.
#[inline(always)]
fn sample(frame: &Frame, x0: u32, x1: u32, y0: u32, y1: u32) -> (f32, Rgb) {
    let mut lum = 0u64;
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for y in y0..y1 {
        for x in x0..x1 {
            let (pr, pg, pb) = frame.pixel(x, y);
            lum += u64::from(weighted_luminance(pr, pg, pb));
            r += u64::from(pr);
            g += u64::from(pg);
            b += u64::from(pb);
        }
    }
    let n = u64::from(x1 - x0) * u64::from(y1 - y0);
    let n = n.max(1);
    let mean = ((r / n) as u8, (g / n) as u8, (b / n) as u8);
    let lum = lum as f64 / (n as f64 * f64::from(LUMA_SCALE));
    (lum as f32, mean)
}
