use ab_glyph::{Font, FontRef, PxScale, point};
use gf_core::error::{CoreError, CoreResult};
use gf_core::frame::{AsciiCell, AsciiGrid, FrameBuffer};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Convertit une AsciiGrid en pixels RGBA.
///
/// Les glyphes sont rasterisés une seule fois à la construction ; le rendu
/// d'une frame ne fait que du mélange alpha depuis ce cache.
pub struct Rasterizer {
    char_width: u32,
    char_height: u32,
    /// Maps a char to its 1D alpha buffer (size = char_width * char_height)
    glyph_cache: HashMap<char, Vec<u8>>,
    /// Fallback for chars the font lacks: the cell is background only.
    empty_glyph: Vec<u8>,
}

impl Rasterizer {
    /// Charge une police depuis le disque.
    ///
    /// `charset` lists extra glyphs (the ramp) cached on top of printable ASCII.
    ///
    /// # Errors
    /// Retourne [`CoreError::Asset`] si le fichier est absent ou n'est pas une
    /// police lisible.
    pub fn from_file(path: &Path, scale_px: f32, charset: &str) -> CoreResult<Self> {
        let label = path.display().to_string();
        let data = std::fs::read(path).map_err(|e| CoreError::asset(&label, e))?;
        let rasterizer = Self::build(&data, scale_px, charset, &label)?;
        log::info!(
            "Police chargée : {label} ({} px, cellule {}×{})",
            scale_px,
            rasterizer.char_width,
            rasterizer.char_height
        );
        Ok(rasterizer)
    }

    fn build(font_data: &[u8], scale_px: f32, charset: &str, label: &str) -> CoreResult<Self> {
        if !(scale_px.is_finite() && scale_px > 0.0) {
            return Err(CoreError::asset(label, format!("taille {scale_px} invalide")));
        }
        let font = FontRef::try_from_slice(font_data).map_err(|e| CoreError::asset(label, e))?;
        let scale = PxScale::from(scale_px);

        let v_advance = font.ascent_unscaled() - font.descent_unscaled() + font.line_gap_unscaled();
        let height = (v_advance * scale.y / font.height_unscaled()).ceil() as u32;

        let m_glyph = font.glyph_id('M');
        let h_advance = font.h_advance_unscaled(m_glyph);
        let width = (h_advance * scale.x / font.height_unscaled()).ceil() as u32;

        let char_width = width.max(1);
        let char_height = height.max(1);

        let mut rasterizer = Self {
            char_width,
            char_height,
            glyph_cache: HashMap::new(),
            empty_glyph: vec![0u8; (char_width * char_height) as usize],
        };

        for ch in (32..=126u32).filter_map(char::from_u32).chain(charset.chars()) {
            if !rasterizer.glyph_cache.contains_key(&ch) {
                rasterizer.cache_char(&font, scale, ch);
            }
        }
        log::debug!("{} glyphes en cache", rasterizer.glyph_cache.len());
        Ok(rasterizer)
    }

    fn cache_char(&mut self, font: &FontRef, scale: PxScale, ch: char) {
        // glyph_id 0 = .notdef; skip so missing chars render as empty cells
        let gid = font.glyph_id(ch);
        if gid.0 == 0 {
            log::warn!("Glyphe absent de la police : {ch:?}");
            return;
        }

        let mut buffer = vec![0u8; (self.char_width * self.char_height) as usize];

        let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();
        let glyph = gid.with_scale_and_position(scale, point(0.0, ascent_px));

        if let Some(outline) = font.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            #[allow(clippy::cast_possible_wrap)]
            outline.draw(|x, y, v| {
                let px = (x as i32 + bounds.min.x as i32).max(0) as u32;
                let py = (y as i32 + bounds.min.y as i32).max(0) as u32;
                if px < self.char_width && py < self.char_height {
                    let idx = (py * self.char_width + px) as usize;
                    buffer[idx] = buffer[idx].max((v * 255.0).round() as u8);
                }
            });
        }
        self.glyph_cache.insert(ch, buffer);
    }

    /// Calcule les dimensions prévues du FrameBuffer en fonction d'une taille de grille.
    #[must_use]
    pub fn target_dimensions(&self, grid_w: u16, grid_h: u16) -> (u32, u32) {
        (
            u32::from(grid_w) * self.char_width,
            u32::from(grid_h) * self.char_height,
        )
    }

    /// Rendu de l'AsciiGrid sur le FrameBuffer. Parallélisé par bande de cellules.
    ///
    /// Cells with a background are opaque; cells without one keep the glyph
    /// coverage as alpha.
    ///
    /// # Errors
    /// Retourne [`CoreError::Render`] si `fb` n'a pas la taille attendue.
    pub fn render(&self, grid: &AsciiGrid, fb: &mut FrameBuffer) -> CoreResult<()> {
        let (expected_w, expected_h) = self.target_dimensions(grid.width, grid.height);
        if fb.width != expected_w || fb.height != expected_h {
            return Err(CoreError::Render(format!(
                "framebuffer {}×{}, {expected_w}×{expected_h} attendu",
                fb.width, fb.height
            )));
        }
        if grid.cells.is_empty() {
            return Ok(());
        }

        let stride = (expected_w * 4) as usize;
        let band_size = stride * self.char_height as usize;

        fb.data
            .par_chunks_exact_mut(band_size)
            .enumerate()
            .for_each(|(gy, band)| {
                for gx in 0..grid.width {
                    let cell = grid.get(gx, gy as u16);
                    let alpha = self.glyph_cache.get(&cell.ch).unwrap_or(&self.empty_glyph);
                    let cx_start = usize::from(gx) * self.char_width as usize;

                    for cy in 0..(self.char_height as usize) {
                        let fb_y_offset = cy * stride;
                        for cx in 0..(self.char_width as usize) {
                            let a = alpha[cy * self.char_width as usize + cx];
                            let px_idx = fb_y_offset + (cx_start + cx) * 4;
                            band[px_idx..px_idx + 4].copy_from_slice(&blend(cell, a));
                        }
                    }
                }
            });
        Ok(())
    }

    /// Allocate a framebuffer of the right size and render `grid` into it.
    ///
    /// # Errors
    /// See [`Rasterizer::render`].
    pub fn rasterize(&self, grid: &AsciiGrid) -> CoreResult<FrameBuffer> {
        let (w, h) = self.target_dimensions(grid.width, grid.height);
        let mut fb = FrameBuffer::new(w, h);
        self.render(grid, &mut fb)?;
        Ok(fb)
    }

    /// Rasterizer over a hand-made glyph table.
    #[cfg(test)]
    pub(crate) fn with_glyphs(char_width: u32, char_height: u32, glyphs: &[(char, Vec<u8>)]) -> Self {
        Self {
            char_width,
            char_height,
            glyph_cache: glyphs.iter().cloned().collect(),
            empty_glyph: vec![0u8; (char_width * char_height) as usize],
        }
    }
}

#[inline]
fn blend(cell: &AsciiCell, alpha: u8) -> [u8; 4] {
    let Some(bg) = cell.bg else {
        return [cell.fg.0, cell.fg.1, cell.fg.2, alpha];
    };
    let a = f32::from(alpha) / 255.0;
    let mix = |f: u8, b: u8| (f32::from(f) * a + f32::from(b) * (1.0 - a)).round() as u8;
    [mix(cell.fg.0, bg.0), mix(cell.fg.1, bg.1), mix(cell.fg.2, bg.2), 255]
}
