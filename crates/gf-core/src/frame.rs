use crate::color::{Rgb, luminance};
use crate::error::{CoreError, CoreResult};

/// Decoded input frame. Immutable once built.
///
/// Stocke les pixels en RGB row-major, 3 bytes par pixel.
///
/// # Example
/// ```
/// use gf_core::frame::Frame;
/// let frame = Frame::solid(4, 2, (10, 20, 30), 100, 0);
/// assert_eq!(frame.pixel(3, 1), (10, 20, 30));
/// assert_eq!(frame.delay_ms(), 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    delay_ms: u32,
    index: usize,
}

impl Frame {
    /// Wrap an RGB buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::Render`] if the buffer length does not match
    /// `width × height × 3` or a dimension is zero.
    pub fn from_rgb(
        data: Vec<u8>,
        width: u32,
        height: u32,
        delay_ms: u32,
        index: usize,
    ) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::Render(format!(
                "frame {index}: dimensions invalides {width}×{height}"
            )));
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(CoreError::Render(format!(
                "frame {index}: {} octets, {expected} attendus",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            delay_ms,
            index,
        })
    }

    /// Single-colour frame. Handy for tests and placeholders.
    #[must_use]
    pub fn solid(width: u32, height: u32, color: Rgb, delay_ms: u32, index: usize) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&[color.0, color.1, color.2]);
        }
        Self {
            data,
            width,
            height,
            delay_ms,
            index,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Original display duration in milliseconds.
    #[must_use]
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// 0-based position in the sequence.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Accès au pixel (x, y) → (r, g, b).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        match self.data.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }

    /// Luminance perceptuelle BT.709 du pixel (x, y), dans [0, 255].
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> f32 {
        let (r, g, b) = self.pixel(x, y);
        luminance(r, g, b)
    }
}

/// Buffer RGBA réutilisable, cible du rasterizer.
///
/// # Example
/// ```
/// use gf_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer pré-alloué aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        match self.data.get(idx..idx + 4) {
            Some(px) => (px[0], px[1], px[2], px[3]),
            None => (0, 0, 0, 0),
        }
    }
}

/// Single cell in the ASCII grid.
///
/// # Example
/// ```
/// use gf_core::frame::AsciiCell;
/// let cell = AsciiCell::default();
/// assert_eq!(cell.ch, ' ');
/// assert_eq!(cell.bg, Some((0, 0, 0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur foreground (RGB).
    pub fg: Rgb,
    /// Couleur background. `None` = transparent, pas de remplissage.
    pub bg: Option<Rgb>,
}

impl Default for AsciiCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: (255, 255, 255),
            bg: Some((0, 0, 0)),
        }
    }
}

/// Grille de sortie ASCII, row-major.
///
/// # Example
/// ```
/// use gf_core::frame::{AsciiGrid, AsciiCell};
/// let mut grid = AsciiGrid::new(80, 24);
/// grid.set(0, 0, AsciiCell { ch: '@', fg: (255, 0, 0), bg: None });
/// assert_eq!(grid.get(0, 0).ch, '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<AsciiCell>,
    /// Width in characters.
    pub width: u16,
    /// Height in characters.
    pub height: u16,
}

impl AsciiGrid {
    /// Crée une grille pré-allouée.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![AsciiCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u16, y: u16, cell: AsciiCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> &AsciiCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Iterate rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[AsciiCell]> {
        self.cells.chunks(usize::from(self.width).max(1))
    }

    /// Row `y` rendered as a plain string, colour dropped.
    ///
    /// # Example
    /// ```
    /// use gf_core::frame::{AsciiGrid, AsciiCell};
    /// let mut grid = AsciiGrid::new(3, 1);
    /// grid.set(1, 0, AsciiCell { ch: '#', ..AsciiCell::default() });
    /// assert_eq!(grid.row_string(0), " # ");
    /// ```
    #[must_use]
    pub fn row_string(&self, y: u16) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_rejects_short_buffer() {
        let err = Frame::from_rgb(vec![0; 5], 2, 1, 10, 0).unwrap_err();
        assert!(matches!(err, CoreError::Render(_)));
    }

    #[test]
    fn from_rgb_rejects_zero_dimension() {
        assert!(Frame::from_rgb(Vec::new(), 0, 4, 10, 0).is_err());
    }

    #[test]
    fn luminance_weights_green_most() {
        let mut data = Vec::new();
        data.extend_from_slice(&[255, 0, 0, 0, 255, 0, 0, 0, 255]);
        let frame = Frame::from_rgb(data, 3, 1, 0, 0).unwrap();
        let (r, g, b) = (frame.luminance(0, 0), frame.luminance(1, 0), frame.luminance(2, 0));
        assert!(g > r && r > b, "r={r} g={g} b={b}");
    }

    #[test]
    fn grid_rows_cover_every_cell() {
        let grid = AsciiGrid::new(4, 3);
        assert_eq!(grid.rows().count(), 3);
        assert!(grid.rows().all(|row| row.len() == 4));
    }
}
