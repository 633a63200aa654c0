use crate::error::{CoreError, CoreResult};

/// 10 caractères, compact, bon contraste. Rampe par défaut.
pub const CHARSET_COMPACT: &str = " .:-=+*#%@";

/// 11 caractères, variante plus ronde.
pub const CHARSET_SOFT: &str = " .-*:o+8&#@";

/// 70 caractères, Paul Bourke, du plus clair au plus dense.
pub const CHARSET_STANDARD: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Ordered glyph ramp, sparse → dense.
///
/// Luminance ℓ ∈ [0, 255] maps to `floor(ℓ / 255 × (len − 1))`, clamped;
/// inversion mirrors the index to `len − 1 − index`.
///
/// # Example
/// ```
/// use gf_core::charset::Ramp;
/// let ramp = Ramp::new(" .:#@").unwrap();
/// assert_eq!(ramp.glyph(0.0, false), ' ');
/// assert_eq!(ramp.glyph(255.0, false), '@');
/// assert_eq!(ramp.glyph(255.0, true), ' ');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ramp {
    glyphs: Vec<char>,
}

impl Ramp {
    /// Build a ramp from a charset ordered lightest→densest.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] if the charset has fewer than 2 glyphs.
    pub fn new(charset: &str) -> CoreResult<Self> {
        let glyphs: Vec<char> = charset.chars().collect();
        if glyphs.len() < 2 {
            return Err(CoreError::Validation(format!(
                "charset {charset:?}: au moins 2 caractères requis"
            )));
        }
        Ok(Self { glyphs })
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: a ramp holds at least two glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Ramp index for a luminance value.
    #[inline(always)]
    #[must_use]
    pub fn index(&self, luminance: f32, invert: bool) -> usize {
        let last = self.glyphs.len() - 1;
        let raw = (luminance / 255.0 * last as f32).floor();
        // NaN lands on 0 through the saturating cast.
        let idx = (raw.max(0.0) as usize).min(last);
        if invert { last - idx } else { idx }
    }

    /// Glyph at a given index, clamped to the ramp.
    #[inline(always)]
    #[must_use]
    pub fn at(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }

    /// Glyph for a luminance value.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, luminance: f32, invert: bool) -> char {
        self.at(self.index(luminance, invert))
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self {
            glyphs: CHARSET_COMPACT.chars().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_monotonic() {
        let ramp = Ramp::new(CHARSET_COMPACT).unwrap();
        let mut prev = 0usize;
        for l in 0..=255u8 {
            let idx = ramp.index(f32::from(l), false);
            assert!(idx >= prev, "ramp non monotone à luminance {l}");
            prev = idx;
        }
        assert_eq!(prev, ramp.len() - 1);
    }

    #[test]
    fn inversion_mirrors_index() {
        let ramp = Ramp::new(CHARSET_STANDARD).unwrap();
        for l in (0..=255u8).step_by(5) {
            let l = f32::from(l);
            assert_eq!(ramp.index(l, true), ramp.len() - 1 - ramp.index(l, false));
        }
    }

    #[test]
    fn out_of_range_luminance_is_clamped() {
        let ramp = Ramp::default();
        assert_eq!(ramp.index(-12.0, false), 0);
        assert_eq!(ramp.index(400.0, false), ramp.len() - 1);
        assert_eq!(ramp.index(f32::NAN, false), 0);
    }

    #[test]
    fn single_glyph_charset_is_rejected() {
        assert!(matches!(Ramp::new("@"), Err(CoreError::Validation(_))));
    }

    #[test]
    fn compact_ramp_midpoint() {
        // floor(128 / 255 × 9) = 4 → '='
        assert_eq!(Ramp::default().glyph(128.0, false), '=');
    }
}
