use crate::error::{CoreError, CoreResult};

/// RGB triple, one byte per channel.
pub type Rgb = (u8, u8, u8);

/// Luminance perceptuelle BT.709 dans [0.0, 255.0].
///
/// # Example
/// ```
/// use gf_core::color::luminance;
/// assert_eq!(luminance(255, 255, 255), 255.0);
/// assert_eq!(luminance(0, 0, 0), 0.0);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    weighted_luminance(r, g, b) as f32 / LUMA_SCALE as f32
}

/// Denominator of [`weighted_luminance`].
pub const LUMA_SCALE: u32 = 10_000;

/// Luminance BT.709 en entiers, multipliée par [`LUMA_SCALE`].
///
/// Integer weights sum to exactly `LUMA_SCALE`, so white maps to 255.0
/// without rounding drift when averaged.
#[inline(always)]
#[must_use]
pub fn weighted_luminance(r: u8, g: u8, b: u8) -> u32 {
    u32::from(r) * 2126 + u32::from(g) * 7152 + u32::from(b) * 722
}

/// Build an [`Rgb`] from loosely typed components (CLI, TOML).
///
/// # Errors
/// Returns [`CoreError::Validation`] unless exactly three components in
/// `0..=255` are given.
///
/// # Example
/// ```
/// use gf_core::color::rgb_from_components;
/// assert_eq!(rgb_from_components("fill", &[255, 128, 0]).unwrap(), (255, 128, 0));
/// assert!(rgb_from_components("fill", &[256, 0, 0]).is_err());
/// ```
pub fn rgb_from_components(name: &str, components: &[i64]) -> CoreResult<Rgb> {
    let [r, g, b] = components else {
        return Err(CoreError::Validation(format!(
            "{name}: 3 composantes attendues, {} reçues",
            components.len()
        )));
    };
    let channel = |v: i64| {
        u8::try_from(v).map_err(|_| {
            CoreError::Validation(format!("{name}: composante {v} hors de [0, 255]"))
        })
    };
    Ok((channel(*r)?, channel(*g)?, channel(*b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_component_is_rejected() {
        assert!(matches!(
            rgb_from_components("back", &[0, -1, 0]),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(rgb_from_components("back", &[0, 0]).is_err());
    }

    #[test]
    fn luminance_is_monotonic_in_gray() {
        let mut prev = -1.0;
        for v in 0..=255u8 {
            let l = luminance(v, v, v);
            assert!(l >= prev);
            prev = l;
        }
    }
}
