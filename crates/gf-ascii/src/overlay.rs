//! Render-time glyph overrides for animated facial regions.
//!
//! The source pixels are never touched: cells inside a warped region's
//! bounding box simply take a region glyph in place of the ramp glyph.

use gf_core::config::FaceConfig;
use gf_core::face::{AnimationState, Bounds, LandmarkSet, Region};
use gf_core::frame::AsciiGrid;

/// Glyph drawn over eyes once the blink passes the threshold.
pub const CLOSED_EYE_GLYPH: char = '-';
/// Glyph drawn over a smiling mouth.
pub const SMILE_GLYPH: char = '~';
/// Glyph drawn over raised eyebrows.
pub const RAISED_BROW_GLYPH: char = '^';

/// Warped landmarks of one frame plus the state that produced them.
#[derive(Clone, Debug, Default)]
pub struct FaceOverlay {
    /// Displaced landmark sets, one per face.
    pub sets: Vec<LandmarkSet>,
    /// Intensities of the frame.
    pub state: AnimationState,
}

/// Override glyph for a region in a given state, if any.
///
/// # Example
/// ```
/// use gf_ascii::overlay::region_glyph;
/// use gf_core::config::FaceConfig;
/// use gf_core::face::{AnimationState, Region};
///
/// let face = FaceConfig::default();
/// let blink = AnimationState { blink: 0.9, ..AnimationState::REST };
/// assert_eq!(region_glyph(Region::LeftEye, &blink, &face), Some('-'));
/// assert_eq!(region_glyph(Region::Mouth, &blink, &face), None);
/// ```
#[must_use]
pub fn region_glyph(region: Region, state: &AnimationState, face: &FaceConfig) -> Option<char> {
    match region {
        Region::LeftEye | Region::RightEye => {
            (state.blink > 0.0 && state.blink >= face.blink_glyph_threshold)
                .then_some(CLOSED_EYE_GLYPH)
        }
        Region::Mouth => (state.smile > 0.0).then_some(SMILE_GLYPH),
        Region::LeftEyebrow | Region::RightEyebrow => {
            (state.eyebrow_raise > 0.0).then_some(RAISED_BROW_GLYPH)
        }
    }
}

/// Stamp override glyphs into `grid`.
///
/// `frame_size` is the source size the landmark coordinates refer to.
pub fn apply_overlay(
    grid: &mut AsciiGrid,
    overlay: &FaceOverlay,
    frame_size: (u32, u32),
    face: &FaceConfig,
) {
    if overlay.state.is_rest() {
        return;
    }
    for set in &overlay.sets {
        for region in Region::ALL {
            let Some(glyph) = region_glyph(region, &overlay.state, face) else {
                continue;
            };
            let Some(bounds) = set.bounds(region) else {
                continue;
            };
            let Some((x0, y0, x1, y1)) = cell_rect(bounds, frame_size, grid) else {
                log::trace!("Région {region:?} hors cadre, ignorée");
                continue;
            };
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let mut cell = *grid.get(x, y);
                    cell.ch = glyph;
                    grid.set(x, y, cell);
                }
            }
        }
    }
}

/// Inclusive cell rectangle covering `bounds`, `None` when fully off-frame.
fn cell_rect(
    bounds: Bounds,
    (fw, fh): (u32, u32),
    grid: &AsciiGrid,
) -> Option<(u16, u16, u16, u16)> {
    let (fw, fh) = (fw as f32, fh as f32);
    if bounds.max.x < 0.0 || bounds.max.y < 0.0 || bounds.min.x >= fw || bounds.min.y >= fh {
        return None;
    }
    let to_cell = |v: f32, frame: f32, cells: u16| -> u16 {
        let c = (v.max(0.0) * f32::from(cells) / frame).floor();
        (c as u16).min(cells.saturating_sub(1))
    };
    Some((
        to_cell(bounds.min.x, fw, grid.width),
        to_cell(bounds.min.y, fh, grid.height),
        to_cell(bounds.max.x, fw, grid.width),
        to_cell(bounds.max.y, fh, grid.height),
    ))
}

#[cfg(test)]
mod tests {
    use gf_core::face::Point;
    use gf_core::frame::AsciiCell;

    use super::*;

    fn grid(w: u16, h: u16) -> AsciiGrid {
        let mut g = AsciiGrid::new(w, h);
        for c in &mut g.cells {
            *c = AsciiCell {
                ch: '.',
                fg: (1, 2, 3),
                bg: Some((4, 5, 6)),
            };
        }
        g
    }

    fn mouth() -> LandmarkSet {
        LandmarkSet::new().with_region(
            Region::Mouth,
            vec![Point::new(20.0, 40.0), Point::new(39.0, 44.0)],
        )
    }

    #[test]
    fn smile_fills_mouth_box_in_cell_space() {
        // 80×60 frame on a 40×30 grid: 2 px per cell
        let mut g = grid(40, 30);
        let overlay = FaceOverlay {
            sets: vec![mouth()],
            state: AnimationState {
                smile: 0.4,
                ..AnimationState::REST
            },
        };
        apply_overlay(&mut g, &overlay, (80, 60), &FaceConfig::default());
        for y in 0..30u16 {
            for x in 0..40u16 {
                let inside = (10..=19).contains(&x) && (20..=22).contains(&y);
                let cell = g.get(x, y);
                assert_eq!(cell.ch == SMILE_GLYPH, inside, "({x},{y})");
                assert_eq!(cell.fg, (1, 2, 3));
                assert_eq!(cell.bg, Some((4, 5, 6)));
            }
        }
    }

    #[test]
    fn weak_blink_keeps_eyes_open() {
        let face = FaceConfig::default();
        let weak = AnimationState {
            blink: face.blink_glyph_threshold / 2.0,
            ..AnimationState::REST
        };
        assert_eq!(region_glyph(Region::RightEye, &weak, &face), None);
    }

    #[test]
    fn rest_state_changes_nothing() {
        let mut g = grid(10, 10);
        let before = g.clone();
        let overlay = FaceOverlay {
            sets: vec![mouth()],
            state: AnimationState::REST,
        };
        apply_overlay(&mut g, &overlay, (10, 10), &FaceConfig::default());
        assert_eq!(g, before);
    }

    #[test]
    fn off_frame_region_is_skipped_and_edges_clamped() {
        let mut g = grid(4, 4);
        let set = LandmarkSet::new()
            .with_region(Region::LeftEyebrow, vec![Point::new(-10.0, -10.0), Point::new(-1.0, -2.0)])
            .with_region(Region::RightEyebrow, vec![Point::new(3.0, -5.0), Point::new(50.0, 0.5)]);
        let overlay = FaceOverlay {
            sets: vec![set],
            state: AnimationState {
                eyebrow_raise: 1.0,
                ..AnimationState::REST
            },
        };
        apply_overlay(&mut g, &overlay, (4, 4), &FaceConfig::default());
        let marked: Vec<(u16, u16)> = (0..4u16)
            .flat_map(|y| (0..4u16).map(move |x| (x, y)))
            .filter(|&(x, y)| g.get(x, y).ch == RAISED_BROW_GLYPH)
            .collect();
        assert_eq!(marked, vec![(3, 0)]);
    }
}
