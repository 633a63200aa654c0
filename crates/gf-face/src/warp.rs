//! Landmark displacement driven by the expression intensities.
//!
//! Every rule interpolates linearly between the original point and a target
//! point, so an intensity of zero leaves the set untouched.

use gf_core::config::FaceConfig;
use gf_core::face::{AnimationState, LandmarkSet, Point, Region};

use crate::waveform::Expression;

/// Fraction of the lid-to-centre distance covered at full blink.
///
/// Stays below 1 so an eye never collapses to zero height.
pub const CLOSURE_FACTOR: f32 = 0.8;

impl Expression {
    /// Displace the regions this expression acts on, in place.
    pub fn apply(self, set: &mut LandmarkSet, intensity: f32, face: &FaceConfig) {
        let t = intensity.clamp(0.0, 1.0);
        if t <= 0.0 || t.is_nan() {
            return;
        }
        match self {
            Self::Blink => {
                for region in [Region::LeftEye, Region::RightEye] {
                    if let Some(points) = set.points_mut(region) {
                        close_lid(points, t);
                    }
                }
            }
            Self::Smile => {
                if let Some(points) = set.points_mut(Region::Mouth) {
                    lift_corners(points, t, face.smile_widen, face.smile_lift);
                }
            }
            Self::EyebrowRaise => {
                for region in [Region::LeftEyebrow, Region::RightEyebrow] {
                    if let Some(points) = set.points_mut(region) {
                        for p in points.iter_mut() {
                            let target = Point::new(p.x, p.y - face.raise_amplitude);
                            *p = p.lerp(target, t);
                        }
                    }
                }
            }
        }
    }
}

/// Upper-lid points (above the eye's mean height) move toward the centre line.
fn close_lid(points: &mut [Point], t: f32) {
    if points.is_empty() {
        return;
    }
    let center_y = points.iter().map(|p| p.y).sum::<f32>() / points.len() as f32;
    for p in points.iter_mut().filter(|p| p.y < center_y) {
        let target = Point::new(p.x, p.y - (p.y - center_y) * CLOSURE_FACTOR);
        *p = p.lerp(target, t);
    }
}

/// Leftmost and rightmost mouth points move outward and up.
fn lift_corners(points: &mut [Point], t: f32, widen: f32, lift: f32) {
    let mut left = None::<usize>;
    let mut right = None::<usize>;
    for (i, p) in points.iter().enumerate() {
        if left.is_none_or(|l| p.x < points[l].x) {
            left = Some(i);
        }
        if right.is_none_or(|r| p.x > points[r].x) {
            right = Some(i);
        }
    }
    let (Some(left), Some(right)) = (left, right) else {
        return;
    };
    if left == right {
        return;
    }
    let width = points[right].x - points[left].x;
    let dx = width * widen;
    let dy = width * lift;

    let l = points[left];
    points[left] = l.lerp(Point::new(l.x - dx, l.y - dy), t);
    let r = points[right];
    points[right] = r.lerp(Point::new(r.x + dx, r.y - dy), t);
}

/// Displaced copy of `set` for one frame's animation state.
///
/// # Example
/// ```
/// use gf_core::config::FaceConfig;
/// use gf_core::face::{AnimationState, LandmarkSet, Point, Region};
/// use gf_face::warp::warp;
///
/// let set = LandmarkSet::new()
///     .with_region(Region::LeftEyebrow, vec![Point::new(5.0, 10.0)]);
/// let state = AnimationState { eyebrow_raise: 1.0, ..AnimationState::REST };
/// let face = FaceConfig { raise_amplitude: 3.0, ..FaceConfig::default() };
/// let out = warp(&set, &state, &face);
/// assert_eq!(out.points(Region::LeftEyebrow).unwrap()[0], Point::new(5.0, 7.0));
/// ```
#[must_use]
pub fn warp(set: &LandmarkSet, state: &AnimationState, face: &FaceConfig) -> LandmarkSet {
    let mut out = set.clone();
    for expression in Expression::ALL {
        expression.apply(&mut out, expression.of(state), face);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Six-point eyes, twelve-point mouth, five-point brows.
    fn face_set() -> LandmarkSet {
        let eye = |cx: f32| {
            vec![
                Point::new(cx - 6.0, 40.0),
                Point::new(cx - 2.0, 37.0),
                Point::new(cx + 2.0, 37.0),
                Point::new(cx + 6.0, 40.0),
                Point::new(cx + 2.0, 43.0),
                Point::new(cx - 2.0, 43.0),
            ]
        };
        let brow = |cx: f32| (0..5).map(|i| Point::new(cx - 8.0 + 4.0 * i as f32, 30.0)).collect();
        let mouth = (0..12)
            .map(|i| {
                let a = i as f32 / 12.0 * std::f32::consts::TAU;
                Point::new(50.0 + 12.0 * a.cos(), 70.0 + 4.0 * a.sin())
            })
            .collect();
        LandmarkSet::new()
            .with_region(Region::LeftEye, eye(30.0))
            .with_region(Region::RightEye, eye(70.0))
            .with_region(Region::LeftEyebrow, brow(30.0))
            .with_region(Region::RightEyebrow, brow(70.0))
            .with_region(Region::Mouth, mouth)
    }

    #[test]
    fn rest_is_identity() {
        let set = face_set();
        let face = FaceConfig::default();
        assert_eq!(warp(&set, &AnimationState::REST, &face), set);
        assert_eq!(warp(&LandmarkSet::new(), &AnimationState::REST, &face), LandmarkSet::new());
    }

    #[test]
    fn full_blink_closes_upper_lid_only() {
        let set = face_set();
        let state = AnimationState {
            blink: 1.0,
            ..AnimationState::REST
        };
        let out = warp(&set, &state, &FaceConfig::default());
        let before = set.points(Region::LeftEye).unwrap();
        let after = out.points(Region::LeftEye).unwrap();
        // centre y = 40; upper lid at 37 → 37 + 3 × 0.8
        assert!((after[1].y - 39.4).abs() < 1e-4);
        assert!((after[2].y - 39.4).abs() < 1e-4);
        assert_eq!(after[1].x, before[1].x);
        for i in [0, 3, 4, 5] {
            assert_eq!(after[i], before[i]);
        }
        // never fully closed
        assert!(after[1].y < 40.0);
    }

    #[test]
    fn half_blink_is_halfway() {
        let set = face_set();
        let state = AnimationState {
            blink: 0.5,
            ..AnimationState::REST
        };
        let out = warp(&set, &state, &FaceConfig::default());
        let y = out.points(Region::RightEye).unwrap()[1].y;
        assert!((y - 38.2).abs() < 1e-4, "{y}");
    }

    #[test]
    fn smile_moves_corners_outward_and_up() {
        let set = face_set();
        let face = FaceConfig::default();
        let state = AnimationState {
            smile: 1.0,
            ..AnimationState::REST
        };
        let out = warp(&set, &state, &face);
        let before = set.points(Region::Mouth).unwrap();
        let after = out.points(Region::Mouth).unwrap();
        // point 0 is the rightmost corner (angle 0), point 6 the leftmost
        let width = before[0].x - before[6].x;
        assert!((after[0].x - (before[0].x + width * face.smile_widen)).abs() < 1e-4);
        assert!((after[6].x - (before[6].x - width * face.smile_widen)).abs() < 1e-4);
        assert!(after[0].y < before[0].y);
        assert!(after[6].y < before[6].y);
        for i in (1..12).filter(|i| *i != 6) {
            assert_eq!(after[i], before[i]);
        }
    }

    #[test]
    fn eyebrow_raise_translates_all_brow_points() {
        let set = face_set();
        let face = FaceConfig {
            raise_amplitude: 6.0,
            ..FaceConfig::default()
        };
        let state = AnimationState {
            eyebrow_raise: 0.5,
            ..AnimationState::REST
        };
        let out = warp(&set, &state, &face);
        for region in [Region::LeftEyebrow, Region::RightEyebrow] {
            for (a, b) in set.points(region).unwrap().iter().zip(out.points(region).unwrap()) {
                assert_eq!(b.x, a.x);
                assert!((b.y - (a.y - 3.0)).abs() < 1e-5);
            }
        }
        assert_eq!(out.points(Region::Mouth), set.points(Region::Mouth));
    }

    #[test]
    fn degenerate_regions_are_left_alone() {
        let set = LandmarkSet::new()
            .with_region(Region::Mouth, vec![Point::new(1.0, 1.0)])
            .with_region(Region::LeftEye, Vec::new());
        let state = AnimationState {
            blink: 1.0,
            smile: 1.0,
            eyebrow_raise: 1.0,
        };
        assert_eq!(warp(&set, &state, &FaceConfig::default()), set);
    }
}
