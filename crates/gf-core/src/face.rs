//! Landmark and expression types shared by the face animation and the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 2-D point in source-pixel coordinates (y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation toward `target`. `t = 0` returns `self` unchanged.
    ///
    /// # Example
    /// ```
    /// use gf_core::face::Point;
    /// let a = Point::new(0.0, 10.0);
    /// let b = Point::new(4.0, 2.0);
    /// assert_eq!(a.lerp(b, 0.5), Point::new(2.0, 6.0));
    /// assert_eq!(a.lerp(b, 0.0), a);
    /// ```
    #[inline]
    #[must_use]
    pub fn lerp(self, target: Self, t: f32) -> Self {
        if t == 0.0 {
            return self;
        }
        Self {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}

/// Named facial region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    /// Left eye outline.
    LeftEye,
    /// Right eye outline.
    RightEye,
    /// Outer lip contour.
    Mouth,
    /// Left eyebrow.
    LeftEyebrow,
    /// Right eyebrow.
    RightEyebrow,
}

impl Region {
    /// Every region, in map order.
    pub const ALL: [Self; 5] = [
        Self::LeftEye,
        Self::RightEye,
        Self::Mouth,
        Self::LeftEyebrow,
        Self::RightEyebrow,
    ];
}

/// Axis-aligned box in source-pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Top-left corner.
    pub min: Point,
    /// Bottom-right corner.
    pub max: Point,
}

/// Landmarks of one detected face in one frame.
///
/// # Example
/// ```
/// use gf_core::face::{LandmarkSet, Point, Region};
/// let set = LandmarkSet::new()
///     .with_region(Region::Mouth, vec![Point::new(10.0, 20.0), Point::new(30.0, 22.0)]);
/// let b = set.bounds(Region::Mouth).unwrap();
/// assert_eq!(b.min, Point::new(10.0, 20.0));
/// assert_eq!(b.max, Point::new(30.0, 22.0));
/// assert!(set.points(Region::LeftEye).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    regions: BTreeMap<Region, Vec<Point>>,
}

impl LandmarkSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_region(mut self, region: Region, points: Vec<Point>) -> Self {
        self.regions.insert(region, points);
        self
    }

    /// Points of a region, if present.
    #[must_use]
    pub fn points(&self, region: Region) -> Option<&[Point]> {
        self.regions.get(&region).map(Vec::as_slice)
    }

    /// Mutable points of a region, if present.
    pub fn points_mut(&mut self, region: Region) -> Option<&mut Vec<Point>> {
        self.regions.get_mut(&region)
    }

    /// Bounding box of a region; `None` when absent or empty.
    #[must_use]
    pub fn bounds(&self, region: Region) -> Option<Bounds> {
        let pts = self.points(region)?;
        let first = pts.first()?;
        let init = Bounds {
            min: *first,
            max: *first,
        };
        Some(pts.iter().fold(init, |b, p| Bounds {
            min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
            max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
        }))
    }
}

/// Expression intensities for one frame, each in [0, 1].
///
/// Shared read-only by every landmark set of the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationState {
    /// Eye closure.
    pub blink: f32,
    /// Mouth-corner lift.
    pub smile: f32,
    /// Eyebrow lift.
    pub eyebrow_raise: f32,
}

impl AnimationState {
    /// All expressions at rest.
    pub const REST: Self = Self {
        blink: 0.0,
        smile: 0.0,
        eyebrow_raise: 0.0,
    };

    /// True when every intensity is zero.
    #[must_use]
    pub fn is_rest(&self) -> bool {
        *self == Self::REST
    }
}
