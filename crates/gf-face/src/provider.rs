//! Landmark providers usable without a real detector.

use std::path::Path;

use gf_core::error::{CoreError, CoreResult};
use gf_core::face::LandmarkSet;
use gf_core::frame::Frame;
use gf_core::traits::LandmarkProvider;

/// Never finds a face.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFaces;

impl LandmarkProvider for NoFaces {
    fn detect(&self, _frame: &Frame) -> Vec<LandmarkSet> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Returns the same landmark sets for every frame.
///
/// # Example
/// ```
/// use gf_core::face::{LandmarkSet, Point, Region};
/// use gf_core::frame::Frame;
/// use gf_core::traits::LandmarkProvider;
/// use gf_face::provider::StaticLandmarks;
///
/// let set = LandmarkSet::new().with_region(Region::Mouth, vec![Point::new(1.0, 2.0)]);
/// let provider = StaticLandmarks::new(vec![set.clone()]);
/// assert_eq!(provider.detect(&Frame::solid(4, 4, (0, 0, 0), 10, 3)), vec![set]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticLandmarks {
    sets: Vec<LandmarkSet>,
}

impl StaticLandmarks {
    /// Provider answering `sets` for every frame.
    #[must_use]
    pub fn new(sets: Vec<LandmarkSet>) -> Self {
        Self { sets }
    }
}

impl LandmarkProvider for StaticLandmarks {
    fn detect(&self, _frame: &Frame) -> Vec<LandmarkSet> {
        self.sets.clone()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Per-frame landmark sets recorded by an offline detector.
///
/// JSON layout: an array indexed by frame, each entry an array of sets,
/// each set an object mapping region names (`leftEye`, `rightEye`, `mouth`,
/// `leftEyebrow`, `rightEyebrow`) to `{ "x": .., "y": .. }` points.
/// Frames past the end of the array have no face.
#[derive(Clone, Debug, Default)]
pub struct LandmarkScript {
    frames: Vec<Vec<LandmarkSet>>,
}

impl LandmarkScript {
    /// Parse a script from JSON text.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] on malformed JSON or unknown regions.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Self::parse(json, "<landmarks>")
    }

    /// Load a script from disk.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let label = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::decode(&label, e))?;
        let script = Self::parse(&content, &label)?;
        log::info!(
            "Script de landmarks chargé : {} frames depuis {label}",
            script.len()
        );
        Ok(script)
    }

    fn parse(json: &str, label: &str) -> CoreResult<Self> {
        let frames: Vec<Vec<LandmarkSet>> =
            serde_json::from_str(json).map_err(|e| CoreError::decode(label, e))?;
        Ok(Self { frames })
    }

    /// Number of frames described by the script.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when the script describes no frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LandmarkProvider for LandmarkScript {
    fn detect(&self, frame: &Frame) -> Vec<LandmarkSet> {
        self.frames.get(frame.index()).cloned().unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "script"
    }
}
