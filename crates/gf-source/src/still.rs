use std::path::Path;

use gf_core::error::{CoreError, CoreResult};
use gf_core::frame::Frame;

/// Delay given to a still image, matching the usual GIF default of 10 cs.
pub const DEFAULT_DELAY_MS: u32 = 100;

/// Charge une image fixe (PNG, JPEG, BMP) comme frame unique d'index 0.
///
/// # Errors
/// Returns [`CoreError::Decode`] if the image cannot be loaded.
///
/// # Example
/// ```no_run
/// use gf_source::still::load_still;
/// use std::path::Path;
/// let frame = load_still(Path::new("photo.png")).unwrap();
/// assert_eq!(frame.index(), 0);
/// ```
pub fn load_still(path: &Path) -> CoreResult<Frame> {
    let label = path.display().to_string();
    let img = image::open(path).map_err(|e| CoreError::decode(&label, e))?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Frame::from_rgb(rgb.into_raw(), width, height, DEFAULT_DELAY_MS, 0)
        .map_err(|e| CoreError::decode(&label, e))
}
