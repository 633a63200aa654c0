/// ASCII conversion engine for gifscii.
///
/// Converts pixel frames to character grids and stamps facial overlays.
pub mod overlay;
pub mod renderer;

pub use overlay::FaceOverlay;
pub use renderer::{AsciiRenderer, grid_dimensions};
