/// Configuration, types, and shared structures for gifscii.
///
/// This crate contains the frame and grid types, the landmark model, the
/// glyph ramp, the run configuration and the error type shared across the
/// gifscii workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod face;
pub mod frame;
pub mod traits;

pub use charset::Ramp;
pub use config::RunConfig;
pub use error::{CoreError, CoreResult};
pub use face::{AnimationState, LandmarkSet, Point, Region};
pub use frame::{AsciiCell, AsciiGrid, Frame, FrameBuffer};
