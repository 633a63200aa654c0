//! Synthetic facial-expression animation for gifscii.
//!
//! Computes per-frame expression intensities and displaces detected
//! landmarks accordingly.

pub mod provider;
pub mod warp;
pub mod waveform;

pub use provider::{LandmarkScript, NoFaces, StaticLandmarks};
pub use warp::warp;
pub use waveform::{Expression, animation_state};
