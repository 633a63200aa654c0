/// Output stage for gifscii: glyph rasterization, GIF encoding and text dumps.
pub mod composer;
pub mod gif;
pub mod rasterizer;
pub mod text;

pub use composer::{Composition, compose, gif_delay_cs, output_delay};
pub use rasterizer::Rasterizer;
