/// Frame sources for gifscii: animated GIFs, still images, in-memory lists.

pub mod gif;
pub mod still;

pub use gif::{GifSource, MemorySource, open_source};
