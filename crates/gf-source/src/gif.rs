use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

use gf_core::error::{CoreError, CoreResult};
use gf_core::frame::Frame;
use gf_core::traits::FrameSource;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat, ImageReader, RgbaImage};

use crate::still::load_still;

/// Source GIF animée, entièrement décodée à l'ouverture.
///
/// Les frames sont composées sur le canevas complet par le décodeur, donc
/// toutes partagent les mêmes dimensions.
///
/// # Example
/// ```no_run
/// use gf_source::gif::GifSource;
/// use std::path::Path;
/// let source = GifSource::open(Path::new("input.gif")).unwrap();
/// ```
pub struct GifSource {
    frames: std::vec::IntoIter<Frame>,
    count: usize,
    size: (u32, u32),
}

impl GifSource {
    /// Decode every frame of a GIF file.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] if the file is missing, not a GIF, or
    /// holds no frame.
    pub fn open(path: &Path) -> CoreResult<Self> {
        let label = path.display().to_string();
        let file = File::open(path).map_err(|e| CoreError::decode(&label, e))?;
        Self::from_reader(BufReader::new(file), &label)
    }

    /// Decode a GIF from any seekable reader. `label` names it in errors.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] on malformed or empty input.
    pub fn from_reader<R: BufRead + Seek>(reader: R, label: &str) -> CoreResult<Self> {
        let decoder = GifDecoder::new(reader).map_err(|e| CoreError::decode(label, e))?;
        let decoded = decoder
            .into_frames()
            .collect_frames()
            .map_err(|e| CoreError::decode(label, e))?;

        let mut frames = Vec::with_capacity(decoded.len());
        for (index, frame) in decoded.into_iter().enumerate() {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 {
                0
            } else {
                (f64::from(numer) / f64::from(denom)).round() as u32
            };
            let rgb = rgba_to_rgb(frame.buffer());
            let (w, h) = frame.buffer().dimensions();
            frames.push(
                Frame::from_rgb(rgb, w, h, delay_ms, index)
                    .map_err(|e| CoreError::decode(label, e))?,
            );
        }
        Self::from_frames(frames, label)
    }

    fn from_frames(frames: Vec<Frame>, label: &str) -> CoreResult<Self> {
        let size = check_sequence(&frames, label)?;
        log::info!(
            "GIF décodé ({} frames, {}×{}) : {label}",
            frames.len(),
            size.0,
            size.1
        );
        Ok(Self {
            count: frames.len(),
            frames: frames.into_iter(),
            size,
        })
    }
}

impl FrameSource for GifSource {
    fn next_frame(&mut self) -> Option<Frame> {
        self.frames.next()
    }

    fn frame_count(&self) -> usize {
        self.count
    }

    fn native_size(&self) -> (u32, u32) {
        self.size
    }
}

/// In-memory frame list, mostly for tests and synthetic input.
///
/// # Example
/// ```
/// use gf_core::frame::Frame;
/// use gf_core::traits::FrameSource;
/// use gf_source::gif::MemorySource;
///
/// let mut src = MemorySource::new(vec![Frame::solid(2, 2, (1, 2, 3), 50, 0)]).unwrap();
/// assert_eq!(src.frame_count(), 1);
/// assert!(src.next_frame().is_some());
/// assert!(src.next_frame().is_none());
/// ```
pub struct MemorySource {
    frames: std::vec::IntoIter<Frame>,
    count: usize,
    size: (u32, u32),
}

impl MemorySource {
    /// Wrap a frame list.
    ///
    /// # Errors
    /// Returns [`CoreError::Decode`] for an empty list or mixed frame sizes.
    pub fn new(frames: Vec<Frame>) -> CoreResult<Self> {
        let size = check_sequence(&frames, "<mémoire>")?;
        Ok(Self {
            count: frames.len(),
            frames: frames.into_iter(),
            size,
        })
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Option<Frame> {
        self.frames.next()
    }

    fn frame_count(&self) -> usize {
        self.count
    }

    fn native_size(&self) -> (u32, u32) {
        self.size
    }
}

/// Open `path` as a GIF animation or, for other formats, a single still frame.
///
/// # Errors
/// Returns [`CoreError::Decode`] if the file cannot be read or decoded.
pub fn open_source(path: &Path) -> CoreResult<Box<dyn FrameSource>> {
    let label = path.display().to_string();
    let format = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| CoreError::decode(&label, e))?
        .format();

    if format == Some(ImageFormat::Gif) {
        Ok(Box::new(GifSource::open(path)?))
    } else {
        log::info!("Image fixe, décodée comme une frame unique : {label}");
        Ok(Box::new(MemorySource::new(vec![load_still(path)?])?))
    }
}

/// Non-empty sequence with one shared size.
fn check_sequence(frames: &[Frame], label: &str) -> CoreResult<(u32, u32)> {
    let first = frames
        .first()
        .ok_or_else(|| CoreError::decode(label, "aucune frame"))?;
    let size = (first.width(), first.height());
    if let Some(odd) = frames
        .iter()
        .find(|f| (f.width(), f.height()) != size)
    {
        return Err(CoreError::decode(
            label,
            format!(
                "frame {} en {}×{}, {}×{} attendu",
                odd.index(),
                odd.width(),
                odd.height(),
                size.0,
                size.1
            ),
        ));
    }
    Ok(size)
}

/// Drop alpha; fully transparent pixels become black.
fn rgba_to_rgb(img: &RgbaImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(img.width() as usize * img.height() as usize * 3);
    for px in img.pixels() {
        let [r, g, b, a] = px.0;
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0]);
        } else {
            out.extend_from_slice(&[r, g, b]);
        }
    }
    out
}
