use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gf_core::error::{CoreError, CoreResult};
use gf_core::frame::FrameBuffer;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, RgbaImage};

/// Wrap a rendered framebuffer as a GIF frame shown for `delay_ms`.
///
/// # Errors
/// Retourne [`CoreError::Render`] si le buffer ne correspond pas à ses dimensions.
pub fn to_gif_frame(fb: FrameBuffer, delay_ms: u32) -> CoreResult<image::Frame> {
    let (w, h) = (fb.width, fb.height);
    let img = RgbaImage::from_raw(w, h, fb.data)
        .ok_or_else(|| CoreError::Render(format!("buffer RGBA incohérent pour {w}×{h}")))?;
    Ok(image::Frame::from_parts(
        img,
        0,
        0,
        Delay::from_numer_denom_ms(delay_ms, 1),
    ))
}

/// Encode `frames` as an infinitely looping GIF into any writer.
///
/// `label` names the destination in errors.
///
/// # Errors
/// Retourne [`CoreError::Encode`] si l'encodeur échoue.
pub fn encode_gif<W: Write>(writer: W, frames: Vec<image::Frame>, label: &str) -> CoreResult<()> {
    let mut encoder = GifEncoder::new(writer);
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| CoreError::encode(label, e))?;
    encoder
        .encode_frames(frames)
        .map_err(|e| CoreError::encode(label, e))
}

/// Écrit une animation GIF sur disque.
///
/// # Errors
/// Retourne [`CoreError::Encode`] si le fichier ne peut être créé ou écrit.
pub fn write_gif(path: &Path, frames: Vec<image::Frame>) -> CoreResult<()> {
    let label = path.display().to_string();
    let file = File::create(path).map_err(|e| CoreError::encode(&label, e))?;
    let mut writer = BufWriter::new(file);
    let count = frames.len();
    encode_gif(&mut writer, frames, &label)?;
    writer.flush().map_err(|e| CoreError::encode(&label, e))?;
    log::info!("GIF écrit ({count} frames) : {label}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use gf_core::traits::FrameSource;
    use gf_source::gif::GifSource;

    use super::*;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> FrameBuffer {
        let mut fb = FrameBuffer::new(w, h);
        for chunk in fb.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        fb
    }

    #[test]
    fn written_gif_decodes_with_same_delays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        let frames = vec![
            to_gif_frame(solid(4, 2, [255, 255, 255, 255]), 100).unwrap(),
            to_gif_frame(solid(4, 2, [0, 0, 0, 255]), 40).unwrap(),
        ];
        write_gif(&path, frames).unwrap();

        let mut src = GifSource::open(&path).unwrap();
        assert_eq!(src.frame_count(), 2);
        assert_eq!(src.native_size(), (4, 2));
        let delays: Vec<u32> = std::iter::from_fn(|| src.next_frame())
            .map(|f| f.delay_ms())
            .collect();
        assert_eq!(delays, vec![100, 40]);
    }

    #[test]
    fn inconsistent_buffer_is_rejected() {
        let fb = FrameBuffer {
            data: vec![0; 7],
            width: 2,
            height: 2,
        };
        assert!(matches!(to_gif_frame(fb, 10), Err(CoreError::Render(_))));
    }

    #[test]
    fn unwritable_destination_is_an_encode_error() {
        let err = write_gif(Path::new("/no/such/dir/out.gif"), Vec::new()).err();
        assert!(matches!(err, Some(CoreError::Encode { .. })));
    }
}
