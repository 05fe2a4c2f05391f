//! Synthetic preview frames
//!
//! Fills callback buffers with a moving luma gradient and neutral chroma so
//! listeners see distinct, recognisable content on every frame without a
//! real sensor.

use crate::session::preview_buffer_size;
use crate::types::{PixelFormat, PreviewSize};

/// Neutral chroma value for YUV formats.
pub const NEUTRAL_CHROMA: u8 = 128;

/// Overwrite `buffer` in place with frame `frame_number` of a `size` preview.
///
/// The first `width * height` bytes are a luma gradient shifted by the frame
/// number; everything after is neutral chroma. Short buffers are filled as
/// far as they go.
pub fn fill_preview_frame(buffer: &mut [u8], frame_number: u64, size: PreviewSize) {
    let base = (frame_number % 256) as u8;
    let width = size.width.max(1) as usize;
    let luma_len = (size.width as usize * size.height as usize).min(buffer.len());

    let (luma, chroma) = buffer.split_at_mut(luma_len);
    for (i, px) in luma.iter_mut().enumerate() {
        let x = i % width;
        let y = i / width;
        *px = base.wrapping_add((x % 256) as u8).wrapping_add((y % 256) as u8);
    }
    chroma.fill(NEUTRAL_CHROMA);
}

/// Allocate and fill a complete frame for `format` at `size`.
pub fn synthetic_preview_frame(frame_number: u64, format: PixelFormat, size: PreviewSize) -> Vec<u8> {
    let len = preview_buffer_size(format, size).unwrap_or(size.width as usize * size.height as usize);
    let mut data = vec![0u8; len];
    fill_preview_frame(&mut data, frame_number, size);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let frame = synthetic_preview_frame(0, PixelFormat::Nv21, PreviewSize::new(4, 2));
        assert_eq!(frame.len(), 12);
        assert_eq!(&frame[..4], &[0, 1, 2, 3]);
        assert_eq!(&frame[4..8], &[1, 2, 3, 4]);
        assert!(frame[8..].iter().all(|&b| b == NEUTRAL_CHROMA));
    }

    #[test]
    fn test_frames_differ_over_time() {
        let size = PreviewSize::new(16, 16);
        let a = synthetic_preview_frame(1, PixelFormat::Yv12, size);
        let b = synthetic_preview_frame(2, PixelFormat::Yv12, size);
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_buffer_does_not_panic() {
        let mut buffer = vec![0u8; 3];
        fill_preview_frame(&mut buffer, 5, PreviewSize::new(640, 480));
        assert_eq!(buffer, vec![5, 6, 7]);
    }
}
