//! Callback buffer pool
//!
//! A fixed number of byte buffers is allocated once per open camera and then
//! circulates between the hardware and the frame listeners. Buffers are never
//! reallocated while the camera stays open.

use crate::platform::CameraDevice;
use crate::types::{PixelFormat, PreviewSize};

/// Buffers allocated per open camera.
pub const CALLBACK_BUFFER_COUNT: usize = 3;

/// Byte size of one preview frame.
///
/// YV12 rows are padded to 16-byte strides for both the luma and the two
/// chroma planes. Every other format is packed at its bits-per-pixel. Returns
/// `None` for formats without a fixed bits-per-pixel.
pub fn preview_buffer_size(format: PixelFormat, size: PreviewSize) -> Option<usize> {
    let width = size.width as usize;
    let height = size.height as usize;

    if format == PixelFormat::Yv12 {
        let y_stride = width.div_ceil(16) * 16;
        let uv_stride = (y_stride / 2).div_ceil(16) * 16;
        let y_size = y_stride * height;
        let uv_size = uv_stride * height / 2;
        return Some(y_size + uv_size * 2);
    }

    let bits = format.bits_per_pixel()? as usize;
    Some(width * height * bits / 8)
}

#[derive(Debug)]
pub struct BufferPool {
    buffer_size: usize,
    capacity: usize,
    idle: Vec<Vec<u8>>,
}

impl BufferPool {
    pub fn allocate(buffer_size: usize, count: usize) -> Self {
        log::debug!("Allocating {} preview buffers of {} bytes", count, buffer_size);
        Self {
            buffer_size,
            capacity: count,
            idle: (0..count).map(|_| vec![0u8; buffer_size]).collect(),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Buffers owned by this pool, whether idle or queued in the hardware.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Buffers not yet handed to the hardware.
    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    /// Move every idle buffer into the hardware queue. Returns how many were
    /// submitted.
    pub fn submit_all(&mut self, camera: &dyn CameraDevice) -> usize {
        let count = self.idle.len();
        for buffer in self.idle.drain(..) {
            camera.add_callback_buffer(buffer);
        }
        count
    }
}
