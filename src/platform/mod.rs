//! Hardware camera seam
//!
//! The session never talks to a concrete camera stack. Drivers implement
//! [`CameraDriver`] to open devices by id and [`CameraDevice`] for an opened
//! handle. Every call is synchronous and bounded by the underlying driver.

pub mod parameters;

pub use parameters::CameraParameters;

use crate::errors::CameraError;
use crate::types::CameraInfo;
use std::sync::Arc;

/// Opaque handle to a windowed drawing surface owned by the windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Opaque handle to a texture-backed surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Receives filled callback buffers from the hardware.
///
/// The buffer is handed back by value together with the device that filled
/// it, so the receiver can return it with
/// [`CameraDevice::add_callback_buffer`].
pub trait PreviewCallback: Send + Sync {
    fn on_preview_frame(&self, buffer: Vec<u8>, camera: &dyn CameraDevice);
}

/// One opened hardware camera.
pub trait CameraDevice: Send + Sync {
    /// Current parameter snapshot. `Ok(None)` means the driver returned no
    /// snapshot at all.
    fn parameters(&self) -> Result<Option<CameraParameters>, CameraError>;

    /// Commit a full parameter set in one call.
    fn set_parameters(&self, parameters: &CameraParameters) -> Result<(), CameraError>;

    fn set_display_orientation(&self, degrees: u32) -> Result<(), CameraError>;

    fn set_preview_display(&self, surface: SurfaceHandle) -> Result<(), CameraError>;

    fn set_preview_texture(&self, texture: TextureHandle) -> Result<(), CameraError>;

    fn start_preview(&self) -> Result<(), CameraError>;

    fn stop_preview(&self) -> Result<(), CameraError>;

    /// Queue a buffer for the next capture. Ownership moves to the hardware
    /// until the buffer comes back through [`PreviewCallback`].
    fn add_callback_buffer(&self, buffer: Vec<u8>);

    /// Register (or with `None`, clear) the buffered frame callback.
    fn set_preview_callback_with_buffer(&self, callback: Option<Arc<dyn PreviewCallback>>);

    fn release(&self) -> Result<(), CameraError>;
}

/// Entry point into a camera stack.
pub trait CameraDriver: Send + Sync {
    fn number_of_cameras(&self) -> u32;

    fn camera_info(&self, camera_id: u32) -> Result<CameraInfo, CameraError>;

    fn open(&self, camera_id: u32) -> Result<Box<dyn CameraDevice>, CameraError>;
}
