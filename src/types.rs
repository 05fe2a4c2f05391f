//! Value types shared by the session, the hardware seam and the negotiator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Preview pixel formats understood by the hardware layer.
///
/// Codes match the platform's image-format constants so that values coming
/// from a driver can be mapped back with [`PixelFormat::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// YCbCr 4:2:2 semi-planar
    Nv16,
    /// YCrCb 4:2:0 semi-planar, the default preview format on most devices
    Nv21,
    /// YCbCr 4:2:2 interleaved
    Yuy2,
    /// YCrCb 4:2:0 planar with 16-byte aligned strides
    Yv12,
    Rgb565,
    Yuv420Flexible,
    /// Compressed; has no fixed bits-per-pixel
    Jpeg,
}

impl PixelFormat {
    pub fn code(&self) -> i32 {
        match self {
            PixelFormat::Nv16 => 0x10,
            PixelFormat::Nv21 => 0x11,
            PixelFormat::Yuy2 => 0x14,
            PixelFormat::Yv12 => 0x3231_5659,
            PixelFormat::Rgb565 => 0x04,
            PixelFormat::Yuv420Flexible => 0x23,
            PixelFormat::Jpeg => 0x100,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0x10 => Some(PixelFormat::Nv16),
            0x11 => Some(PixelFormat::Nv21),
            0x14 => Some(PixelFormat::Yuy2),
            0x3231_5659 => Some(PixelFormat::Yv12),
            0x04 => Some(PixelFormat::Rgb565),
            0x23 => Some(PixelFormat::Yuv420Flexible),
            0x100 => Some(PixelFormat::Jpeg),
            _ => None,
        }
    }

    /// Bits per pixel, or `None` for formats without a fixed layout.
    pub fn bits_per_pixel(&self) -> Option<u32> {
        match self {
            PixelFormat::Nv16 | PixelFormat::Yuy2 | PixelFormat::Rgb565 => Some(16),
            PixelFormat::Nv21 | PixelFormat::Yv12 | PixelFormat::Yuv420Flexible => Some(12),
            PixelFormat::Jpeg => None,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Nv16 => "NV16",
            PixelFormat::Nv21 => "NV21",
            PixelFormat::Yuy2 => "YUY2",
            PixelFormat::Yv12 => "YV12",
            PixelFormat::Rgb565 => "RGB_565",
            PixelFormat::Yuv420Flexible => "YUV_420_888",
            PixelFormat::Jpeg => "JPEG",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
}

impl PreviewSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for PreviewSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Inclusive frame-rate range in milli-fps, the unit the hardware reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FpsRange {
    pub min: u32,
    pub max: u32,
}

impl FpsRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Build a range from whole frames per second.
    pub fn from_fps(min_fps: u32, max_fps: u32) -> Self {
        Self {
            min: min_fps.saturating_mul(1000),
            max: max_fps.saturating_mul(1000),
        }
    }
}

impl fmt::Display for FpsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusMode {
    Auto,
    ContinuousVideo,
    ContinuousPicture,
    Fixed,
    Infinity,
    Macro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Back,
    Front,
}

impl Default for Facing {
    fn default() -> Self {
        Facing::Back
    }
}

/// Static description of one camera as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub facing: Facing,
    /// Clockwise angle the sensor image must be rotated to be upright.
    pub orientation: u32,
}

/// Rotation of the display relative to its natural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl Rotation {
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::Rotation0 => 0,
            Rotation::Rotation90 => 90,
            Rotation::Rotation180 => 180,
            Rotation::Rotation270 => 270,
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::Rotation0
    }
}
