//! Parameter snapshot exchanged with a camera device.
//!
//! A device hands out a copy of its current parameters; the session edits the
//! copy field by field and commits it back in a single
//! [`CameraDevice::set_parameters`](super::CameraDevice::set_parameters) call.
//! Each setter validates against the capabilities the device advertised, so
//! every negotiation step can fail on its own.

use crate::errors::CameraError;
use crate::types::{FocusMode, FpsRange, PixelFormat, PreviewSize};

#[derive(Debug, Clone, PartialEq)]
pub struct CameraParameters {
    preview_fps_range: FpsRange,
    preview_size: PreviewSize,
    preview_format: PixelFormat,
    focus_mode: FocusMode,
    supported_fps_ranges: Vec<FpsRange>,
    supported_preview_sizes: Vec<PreviewSize>,
    supported_preview_formats: Vec<PixelFormat>,
    // None when the driver cannot report its focus modes
    supported_focus_modes: Option<Vec<FocusMode>>,
}

impl CameraParameters {
    /// Create a snapshot with the given current preview geometry and format.
    /// Supported lists start empty and are filled with the `with_*` builders.
    pub fn new(preview_size: PreviewSize, preview_format: PixelFormat) -> Self {
        Self {
            preview_fps_range: FpsRange::from_fps(30, 30),
            preview_size,
            preview_format,
            focus_mode: FocusMode::Fixed,
            supported_fps_ranges: Vec::new(),
            supported_preview_sizes: Vec::new(),
            supported_preview_formats: Vec::new(),
            supported_focus_modes: Some(vec![FocusMode::Fixed]),
        }
    }

    pub fn with_supported_fps_ranges(mut self, ranges: Vec<FpsRange>) -> Self {
        self.supported_fps_ranges = ranges;
        self
    }

    pub fn with_supported_preview_sizes(mut self, sizes: Vec<PreviewSize>) -> Self {
        self.supported_preview_sizes = sizes;
        self
    }

    pub fn with_supported_preview_formats(mut self, formats: Vec<PixelFormat>) -> Self {
        self.supported_preview_formats = formats;
        self
    }

    /// `None` models a driver that fails to report its focus modes.
    pub fn with_supported_focus_modes(mut self, modes: Option<Vec<FocusMode>>) -> Self {
        self.supported_focus_modes = modes;
        self
    }

    pub fn with_focus_mode(mut self, mode: FocusMode) -> Self {
        self.focus_mode = mode;
        self
    }

    pub fn preview_fps_range(&self) -> FpsRange {
        self.preview_fps_range
    }

    pub fn preview_size(&self) -> PreviewSize {
        self.preview_size
    }

    pub fn preview_format(&self) -> PixelFormat {
        self.preview_format
    }

    pub fn focus_mode(&self) -> FocusMode {
        self.focus_mode
    }

    pub fn supported_fps_ranges(&self) -> &[FpsRange] {
        &self.supported_fps_ranges
    }

    pub fn supported_preview_sizes(&self) -> &[PreviewSize] {
        &self.supported_preview_sizes
    }

    pub fn supported_preview_formats(&self) -> &[PixelFormat] {
        &self.supported_preview_formats
    }

    pub fn supported_focus_modes(&self) -> Result<&[FocusMode], CameraError> {
        self.supported_focus_modes
            .as_deref()
            .ok_or_else(|| CameraError::Unsupported("focus modes not reported".to_string()))
    }

    pub fn set_preview_fps_range(&mut self, range: FpsRange) -> Result<(), CameraError> {
        if range.max == 0 || range.min > range.max {
            return Err(CameraError::InvalidParameter(format!(
                "invalid fps range {}",
                range
            )));
        }
        self.preview_fps_range = range;
        Ok(())
    }

    pub fn set_preview_size(&mut self, size: PreviewSize) -> Result<(), CameraError> {
        if size.width == 0 || size.height == 0 {
            return Err(CameraError::InvalidParameter(format!(
                "invalid preview size {}",
                size
            )));
        }
        self.preview_size = size;
        Ok(())
    }

    pub fn set_preview_format(&mut self, format: PixelFormat) -> Result<(), CameraError> {
        if !self.supported_preview_formats.is_empty()
            && !self.supported_preview_formats.contains(&format)
        {
            return Err(CameraError::InvalidParameter(format!(
                "preview format {} not supported",
                format
            )));
        }
        self.preview_format = format;
        Ok(())
    }

    pub fn set_focus_mode(&mut self, mode: FocusMode) -> Result<(), CameraError> {
        if !self.supported_focus_modes()?.contains(&mode) {
            return Err(CameraError::InvalidParameter(format!(
                "focus mode {:?} not supported",
                mode
            )));
        }
        self.focus_mode = mode;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CameraParameters {
        CameraParameters::new(PreviewSize::new(640, 480), PixelFormat::Nv21)
            .with_supported_preview_formats(vec![PixelFormat::Nv21, PixelFormat::Yv12])
            .with_supported_focus_modes(Some(vec![FocusMode::Auto, FocusMode::Fixed]))
    }

    #[test]
    fn test_fps_range_validation() {
        let mut p = params();
        assert!(p.set_preview_fps_range(FpsRange::from_fps(30, 15)).is_err());
        assert!(p.set_preview_fps_range(FpsRange::new(0, 0)).is_err());
        assert!(p.set_preview_fps_range(FpsRange::from_fps(15, 30)).is_ok());
        assert_eq!(p.preview_fps_range(), FpsRange::from_fps(15, 30));
    }

    #[test]
    fn test_preview_format_must_be_supported() {
        let mut p = params();
        let err = p.set_preview_format(PixelFormat::Rgb565).unwrap_err();
        assert!(matches!(err, CameraError::InvalidParameter(_)));
        assert_eq!(p.preview_format(), PixelFormat::Nv21);
        p.set_preview_format(PixelFormat::Yv12).unwrap();
        assert_eq!(p.preview_format(), PixelFormat::Yv12);
    }

    #[test]
    fn test_unknown_focus_modes_is_an_error() {
        let mut p = params().with_supported_focus_modes(None);
        assert!(p.supported_focus_modes().is_err());
        assert!(p.set_focus_mode(FocusMode::Auto).is_err());
    }

    #[test]
    fn test_zero_preview_size_rejected() {
        let mut p = params();
        assert!(p.set_preview_size(PreviewSize::new(0, 480)).is_err());
        assert_eq!(p.preview_size(), PreviewSize::new(640, 480));
    }
}
