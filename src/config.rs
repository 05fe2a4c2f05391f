//! Session configuration
//!
//! [`SessionConfig`] describes which camera to open and what to ask of it.
//! It is built in code with the `with_*` builders or loaded from a TOML file.

use crate::errors::CameraError;
use crate::types::{Facing, FpsRange, PixelFormat, PreviewSize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Camera id passed to the driver
    pub camera_id: u32,
    /// Which way the selected camera faces
    pub facing: Facing,
    /// Preferred preview fps range; negotiated to the closest supported range
    pub preferred_fps: Option<FpsRange>,
    /// Preferred preview size; negotiated to the closest supported size
    pub preferred_preview_size: Option<PreviewSize>,
    /// Preview pixel format, left at the device default when unset
    pub preview_format: Option<PixelFormat>,
    /// Pick a continuous or auto focus mode when the device has one
    pub auto_focus: bool,
    /// Display orientation in degrees; computed from the display rotation when unset
    pub display_orientation: Option<u32>,
    /// Callback buffer size in bytes; derived from format and geometry when unset
    pub preview_buffer_size: Option<usize>,
    /// Subscribe to surface lifecycle events and defer preview start until ready
    pub handle_surface_events: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            camera_id: 0,
            facing: Facing::Back,
            preferred_fps: None,
            preferred_preview_size: None,
            preview_format: None,
            auto_focus: false,
            display_orientation: None,
            preview_buffer_size: None,
            handle_surface_events: false,
        }
    }
}

impl SessionConfig {
    pub fn new(camera_id: u32, facing: Facing) -> Self {
        Self {
            camera_id,
            facing,
            ..Self::default()
        }
    }

    pub fn with_preferred_fps(mut self, range: FpsRange) -> Self {
        self.preferred_fps = Some(range);
        self
    }

    pub fn with_preferred_preview_size(mut self, size: PreviewSize) -> Self {
        self.preferred_preview_size = Some(size);
        self
    }

    pub fn with_preview_format(mut self, format: PixelFormat) -> Self {
        self.preview_format = Some(format);
        self
    }

    pub fn with_auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    pub fn with_display_orientation(mut self, degrees: u32) -> Self {
        self.display_orientation = Some(degrees);
        self
    }

    pub fn with_preview_buffer_size(mut self, bytes: usize) -> Self {
        self.preview_buffer_size = Some(bytes);
        self
    }

    pub fn with_surface_events(mut self, handle: bool) -> Self {
        self.handle_surface_events = handle;
        self
    }

    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| CameraError::Config(format!("Failed to read config file: {}", e)))?;

        let config: SessionConfig = toml::from_str(&contents)
            .map_err(|e| CameraError::Config(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded session configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CameraError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CameraError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| CameraError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| CameraError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved session configuration to {:?}", path);
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from("camsession.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(range) = self.preferred_fps {
            if range.max == 0 || range.min > range.max {
                return Err(format!("Invalid preferred fps range {}", range));
            }
        }
        if let Some(size) = self.preferred_preview_size {
            if size.width == 0 || size.height == 0 {
                return Err(format!("Invalid preferred preview size {}", size));
            }
        }
        if let Some(degrees) = self.display_orientation {
            if degrees % 90 != 0 || degrees >= 360 {
                return Err("Display orientation must be 0, 90, 180 or 270".to_string());
            }
        }
        if self.preview_buffer_size == Some(0) {
            return Err("Preview buffer size must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.camera_id, 0);
        assert_eq!(config.facing, Facing::Back);
        assert!(config.preferred_fps.is_none());
        assert!(config.display_orientation.is_none());
        assert!(!config.handle_surface_events);
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new(1, Facing::Front)
            .with_preferred_fps(FpsRange::from_fps(15, 30))
            .with_preview_format(PixelFormat::Yv12)
            .with_auto_focus(true)
            .with_surface_events(true);
        assert_eq!(config.camera_id, 1);
        assert_eq!(config.preferred_fps, Some(FpsRange::from_fps(15, 30)));
        assert_eq!(config.preview_format, Some(PixelFormat::Yv12));
        assert!(config.auto_focus);
        assert!(config.handle_surface_events);
    }

    #[test]
    fn test_config_validation() {
        assert!(SessionConfig::default().validate().is_ok());

        let bad_fps = SessionConfig::default().with_preferred_fps(FpsRange::from_fps(30, 15));
        assert!(bad_fps.validate().is_err());

        let bad_orientation = SessionConfig::default().with_display_orientation(45);
        assert!(bad_orientation.validate().is_err());

        let bad_buffer = SessionConfig::default().with_preview_buffer_size(0);
        assert!(bad_buffer.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("nested").join("camsession.toml");

        let config = SessionConfig::new(1, Facing::Front)
            .with_preferred_preview_size(PreviewSize::new(1280, 720))
            .with_display_orientation(90);
        config.save_to_file(&config_path).unwrap();

        let loaded = SessionConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SessionConfig = toml::from_str("camera_id = 2\nauto_focus = true\n").unwrap();
        assert_eq!(config.camera_id, 2);
        assert!(config.auto_focus);
        assert_eq!(config.facing, Facing::Back);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = SessionConfig::load_from_file("nonexistent_camsession.toml");
        assert_eq!(result.unwrap(), SessionConfig::default());
    }
}
