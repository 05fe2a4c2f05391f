//! Capability negotiation
//!
//! Maps the caller's preferences onto what a device actually supports. The
//! session only depends on the [`CapabilityNegotiator`] trait; [`ClosestMatch`]
//! is the stock implementation.

use crate::errors::CameraError;
use crate::platform::{CameraDriver, CameraParameters};
use crate::types::{Facing, FpsRange, PreviewSize, Rotation};

pub trait CapabilityNegotiator: Send + Sync {
    /// Closest fps range the device supports.
    fn closest_fps_range(
        &self,
        parameters: &CameraParameters,
        preferred: FpsRange,
    ) -> Result<FpsRange, CameraError>;

    /// Closest preview size the device supports.
    fn closest_preview_size(
        &self,
        parameters: &CameraParameters,
        preferred: PreviewSize,
    ) -> Result<PreviewSize, CameraError>;

    /// Display orientation in degrees for an upright portrait preview.
    fn display_orientation(
        &self,
        driver: &dyn CameraDriver,
        camera_id: u32,
        facing: Facing,
    ) -> Result<u32, CameraError>;
}

/// Picks the supported value with the smallest absolute distance to the
/// preference. The first candidate wins ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosestMatch {
    pub display_rotation: Rotation,
}

impl ClosestMatch {
    pub fn new(display_rotation: Rotation) -> Self {
        Self { display_rotation }
    }
}

impl CapabilityNegotiator for ClosestMatch {
    fn closest_fps_range(
        &self,
        parameters: &CameraParameters,
        preferred: FpsRange,
    ) -> Result<FpsRange, CameraError> {
        parameters
            .supported_fps_ranges()
            .iter()
            .min_by_key(|r| {
                u64::from(r.min.abs_diff(preferred.min)) + u64::from(r.max.abs_diff(preferred.max))
            })
            .copied()
            .ok_or_else(|| CameraError::Unsupported("device reports no fps ranges".to_string()))
    }

    fn closest_preview_size(
        &self,
        parameters: &CameraParameters,
        preferred: PreviewSize,
    ) -> Result<PreviewSize, CameraError> {
        let sizes = parameters.supported_preview_sizes();
        if sizes.contains(&preferred) {
            return Ok(preferred);
        }
        sizes
            .iter()
            .min_by_key(|s| {
                u64::from(s.width.abs_diff(preferred.width))
                    + u64::from(s.height.abs_diff(preferred.height))
            })
            .copied()
            .ok_or_else(|| CameraError::Unsupported("device reports no preview sizes".to_string()))
    }

    fn display_orientation(
        &self,
        driver: &dyn CameraDriver,
        camera_id: u32,
        facing: Facing,
    ) -> Result<u32, CameraError> {
        let info = driver.camera_info(camera_id)?;
        let rotation = self.display_rotation.degrees();
        let degrees = match facing {
            // front sensors are mirrored
            Facing::Front => (360 - (info.orientation + rotation) % 360) % 360,
            Facing::Back => (info.orientation + 360 - rotation) % 360,
        };
        log::debug!(
            "Display orientation for camera {} ({:?}, sensor {}, rotation {}): {}",
            camera_id,
            facing,
            info.orientation,
            rotation,
            degrees
        );
        Ok(degrees)
    }
}
