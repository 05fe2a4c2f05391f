//! camsession: camera session lifecycle and preview frame delivery
//!
//! This crate drives one hardware camera through its preview lifecycle:
//! opening the device, negotiating capture parameters, binding a windowed or
//! texture-backed presentation target, starting and stopping preview, and
//! delivering raw preview frames to listeners through a recycled buffer pool.
//!
//! # Features
//! - Ordered parameter negotiation with a distinct failure reason per step
//! - Deferred preview start until the bound surface reports it is ready
//! - Fixed-size callback buffer pool, never reallocated while open
//! - Pluggable hardware driver and capability negotiator
//! - Fake driver and surfaces for testing without hardware
//!
//! # Usage
//! ```rust,ignore
//! use camsession::{CameraSession, ClosestMatch, SessionConfig};
//! use std::sync::Arc;
//!
//! let mut session = CameraSession::new(driver, Arc::new(ClosestMatch::default()))
//!     .with_config(SessionConfig::default().with_surface_events(true));
//! if !session.open() {
//!     eprintln!("{:?}", session.open_error());
//! }
//! session.bind_texture(texture);
//! session.install_preview_callback(Arc::new(|frame: &[u8]| println!("{} bytes", frame.len())));
//! session.start_preview();
//! ```
pub mod config;
pub mod errors;
pub mod negotiate;
pub mod platform;
pub mod session;
pub mod surface;
pub mod types;

// Testing utilities - fake hardware for offline testing
pub mod testing;

// Re-exports for convenience
pub use config::SessionConfig;
pub use errors::CameraError;
pub use negotiate::{CapabilityNegotiator, ClosestMatch};
pub use platform::{CameraDevice, CameraDriver, CameraParameters, PreviewCallback};
pub use session::{
    BindSurfaceError, CameraSession, NegotiatedParameters, OpenCameraError, OpenFailedReason,
    PreviewFrameListener, SessionState, StartPreviewError,
};
pub use surface::{PreviewTarget, SurfaceListener, TextureSurface, WindowSurface};
pub use types::{CameraInfo, Facing, FocusMode, FpsRange, PixelFormat, PreviewSize, Rotation};

/// Initialize logging for the camera session
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "camsession=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_name() {
        assert_eq!(NAME, "camsession");
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
