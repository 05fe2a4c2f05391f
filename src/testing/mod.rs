//! Testing utilities
//!
//! Fake camera driver, device and surfaces plus synthetic preview frames for
//! exercising sessions without hardware.

pub mod fake;
pub mod synthetic_data;

pub use fake::{default_parameters, FakeDevice, FakeDriver, FakeTextureSurface, FakeWindowSurface};
pub use synthetic_data::{fill_preview_frame, synthetic_preview_frame};
