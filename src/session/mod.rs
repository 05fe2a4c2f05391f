//! Camera session state machine
//!
//! A [`CameraSession`] walks a single camera through
//! open → bind surface → start preview → close, records why each phase
//! failed, and fans preview frames out to registered listeners through a
//! small recycled buffer pool.

pub mod buffers;
pub mod errors;
#[allow(clippy::module_inception)]
pub mod session;

pub use buffers::{preview_buffer_size, BufferPool, CALLBACK_BUFFER_COUNT};
pub use errors::{BindSurfaceError, OpenCameraError, OpenFailedReason, StartPreviewError};
pub use session::{CameraSession, NegotiatedParameters, PreviewFrameListener, SessionState};
