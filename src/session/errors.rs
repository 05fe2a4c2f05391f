use crate::errors::CameraError;
use std::fmt;
use thiserror::Error;

/// Which step of [`CameraSession::open`](super::CameraSession::open) failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenFailedReason {
    /// No configuration was set, or it failed validation
    ParameterError,
    OpenFailed,
    GetParameterFailed,
    SetFpsFailed,
    SetPreviewSizeFailed,
    SetPreviewFormatFailed,
    SetAutoFocusFailed,
    /// The final commit of the whole parameter set was rejected
    SetParameterFailed,
    SetDisplayOrientationFailed,
}

impl fmt::Display for OpenFailedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            OpenFailedReason::ParameterError => "missing or invalid session configuration",
            OpenFailedReason::OpenFailed => "could not open camera device",
            OpenFailedReason::GetParameterFailed => "could not read camera parameters",
            OpenFailedReason::SetFpsFailed => "could not set preview fps range",
            OpenFailedReason::SetPreviewSizeFailed => "could not set preview size",
            OpenFailedReason::SetPreviewFormatFailed => "could not set preview format",
            OpenFailedReason::SetAutoFocusFailed => "could not set auto focus mode",
            OpenFailedReason::SetParameterFailed => "could not commit camera parameters",
            OpenFailedReason::SetDisplayOrientationFailed => "could not set display orientation",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("open camera failed: {reason}")]
pub struct OpenCameraError {
    pub reason: OpenFailedReason,
    #[source]
    pub cause: Option<CameraError>,
}

impl OpenCameraError {
    pub fn new(reason: OpenFailedReason, cause: Option<CameraError>) -> Self {
        Self { reason, cause }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("bind surface failed: {message}")]
pub struct BindSurfaceError {
    pub message: String,
    #[source]
    pub cause: Option<CameraError>,
}

impl BindSurfaceError {
    pub(crate) fn from_cause(cause: CameraError) -> Self {
        Self {
            message: cause.message().to_string(),
            cause: Some(cause),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("start preview failed: {message}")]
pub struct StartPreviewError {
    pub message: String,
    #[source]
    pub cause: Option<CameraError>,
}

impl StartPreviewError {
    pub(crate) fn from_cause(cause: CameraError) -> Self {
        Self {
            message: cause.message().to_string(),
            cause: Some(cause),
        }
    }
}
