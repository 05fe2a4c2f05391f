use std::fmt;

/// Failure reported by the hardware camera layer, the capability negotiator
/// or the configuration loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    OpenFailed(String),
    Hardware(String),
    InvalidParameter(String),
    Unsupported(String),
    Released(String),
    Config(String),
}

impl CameraError {
    /// The bare message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            CameraError::OpenFailed(msg)
            | CameraError::Hardware(msg)
            | CameraError::InvalidParameter(msg)
            | CameraError::Unsupported(msg)
            | CameraError::Released(msg)
            | CameraError::Config(msg) => msg,
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CameraError::OpenFailed(msg) => write!(f, "Camera open error: {}", msg),
            CameraError::Hardware(msg) => write!(f, "Camera hardware error: {}", msg),
            CameraError::InvalidParameter(msg) => write!(f, "Invalid camera parameter: {}", msg),
            CameraError::Unsupported(msg) => write!(f, "Unsupported operation: {}", msg),
            CameraError::Released(msg) => write!(f, "Camera already released: {}", msg),
            CameraError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
