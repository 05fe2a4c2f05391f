#[cfg(test)]
mod error_tests {
    use camsession::errors::CameraError;
    use camsession::session::{
        BindSurfaceError, OpenCameraError, OpenFailedReason, StartPreviewError,
    };
    use std::error::Error;

    #[test]
    fn test_camera_error_display_trait() {
        let error = CameraError::Hardware("Display test".to_string());
        assert_eq!(format!("{}", error), "Camera hardware error: Display test");
        assert_eq!(error.message(), "Display test");
    }

    #[test]
    fn test_camera_error_debug_format() {
        let error = CameraError::OpenFailed("Debug test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("OpenFailed"));
        assert!(debug_str.contains("Debug test"));
    }

    #[test]
    fn test_all_error_variants() {
        let errors = vec![
            CameraError::OpenFailed("open".to_string()),
            CameraError::Hardware("hardware".to_string()),
            CameraError::InvalidParameter("parameter".to_string()),
            CameraError::Unsupported("unsupported".to_string()),
            CameraError::Released("released".to_string()),
            CameraError::Config("config".to_string()),
        ];
        for error in &errors {
            let text = error.to_string();
            assert!(text.ends_with(error.message()), "{}", text);
            assert!(error.source().is_none());
        }
    }

    #[test]
    fn test_open_error_carries_step_and_cause() {
        let cause = CameraError::Hardware("rejected".to_string());
        let error = OpenCameraError::new(OpenFailedReason::SetParameterFailed, Some(cause.clone()));
        assert_eq!(
            error.to_string(),
            "open camera failed: could not commit camera parameters"
        );
        assert_eq!(error.source().map(|s| s.to_string()), Some(cause.to_string()));

        let bare = OpenCameraError::new(OpenFailedReason::GetParameterFailed, None);
        assert!(bare.source().is_none());
    }

    #[test]
    fn test_every_open_reason_has_text() {
        let reasons = [
            OpenFailedReason::ParameterError,
            OpenFailedReason::OpenFailed,
            OpenFailedReason::GetParameterFailed,
            OpenFailedReason::SetFpsFailed,
            OpenFailedReason::SetPreviewSizeFailed,
            OpenFailedReason::SetPreviewFormatFailed,
            OpenFailedReason::SetAutoFocusFailed,
            OpenFailedReason::SetParameterFailed,
            OpenFailedReason::SetDisplayOrientationFailed,
        ];
        let mut texts: Vec<String> = reasons.iter().map(|r| r.to_string()).collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), reasons.len());
    }

    #[test]
    fn test_bind_and_preview_errors() {
        let bind = BindSurfaceError {
            message: "surface gone".to_string(),
            cause: None,
        };
        assert_eq!(bind.to_string(), "bind surface failed: surface gone");
        assert!(bind.source().is_none());

        let preview = StartPreviewError {
            message: "busy".to_string(),
            cause: Some(CameraError::Hardware("busy".to_string())),
        };
        assert_eq!(preview.to_string(), "start preview failed: busy");
        assert!(preview.source().is_some());
    }
}
