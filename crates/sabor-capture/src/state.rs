//! Capture controller states.

use crate::error::FailureReason;

/// Where the controller is in a capture attempt.
///
/// ```text
/// Idle -> PermissionPending -> PreviewActive -> Capturing -> Captured -> Idle
/// Idle -> PreviewActive (permission already granted)
/// Idle -> GallerySelecting -> Captured -> Idle
///      -> Failed(reason) -> Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    PermissionPending,
    PreviewActive,
    Capturing,
    /// Image bytes are in hand and the pipeline is running.
    Captured,
    GallerySelecting,
    Failed(FailureReason),
}

impl CaptureState {
    /// Short name used in logs and rejection errors.
    pub fn name(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::PermissionPending => "waiting for permission",
            CaptureState::PreviewActive => "previewing",
            CaptureState::Capturing => "capturing",
            CaptureState::Captured => "processing",
            CaptureState::GallerySelecting => "selecting from gallery",
            CaptureState::Failed(_) => "failed",
        }
    }

    /// True while a capture or selection is in flight.
    pub fn is_busy(&self) -> bool {
        !matches!(self, CaptureState::Idle)
    }
}
