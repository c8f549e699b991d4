//! Error types for capture operations.

use sabor_core::PipelineError;
use thiserror::Error;

/// Errors surfaced by the capture controller.
///
/// `PermissionDenied` and `HardwareCaptureFailure` are retryable by starting
/// a new capture. Pipeline failures only cost the image; the recipe can be
/// submitted without one.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The user declined a required permission.
    #[error("Camera permission denied")]
    PermissionDenied,

    /// The camera reported a failure, dropped its callback, or timed out.
    #[error("Capture failed: {0}")]
    HardwareCaptureFailure(String),

    /// The captured image could not be processed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The processing worker panicked or was cancelled.
    #[error("Image processing aborted: {0}")]
    ProcessingAborted(String),

    /// The action is not valid in the current state. Nothing changed.
    #[error("Cannot {action} while {state}")]
    Rejected {
        action: &'static str,
        state: &'static str,
    },
}

impl CaptureError {
    /// The failure category published with the `Failed` state, if this
    /// error ends an attempt.
    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            CaptureError::PermissionDenied => Some(FailureReason::PermissionDenied),
            CaptureError::HardwareCaptureFailure(_) => Some(FailureReason::HardwareCaptureFailure),
            CaptureError::Pipeline(PipelineError::Encoding(_)) => {
                Some(FailureReason::EncodingError)
            }
            CaptureError::Pipeline(PipelineError::Decode(_)) => Some(FailureReason::DecodeError),
            // Raster disagreeing with its own dimensions
            CaptureError::Pipeline(PipelineError::Transform(_)) => {
                Some(FailureReason::EncodingError)
            }
            CaptureError::ProcessingAborted(_) => Some(FailureReason::EncodingError),
            CaptureError::Rejected { .. } => None,
        }
    }
}

/// Why an attempt ended in the `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    PermissionDenied,
    HardwareCaptureFailure,
    EncodingError,
    DecodeError,
}
