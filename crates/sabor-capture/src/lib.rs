//! Sabor Capture - camera and gallery acquisition for recipe images
//!
//! [`CaptureController`] sequences permission requests, preview, still
//! capture and gallery selection, then hands the bytes to
//! [`sabor_core::ImagePipeline`] on the blocking pool. The platform side
//! plugs in through the traits in [`devices`].
//!
//! ```text
//! request_capture -> [permission_result] -> shutter_pressed -> resolve().await
//! pick_from_gallery -> resolve().await
//! ```

pub mod config;
pub mod controller;
pub mod devices;
pub mod error;
pub mod state;

pub use config::CaptureConfig;
pub use controller::{CaptureController, CaptureOutcome};
pub use devices::{
    CameraHardware, FilePicker, HardwareReply, LensFacing, Permission, PermissionGate,
    PickerReply,
};
pub use error::{CaptureError, FailureReason};
pub use state::CaptureState;
