//! Collaborators the controller drives: permissions, camera, and gallery.
//!
//! Platform layers implement these traits. Completion of a picture or a
//! gallery selection is reported once, through a single-shot reply handle,
//! from whatever thread the platform calls back on.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Permissions a camera capture may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Camera,
    /// Older devices also needed write access to save the photo.
    WriteStorage,
}

impl Permission {
    /// Get the human-readable name of this permission
    pub fn name(&self) -> &'static str {
        match self {
            Permission::Camera => "Camera",
            Permission::WriteStorage => "Storage",
        }
    }
}

/// Which camera the preview is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensFacing {
    #[default]
    Back,
    Front,
}

impl LensFacing {
    pub fn toggled(self) -> Self {
        match self {
            LensFacing::Back => LensFacing::Front,
            LensFacing::Front => LensFacing::Back,
        }
    }
}

/// Grants or denies runtime permissions.
pub trait PermissionGate {
    fn is_granted(&self, permission: Permission) -> bool;

    /// Ask the user. The answer comes back through
    /// [`crate::CaptureController::permission_result`].
    fn request(&mut self, permissions: &[Permission]);
}

/// Camera preview and still capture.
pub trait CameraHardware {
    /// Bind (or rebind) the live preview to a lens.
    fn bind_preview(&mut self, lens: LensFacing);

    fn release_preview(&mut self);

    /// Take a still picture. The encoded bytes, or the failure, are sent
    /// through `reply`. Dropping `reply` counts as a failure.
    fn take_picture(&mut self, lens: LensFacing, reply: HardwareReply);
}

/// System image picker.
pub trait FilePicker {
    /// Show the picker. Dropping `reply` counts as a cancellation.
    fn open(&mut self, reply: PickerReply);
}

pub(crate) type HardwareResult = Result<Vec<u8>, String>;

/// Single-shot completion handle for a still capture.
#[derive(Debug)]
pub struct HardwareReply(oneshot::Sender<HardwareResult>);

impl HardwareReply {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<HardwareResult>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    pub fn succeed(self, bytes: Vec<u8>) {
        // Receiver gone means the controller stopped waiting (timeout)
        let _ = self.0.send(Ok(bytes));
    }

    pub fn fail(self, reason: impl Into<String>) {
        let _ = self.0.send(Err(reason.into()));
    }
}

/// Single-shot completion handle for a gallery selection.
#[derive(Debug)]
pub struct PickerReply(oneshot::Sender<Option<Vec<u8>>>);

impl PickerReply {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Option<Vec<u8>>>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    pub fn select(self, bytes: Vec<u8>) {
        let _ = self.0.send(Some(bytes));
    }

    pub fn cancel(self) {
        let _ = self.0.send(None);
    }
}
