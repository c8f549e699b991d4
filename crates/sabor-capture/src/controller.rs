//! Capture controller state machine.
//!
//! One controller owns at most one capture or gallery selection at a time.
//! Actions that don't fit the current state are rejected without side
//! effects, never queued. Platform callbacks arrive through single-shot
//! reply handles; [`CaptureController::resolve`] awaits the in-flight one,
//! runs the image pipeline on the blocking pool, and returns to `Idle`.

use log::{debug, info, warn};
use sabor_core::{AssetSource, ImagePipeline, ImageRef, RawImageAsset, TransportPayload};
use tokio::sync::{broadcast, oneshot};

use crate::config::CaptureConfig;
use crate::devices::{
    CameraHardware, FilePicker, HardwareReply, HardwareResult, LensFacing, PermissionGate,
    PickerReply,
};
use crate::error::CaptureError;
use crate::state::CaptureState;

const TRANSITION_BUFFER: usize = 32;

/// Result of a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The pipeline produced a payload for the recipe.
    Attached(TransportPayload),
    /// The user backed out of the gallery.
    Cancelled,
}

impl CaptureOutcome {
    pub fn payload(&self) -> Option<&TransportPayload> {
        match self {
            CaptureOutcome::Attached(payload) => Some(payload),
            CaptureOutcome::Cancelled => None,
        }
    }

    /// The image field value for the recipe, if anything was attached.
    pub fn into_image_ref(self) -> Option<ImageRef> {
        match self {
            CaptureOutcome::Attached(payload) => Some(ImageRef::from(payload)),
            CaptureOutcome::Cancelled => None,
        }
    }
}

enum InFlight {
    Camera(oneshot::Receiver<HardwareResult>),
    Gallery(oneshot::Receiver<Option<Vec<u8>>>),
}

/// Borrow of the controller for one `resolve` call. Dropping it while the
/// attempt is still waiting or processing abandons the attempt.
struct Attempt<'a, P, C, F>
where
    P: PermissionGate,
    C: CameraHardware,
    F: FilePicker,
{
    controller: &'a mut CaptureController<P, C, F>,
}

impl<P, C, F> Drop for Attempt<'_, P, C, F>
where
    P: PermissionGate,
    C: CameraHardware,
    F: FilePicker,
{
    fn drop(&mut self) {
        if matches!(
            self.controller.state,
            CaptureState::Capturing | CaptureState::Captured | CaptureState::GallerySelecting
        ) {
            self.controller.abandon();
        }
    }
}

/// Drives camera and gallery sources into the image pipeline.
pub struct CaptureController<P, C, F> {
    config: CaptureConfig,
    pipeline: ImagePipeline,
    permissions: P,
    camera: C,
    picker: F,
    state: CaptureState,
    lens: LensFacing,
    /// A lens switch requested mid-capture, applied once it resolves.
    deferred_switch: bool,
    in_flight: Option<InFlight>,
    transitions: broadcast::Sender<CaptureState>,
}

impl<P, C, F> CaptureController<P, C, F>
where
    P: PermissionGate,
    C: CameraHardware,
    F: FilePicker,
{
    pub fn new(config: CaptureConfig, permissions: P, camera: C, picker: F) -> Self {
        let (transitions, _) = broadcast::channel(TRANSITION_BUFFER);
        Self {
            pipeline: ImagePipeline::new(config.pipeline.clone()),
            lens: config.initial_lens,
            config,
            permissions,
            camera,
            picker,
            state: CaptureState::Idle,
            deferred_switch: false,
            in_flight: None,
            transitions,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// The lens the preview is (or will next be) bound to.
    pub fn lens(&self) -> LensFacing {
        self.lens
    }

    /// Every state the controller enters, including transient ones.
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureState> {
        self.transitions.subscribe()
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn picker(&self) -> &F {
        &self.picker
    }

    pub fn permissions(&self) -> &P {
        &self.permissions
    }

    /// Start a camera capture: open the preview, asking for permission first
    /// if it hasn't been granted.
    pub fn request_capture(&mut self) -> Result<(), CaptureError> {
        self.require(CaptureState::Idle, "start a capture")?;

        let required = self.config.required_permissions();
        if required.iter().all(|p| self.permissions.is_granted(*p)) {
            self.open_preview();
        } else {
            debug!(
                "Requesting permissions: {:?}",
                required.iter().map(|p| p.name()).collect::<Vec<_>>()
            );
            self.permissions.request(&required);
            self.set_state(CaptureState::PermissionPending);
        }
        Ok(())
    }

    /// Deliver the user's answer to a permission request.
    ///
    /// A denial ends the attempt; the error is returned and the controller
    /// is back in `Idle`.
    pub fn permission_result(&mut self, granted: bool) -> Result<(), CaptureError> {
        self.require(CaptureState::PermissionPending, "accept a permission result")?;

        if granted {
            self.open_preview();
            Ok(())
        } else {
            Err(self.fail(CaptureError::PermissionDenied))
        }
    }

    /// Toggle between front and back cameras.
    ///
    /// While previewing the preview is rebound at once. While a picture is
    /// being taken the switch is deferred until the capture resolves.
    /// Returns the lens that is, or will be, selected.
    pub fn switch_source(&mut self) -> Result<LensFacing, CaptureError> {
        match self.state {
            CaptureState::PreviewActive => {
                self.lens = self.lens.toggled();
                self.camera.bind_preview(self.lens);
                debug!("Preview rebound to {:?}", self.lens);
                Ok(self.lens)
            }
            CaptureState::Capturing => {
                self.deferred_switch = !self.deferred_switch;
                debug!("Lens switch deferred until capture resolves");
                Ok(if self.deferred_switch {
                    self.lens.toggled()
                } else {
                    self.lens
                })
            }
            _ => Err(self.rejected("switch camera")),
        }
    }

    /// Take a picture with the current lens.
    pub fn shutter_pressed(&mut self) -> Result<(), CaptureError> {
        self.require(CaptureState::PreviewActive, "press shutter")?;

        let (reply, rx) = HardwareReply::channel();
        self.in_flight = Some(InFlight::Camera(rx));
        self.set_state(CaptureState::Capturing);
        self.camera.take_picture(self.lens, reply);
        Ok(())
    }

    /// Open the gallery picker.
    pub fn pick_from_gallery(&mut self) -> Result<(), CaptureError> {
        self.require(CaptureState::Idle, "open the gallery")?;

        let (reply, rx) = PickerReply::channel();
        self.in_flight = Some(InFlight::Gallery(rx));
        self.set_state(CaptureState::GallerySelecting);
        self.picker.open(reply);
        Ok(())
    }

    /// Abandon the attempt before anything has been captured.
    pub fn cancel(&mut self) -> Result<(), CaptureError> {
        match self.state {
            CaptureState::PermissionPending => {}
            CaptureState::PreviewActive => self.camera.release_preview(),
            CaptureState::GallerySelecting => self.in_flight = None,
            _ => return Err(self.rejected("cancel")),
        }
        self.set_state(CaptureState::Idle);
        Ok(())
    }

    /// Wait for the in-flight capture or selection and process it.
    ///
    /// Camera callbacks are bounded by the configured hardware timeout.
    /// Whatever happens, the controller ends in `Idle`, including when the
    /// returned future is dropped before it completes: the attempt is then
    /// abandoned, the preview released, and any late reply discarded.
    pub async fn resolve(&mut self) -> Result<CaptureOutcome, CaptureError> {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) => in_flight,
            None => return Err(self.rejected("resolve")),
        };

        let mut attempt = Attempt { controller: self };
        let outcome = attempt.controller.complete(in_flight).await;
        drop(attempt);
        outcome
    }

    async fn complete(&mut self, in_flight: InFlight) -> Result<CaptureOutcome, CaptureError> {
        let asset = match in_flight {
            InFlight::Camera(rx) => {
                let result = self.await_camera(rx).await;
                self.finish_camera();
                match result {
                    Ok(bytes) => RawImageAsset::new(bytes, AssetSource::Camera),
                    Err(e) => return Err(self.fail(e)),
                }
            }
            InFlight::Gallery(rx) => match rx.await {
                Ok(Some(bytes)) => RawImageAsset::new(bytes, AssetSource::Gallery),
                Ok(None) | Err(_) => {
                    debug!("Gallery selection cancelled");
                    self.set_state(CaptureState::Idle);
                    return Ok(CaptureOutcome::Cancelled);
                }
            },
        };

        self.set_state(CaptureState::Captured);

        let pipeline = self.pipeline.clone();
        let processed = tokio::task::spawn_blocking(move || pipeline.normalize(&asset)).await;

        match processed {
            Ok(Ok(payload)) => {
                info!("Image attached ({} chars)", payload.len());
                self.set_state(CaptureState::Idle);
                Ok(CaptureOutcome::Attached(payload))
            }
            Ok(Err(e)) => Err(self.fail(e.into())),
            Err(e) => Err(self.fail(CaptureError::ProcessingAborted(e.to_string()))),
        }
    }

    /// Reset after `resolve` was dropped mid-await.
    fn abandon(&mut self) {
        warn!("Capture attempt abandoned while {}", self.state.name());
        if self.state == CaptureState::Capturing {
            self.finish_camera();
        }
        self.in_flight = None;
        self.set_state(CaptureState::Idle);
    }

    async fn await_camera(
        &self,
        rx: oneshot::Receiver<HardwareResult>,
    ) -> Result<Vec<u8>, CaptureError> {
        let received = match self.config.hardware_timeout() {
            Some(limit) => tokio::time::timeout(limit, rx).await.map_err(|_| {
                CaptureError::HardwareCaptureFailure(format!(
                    "no response from camera within {:?}",
                    limit
                ))
            })?,
            None => rx.await,
        };

        match received {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(reason)) => Err(CaptureError::HardwareCaptureFailure(reason)),
            Err(_) => Err(CaptureError::HardwareCaptureFailure(
                "camera dropped the capture callback".to_string(),
            )),
        }
    }

    /// Leave camera mode once a capture resolves, applying any deferred
    /// lens switch so the next preview opens on the requested lens.
    fn finish_camera(&mut self) {
        if std::mem::take(&mut self.deferred_switch) {
            self.lens = self.lens.toggled();
            debug!("Applied deferred lens switch: {:?}", self.lens);
        }
        self.camera.release_preview();
    }

    fn open_preview(&mut self) {
        self.camera.bind_preview(self.lens);
        self.set_state(CaptureState::PreviewActive);
    }

    fn require(&self, state: CaptureState, action: &'static str) -> Result<(), CaptureError> {
        if self.state == state {
            Ok(())
        } else {
            Err(self.rejected(action))
        }
    }

    fn rejected(&self, action: &'static str) -> CaptureError {
        debug!("Rejected '{}' while {}", action, self.state.name());
        CaptureError::Rejected {
            action,
            state: self.state.name(),
        }
    }

    /// Publish `Failed`, then reset to `Idle` and hand the error back.
    fn fail(&mut self, error: CaptureError) -> CaptureError {
        warn!("Capture attempt failed: {}", error);
        if let Some(reason) = error.reason() {
            self.set_state(CaptureState::Failed(reason));
        }
        self.in_flight = None;
        self.set_state(CaptureState::Idle);
        error
    }

    fn set_state(&mut self, next: CaptureState) {
        debug!("Capture state: {} -> {}", self.state.name(), next.name());
        self.state = next;
        // No subscribers is fine
        let _ = self.transitions.send(next);
    }
}
