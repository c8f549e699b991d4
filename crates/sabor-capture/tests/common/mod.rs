//! Scriptable platform doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;

use sabor_capture::{
    CameraHardware, CaptureConfig, CaptureController, FilePicker, HardwareReply, LensFacing,
    Permission, PermissionGate, PickerReply,
};
use sabor_core::{compress, RasterBuffer};

/// What the camera does when the shutter fires.
pub enum Shot {
    /// Deliver bytes from a platform thread.
    Deliver(Vec<u8>),
    Fail(&'static str),
    /// Drop the callback without answering.
    Drop,
    /// Keep the callback and never answer.
    Hold,
}

/// What the picker does when opened.
pub enum Pick {
    Select(Vec<u8>),
    Cancel,
    Drop,
}

#[derive(Clone, Default)]
pub struct Permissions {
    pub granted: Arc<Mutex<bool>>,
    pub requested: Arc<Mutex<Vec<Vec<Permission>>>>,
}

impl Permissions {
    pub fn granted() -> Self {
        let permissions = Self::default();
        *permissions.granted.lock().unwrap() = true;
        permissions
    }
}

impl PermissionGate for Permissions {
    fn is_granted(&self, _permission: Permission) -> bool {
        *self.granted.lock().unwrap()
    }

    fn request(&mut self, permissions: &[Permission]) {
        self.requested.lock().unwrap().push(permissions.to_vec());
    }
}

#[derive(Default)]
pub struct CameraLog {
    pub bound: Vec<LensFacing>,
    pub released: usize,
    pub shots: Vec<LensFacing>,
    pub held: Vec<HardwareReply>,
}

#[derive(Clone, Default)]
pub struct Camera {
    pub log: Arc<Mutex<CameraLog>>,
    pub script: Arc<Mutex<VecDeque<Shot>>>,
}

impl Camera {
    pub fn scripted(shots: impl IntoIterator<Item = Shot>) -> Self {
        let camera = Self::default();
        camera.script.lock().unwrap().extend(shots);
        camera
    }
}

impl CameraHardware for Camera {
    fn bind_preview(&mut self, lens: LensFacing) {
        self.log.lock().unwrap().bound.push(lens);
    }

    fn release_preview(&mut self) {
        self.log.lock().unwrap().released += 1;
    }

    fn take_picture(&mut self, lens: LensFacing, reply: HardwareReply) {
        self.log.lock().unwrap().shots.push(lens);
        match self.script.lock().unwrap().pop_front().unwrap_or(Shot::Hold) {
            Shot::Deliver(bytes) => {
                thread::spawn(move || reply.succeed(bytes));
            }
            Shot::Fail(reason) => reply.fail(reason),
            Shot::Drop => drop(reply),
            Shot::Hold => self.log.lock().unwrap().held.push(reply),
        }
    }
}

#[derive(Clone, Default)]
pub struct Picker {
    pub opened: Arc<Mutex<usize>>,
    pub script: Arc<Mutex<VecDeque<Pick>>>,
}

impl Picker {
    pub fn scripted(picks: impl IntoIterator<Item = Pick>) -> Self {
        let picker = Self::default();
        picker.script.lock().unwrap().extend(picks);
        picker
    }
}

impl FilePicker for Picker {
    fn open(&mut self, reply: PickerReply) {
        *self.opened.lock().unwrap() += 1;
        match self.script.lock().unwrap().pop_front().unwrap_or(Pick::Cancel) {
            Pick::Select(bytes) => {
                thread::spawn(move || reply.select(bytes));
            }
            Pick::Cancel => reply.cancel(),
            Pick::Drop => drop(reply),
        }
    }
}

pub type TestController = CaptureController<Permissions, Camera, Picker>;

pub fn controller(permissions: Permissions, camera: Camera, picker: Picker) -> TestController {
    CaptureController::new(CaptureConfig::default(), permissions, camera, picker)
}

/// Horizontal/vertical gradient with a bright block in the top-left
/// quarter of the blue channel, so a wrong rotation shows up as a large
/// pixel difference rather than a subtle one.
pub fn marked_gradient(width: u32, height: u32) -> RasterBuffer {
    let mut pixels = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push((x * 255 / width.max(1)) as u8);
            pixels.push((y * 255 / height.max(1)) as u8);
            pixels.push(if x < width / 4 && y < height / 4 { 255 } else { 40 });
        }
    }
    RasterBuffer::new(width, height, pixels)
}

pub fn jpeg_bytes(raster: &RasterBuffer) -> Vec<u8> {
    compress(raster, 95).unwrap().bytes
}
