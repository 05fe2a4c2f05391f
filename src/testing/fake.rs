//! In-memory camera stack
//!
//! [`FakeDriver`] and [`FakeDevice`] implement the hardware seam, record every
//! call and let a test inject failures per method. Frames are produced on
//! demand with [`FakeDevice::deliver_frame`]. The fake surfaces emit their
//! lifecycle callbacks when told to.

use crate::errors::CameraError;
use crate::platform::{
    CameraDevice, CameraDriver, CameraParameters, PreviewCallback, SurfaceHandle, TextureHandle,
};
use crate::surface::{TextureListener, TextureSurface, WindowSurface, WindowSurfaceCallback};
use crate::testing::synthetic_data::fill_preview_frame;
use crate::types::{CameraInfo, FocusMode, FpsRange, PixelFormat, PreviewSize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Parameters of a typical phone sensor: 640x480 NV21 by default.
pub fn default_parameters() -> CameraParameters {
    CameraParameters::new(PreviewSize::new(640, 480), PixelFormat::Nv21)
        .with_supported_fps_ranges(vec![
            FpsRange::from_fps(7, 15),
            FpsRange::from_fps(15, 30),
            FpsRange::from_fps(30, 30),
        ])
        .with_supported_preview_sizes(vec![
            PreviewSize::new(1920, 1080),
            PreviewSize::new(1280, 720),
            PreviewSize::new(640, 480),
            PreviewSize::new(320, 240),
        ])
        .with_supported_preview_formats(vec![PixelFormat::Nv21, PixelFormat::Yv12])
        .with_supported_focus_modes(Some(vec![
            FocusMode::Auto,
            FocusMode::ContinuousVideo,
            FocusMode::Fixed,
        ]))
}

struct DeviceState {
    parameters: Option<CameraParameters>,
    failures: HashMap<&'static str, CameraError>,
    calls: Vec<&'static str>,
    queued: VecDeque<Vec<u8>>,
    callback: Option<Arc<dyn PreviewCallback>>,
    committed: Option<CameraParameters>,
    orientation: Option<u32>,
    surface: Option<SurfaceHandle>,
    texture: Option<TextureHandle>,
    frames: u64,
}

/// A fake opened camera. Clones share state, so a test can keep one clone
/// while the session owns another.
#[derive(Clone)]
pub struct FakeDevice {
    state: Arc<Mutex<DeviceState>>,
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self::new(Some(default_parameters()))
    }
}

impl FakeDevice {
    /// `None` makes `parameters()` return an absent snapshot.
    pub fn new(parameters: Option<CameraParameters>) -> Self {
        Self {
            state: Arc::new(Mutex::new(DeviceState {
                parameters,
                failures: HashMap::new(),
                calls: Vec::new(),
                queued: VecDeque::new(),
                callback: None,
                committed: None,
                orientation: None,
                surface: None,
                texture: None,
                frames: 0,
            })),
        }
    }

    /// Make every later call to `method` fail with `error`.
    pub fn fail_on(&self, method: &'static str, error: CameraError) {
        lock(&self.state).failures.insert(method, error);
    }

    pub fn clear_failure(&self, method: &'static str) {
        lock(&self.state).failures.remove(method);
    }

    /// How many times `method` was called.
    pub fn calls(&self, method: &str) -> usize {
        lock(&self.state).calls.iter().filter(|c| **c == method).count()
    }

    pub fn call_log(&self) -> Vec<&'static str> {
        lock(&self.state).calls.clone()
    }

    pub fn queued_buffers(&self) -> usize {
        lock(&self.state).queued.len()
    }

    /// Addresses of the queued buffers, oldest first.
    pub fn queued_buffer_addrs(&self) -> Vec<usize> {
        lock(&self.state)
            .queued
            .iter()
            .map(|b| b.as_ptr() as usize)
            .collect()
    }

    pub fn queued_buffer_lens(&self) -> Vec<usize> {
        lock(&self.state).queued.iter().map(Vec::len).collect()
    }

    pub fn committed_parameters(&self) -> Option<CameraParameters> {
        lock(&self.state).committed.clone()
    }

    pub fn display_orientation(&self) -> Option<u32> {
        lock(&self.state).orientation
    }

    pub fn preview_surface(&self) -> Option<SurfaceHandle> {
        lock(&self.state).surface
    }

    pub fn preview_texture(&self) -> Option<TextureHandle> {
        lock(&self.state).texture
    }

    pub fn has_frame_callback(&self) -> bool {
        lock(&self.state).callback.is_some()
    }

    /// Fill the oldest queued buffer and hand it to the frame callback.
    /// Returns the buffer's address, or `None` when nothing was delivered.
    pub fn deliver_frame(&self) -> Option<usize> {
        let (mut buffer, callback, frame, size) = {
            let mut state = lock(&self.state);
            let callback = state.callback.clone()?;
            let buffer = state.queued.pop_front()?;
            state.frames += 1;
            let size = state
                .committed
                .as_ref()
                .or(state.parameters.as_ref())
                .map(CameraParameters::preview_size)
                .unwrap_or(PreviewSize::new(0, 0));
            (buffer, callback, state.frames, size)
        };
        fill_preview_frame(&mut buffer, frame, size);
        let addr = buffer.as_ptr() as usize;
        callback.on_preview_frame(buffer, self);
        Some(addr)
    }

    fn record(&self, method: &'static str) -> Result<(), CameraError> {
        let mut state = lock(&self.state);
        state.calls.push(method);
        match state.failures.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl CameraDevice for FakeDevice {
    fn parameters(&self) -> Result<Option<CameraParameters>, CameraError> {
        self.record("parameters")?;
        let state = lock(&self.state);
        Ok(state.committed.clone().or_else(|| state.parameters.clone()))
    }

    fn set_parameters(&self, parameters: &CameraParameters) -> Result<(), CameraError> {
        self.record("set_parameters")?;
        lock(&self.state).committed = Some(parameters.clone());
        Ok(())
    }

    fn set_display_orientation(&self, degrees: u32) -> Result<(), CameraError> {
        self.record("set_display_orientation")?;
        lock(&self.state).orientation = Some(degrees);
        Ok(())
    }

    fn set_preview_display(&self, surface: SurfaceHandle) -> Result<(), CameraError> {
        self.record("set_preview_display")?;
        lock(&self.state).surface = Some(surface);
        Ok(())
    }

    fn set_preview_texture(&self, texture: TextureHandle) -> Result<(), CameraError> {
        self.record("set_preview_texture")?;
        lock(&self.state).texture = Some(texture);
        Ok(())
    }

    fn start_preview(&self) -> Result<(), CameraError> {
        self.record("start_preview")
    }

    fn stop_preview(&self) -> Result<(), CameraError> {
        self.record("stop_preview")
    }

    fn add_callback_buffer(&self, buffer: Vec<u8>) {
        let mut state = lock(&self.state);
        state.calls.push("add_callback_buffer");
        state.queued.push_back(buffer);
    }

    fn set_preview_callback_with_buffer(&self, callback: Option<Arc<dyn PreviewCallback>>) {
        let mut state = lock(&self.state);
        state.calls.push("set_preview_callback_with_buffer");
        state.callback = callback;
    }

    fn release(&self) -> Result<(), CameraError> {
        self.record("release")?;
        let mut state = lock(&self.state);
        state.queued.clear();
        state.callback = None;
        Ok(())
    }
}

/// A fake camera stack with a fixed device behind every camera id.
#[derive(Default)]
pub struct FakeDriver {
    cameras: Vec<CameraInfo>,
    device: Option<FakeDevice>,
    open_error: Option<CameraError>,
    opened: Mutex<Vec<u32>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(mut self, info: CameraInfo) -> Self {
        self.cameras.push(info);
        self
    }

    /// The device handed out by `open`.
    pub fn with_device(mut self, device: FakeDevice) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_open_error(mut self, error: CameraError) -> Self {
        self.open_error = Some(error);
        self
    }

    /// Camera ids passed to `open`, in order.
    pub fn opened_ids(&self) -> Vec<u32> {
        lock(&self.opened).clone()
    }
}

impl CameraDriver for FakeDriver {
    fn number_of_cameras(&self) -> u32 {
        self.cameras.len() as u32
    }

    fn camera_info(&self, camera_id: u32) -> Result<CameraInfo, CameraError> {
        self.cameras
            .get(camera_id as usize)
            .copied()
            .ok_or_else(|| CameraError::InvalidParameter(format!("no camera with id {}", camera_id)))
    }

    fn open(&self, camera_id: u32) -> Result<Box<dyn CameraDevice>, CameraError> {
        lock(&self.opened).push(camera_id);
        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }
        match &self.device {
            Some(device) => Ok(Box::new(device.clone())),
            None => Err(CameraError::OpenFailed(format!("camera {} not present", camera_id))),
        }
    }
}

/// A windowed surface whose lifecycle is driven by the test.
pub struct FakeWindowSurface {
    holder: Option<SurfaceHandle>,
    callbacks: Mutex<Vec<Arc<dyn WindowSurfaceCallback>>>,
}

impl FakeWindowSurface {
    pub fn new(holder: Option<SurfaceHandle>) -> Self {
        Self {
            holder,
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn callback_count(&self) -> usize {
        lock(&self.callbacks).len()
    }

    pub fn emit_created(&self) {
        let callbacks = lock(&self.callbacks).clone();
        for callback in callbacks {
            callback.surface_created();
        }
    }

    pub fn emit_changed(&self, width: u32, height: u32) {
        let callbacks = lock(&self.callbacks).clone();
        for callback in callbacks {
            callback.surface_changed(width, height);
        }
    }

    pub fn emit_destroyed(&self) {
        let callbacks = lock(&self.callbacks).clone();
        for callback in callbacks {
            callback.surface_destroyed();
        }
    }
}

impl WindowSurface for FakeWindowSurface {
    fn holder(&self) -> Option<SurfaceHandle> {
        self.holder
    }

    fn add_callback(&self, callback: Arc<dyn WindowSurfaceCallback>) {
        lock(&self.callbacks).push(callback);
    }
}

struct TextureState {
    texture: Option<TextureHandle>,
    listener: Option<Arc<dyn TextureListener>>,
}

/// A texture-backed surface. It is available exactly when it has a texture.
pub struct FakeTextureSurface {
    state: Mutex<TextureState>,
}

impl FakeTextureSurface {
    pub fn new(texture: Option<TextureHandle>) -> Self {
        Self {
            state: Mutex::new(TextureState {
                texture,
                listener: None,
            }),
        }
    }

    pub fn has_listener(&self) -> bool {
        lock(&self.state).listener.is_some()
    }

    pub fn emit_available(&self, texture: TextureHandle, width: u32, height: u32) {
        let listener = {
            let mut state = lock(&self.state);
            state.texture = Some(texture);
            state.listener.clone()
        };
        if let Some(listener) = listener {
            listener.texture_available(width, height);
        }
    }

    pub fn emit_size_changed(&self, width: u32, height: u32) {
        let listener = lock(&self.state).listener.clone();
        if let Some(listener) = listener {
            listener.texture_size_changed(width, height);
        }
    }

    pub fn emit_updated(&self) {
        let listener = lock(&self.state).listener.clone();
        if let Some(listener) = listener {
            listener.texture_updated();
        }
    }

    /// Returns what the listener answered, or false without a listener.
    pub fn emit_destroyed(&self) -> bool {
        let listener = {
            let mut state = lock(&self.state);
            state.texture = None;
            state.listener.clone()
        };
        listener.map_or(false, |l| l.texture_destroyed())
    }
}

impl TextureSurface for FakeTextureSurface {
    fn surface_texture(&self) -> Option<TextureHandle> {
        lock(&self.state).texture
    }

    fn is_available(&self) -> bool {
        lock(&self.state).texture.is_some()
    }

    fn set_texture_listener(&self, listener: Arc<dyn TextureListener>) {
        lock(&self.state).listener = Some(listener);
    }
}
