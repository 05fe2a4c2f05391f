use crate::config::SessionConfig;
use crate::errors::CameraError;
use crate::negotiate::CapabilityNegotiator;
use crate::platform::{CameraDevice, CameraDriver, PreviewCallback};
use crate::session::buffers::{preview_buffer_size, BufferPool, CALLBACK_BUFFER_COUNT};
use crate::session::errors::{
    BindSurfaceError, OpenCameraError, OpenFailedReason, StartPreviewError,
};
use crate::surface::{PreviewTarget, SurfaceListener, TextureSurface, WindowSurface};
use crate::types::{FocusMode, FpsRange, PixelFormat, PreviewSize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use uuid::Uuid;

/// Receives every preview frame. The slice is only valid for the duration of
/// the call; once every listener has returned, or one of them panics, the
/// buffer is handed back to the hardware.
pub trait PreviewFrameListener: Send + Sync {
    fn on_preview_frame(&self, data: &[u8]);
}

impl<F> PreviewFrameListener for F
where
    F: Fn(&[u8]) + Send + Sync,
{
    fn on_preview_frame(&self, data: &[u8]) {
        self(data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Opened,
    SurfaceBound,
    Previewing,
}

/// Parameters the device accepted during `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedParameters {
    pub fps_range: FpsRange,
    pub preview_size: PreviewSize,
    pub preview_format: PixelFormat,
    pub focus_mode: FocusMode,
    pub display_orientation: u32,
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State reachable from the hardware callback thread.
struct Shared {
    id: Uuid,
    camera: Mutex<Option<Arc<dyn CameraDevice>>>,
    target: Mutex<Option<PreviewTarget>>,
    opened: AtomicBool,
    surface_bound: AtomicBool,
    surface_attached: AtomicBool,
    surface_ready: AtomicBool,
    start_pending: AtomicBool,
    previewing: AtomicBool,
    listeners: RwLock<Vec<Arc<dyn PreviewFrameListener>>>,
}

impl Shared {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            camera: Mutex::new(None),
            target: Mutex::new(None),
            opened: AtomicBool::new(false),
            surface_bound: AtomicBool::new(false),
            surface_attached: AtomicBool::new(false),
            surface_ready: AtomicBool::new(false),
            start_pending: AtomicBool::new(false),
            previewing: AtomicBool::new(false),
            listeners: RwLock::new(Vec::new()),
        }
    }

    fn camera(&self) -> Option<Arc<dyn CameraDevice>> {
        lock(&self.camera).clone()
    }

    fn target(&self) -> Option<PreviewTarget> {
        lock(&self.target).clone()
    }

    fn listeners(&self) -> Vec<Arc<dyn PreviewFrameListener>> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reset_flags(&self) {
        self.opened.store(false, Ordering::SeqCst);
        self.surface_bound.store(false, Ordering::SeqCst);
        self.surface_attached.store(false, Ordering::SeqCst);
        self.surface_ready.store(false, Ordering::SeqCst);
        self.start_pending.store(false, Ordering::SeqCst);
        self.previewing.store(false, Ordering::SeqCst);
    }

    /// Best effort: failures here are logged and never recorded.
    fn surface_available(&self) {
        self.surface_ready.store(true, Ordering::SeqCst);

        let Some(camera) = self.camera() else {
            log::debug!("Session {}: surface available with no open camera", self.id);
            return;
        };

        if !self.surface_attached.load(Ordering::SeqCst) {
            if let Some(target) = self.target() {
                match target.attach(camera.as_ref()) {
                    Ok(attached) => self.surface_attached.store(attached, Ordering::SeqCst),
                    Err(e) => log::warn!(
                        "Session {}: attaching surface on availability failed: {}",
                        self.id,
                        e
                    ),
                }
            }
        }

        if self.start_pending.load(Ordering::SeqCst) {
            match camera.start_preview() {
                Ok(()) => {
                    self.previewing.store(true, Ordering::SeqCst);
                    log::info!("Session {}: deferred preview started", self.id);
                }
                Err(e) => log::warn!(
                    "Session {}: deferred preview start failed: {}",
                    self.id,
                    e
                ),
            }
        }
    }

    fn surface_destroyed(&self) {
        log::debug!("Session {}: surface destroyed", self.id);
        self.surface_ready.store(false, Ordering::SeqCst);
        // a recreated surface has a new handle and must be attached again
        self.surface_attached.store(false, Ordering::SeqCst);
    }
}

/// Surface events routed back into the session.
struct SessionEvents {
    shared: Weak<Shared>,
}

impl SurfaceListener for SessionEvents {
    fn on_available(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.surface_available();
        }
    }

    fn on_destroyed(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.surface_destroyed();
        }
    }
}

/// Fans each filled buffer out to the listeners, then hands it back to the
/// hardware.
struct FrameDispatcher {
    shared: Weak<Shared>,
}

impl PreviewCallback for FrameDispatcher {
    fn on_preview_frame(&self, buffer: Vec<u8>, camera: &dyn CameraDevice) {
        let frame = RequeueOnDrop {
            buffer: Some(buffer),
            camera,
        };
        if let Some(shared) = self.shared.upgrade() {
            for listener in shared.listeners() {
                listener.on_preview_frame(frame.data());
            }
        }
    }
}

/// Lends a delivered buffer to the listeners and returns it to the hardware
/// queue when dropped, including during unwinding.
struct RequeueOnDrop<'a> {
    buffer: Option<Vec<u8>>,
    camera: &'a dyn CameraDevice,
}

impl RequeueOnDrop<'_> {
    fn data(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or_default()
    }
}

impl Drop for RequeueOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.camera.add_callback_buffer(buffer);
        }
    }
}

fn step(reason: OpenFailedReason) -> impl FnOnce(CameraError) -> OpenCameraError {
    move |cause| OpenCameraError::new(reason, Some(cause))
}

/// One camera bound to at most one presentation target.
///
/// Control calls (`open`, `bind_*`, `start_preview`, `close`, listener
/// management) belong to a single control thread. Frames and surface events
/// may arrive from the hardware callback thread at any time; callers must not
/// run `close` concurrently with frame delivery.
pub struct CameraSession {
    driver: Arc<dyn CameraDriver>,
    negotiator: Arc<dyn CapabilityNegotiator>,
    config: Option<SessionConfig>,
    shared: Arc<Shared>,
    pool: Option<BufferPool>,
    frame_callback_set: bool,
    negotiated: Option<NegotiatedParameters>,
    open_failure: Option<OpenCameraError>,
    bind_failure: Option<BindSurfaceError>,
    preview_failure: Option<StartPreviewError>,
}

impl CameraSession {
    pub fn new(driver: Arc<dyn CameraDriver>, negotiator: Arc<dyn CapabilityNegotiator>) -> Self {
        Self {
            driver,
            negotiator,
            config: None,
            shared: Arc::new(Shared::new()),
            pool: None,
            frame_callback_set: false,
            negotiated: None,
            open_failure: None,
            bind_failure: None,
            preview_failure: None,
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Takes effect on the next `open`.
    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = Some(config);
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn session_id(&self) -> Uuid {
        self.shared.id
    }

    /// Open the configured camera and negotiate its parameters.
    ///
    /// On failure the device is released again and the failing step is
    /// available from [`CameraSession::open_error`].
    pub fn open(&mut self) -> bool {
        if self.shared.camera().is_some() {
            log::warn!(
                "Session {}: open called with a camera already open, closing it first",
                self.shared.id
            );
            self.close();
        }
        self.reset();

        let Some(config) = self.config.clone() else {
            log::error!("Session {}: open failed, no configuration set", self.shared.id);
            self.open_failure = Some(OpenCameraError::new(OpenFailedReason::ParameterError, None));
            return false;
        };
        if let Err(e) = config.validate() {
            log::error!("Session {}: open failed, invalid configuration: {}", self.shared.id, e);
            self.open_failure = Some(OpenCameraError::new(
                OpenFailedReason::ParameterError,
                Some(CameraError::Config(e)),
            ));
            return false;
        }

        let camera: Arc<dyn CameraDevice> = match self.driver.open(config.camera_id) {
            Ok(camera) => Arc::from(camera),
            Err(e) => {
                log::error!("Session {}: open camera {} failed: {}", self.shared.id, config.camera_id, e);
                self.open_failure = Some(OpenCameraError::new(OpenFailedReason::OpenFailed, Some(e)));
                return false;
            }
        };

        match self.configure(camera.as_ref(), &config) {
            Ok(negotiated) => {
                *lock(&self.shared.camera) = Some(camera);
                self.negotiated = Some(negotiated);
                self.shared.opened.store(true, Ordering::SeqCst);
                log::info!(
                    "Session {}: camera {} open, preview {} {} at {}, orientation {}",
                    self.shared.id,
                    config.camera_id,
                    negotiated.preview_size,
                    negotiated.preview_format,
                    negotiated.fps_range,
                    negotiated.display_orientation
                );
                true
            }
            Err(err) => {
                match &err.cause {
                    Some(cause) => log::error!("Session {}: {}: {}", self.shared.id, err, cause),
                    None => log::error!("Session {}: {}", self.shared.id, err),
                }
                if let Err(e) = camera.release() {
                    log::warn!("Session {}: releasing camera after failed open: {}", self.shared.id, e);
                }
                self.open_failure = Some(err);
                false
            }
        }
    }

    fn configure(
        &self,
        camera: &dyn CameraDevice,
        config: &SessionConfig,
    ) -> Result<NegotiatedParameters, OpenCameraError> {
        use OpenFailedReason::*;

        let mut parameters = camera
            .parameters()
            .map_err(step(GetParameterFailed))?
            .ok_or_else(|| OpenCameraError::new(GetParameterFailed, None))?;

        if let Some(preferred) = config.preferred_fps {
            let range = self
                .negotiator
                .closest_fps_range(&parameters, preferred)
                .map_err(step(SetFpsFailed))?;
            parameters
                .set_preview_fps_range(range)
                .map_err(step(SetFpsFailed))?;
        }

        if let Some(preferred) = config.preferred_preview_size {
            let size = self
                .negotiator
                .closest_preview_size(&parameters, preferred)
                .map_err(step(SetPreviewSizeFailed))?;
            parameters
                .set_preview_size(size)
                .map_err(step(SetPreviewSizeFailed))?;
        }

        if let Some(format) = config.preview_format {
            parameters
                .set_preview_format(format)
                .map_err(step(SetPreviewFormatFailed))?;
        }

        if config.auto_focus {
            let supported = parameters
                .supported_focus_modes()
                .map_err(step(SetAutoFocusFailed))?;
            let mode = [FocusMode::ContinuousVideo, FocusMode::Auto]
                .into_iter()
                .find(|mode| supported.contains(mode));
            if let Some(mode) = mode {
                parameters
                    .set_focus_mode(mode)
                    .map_err(step(SetAutoFocusFailed))?;
            }
        }

        camera
            .set_parameters(&parameters)
            .map_err(step(SetParameterFailed))?;

        let orientation = match config.display_orientation {
            Some(degrees) => degrees,
            None => self
                .negotiator
                .display_orientation(self.driver.as_ref(), config.camera_id, config.facing)
                .map_err(step(SetDisplayOrientationFailed))?,
        };
        camera
            .set_display_orientation(orientation)
            .map_err(step(SetDisplayOrientationFailed))?;

        Ok(NegotiatedParameters {
            fps_range: parameters.preview_fps_range(),
            preview_size: parameters.preview_size(),
            preview_format: parameters.preview_format(),
            focus_mode: parameters.focus_mode(),
            display_orientation: orientation,
        })
    }

    pub fn open_error(&self) -> Option<OpenCameraError> {
        self.open_failure.clone()
    }

    /// Register a frame listener and start feeding callback buffers to the
    /// hardware. The buffer pool is allocated on the first call.
    pub fn install_preview_callback(&mut self, listener: Arc<dyn PreviewFrameListener>) -> bool {
        if !self.shared.opened.load(Ordering::SeqCst) {
            return false;
        }
        let Some(camera) = self.shared.camera() else {
            return false;
        };

        if self.pool.is_none() {
            let size = match self.config.as_ref().and_then(|c| c.preview_buffer_size) {
                Some(size) => size,
                None => match derive_buffer_size(camera.as_ref()) {
                    Ok(size) => size,
                    Err(e) => {
                        log::error!(
                            "Session {}: cannot size preview buffers: {}",
                            self.shared.id,
                            e
                        );
                        return false;
                    }
                },
            };
            self.pool = Some(BufferPool::allocate(size, CALLBACK_BUFFER_COUNT));
        }
        if let Some(pool) = self.pool.as_mut() {
            pool.submit_all(camera.as_ref());
        }

        self.shared
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);

        if !self.frame_callback_set {
            camera.set_preview_callback_with_buffer(Some(Arc::new(FrameDispatcher {
                shared: Arc::downgrade(&self.shared),
            })));
            self.frame_callback_set = true;
        }
        true
    }

    /// Remove the first registration of `listener`. Listeners match by
    /// identity, not by value.
    pub fn uninstall_preview_callback(&mut self, listener: &Arc<dyn PreviewFrameListener>) -> bool {
        let mut listeners = self
            .shared
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let target = Arc::as_ptr(listener) as *const ();
        match listeners
            .iter()
            .position(|l| Arc::as_ptr(l) as *const () == target)
        {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn bind_surface(&mut self, surface: Arc<dyn WindowSurface>) -> bool {
        self.bind(PreviewTarget::Windowed(surface))
    }

    pub fn bind_texture(&mut self, texture: Arc<dyn TextureSurface>) -> bool {
        self.bind(PreviewTarget::Texture(texture))
    }

    /// Bind the preview to `target`. Only one target per open camera; a
    /// failed bind still occupies the slot until `close`.
    pub fn bind(&mut self, target: PreviewTarget) -> bool {
        if !self.shared.opened.load(Ordering::SeqCst) {
            return false;
        }
        let Some(camera) = self.shared.camera() else {
            return false;
        };
        {
            let mut slot = lock(&self.shared.target);
            if slot.is_some() {
                log::debug!("Session {}: surface already bound", self.shared.id);
                return false;
            }
            *slot = Some(target.clone());
        }

        if self.handles_surface_events() {
            target.subscribe(Arc::new(SessionEvents {
                shared: Arc::downgrade(&self.shared),
            }));
        }

        match target.attach(camera.as_ref()) {
            Ok(attached) => {
                self.shared.surface_attached.store(attached, Ordering::SeqCst);
                self.shared.surface_bound.store(true, Ordering::SeqCst);
                log::debug!(
                    "Session {}: bound {:?} target (attached now: {})",
                    self.shared.id,
                    target.kind(),
                    attached
                );
                true
            }
            Err(e) => {
                log::error!("Session {}: bind {:?} failed: {}", self.shared.id, target.kind(), e);
                self.bind_failure = Some(BindSurfaceError::from_cause(e));
                false
            }
        }
    }

    pub fn bind_error(&self) -> Option<BindSurfaceError> {
        self.bind_failure.clone()
    }

    /// Start the preview, or arm a deferred start when surface events are
    /// handled and the target is not ready yet.
    pub fn start_preview(&mut self) -> bool {
        if !self.shared.opened.load(Ordering::SeqCst)
            || !self.shared.surface_bound.load(Ordering::SeqCst)
        {
            return false;
        }
        let Some(camera) = self.shared.camera() else {
            return false;
        };

        if self.shared.target().is_some_and(|t| t.is_ready()) {
            self.shared.surface_ready.store(true, Ordering::SeqCst);
        }

        if !self.shared.surface_ready.load(Ordering::SeqCst) && self.handles_surface_events() {
            self.shared.start_pending.store(true, Ordering::SeqCst);
            log::debug!("Session {}: surface not ready, preview start deferred", self.shared.id);
            return true;
        }

        match camera.start_preview() {
            Ok(()) => {
                self.shared.previewing.store(true, Ordering::SeqCst);
                log::info!("Session {}: preview started", self.shared.id);
                true
            }
            Err(e) => {
                log::error!("Session {}: start preview failed: {}", self.shared.id, e);
                self.preview_failure = Some(StartPreviewError::from_cause(e));
                false
            }
        }
    }

    pub fn preview_error(&self) -> Option<StartPreviewError> {
        self.preview_failure.clone()
    }

    /// Stop the hardware preview and drop any deferred start. The camera stays
    /// open and bound.
    pub fn stop_preview(&mut self) -> bool {
        let Some(camera) = self.shared.camera() else {
            return false;
        };
        self.shared.start_pending.store(false, Ordering::SeqCst);
        if !self.shared.previewing.swap(false, Ordering::SeqCst) {
            return true;
        }
        match camera.stop_preview() {
            Ok(()) => {
                log::info!("Session {}: preview stopped", self.shared.id);
                true
            }
            Err(e) => {
                log::error!("Session {}: stop preview failed: {}", self.shared.id, e);
                false
            }
        }
    }

    /// Feed a surface-available event in directly, for callers that track
    /// surface lifecycle themselves.
    pub fn on_surface_available(&self) {
        self.shared.surface_available();
    }

    pub fn on_surface_destroyed(&self) {
        self.shared.surface_destroyed();
    }

    /// Release the camera. Session state is reset even when the release call
    /// fails; registered listeners are kept.
    pub fn close(&mut self) -> bool {
        let Some(camera) = lock(&self.shared.camera).take() else {
            return false;
        };

        camera.set_preview_callback_with_buffer(None);
        let released = camera.release();
        self.reset();

        match released {
            Ok(()) => {
                log::info!("Session {}: camera closed", self.shared.id);
                true
            }
            Err(e) => {
                log::error!("Session {}: close camera failed: {}", self.shared.id, e);
                false
            }
        }
    }

    fn reset(&mut self) {
        self.shared.reset_flags();
        *lock(&self.shared.target) = None;
        self.pool = None;
        self.frame_callback_set = false;
        self.negotiated = None;
        self.open_failure = None;
        self.bind_failure = None;
        self.preview_failure = None;
    }

    fn handles_surface_events(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.handle_surface_events)
    }

    pub fn state(&self) -> SessionState {
        if !self.shared.opened.load(Ordering::SeqCst) {
            SessionState::Idle
        } else if self.shared.previewing.load(Ordering::SeqCst) {
            SessionState::Previewing
        } else if self.shared.surface_bound.load(Ordering::SeqCst) {
            SessionState::SurfaceBound
        } else {
            SessionState::Opened
        }
    }

    pub fn is_open(&self) -> bool {
        self.shared.opened.load(Ordering::SeqCst)
    }

    pub fn is_surface_bound(&self) -> bool {
        self.shared.surface_bound.load(Ordering::SeqCst)
    }

    pub fn is_surface_ready(&self) -> bool {
        self.shared.surface_ready.load(Ordering::SeqCst)
    }

    /// Whether a deferred preview start is armed.
    pub fn is_start_pending(&self) -> bool {
        self.shared.start_pending.load(Ordering::SeqCst)
    }

    pub fn negotiated(&self) -> Option<NegotiatedParameters> {
        self.negotiated
    }

    pub fn listener_count(&self) -> usize {
        self.shared
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Size of each callback buffer once the pool exists.
    pub fn callback_buffer_size(&self) -> Option<usize> {
        self.pool.as_ref().map(BufferPool::buffer_size)
    }

    /// The open device, for collaborators that need direct hardware access.
    pub fn native_camera(&self) -> Option<Arc<dyn CameraDevice>> {
        self.shared.camera()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if self.shared.camera().is_some() && !self.close() {
            log::warn!("Session {}: camera release failed in drop", self.shared.id);
        }
    }
}

fn derive_buffer_size(camera: &dyn CameraDevice) -> Result<usize, CameraError> {
    let parameters = camera
        .parameters()?
        .ok_or_else(|| CameraError::Hardware("no parameters available".to_string()))?;
    let format = parameters.preview_format();
    let size = parameters.preview_size();
    let bytes = preview_buffer_size(format, size).ok_or_else(|| {
        CameraError::Unsupported(format!("no fixed frame size for {}", format))
    })?;
    log::debug!(
        "Preview buffer size {} bytes for {} {} ({:?} bpp)",
        bytes,
        format,
        size,
        format.bits_per_pixel()
    );
    Ok(bytes)
}
