//! Presentation targets and the surface event bridge
//!
//! A preview can be drawn either on a windowed surface or on a texture-backed
//! surface. Both report their lifecycle through different callback families;
//! [`SurfaceBridge`] folds them into the two events a session cares about.

use crate::errors::CameraError;
use crate::platform::{CameraDevice, SurfaceHandle, TextureHandle};
use std::fmt;
use std::sync::Arc;

/// The two events a session reacts to, whatever the target kind.
pub trait SurfaceListener: Send + Sync {
    fn on_available(&self);
    fn on_destroyed(&self);
}

/// Lifecycle callbacks emitted by a windowed surface.
pub trait WindowSurfaceCallback: Send + Sync {
    fn surface_created(&self);
    fn surface_changed(&self, width: u32, height: u32);
    fn surface_destroyed(&self);
}

/// Lifecycle callbacks emitted by a texture-backed surface.
pub trait TextureListener: Send + Sync {
    fn texture_available(&self, width: u32, height: u32);
    fn texture_size_changed(&self, width: u32, height: u32);
    /// Returns true when the texture may be released by its owner.
    fn texture_destroyed(&self) -> bool;
    fn texture_updated(&self);
}

pub trait WindowSurface: Send + Sync {
    /// The drawable surface, if the windowing system has one yet.
    fn holder(&self) -> Option<SurfaceHandle>;
    fn add_callback(&self, callback: Arc<dyn WindowSurfaceCallback>);
}

pub trait TextureSurface: Send + Sync {
    /// The backing texture; absent until the view is attached.
    fn surface_texture(&self) -> Option<TextureHandle>;
    fn is_available(&self) -> bool;
    fn set_texture_listener(&self, listener: Arc<dyn TextureListener>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Windowed,
    Texture,
}

/// A presentation target a session can bind to.
#[derive(Clone)]
pub enum PreviewTarget {
    Windowed(Arc<dyn WindowSurface>),
    Texture(Arc<dyn TextureSurface>),
}

impl PreviewTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            PreviewTarget::Windowed(_) => TargetKind::Windowed,
            PreviewTarget::Texture(_) => TargetKind::Texture,
        }
    }

    /// Whether the target already reports itself ready for frames.
    /// Windowed surfaces only ever signal readiness through events.
    pub fn is_ready(&self) -> bool {
        match self {
            PreviewTarget::Windowed(_) => false,
            PreviewTarget::Texture(texture) => texture.is_available(),
        }
    }

    /// Route this target's lifecycle events to `listener`.
    pub fn subscribe(&self, listener: Arc<dyn SurfaceListener>) {
        let bridge = Arc::new(SurfaceBridge::new(listener));
        match self {
            PreviewTarget::Windowed(surface) => surface.add_callback(bridge),
            PreviewTarget::Texture(texture) => texture.set_texture_listener(bridge),
        }
    }

    /// Hand the underlying surface to the camera if one exists yet.
    /// Returns whether anything was attached.
    pub(crate) fn attach(&self, camera: &dyn CameraDevice) -> Result<bool, CameraError> {
        match self {
            PreviewTarget::Windowed(surface) => match surface.holder() {
                Some(holder) => camera.set_preview_display(holder).map(|_| true),
                None => Ok(false),
            },
            PreviewTarget::Texture(texture) => match texture.surface_texture() {
                Some(handle) => camera.set_preview_texture(handle).map(|_| true),
                None => Ok(false),
            },
        }
    }
}

impl fmt::Debug for PreviewTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewTarget").field(&self.kind()).finish()
    }
}

/// Stateless translator from both callback families to [`SurfaceListener`].
pub struct SurfaceBridge {
    listener: Arc<dyn SurfaceListener>,
}

impl SurfaceBridge {
    pub fn new(listener: Arc<dyn SurfaceListener>) -> Self {
        Self { listener }
    }
}

impl WindowSurfaceCallback for SurfaceBridge {
    fn surface_created(&self) {
        self.listener.on_available();
    }

    fn surface_changed(&self, _width: u32, _height: u32) {}

    fn surface_destroyed(&self) {
        self.listener.on_destroyed();
    }
}

impl TextureListener for SurfaceBridge {
    fn texture_available(&self, _width: u32, _height: u32) {
        self.listener.on_available();
    }

    fn texture_size_changed(&self, _width: u32, _height: u32) {}

    fn texture_destroyed(&self) -> bool {
        self.listener.on_destroyed();
        true
    }

    fn texture_updated(&self) {}
}
