//! Surface collaborator seam.
//!
//! The native windowing layer and the rendering engine live outside this
//! crate. The coordinator reaches them through `SurfaceBackend`: create
//! and destroy native surfaces, and answer frame/monitor/DPI queries.
//! Platform adapters implement this trait; tests use the headless
//! implementation in `platform::api`.

use crate::core::geometry::{Point, Rect, Size};
use crate::core::window::Archetype;

/// Identifier the rendering engine assigns to a view at surface creation.
pub type ViewId = i64;

/// Opaque handle to a native window, owned by exactly one window record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(u64);

impl NativeHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Everything the native layer needs to create a surface.
#[derive(Debug, Clone)]
pub struct SurfaceSpec {
    pub title: String,
    /// Top-left corner in logical units.
    pub origin: Point,
    /// Client size in logical units.
    pub size: Size,
    pub archetype: Archetype,
    /// Native parent for transient surfaces.
    pub parent: Option<NativeHandle>,
}

/// Result of a successful surface creation.
#[derive(Debug, Clone, Copy)]
pub struct CreatedSurface {
    pub view_id: ViewId,
    pub handle: NativeHandle,
}

/// Native windowing collaborator.
///
/// Creation and destruction are synchronous and bounded; there is no
/// cancellation. The destroy path may re-enter the coordinator (native
/// close callbacks), so the coordinator never holds its lock across
/// these calls.
pub trait SurfaceBackend: Send + Sync {
    /// Create a native surface. `None` when the native layer fails.
    fn create_surface(&self, spec: SurfaceSpec) -> Option<CreatedSurface>;

    /// Destroy a native surface. Best effort; `false` for a stale handle.
    fn destroy_surface(&self, handle: NativeHandle) -> bool;

    /// Device-space frame of a live surface.
    fn surface_frame(&self, handle: NativeHandle) -> Option<Rect>;

    /// Device-space bounds of the monitor the surface sits on.
    fn monitor_frame(&self, handle: NativeHandle) -> Rect;

    /// Device-space bounds of the monitor nearest a point.
    fn monitor_frame_at(&self, point: Point) -> Rect;

    /// DPI scale of the monitor the surface sits on (device px per logical unit).
    fn scale_factor(&self, handle: NativeHandle) -> f64;

    /// DPI scale of the monitor nearest a point.
    fn scale_factor_at(&self, point: Point) -> f64;
}
